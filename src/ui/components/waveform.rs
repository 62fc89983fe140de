//! Waveform visualization of the recording in progress

use crate::ui::theme::Theme;
use egui::{self, Pos2, Sense, Vec2};

pub struct Waveform<'a> {
    samples: &'a [f32],
    theme: &'a Theme,
    height: f32,
}

impl<'a> Waveform<'a> {
    pub fn new(samples: &'a [f32], theme: &'a Theme) -> Self {
        Self {
            samples,
            theme,
            height: 40.0,
        }
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let width = ui.available_width();
        let (rect, _) = ui.allocate_exact_size(Vec2::new(width, self.height), Sense::hover());
        let painter = ui.painter();

        painter.rect_filled(rect, 4.0, self.theme.bg_tertiary);

        if self.samples.is_empty() {
            return;
        }

        let bar_count = (width / 4.0).max(1.0) as usize;
        let samples_per_bar = (self.samples.len() / bar_count).max(1);
        let bar_width = rect.width() / bar_count as f32;
        let center_y = rect.center().y;
        let max_height = rect.height() * 0.85;

        for i in 0..bar_count {
            let start = i * samples_per_bar;
            if start >= self.samples.len() {
                break;
            }
            let end = (start + samples_per_bar).min(self.samples.len());

            let rms = (self.samples[start..end]
                .iter()
                .map(|s| s * s)
                .sum::<f32>()
                / (end - start) as f32)
                .sqrt();

            let bar_height = (rms * max_height * 4.0).clamp(1.0, max_height);
            let x = rect.left() + i as f32 * bar_width + bar_width * 0.5;

            painter.line_segment(
                [
                    Pos2::new(x, center_y - bar_height / 2.0),
                    Pos2::new(x, center_y + bar_height / 2.0),
                ],
                egui::Stroke::new(2.0, self.theme.waveform_active),
            );
        }
    }
}
