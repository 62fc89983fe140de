//! Input bar component
//!
//! Text input, mic toggle, ID-photo upload, and the send button. Every
//! control that triggers a network round trip disables while that operation
//! is in flight.

use crate::ui::state::{AppState, RecordingState};
use crate::ui::theme::Theme;
use egui::{self, Key, RichText, Vec2};

pub struct InputBar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                if self.state.show_upload {
                    self.show_upload_row(ui);
                    ui.add_space(self.theme.spacing_sm);
                }

                ui.horizontal(|ui| {
                    self.show_record_button(ui);
                    self.show_upload_button(ui);
                    self.show_text_input(ui);
                    self.show_send_button(ui);
                });

                // Microphone problems are persistent and instructive, not a
                // passing toast
                if let Some(mic_error) = self.state.mic_error.clone() {
                    ui.add_space(4.0);
                    ui.label(RichText::new(mic_error).size(12.0).color(self.theme.error));
                }
            });
    }

    fn show_record_button(&mut self, ui: &mut egui::Ui) {
        let (icon, tooltip, color) = match self.state.recording_state {
            RecordingState::Idle => ("🎤", "Start recording", self.theme.text_secondary),
            RecordingState::Recording => ("⏹", "Stop recording", self.theme.recording),
            RecordingState::Processing => ("⏳", "Transcribing...", self.theme.warning),
        };
        let is_recording = self.state.recording_state == RecordingState::Recording;
        let is_processing = self.state.recording_state == RecordingState::Processing;

        let button = egui::Button::new(RichText::new(icon).size(18.0).color(color))
            .min_size(Vec2::splat(40.0))
            .rounding(self.theme.button_rounding);
        let button = if is_recording {
            button.fill(self.theme.recording.gamma_multiply(0.2))
        } else {
            button
        };

        let response = ui.add_enabled(!is_processing && self.state.session.is_some(), button);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, !is_processing, "Record voice")
        });

        let rect = response.rect;
        if response.on_hover_text(tooltip).clicked() {
            self.state.toggle_recording();
        }

        if is_recording {
            let t = ui.ctx().input(|input| input.time);
            let pulse = ((t * 3.0).sin() * 0.5 + 0.5) as f32;
            ui.painter().circle_stroke(
                rect.center(),
                rect.width() / 2.0 + 2.0 + pulse * 3.0,
                egui::Stroke::new(2.0 * pulse, self.theme.recording.gamma_multiply(1.0 - pulse * 0.5)),
            );
            ui.ctx().request_repaint();
        }
    }

    fn show_upload_button(&mut self, ui: &mut egui::Ui) {
        let button = egui::Button::new(RichText::new("🖼").size(16.0))
            .min_size(Vec2::splat(40.0))
            .rounding(self.theme.button_rounding);
        let response = ui.add_enabled(!self.state.is_uploading, button);
        if response.on_hover_text("رفع صورة الهوية").clicked() {
            self.state.show_upload = !self.state.show_upload;
        }
    }

    fn show_upload_row(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Image file:").size(12.0).color(self.theme.text_muted));

            let text_edit = egui::TextEdit::singleline(&mut self.state.upload_path)
                .hint_text("/path/to/id-photo.jpg")
                .desired_width(ui.available_width() - 90.0);
            ui.add_enabled(!self.state.is_uploading, text_edit);

            let can_upload =
                !self.state.upload_path.trim().is_empty() && !self.state.is_uploading;
            let response = ui.add_enabled(can_upload, egui::Button::new("Upload"));
            response.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::Button, can_upload, "Upload ID photo")
            });
            if response.clicked() {
                self.state.upload_photo();
            }
        });
    }

    fn show_text_input(&mut self, ui: &mut egui::Ui) {
        let busy = self.state.is_sending;
        let recording = self.state.recording_state != RecordingState::Idle;

        let available_width = ui.available_width() - 52.0;
        let text_edit = egui::TextEdit::singleline(&mut self.state.input_text)
            .hint_text("اكتب رسالتك هنا…")
            .desired_width(available_width)
            .margin(egui::Margin::symmetric(12.0, 8.0));

        let response = ui.add_enabled(!busy && !recording, text_edit);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, !busy, "Message input")
        });

        if response.has_focus() && !self.state.input_text.trim().is_empty() {
            let enter_pressed = ui.input(|input| input.key_pressed(Key::Enter));
            let shift_held = ui.input(|input| input.modifiers.shift);
            if enter_pressed && !shift_held {
                self.state.send_message();
            }
        }
    }

    fn show_send_button(&mut self, ui: &mut egui::Ui) {
        let can_send = !self.state.input_text.trim().is_empty()
            && !self.state.is_sending
            && self.state.recording_state == RecordingState::Idle;

        let fill = if can_send {
            self.theme.primary
        } else {
            self.theme.text_muted
        };
        let button = egui::Button::new(
            RichText::new("➤").size(16.0).color(egui::Color32::WHITE),
        )
        .min_size(Vec2::splat(40.0))
        .rounding(self.theme.button_rounding)
        .fill(fill);

        let response = ui.add_enabled(can_send, button);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, can_send, "Send message")
        });
        if response.on_hover_text("Send message (Enter)").clicked() {
            self.state.send_message();
        }
    }
}
