//! Theme and styling for the assistant UI
//!
//! Colors, rounding, and spacing used across all components. The palette
//! follows the Absher service colors (teal primary).

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Vec2, Visuals};

/// Application theme configuration
#[derive(Clone, Debug)]
pub struct Theme {
    /// Primary accent color (Absher teal)
    pub primary: Color32,
    /// Darker companion of the primary
    pub secondary: Color32,
    /// Success color
    pub success: Color32,
    /// Warning color
    pub warning: Color32,
    /// Error color
    pub error: Color32,

    /// Background colors
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,

    /// Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    /// Recording indicator color
    pub recording: Color32,

    /// Waveform colors
    pub waveform_active: Color32,
    pub waveform_inactive: Color32,

    /// Chat bubble fills
    pub user_bubble: Color32,
    pub assistant_bubble: Color32,

    /// Border radius for chat bubbles
    pub bubble_rounding: Rounding,
    /// Border radius for buttons
    pub button_rounding: Rounding,
    /// Border radius for cards/panels
    pub card_rounding: Rounding,

    /// Standard spacing
    pub spacing: f32,
    /// Large spacing
    pub spacing_lg: f32,
    /// Small spacing
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    /// The portal's light theme
    pub fn light() -> Self {
        Self {
            primary: Color32::from_rgb(15, 174, 158),   // Absher teal
            secondary: Color32::from_rgb(11, 127, 116), // Darker teal
            success: Color32::from_rgb(22, 163, 74),
            warning: Color32::from_rgb(202, 138, 4),
            error: Color32::from_rgb(220, 38, 38),

            bg_primary: Color32::from_rgb(246, 250, 249),
            bg_secondary: Color32::from_rgb(255, 255, 255),
            bg_tertiary: Color32::from_rgb(230, 239, 237),

            text_primary: Color32::from_rgb(31, 58, 55),
            text_secondary: Color32::from_rgb(55, 65, 81),
            text_muted: Color32::from_rgb(107, 114, 128),

            recording: Color32::from_rgb(220, 38, 38),

            waveform_active: Color32::from_rgb(15, 174, 158),
            waveform_inactive: Color32::from_rgb(156, 163, 175),

            user_bubble: Color32::from_rgb(15, 174, 158),
            assistant_bubble: Color32::from_rgb(255, 255, 255),

            bubble_rounding: Rounding::same(10.0),
            button_rounding: Rounding::same(8.0),
            card_rounding: Rounding::same(12.0),

            spacing: 16.0,
            spacing_lg: 24.0,
            spacing_sm: 8.0,
        }
    }

    /// Dark variant
    pub fn dark() -> Self {
        Self {
            primary: Color32::from_rgb(15, 174, 158),
            secondary: Color32::from_rgb(124, 225, 205),
            success: Color32::from_rgb(34, 197, 94),
            warning: Color32::from_rgb(234, 179, 8),
            error: Color32::from_rgb(239, 68, 68),

            bg_primary: Color32::from_rgb(17, 24, 39),
            bg_secondary: Color32::from_rgb(31, 41, 55),
            bg_tertiary: Color32::from_rgb(55, 65, 81),

            text_primary: Color32::from_rgb(249, 250, 251),
            text_secondary: Color32::from_rgb(209, 213, 219),
            text_muted: Color32::from_rgb(156, 163, 175),

            recording: Color32::from_rgb(239, 68, 68),

            waveform_active: Color32::from_rgb(15, 174, 158),
            waveform_inactive: Color32::from_rgb(75, 85, 99),

            user_bubble: Color32::from_rgb(11, 127, 116),
            assistant_bubble: Color32::from_rgb(31, 41, 55),

            bubble_rounding: Rounding::same(10.0),
            button_rounding: Rounding::same(8.0),
            card_rounding: Rounding::same(12.0),

            spacing: 16.0,
            spacing_lg: 24.0,
            spacing_sm: 8.0,
        }
    }

    /// Apply this theme to egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = if self.bg_primary.r() > 128 {
            Visuals::light()
        } else {
            Visuals::dark()
        };

        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.extreme_bg_color = self.bg_tertiary;

        visuals.widgets.noninteractive.bg_fill = self.bg_secondary;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        visuals.widgets.inactive.bg_fill = self.bg_tertiary;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        visuals.widgets.hovered.bg_fill = self.primary.gamma_multiply(0.8);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.active.bg_fill = self.primary;
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.selection.bg_fill = self.primary.gamma_multiply(0.3);
        visuals.selection.stroke = Stroke::new(1.0, self.primary);

        visuals.hyperlink_color = self.primary;

        visuals.window_rounding = self.card_rounding;
        visuals.window_stroke = Stroke::new(1.0, self.bg_tertiary);

        ctx.set_visuals(visuals);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.window_margin = egui::Margin::same(self.spacing);
        style.spacing.button_padding = Vec2::new(self.spacing, self.spacing_sm);

        style.text_styles.insert(
            egui::TextStyle::Heading,
            FontId::new(22.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Body,
            FontId::new(14.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Monospace,
            FontId::new(13.0, FontFamily::Monospace),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            FontId::new(14.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Small,
            FontId::new(12.0, FontFamily::Proportional),
        );

        ctx.set_style(style);
    }
}
