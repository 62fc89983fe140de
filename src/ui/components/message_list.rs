//! Message list component
//!
//! Displays the conversation transcript: chat bubbles, timestamps, uploaded
//! image markers, proposed-action hints, and a speak button on assistant
//! turns. An empty transcript shows the quick-start service shortcuts.

use crate::messages::Message;
use crate::ui::state::{AppState, QUICK_ACTIONS};
use crate::ui::theme::Theme;
use egui::{self, Align, Color32, RichText, Vec2};
use uuid::Uuid;

/// What the user did to the list this frame
#[derive(Default)]
pub struct MessageListActions {
    pub quick_action: Option<&'static str>,
    pub play_message: Option<Uuid>,
}

pub struct MessageList<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) -> MessageListActions {
        let mut actions = MessageListActions::default();
        let messages = self.state.messages.get_all();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.add_space(self.theme.spacing);

                    if messages.len() <= 1 {
                        self.show_quick_actions(ui, &mut actions);
                        ui.add_space(self.theme.spacing);
                    }

                    for message in &messages {
                        self.show_message(ui, message, &mut actions);
                        ui.add_space(self.theme.spacing_sm);
                    }

                    if self.state.is_sending || self.state.is_uploading {
                        self.show_typing_indicator(ui);
                    }

                    ui.add_space(self.theme.spacing);
                });
            });

        actions
    }

    fn show_quick_actions(&self, ui: &mut egui::Ui, actions: &mut MessageListActions) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.label(
                    RichText::new("ابدأ بسرعة · خدمات شائعة")
                        .size(12.0)
                        .color(self.theme.secondary),
                );
                ui.add_space(self.theme.spacing_sm);

                ui.horizontal_wrapped(|ui| {
                    for label in QUICK_ACTIONS {
                        let button = egui::Button::new(
                            RichText::new(label).size(13.0).color(self.theme.text_primary),
                        )
                        .fill(self.theme.bg_primary)
                        .rounding(self.theme.button_rounding)
                        .min_size(Vec2::new(0.0, 32.0));

                        let response = ui.add_enabled(!self.state.is_sending, button);
                        response.widget_info(|| {
                            egui::WidgetInfo::labeled(
                                egui::WidgetType::Button,
                                true,
                                &format!("Quick action: {}", label),
                            )
                        });
                        if response.clicked() {
                            actions.quick_action = Some(label);
                        }
                    }
                });
            });
    }

    fn show_message(&self, ui: &mut egui::Ui, message: &Message, actions: &mut MessageListActions) {
        let is_user = message.is_from_user();
        let bubble_color = if is_user {
            self.theme.user_bubble
        } else {
            self.theme.assistant_bubble
        };
        let text_color = if is_user {
            Color32::WHITE
        } else {
            self.theme.text_primary
        };
        let align = if is_user { Align::RIGHT } else { Align::LEFT };

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            ui.label(
                RichText::new(if is_user { "You" } else { "Assistant" })
                    .size(12.0)
                    .color(self.theme.text_muted),
            );
            ui.add_space(2.0);

            let max_width = ui.available_width() * 0.75;

            egui::Frame::none()
                .fill(bubble_color)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);

                    if let Some(image_path) = &message.image_path {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new("🖼").size(18.0));
                            ui.label(
                                RichText::new(image_path)
                                    .size(11.0)
                                    .color(text_color.gamma_multiply(0.8)),
                            );
                        });
                    }

                    if !message.text.is_empty() {
                        let response = ui.label(RichText::new(&message.text).color(text_color));
                        let label = if is_user {
                            format!("User message: {}", message.text)
                        } else {
                            format!("Assistant response: {}", message.text)
                        };
                        response.widget_info(|| {
                            egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label)
                        });
                    }

                    if let Some(action) = &message.proposed_action {
                        ui.add_space(4.0);
                        ui.separator();
                        ui.label(
                            RichText::new("إجراء مقترح:")
                                .size(11.0)
                                .strong()
                                .color(self.theme.secondary),
                        );
                        ui.label(
                            RichText::new(&action.description)
                                .size(12.0)
                                .color(text_color),
                        );
                    }

                    if !is_user && !message.text.is_empty() {
                        let speaking = self.state.player.playing_message() == Some(message.id);
                        let icon = if speaking { "🔊…" } else { "🔊" };
                        let response = ui.add(
                            egui::Button::new(RichText::new(icon).size(12.0))
                                .frame(false)
                                .min_size(Vec2::splat(20.0)),
                        );
                        let response = response.on_hover_text(if speaking {
                            "Playing audio..."
                        } else {
                            "Play voice"
                        });
                        if response.clicked() {
                            actions.play_message = Some(message.id);
                        }
                    }
                });

            let time_str = message.timestamp.format("%H:%M").to_string();
            ui.label(
                RichText::new(time_str)
                    .size(10.0)
                    .color(self.theme.text_muted),
            );
        });
    }

    fn show_typing_indicator(&self, ui: &mut egui::Ui) {
        ui.with_layout(egui::Layout::top_down(Align::LEFT), |ui| {
            egui::Frame::none()
                .fill(self.theme.assistant_bubble)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        for i in 0..3 {
                            let t = ui.ctx().input(|input| input.time);
                            let alpha = ((t * 3.0 + i as f64 * 0.5).sin() * 0.5 + 0.5) as f32;
                            ui.label(
                                RichText::new("●")
                                    .size(10.0)
                                    .color(self.theme.text_muted.gamma_multiply(alpha)),
                            );
                        }
                        let caption = if self.state.is_uploading {
                            "جاري معالجة الصورة..."
                        } else {
                            "جاري الإرسال..."
                        };
                        ui.label(RichText::new(caption).size(11.0).color(self.theme.text_muted));
                    });
                });
        });
        ui.ctx().request_repaint();
    }
}
