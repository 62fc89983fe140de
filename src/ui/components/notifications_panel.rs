//! Notification panels: the SMS phone mock and the in-app list
//!
//! SMS notifications render inside a phone frame, newest first. The panel
//! also hosts the proactive-engine trigger and a refresh control.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Color32, RichText};

/// What the user did to the panel this frame
#[derive(Default)]
pub struct NotificationActions {
    pub run_proactive: bool,
    pub refresh: bool,
}

pub struct NotificationsPanel<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> NotificationsPanel<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) -> NotificationActions {
        let mut actions = NotificationActions::default();

        self.show_sms_panel(ui, &mut actions);
        ui.add_space(self.theme.spacing);
        self.show_in_app_panel(ui, &mut actions);

        actions
    }

    fn show_sms_panel(&self, ui: &mut egui::Ui, actions: &mut NotificationActions) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("الرسائل النصية")
                            .size(13.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let label = if self.state.proactive_busy {
                            "جارٍ التشغيل..."
                        } else {
                            "تشغيل المحرك الاستباقي"
                        };
                        let button = egui::Button::new(
                            RichText::new(label).size(11.0).color(Color32::WHITE),
                        )
                        .fill(self.theme.primary)
                        .rounding(self.theme.button_rounding);
                        let response = ui.add_enabled(!self.state.proactive_busy, button);
                        response.widget_info(|| {
                            egui::WidgetInfo::labeled(
                                egui::WidgetType::Button,
                                !self.state.proactive_busy,
                                "Run proactive engine",
                            )
                        });
                        if response.clicked() {
                            actions.run_proactive = true;
                        }
                    });
                });

                ui.add_space(self.theme.spacing_sm);

                // Phone mock
                egui::Frame::none()
                    .fill(Color32::from_rgb(15, 23, 42))
                    .rounding(egui::Rounding::same(18.0))
                    .inner_margin(self.theme.spacing_sm)
                    .show(ui, |ui| {
                        ui.set_min_height(180.0);
                        ui.vertical(|ui| {
                            ui.label(
                                RichText::new("+966 • مساعد أبشر")
                                    .size(10.0)
                                    .color(Color32::from_rgb(203, 213, 225)),
                            );
                            ui.add_space(4.0);

                            let sms = self.state.sms_notifications();
                            if sms.is_empty() {
                                ui.label(
                                    RichText::new("لا توجد رسائل نصية بعد.")
                                        .size(11.0)
                                        .color(Color32::from_rgb(148, 163, 184)),
                                );
                            }
                            egui::ScrollArea::vertical()
                                .id_salt("sms_scroll")
                                .max_height(200.0)
                                .show(ui, |ui| {
                                    for notification in sms {
                                        egui::Frame::none()
                                            .fill(self.theme.secondary)
                                            .rounding(egui::Rounding::same(10.0))
                                            .inner_margin(6.0)
                                            .show(ui, |ui| {
                                                ui.label(
                                                    RichText::new(&notification.message)
                                                        .size(11.0)
                                                        .color(Color32::WHITE),
                                                );
                                                ui.label(
                                                    RichText::new(
                                                        notification
                                                            .created_at
                                                            .format("%Y-%m-%d %H:%M")
                                                            .to_string(),
                                                    )
                                                    .size(8.0)
                                                    .color(Color32::WHITE.gamma_multiply(0.7)),
                                                );
                                            });
                                        ui.add_space(4.0);
                                    }
                                });
                        });
                    });

                ui.label(
                    RichText::new("هذه الرسائل يتم إنشاؤها من خلال المحرك الاستباقي.")
                        .size(10.0)
                        .color(self.theme.text_muted),
                );
            });
    }

    fn show_in_app_panel(&self, ui: &mut egui::Ui, actions: &mut NotificationActions) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.label(
                    RichText::new("In-App Notifications")
                        .size(13.0)
                        .strong()
                        .color(self.theme.text_primary),
                );
                ui.add_space(4.0);

                egui::ScrollArea::vertical()
                    .id_salt("in_app_scroll")
                    .max_height(220.0)
                    .show(ui, |ui| {
                        for notification in self.state.in_app_notifications() {
                            egui::Frame::none()
                                .fill(self.theme.bg_primary)
                                .rounding(self.theme.button_rounding)
                                .inner_margin(6.0)
                                .show(ui, |ui| {
                                    ui.horizontal(|ui| {
                                        ui.label(
                                            RichText::new("IN APP")
                                                .size(9.0)
                                                .color(self.theme.text_muted),
                                        );
                                        ui.with_layout(
                                            egui::Layout::right_to_left(egui::Align::Center),
                                            |ui| {
                                                ui.label(
                                                    RichText::new(
                                                        notification
                                                            .created_at
                                                            .format("%Y-%m-%d %H:%M")
                                                            .to_string(),
                                                    )
                                                    .size(9.0)
                                                    .color(self.theme.text_muted),
                                                );
                                            },
                                        );
                                    });
                                    ui.label(
                                        RichText::new(&notification.message)
                                            .size(12.0)
                                            .color(self.theme.text_primary),
                                    );
                                });
                            ui.add_space(4.0);
                        }
                    });

                let response = ui.add_enabled(
                    !self.state.notifications_busy,
                    egui::Button::new(RichText::new("Refresh").size(11.0)).frame(false),
                );
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(
                        egui::WidgetType::Button,
                        !self.state.notifications_busy,
                        "Refresh notifications",
                    )
                });
                if response.clicked() {
                    actions.refresh = true;
                }
            });
    }
}
