//! Main application struct and eframe integration

use crate::action::ActionPhase;
use crate::ui::components::{
    ActionModal, InputBar, LoginCard, MessageList, NotificationsPanel, PaymentModal, Waveform,
};
use crate::ui::state::{AppState, RecordingState};
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};

/// Main Absher assistant application
pub struct AbsherApp {
    state: AppState,
    theme: Theme,
}

impl AbsherApp {
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        let theme = Theme::light();
        theme.apply(&cc.egui_ctx);

        Self { state, theme }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("أبشر")
                            .size(20.0)
                            .strong()
                            .color(self.theme.primary),
                    );
                    ui.label(
                        RichText::new("Absher AI Agent")
                            .size(14.0)
                            .color(self.theme.text_muted),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if let Some(session) = self.state.session.clone() {
                            let logout = ui.button(RichText::new("Logout").color(self.theme.error));
                            logout.widget_info(|| {
                                egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Logout")
                            });
                            if logout.clicked() {
                                self.state.logout();
                            }
                            ui.label(
                                RichText::new(format!(
                                    "Logged in as {} ({})",
                                    session.user_name, session.user_id
                                ))
                                .size(11.0)
                                .color(self.theme.text_muted),
                            );
                        }
                    });
                });
            });
    }

    fn show_notifications_panel(&mut self, ctx: &egui::Context) {
        SidePanel::right("notifications")
            .resizable(true)
            .default_width(300.0)
            .min_width(260.0)
            .max_width(420.0)
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing_sm),
            )
            .show(ctx, |ui| {
                let actions = NotificationsPanel::new(&self.state, &self.theme).show(ui);
                if actions.run_proactive {
                    self.state.run_proactive();
                }
                if actions.refresh {
                    self.state.fetch_notifications();
                }
            });
    }

    fn show_input_area(&mut self, ctx: &egui::Context) {
        TopBottomPanel::bottom("input_area")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing_sm),
            )
            .show(ctx, |ui| {
                if self.state.recording_state == RecordingState::Recording {
                    let samples = self
                        .state
                        .orchestrator()
                        .map(|handle| handle.waveform().snapshot())
                        .unwrap_or_default();
                    Waveform::new(&samples, &self.theme).height(48.0).show(ui);
                    ui.add_space(self.theme.spacing_sm);
                }

                InputBar::new(&mut self.state, &self.theme).show(ui);
            });
    }

    fn show_chat(&mut self, ctx: &egui::Context) {
        CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.bg_primary))
            .show(ctx, |ui| {
                let actions = MessageList::new(&self.state, &self.theme).show(ui);
                if let Some(label) = actions.quick_action {
                    self.state.send_quick_action(label);
                }
                if let Some(id) = actions.play_message {
                    self.state.play_message(id);
                }
            });
    }

    fn show_modals(&mut self, ctx: &egui::Context) {
        let Some(phase) = self.state.action_flow.phase() else {
            return;
        };
        let Some(action) = self.state.action_flow.action().cloned() else {
            return;
        };

        match phase {
            ActionPhase::Reviewing | ActionPhase::Confirming => {
                let busy = self.state.confirm_busy || phase == ActionPhase::Confirming;
                let choice = ActionModal::new(
                    &action,
                    busy,
                    self.state.action_flow.can_cancel(),
                    &self.theme,
                )
                .show(ctx);

                if choice.accept {
                    self.state.accept_action();
                } else if choice.reject {
                    self.state.reject_action();
                } else if choice.close {
                    self.state.cancel_action();
                }
            }

            ActionPhase::AwaitingPayment | ActionPhase::Charging => {
                let decline = self.state.action_flow.last_decline().map(str::to_string);
                let form_error = self.state.payment_error.clone();
                let choice = PaymentModal::new(
                    &action,
                    &mut self.state.payment_form,
                    phase,
                    decline.as_deref(),
                    form_error.as_deref(),
                    &self.theme,
                )
                .show(ctx);

                if choice.pay {
                    self.state.submit_payment();
                } else if choice.cancel {
                    self.state.cancel_action();
                }
            }
        }
    }

    fn show_toast(&mut self, ctx: &egui::Context) {
        let Some(toast) = self.state.toast.clone() else {
            return;
        };

        egui::Area::new(egui::Id::new("toast"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::Vec2::new(0.0, -16.0))
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(egui::Color32::from_rgb(15, 23, 42))
                    .rounding(egui::Rounding::same(16.0))
                    .inner_margin(egui::Margin::symmetric(14.0, 8.0))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(
                                RichText::new(toast).size(12.0).color(egui::Color32::WHITE),
                            );
                            if ui
                                .button(RichText::new("×").color(egui::Color32::LIGHT_GRAY))
                                .clicked()
                            {
                                self.state.toast = None;
                            }
                        });
                    });
            });
    }
}

impl eframe::App for AbsherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_events();

        if self.state.session.is_none() {
            CentralPanel::default()
                .frame(egui::Frame::none().fill(self.theme.bg_primary))
                .show(ctx, |ui| {
                    LoginCard::new(&mut self.state, &self.theme).show(ui);
                });
            self.show_toast(ctx);
            if self.state.login.busy {
                ctx.request_repaint();
            }
            return;
        }

        self.show_header(ctx);
        self.show_notifications_panel(ctx);
        self.show_input_area(ctx);
        self.show_chat(ctx);
        self.show_modals(ctx);
        self.show_toast(ctx);

        let waiting = self.state.is_sending
            || self.state.is_uploading
            || self.state.confirm_busy
            || self.state.notifications_busy
            || self.state.proactive_busy
            || self.state.recording_state != RecordingState::Idle
            || self.state.player.is_playing();
        if waiting {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.shutdown();
    }
}
