//! Login card shown before a session exists

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

pub struct LoginCard<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> LoginCard<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.25);

            egui::Frame::none()
                .fill(self.theme.bg_secondary)
                .rounding(self.theme.card_rounding)
                .inner_margin(self.theme.spacing_lg)
                .show(ui, |ui| {
                    ui.set_width(320.0);

                    ui.label(
                        RichText::new("Absher AI Agent")
                            .size(18.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    ui.label(
                        RichText::new("Mock login — credentials are checked by the demo backend.")
                            .size(11.0)
                            .color(self.theme.text_muted),
                    );
                    ui.add_space(self.theme.spacing);

                    ui.label(RichText::new("Username").size(12.0));
                    let username = egui::TextEdit::singleline(&mut self.state.login.username)
                        .hint_text("e.g. abdullah")
                        .desired_width(f32::INFINITY);
                    let username_response = ui.add_enabled(!self.state.login.busy, username);
                    username_response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, true, "Username input")
                    });

                    ui.add_space(4.0);
                    ui.label(RichText::new("Password").size(12.0));
                    let password = egui::TextEdit::singleline(&mut self.state.login.password)
                        .hint_text("e.g. 123456")
                        .password(true)
                        .desired_width(f32::INFINITY);
                    let password_response = ui.add_enabled(!self.state.login.busy, password);
                    password_response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, true, "Password input")
                    });

                    // Auth failures belong inline on the form, not in a toast
                    if let Some(error) = &self.state.login.error {
                        ui.add_space(4.0);
                        ui.label(RichText::new(error).size(12.0).color(self.theme.error));
                    }

                    ui.add_space(self.theme.spacing_sm);

                    let label = if self.state.login.busy {
                        "Logging in..."
                    } else {
                        "Login"
                    };
                    let button = egui::Button::new(
                        RichText::new(label).color(egui::Color32::WHITE),
                    )
                    .fill(self.theme.primary)
                    .rounding(self.theme.button_rounding)
                    .min_size(Vec2::new(ui.available_width(), 36.0));

                    let response = ui.add_enabled(!self.state.login.busy, button);
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(
                            egui::WidgetType::Button,
                            !self.state.login.busy,
                            "Login button",
                        )
                    });
                    let submitted = response.clicked()
                        || (ui.input(|input| input.key_pressed(egui::Key::Enter))
                            && (username_response.lost_focus() || password_response.lost_focus()));
                    if submitted {
                        self.state.submit_login();
                    }

                    ui.add_space(self.theme.spacing_sm);
                    ui.label(
                        RichText::new("Demo credentials: abdullah / 123456 · fatimah / password")
                            .size(10.0)
                            .color(self.theme.text_muted),
                    );
                });
        });
    }
}
