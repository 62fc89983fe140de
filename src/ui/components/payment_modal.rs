//! Payment sheet for accepted actions with a fee
//!
//! Collects card details (presence-checked only — the charge is simulated),
//! shows the last decline reason, and withholds cancellation while the
//! charge is in flight.

use crate::action::{ActionPhase, PaymentForm};
use crate::api::types::{service_label, ProposedAction};
use crate::ui::theme::Theme;
use egui::{self, Color32, RichText, Vec2};

/// What the user did on the sheet this frame
#[derive(Default)]
pub struct PaymentChoice {
    pub pay: bool,
    pub cancel: bool,
}

pub struct PaymentModal<'a> {
    action: &'a ProposedAction,
    form: &'a mut PaymentForm,
    phase: ActionPhase,
    decline: Option<&'a str>,
    form_error: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> PaymentModal<'a> {
    pub fn new(
        action: &'a ProposedAction,
        form: &'a mut PaymentForm,
        phase: ActionPhase,
        decline: Option<&'a str>,
        form_error: Option<&'a str>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            action,
            form,
            phase,
            decline,
            form_error,
            theme,
        }
    }

    pub fn show(self, ctx: &egui::Context) -> PaymentChoice {
        let mut choice = PaymentChoice::default();
        let charging = self.phase == ActionPhase::Charging;

        egui::Window::new("الدفع الآمن")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.set_width(340.0);

                let service = self
                    .action
                    .service_type()
                    .and_then(service_label)
                    .unwrap_or(&self.action.description);
                ui.label(RichText::new(service).strong().color(self.theme.text_primary));

                if let Some(amount) = self.action.amount() {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("المجموع:").strong());
                        ui.label(
                            RichText::new(format!("{:.2} {}", amount, self.action.currency()))
                                .size(16.0)
                                .strong()
                                .color(self.theme.secondary),
                        );
                    });
                }

                ui.add_space(self.theme.spacing_sm);

                ui.add_enabled_ui(!charging, |ui| {
                    ui.label(RichText::new("اسم حامل البطاقة").size(11.0));
                    ui.add(
                        egui::TextEdit::singleline(&mut self.form.card_holder)
                            .hint_text("Abdullah Alqahtani")
                            .desired_width(f32::INFINITY),
                    )
                    .widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, true, "Card holder input")
                    });

                    ui.label(RichText::new("رقم البطاقة").size(11.0));
                    ui.add(
                        egui::TextEdit::singleline(&mut self.form.card_number)
                            .hint_text("4111 1111 1111 1111")
                            .desired_width(f32::INFINITY),
                    )
                    .widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, true, "Card number input")
                    });

                    ui.horizontal(|ui| {
                        ui.add(
                            egui::TextEdit::singleline(&mut self.form.expiry_month)
                                .hint_text("MM")
                                .desired_width(48.0),
                        );
                        ui.add(
                            egui::TextEdit::singleline(&mut self.form.expiry_year)
                                .hint_text("YYYY")
                                .desired_width(64.0),
                        );
                        ui.add(
                            egui::TextEdit::singleline(&mut self.form.cvv)
                                .hint_text("CVV")
                                .password(true)
                                .desired_width(52.0),
                        );
                    });
                });

                // Declines come back retryable, with the server's reason
                if let Some(decline) = self.decline {
                    ui.add_space(4.0);
                    ui.label(RichText::new(decline).size(12.0).color(self.theme.error));
                }
                if let Some(form_error) = self.form_error {
                    ui.add_space(4.0);
                    ui.label(RichText::new(form_error).size(12.0).color(self.theme.error));
                }

                ui.add_space(self.theme.spacing_sm);

                let pay_label = if charging { "جاري المعالجة..." } else { "ادفع الآن" };
                let pay = ui.add_enabled(
                    !charging,
                    egui::Button::new(RichText::new(pay_label).color(Color32::WHITE))
                        .fill(Color32::from_rgb(16, 16, 16))
                        .rounding(self.theme.button_rounding)
                        .min_size(Vec2::new(ui.available_width(), 40.0)),
                );
                pay.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Button, !charging, "Pay now")
                });
                if pay.clicked() {
                    choice.pay = true;
                }

                // No way out mid-charge; cancellation returns once it settles
                if !charging {
                    let cancel = ui.add(
                        egui::Button::new("إلغاء")
                            .rounding(self.theme.button_rounding)
                            .min_size(Vec2::new(ui.available_width(), 32.0)),
                    );
                    cancel.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Cancel payment")
                    });
                    if cancel.clicked() {
                        choice.cancel = true;
                    }
                }
            });

        choice
    }
}
