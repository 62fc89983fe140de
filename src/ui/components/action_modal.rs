//! Proposed-action review modal
//!
//! Presents the action's description, the derived service label, and the
//! fee ("to be calculated" when absent). The close control disappears while
//! the confirmation round trip is in flight.

use crate::api::types::{service_label, ProposedAction, DEFAULT_CURRENCY};
use crate::ui::theme::Theme;
use egui::{self, Color32, RichText, Vec2};

/// What the user decided this frame
#[derive(Default)]
pub struct ActionModalChoice {
    pub accept: bool,
    pub reject: bool,
    pub close: bool,
}

pub struct ActionModal<'a> {
    action: &'a ProposedAction,
    busy: bool,
    can_cancel: bool,
    theme: &'a Theme,
}

impl<'a> ActionModal<'a> {
    pub fn new(action: &'a ProposedAction, busy: bool, can_cancel: bool, theme: &'a Theme) -> Self {
        Self {
            action,
            busy,
            can_cancel,
            theme,
        }
    }

    pub fn show(self, ctx: &egui::Context) -> ActionModalChoice {
        let mut choice = ActionModalChoice::default();

        egui::Window::new("المساعد يريد تنفيذ إجراء")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.set_width(340.0);

                ui.horizontal(|ui| {
                    ui.label(RichText::new("الإجراء:").strong());
                    ui.label(RichText::new(&self.action.description));
                });

                if let Some(service_type) = self.action.service_type() {
                    let label = service_label(service_type).unwrap_or(service_type);
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("الخدمة:").strong());
                        ui.label(RichText::new(label));
                    });
                }

                let fee = match self.action.amount() {
                    Some(amount) => format!("{:.2} {}", amount, self.action.currency()),
                    None => "سيتم احتسابها لاحقاً".to_string(),
                };
                ui.horizontal(|ui| {
                    ui.label(RichText::new("الرسوم:").strong());
                    ui.label(RichText::new(fee).color(self.theme.secondary));
                });

                ui.add_space(4.0);
                ui.label(
                    RichText::new(
                        "هذا مجرد نموذج تجريبي. عند التأكيد سيتم تنفيذ عملية وهمية من جهة الخادم.",
                    )
                    .size(10.0)
                    .color(self.theme.text_muted),
                );
                ui.add_space(self.theme.spacing_sm);

                ui.horizontal(|ui| {
                    let reject = ui.add_enabled(
                        !self.busy,
                        egui::Button::new("لا").rounding(self.theme.button_rounding),
                    );
                    reject.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Button, !self.busy, "Reject action")
                    });
                    if reject.clicked() {
                        choice.reject = true;
                    }

                    let accept_label = if self.busy {
                        "جارٍ التنفيذ..."
                    } else {
                        "نعم، متابعة"
                    };
                    let accept = ui.add_enabled(
                        !self.busy,
                        egui::Button::new(RichText::new(accept_label).color(Color32::WHITE))
                            .fill(self.theme.primary)
                            .rounding(self.theme.button_rounding),
                    );
                    accept.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Button, !self.busy, "Accept action")
                    });
                    if accept.clicked() {
                        choice.accept = true;
                    }
                });

                if self.can_cancel && !self.busy {
                    let close = ui.add(
                        egui::Button::new(RichText::new("إغلاق").size(11.0)).frame(false),
                    );
                    close.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Close action review")
                    });
                    if close.clicked() {
                        choice.close = true;
                    }
                }
            });

        choice
    }
}
