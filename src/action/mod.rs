//! Proposed-action review and payment workflow
//!
//! A proposed action moves through review, an optional payment sub-flow, and
//! a confirmation round trip:
//!
//! `Reviewing -> (AwaitingPayment -> Charging) -> Confirming -> cleared`
//!
//! Rejection short-circuits from `Reviewing` straight to `Confirming` with
//! `accepted = false` — the backend is informed either way. At most one
//! action is active at a time; the transitions here are the busy-guards that
//! keep a second charge or confirmation from ever being in flight for the
//! same action.

use crate::api::types::{PaymentCard, ProposedAction};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    /// The action is presented for the user's decision
    Reviewing,
    /// Accepted; collecting card details
    AwaitingPayment,
    /// Charge request in flight — cancellation is withheld until it settles
    Charging,
    /// Confirmation request in flight (accepted or rejected)
    Confirming,
}

/// What should happen after the user accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// The action carries a fee: collect payment before confirming
    CollectPayment,
    /// No fee: go straight to confirmation
    Confirm,
}

/// Card form state for the payment sheet.
#[derive(Debug, Clone, Default)]
pub struct PaymentForm {
    pub card_holder: String,
    pub card_number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
}

impl PaymentForm {
    /// Presence check only — this is a simulated charge.
    pub fn is_complete(&self) -> bool {
        !self.card_holder.trim().is_empty()
            && !self.card_number.trim().is_empty()
            && !self.expiry_month.trim().is_empty()
            && !self.expiry_year.trim().is_empty()
            && !self.cvv.trim().is_empty()
    }

    pub fn to_card(&self) -> PaymentCard {
        PaymentCard {
            card_holder: self.card_holder.trim().to_string(),
            card_number: self.card_number.trim().to_string(),
            expiry_month: self.expiry_month.trim().to_string(),
            expiry_year: self.expiry_year.trim().to_string(),
            cvv: self.cvv.trim().to_string(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// State machine for the single active proposed action.
pub struct ActionFlow {
    action: Option<ProposedAction>,
    phase: ActionPhase,
    decision: Option<bool>,
    last_decline: Option<String>,
}

impl ActionFlow {
    pub fn new() -> Self {
        Self {
            action: None,
            phase: ActionPhase::Reviewing,
            decision: None,
            last_decline: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.action.is_some()
    }

    pub fn action(&self) -> Option<&ProposedAction> {
        self.action.as_ref()
    }

    pub fn phase(&self) -> Option<ActionPhase> {
        self.action.as_ref().map(|_| self.phase)
    }

    /// The user's decision, set once confirmation has been dispatched.
    pub fn decision(&self) -> Option<bool> {
        self.decision
    }

    pub fn last_decline(&self) -> Option<&str> {
        self.last_decline.as_deref()
    }

    /// Surface a new proposal. Review opens immediately.
    ///
    /// A proposal arriving while another action is pending resolution is
    /// dropped, never overwriting the active one — the backend re-proposes
    /// on the next matching chat turn.
    pub fn propose(&mut self, action: ProposedAction) -> bool {
        if self.is_active() {
            warn!(
                "Dropping proposed action {} while {} is still pending",
                action.id,
                self.action.as_ref().map(|a| a.id.as_str()).unwrap_or("?")
            );
            return false;
        }

        debug!("Reviewing proposed action {}", action.id);
        self.action = Some(action);
        self.phase = ActionPhase::Reviewing;
        self.decision = None;
        self.last_decline = None;
        true
    }

    /// The user accepted the action under review.
    pub fn accept(&mut self) -> Option<AcceptOutcome> {
        if self.phase != ActionPhase::Reviewing {
            return None;
        }
        let action = self.action.as_ref()?;

        if action.requires_payment() {
            self.phase = ActionPhase::AwaitingPayment;
            Some(AcceptOutcome::CollectPayment)
        } else {
            self.phase = ActionPhase::Confirming;
            self.decision = Some(true);
            Some(AcceptOutcome::Confirm)
        }
    }

    /// The user declined the action under review. The backend is still
    /// informed: the caller must dispatch one confirmation with
    /// `accepted = false`.
    pub fn reject(&mut self) -> bool {
        if !self.is_active() || self.phase != ActionPhase::Reviewing {
            return false;
        }
        self.phase = ActionPhase::Confirming;
        self.decision = Some(false);
        true
    }

    /// Move into the charge round trip. Refused unless a payment is being
    /// collected and no charge is already in flight.
    pub fn begin_charge(&mut self) -> bool {
        if !self.is_active() || self.phase != ActionPhase::AwaitingPayment {
            return false;
        }
        self.phase = ActionPhase::Charging;
        self.last_decline = None;
        true
    }

    /// The charge was declined (business failure or transport error).
    /// Returns to a retry-capable payment state; confirmation is not reached.
    pub fn charge_declined(&mut self, reason: impl Into<String>) {
        if self.phase == ActionPhase::Charging {
            self.phase = ActionPhase::AwaitingPayment;
            self.last_decline = Some(reason.into());
        }
    }

    /// The charge settled successfully; confirmation may now be dispatched.
    pub fn charge_succeeded(&mut self) -> bool {
        if self.phase != ActionPhase::Charging {
            return false;
        }
        self.phase = ActionPhase::Confirming;
        self.decision = Some(true);
        true
    }

    /// Whether the user may abandon the workflow right now. Once charging
    /// has begun there is no way out until the charge settles.
    pub fn can_cancel(&self) -> bool {
        self.is_active()
            && matches!(
                self.phase,
                ActionPhase::Reviewing | ActionPhase::AwaitingPayment
            )
    }

    /// Abandon the workflow without informing the backend.
    pub fn cancel(&mut self) -> bool {
        if !self.can_cancel() {
            return false;
        }
        debug!(
            "Cancelled action {}",
            self.action.as_ref().map(|a| a.id.as_str()).unwrap_or("?")
        );
        self.action = None;
        self.decision = None;
        self.last_decline = None;
        true
    }

    /// Unconditional clear once the confirmation request resolves — success
    /// or failure, the workflow can never be left open.
    pub fn finish(&mut self) -> Option<ProposedAction> {
        self.decision = None;
        self.last_decline = None;
        self.phase = ActionPhase::Reviewing;
        self.action.take()
    }
}

impl Default for ActionFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paid_action(id: &str) -> ProposedAction {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "type": "service_renewal",
            "description": "تجديد الهوية الوطنية",
            "data": {
                "service_type": "national_id",
                "amount": 150.0,
                "currency": "SAR",
            },
        }))
        .unwrap()
    }

    fn free_action(id: &str) -> ProposedAction {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "type": "appointment",
            "description": "حجز موعد",
            "data": { "service_type": "passport" },
        }))
        .unwrap()
    }

    #[test]
    fn test_accept_with_fee_collects_payment() {
        let mut flow = ActionFlow::new();
        assert!(flow.propose(paid_action("a1")));
        assert_eq!(flow.phase(), Some(ActionPhase::Reviewing));

        assert_eq!(flow.accept(), Some(AcceptOutcome::CollectPayment));
        assert_eq!(flow.phase(), Some(ActionPhase::AwaitingPayment));
        assert_eq!(flow.decision(), None);
    }

    #[test]
    fn test_accept_without_fee_confirms_directly() {
        let mut flow = ActionFlow::new();
        flow.propose(free_action("a1"));

        assert_eq!(flow.accept(), Some(AcceptOutcome::Confirm));
        assert_eq!(flow.phase(), Some(ActionPhase::Confirming));
        assert_eq!(flow.decision(), Some(true));
    }

    #[test]
    fn test_reject_goes_to_confirmation_with_accepted_false() {
        let mut flow = ActionFlow::new();
        flow.propose(paid_action("a1"));

        assert!(flow.reject());
        assert_eq!(flow.phase(), Some(ActionPhase::Confirming));
        assert_eq!(flow.decision(), Some(false));
    }

    #[test]
    fn test_declined_charge_never_reaches_confirmation() {
        let mut flow = ActionFlow::new();
        flow.propose(paid_action("a1"));
        flow.accept();

        assert!(flow.begin_charge());
        assert_eq!(flow.phase(), Some(ActionPhase::Charging));

        flow.charge_declined("insufficient funds");
        assert_eq!(flow.phase(), Some(ActionPhase::AwaitingPayment));
        assert_eq!(flow.decision(), None);
        assert_eq!(flow.last_decline(), Some("insufficient funds"));

        // Retry after decline, this time it settles
        assert!(flow.begin_charge());
        assert!(flow.last_decline().is_none());
        assert!(flow.charge_succeeded());
        assert_eq!(flow.phase(), Some(ActionPhase::Confirming));
        assert_eq!(flow.decision(), Some(true));
    }

    #[test]
    fn test_no_double_charge() {
        let mut flow = ActionFlow::new();
        flow.propose(paid_action("a1"));
        flow.accept();

        assert!(flow.begin_charge());
        // A second submission while the charge is in flight is refused
        assert!(!flow.begin_charge());
    }

    #[test]
    fn test_second_proposal_is_dropped_not_overwritten() {
        let mut flow = ActionFlow::new();
        assert!(flow.propose(paid_action("a1")));
        assert!(!flow.propose(paid_action("a2")));

        assert_eq!(flow.action().unwrap().id, "a1");
        assert_eq!(flow.phase(), Some(ActionPhase::Reviewing));

        // After the first resolves, a new proposal is welcome
        flow.finish();
        assert!(flow.propose(paid_action("a2")));
    }

    #[test]
    fn test_cancellation_window() {
        let mut flow = ActionFlow::new();
        flow.propose(paid_action("a1"));
        assert!(flow.can_cancel());

        flow.accept();
        assert!(flow.can_cancel());

        flow.begin_charge();
        // Irreversible network effect started: no cancel until it settles
        assert!(!flow.can_cancel());
        assert!(!flow.cancel());

        flow.charge_declined("timeout");
        assert!(flow.can_cancel());
        assert!(flow.cancel());
        assert!(!flow.is_active());
    }

    #[test]
    fn test_finish_clears_unconditionally() {
        let mut flow = ActionFlow::new();
        flow.propose(paid_action("a1"));
        flow.accept();
        flow.begin_charge();
        flow.charge_succeeded();

        let finished = flow.finish();
        assert_eq!(finished.unwrap().id, "a1");
        assert!(!flow.is_active());
        assert_eq!(flow.decision(), None);
    }

    #[test]
    fn test_accept_outside_review_is_refused() {
        let mut flow = ActionFlow::new();
        assert_eq!(flow.accept(), None);

        flow.propose(paid_action("a1"));
        flow.accept();
        // Already collecting payment
        assert_eq!(flow.accept(), None);
        assert!(!flow.reject());
    }

    #[test]
    fn test_payment_form_presence_check() {
        let mut form = PaymentForm::default();
        assert!(!form.is_complete());

        form.card_holder = "Abdullah".into();
        form.card_number = "4111111111111111".into();
        form.expiry_month = "04".into();
        form.expiry_year = "2027".into();
        assert!(!form.is_complete());

        form.cvv = "123".into();
        assert!(form.is_complete());

        form.reset();
        assert!(!form.is_complete());
    }
}
