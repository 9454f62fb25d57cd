//! Checkout session state machine.
//!
//! A session walks `DeliveryInfo → Payment → Confirm`, then a distinct
//! explicit submit drives it to completion. While a submission is in flight
//! every transition is rejected, which is what makes the cart clear at most
//! once per successful submission.

use super::models::{CheckoutForm, CheckoutStep, UserProfile};
use thiserror::Error;

/// Guard violations of the checkout state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// A submission is in flight; no transition is allowed until it settles.
    #[error("submission already in flight")]
    SubmissionInFlight,

    /// Submit was called from a step other than the confirmation step.
    #[error("submit is only allowed from the confirmation step")]
    NotAtConfirmation,

    /// The session already completed; it is awaiting teardown.
    #[error("checkout already completed")]
    AlreadyCompleted,
}

/// One checkout attempt for one session.
#[derive(Debug, Clone, Default)]
pub struct CheckoutSession {
    /// Current wizard step
    pub step: CheckoutStep,

    /// Transient form state, discarded with the session
    pub form: CheckoutForm,

    /// True while a gateway call is in flight
    pub submitting: bool,

    /// Terminal flag; set only after the gateway confirmed success
    pub completed: bool,
}

impl CheckoutSession {
    /// Opens a fresh session, optionally prefilled from the user profile.
    #[must_use]
    pub fn open(profile: Option<&UserProfile>) -> Self {
        Self {
            form: profile.map(CheckoutForm::prefilled).unwrap_or_default(),
            ..Self::default()
        }
    }

    fn guard_idle(&self) -> Result<(), CheckoutError> {
        if self.submitting {
            return Err(CheckoutError::SubmissionInFlight);
        }
        if self.completed {
            return Err(CheckoutError::AlreadyCompleted);
        }
        Ok(())
    }

    /// Advances one step; a no-op at the confirmation step.
    pub fn next(&mut self) -> Result<(), CheckoutError> {
        self.guard_idle()?;
        self.step = self.step.next();
        Ok(())
    }

    /// Goes back one step; a no-op at the delivery step.
    pub fn previous(&mut self) -> Result<(), CheckoutError> {
        self.guard_idle()?;
        self.step = self.step.previous();
        Ok(())
    }

    /// Merges a partial form update; rejected while a submission is in
    /// flight or after completion.
    pub fn update_form(&mut self, update: super::models::FormUpdate) -> Result<(), CheckoutError> {
        self.guard_idle()?;
        self.form.merge(update);
        Ok(())
    }

    /// Marks the submission as in flight. Callers must flip this before the
    /// gateway await so a concurrent submit is rejected, and must settle it
    /// with [`Self::finish_submit`] exactly once.
    pub fn begin_submit(&mut self) -> Result<(), CheckoutError> {
        self.guard_idle()?;
        if self.step != CheckoutStep::Confirm {
            return Err(CheckoutError::NotAtConfirmation);
        }
        self.submitting = true;
        Ok(())
    }

    /// Settles an in-flight submission. On failure the session stays at the
    /// confirmation step, retryable via another submit.
    pub fn finish_submit(&mut self, success: bool) {
        self.submitting = false;
        if success {
            self.completed = true;
        }
    }
}
