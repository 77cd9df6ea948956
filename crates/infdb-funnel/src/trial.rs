//! Free-trial request form.

use infdb_client::{WebhookClient, WebhookError};
use infdb_core::is_valid_email;
use serde::Serialize;

use crate::error::FunnelError;
use crate::variant::{Button, ButtonVariant};

pub const GENERIC_ERROR: &str = "An error occurred while processing your request";
pub const NETWORK_ERROR: &str = "Network error. Please try again.";

/// Records delivered by a free trial.
pub const TRIAL_RECORDS: u32 = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TrialOutcome {
    #[default]
    Idle,
    Submitting,
    Success,
    Error {
        message: String,
    },
}

impl TrialOutcome {
    /// Maps a finished request onto the outcome shown to the user.
    #[must_use]
    pub fn from_result(result: &Result<(), WebhookError>) -> Self {
        match result {
            Ok(()) => TrialOutcome::Success,
            Err(e @ (WebhookError::Http(_) | WebhookError::Deserialize { .. })) => {
                tracing::warn!(error = %e, "trial request failed before a usable response");
                TrialOutcome::Error {
                    message: NETWORK_ERROR.to_string(),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "trial request rejected");
                TrialOutcome::Error {
                    message: e.server_message().unwrap_or(GENERIC_ERROR).to_string(),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialView {
    pub title: &'static str,
    pub subtitle: String,
    pub email: String,
    pub outcome: TrialOutcome,
    /// Confirmation shown after success.
    pub confirmation: Option<String>,
    pub submit: Button,
}

#[derive(Debug, Clone, Default)]
pub struct TrialForm {
    email: String,
    outcome: TrialOutcome,
}

impl TrialForm {
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn outcome(&self) -> &TrialOutcome {
        &self.outcome
    }

    /// Editing the email clears a previous success or error. The value is
    /// kept as typed; surrounding whitespace makes it invalid.
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
        if self.outcome != TrialOutcome::Submitting {
            self.outcome = TrialOutcome::Idle;
        }
    }

    /// Closing the confirmation dialog returns the form to idle.
    pub fn dismiss(&mut self) {
        if self.outcome != TrialOutcome::Submitting {
            self.outcome = TrialOutcome::Idle;
        }
    }

    /// Full reset, used when the result the form was tied to goes away.
    pub fn reset(&mut self) {
        self.email.clear();
        self.outcome = TrialOutcome::Idle;
    }

    #[must_use]
    pub fn can_submit(&self, offer_id: Option<i64>) -> bool {
        self.check(offer_id).is_ok()
    }

    fn check(&self, offer_id: Option<i64>) -> Result<i64, FunnelError> {
        if self.outcome == TrialOutcome::Submitting {
            return Err(FunnelError::TrialInFlight);
        }
        if !is_valid_email(&self.email) {
            return Err(FunnelError::InvalidEmail);
        }
        offer_id.ok_or(FunnelError::MissingOfferId)
    }

    /// Moves to `Submitting` and returns the offer the request is for.
    ///
    /// # Errors
    ///
    /// Returns the blocking [`FunnelError`] when the email is invalid, no
    /// identifier is present, or a request is already running.
    pub fn begin(&mut self, offer_id: Option<i64>) -> Result<i64, FunnelError> {
        let id = self.check(offer_id)?;
        self.outcome = TrialOutcome::Submitting;
        Ok(id)
    }

    pub fn finish(&mut self, result: &Result<(), WebhookError>) -> &TrialOutcome {
        self.outcome = TrialOutcome::from_result(result);
        &self.outcome
    }

    /// Submits the trial request for `offer_id`.
    ///
    /// Network and server failures land in the outcome, never in the error.
    ///
    /// # Errors
    ///
    /// Returns a [`FunnelError`] when submission is blocked; no request is
    /// sent in that case.
    pub async fn submit(
        &mut self,
        client: &WebhookClient,
        offer_id: Option<i64>,
    ) -> Result<&TrialOutcome, FunnelError> {
        let id = self.begin(offer_id)?;
        let result = client.request_trial(id, &self.email).await;
        if result.is_ok() {
            tracing::info!(offer_id = id, "trial package requested");
        }
        Ok(self.finish(&result))
    }

    /// Confirmation text once the request succeeded.
    #[must_use]
    pub fn confirmation(&self) -> Option<String> {
        (self.outcome == TrialOutcome::Success).then(|| {
            format!(
                "Trial package of {TRIAL_RECORDS} influencers sent to {}",
                self.email
            )
        })
    }

    #[must_use]
    pub fn view(&self, offer_id: Option<i64>) -> TrialView {
        let label = if self.outcome == TrialOutcome::Submitting {
            "Sending..."
        } else {
            "Get Free Package"
        };
        TrialView {
            title: "Free Trial Package",
            subtitle: format!(
                "Get {TRIAL_RECORDS} influencers for free to evaluate the quality of our database"
            ),
            email: self.email.clone(),
            outcome: self.outcome.clone(),
            confirmation: self.confirmation(),
            submit: Button::new(label, ButtonVariant::Hero).enabled(self.can_submit(offer_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_without_tld_keeps_submit_disabled() {
        let mut form = TrialForm::default();
        form.set_email("foo@bar");
        assert!(!form.can_submit(Some(1)));
        assert!(!form.view(Some(1)).submit.enabled);

        form.set_email("foo@bar.com");
        assert!(form.can_submit(Some(1)));
        assert!(form.view(Some(1)).submit.enabled);
    }

    #[test]
    fn surrounding_whitespace_keeps_submit_disabled() {
        let mut form = TrialForm::default();
        form.set_email(" foo@bar.com");
        assert!(!form.can_submit(Some(1)));
        assert_eq!(form.begin(Some(1)), Err(FunnelError::InvalidEmail));

        form.set_email("foo@bar.com\n");
        assert!(!form.view(Some(1)).submit.enabled);
    }

    #[test]
    fn missing_identifier_blocks_submit() {
        let mut form = TrialForm::default();
        form.set_email("foo@bar.com");
        assert_eq!(form.begin(None), Err(FunnelError::MissingOfferId));
        assert_eq!(form.outcome(), &TrialOutcome::Idle);
    }

    #[test]
    fn begin_blocks_double_submit() {
        let mut form = TrialForm::default();
        form.set_email("foo@bar.com");
        assert_eq!(form.begin(Some(9)), Ok(9));
        assert_eq!(form.begin(Some(9)), Err(FunnelError::TrialInFlight));
    }

    #[test]
    fn editing_email_resets_outcome() {
        let mut form = TrialForm::default();
        form.set_email("foo@bar.com");
        form.begin(Some(1)).unwrap();
        form.finish(&Err(WebhookError::Api(Some("Nope".to_string()))));
        assert_eq!(
            form.outcome(),
            &TrialOutcome::Error {
                message: "Nope".to_string()
            }
        );

        form.set_email("other@bar.com");
        assert_eq!(form.outcome(), &TrialOutcome::Idle);
    }

    #[test]
    fn dismiss_resets_success() {
        let mut form = TrialForm::default();
        form.set_email("foo@bar.com");
        form.begin(Some(1)).unwrap();
        form.finish(&Ok(()));
        assert_eq!(
            form.view(Some(1)).confirmation.as_deref(),
            Some("Trial package of 5 influencers sent to foo@bar.com")
        );
        form.dismiss();
        assert_eq!(form.outcome(), &TrialOutcome::Idle);
        assert_eq!(form.email(), "foo@bar.com");
    }

    #[test]
    fn rejection_without_message_uses_generic_text() {
        let outcome = TrialOutcome::from_result(&Err(WebhookError::Api(None)));
        assert_eq!(
            outcome,
            TrialOutcome::Error {
                message: GENERIC_ERROR.to_string()
            }
        );
        let outcome = TrialOutcome::from_result(&Err(WebhookError::UnexpectedStatus {
            status: 500,
            url: "http://x/webhook/trial".to_string(),
            message: None,
        }));
        assert_eq!(
            outcome,
            TrialOutcome::Error {
                message: GENERIC_ERROR.to_string()
            }
        );
    }
}
