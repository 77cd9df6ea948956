use infdb_core::FilterError;
use thiserror::Error;

/// Reasons a page refuses to start an action.
///
/// These are the blocked-submit cases; network failures never surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunnelError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("a search is already in flight")]
    SearchInFlight,

    #[error("a valid email address is required")]
    InvalidEmail,

    #[error("no search or offer identifier to attach the request to")]
    MissingOfferId,

    #[error("a trial request is already in flight")]
    TrialInFlight,
}
