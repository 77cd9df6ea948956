//! Lead-funnel page logic: filter state, search sequencing, result preview,
//! trial requests, offer retrieval and the purchase hand-off, exposed as
//! serializable view models.

pub mod error;
pub mod filter_panel;
pub mod format;
pub mod notify;
pub mod offer;
pub mod page;
pub mod purchase;
pub mod results;
pub mod search;
pub mod trial;
pub mod variant;

pub use error::FunnelError;
pub use filter_panel::{FilterChange, FilterPanel, FilterPanelView, LocationList};
pub use notify::{Notification, Notifications, Rendered, Tone};
pub use offer::{OfferPage, OfferPageState, OfferPageView};
pub use page::{FunnelPhase, SearchPage, SearchPageView};
pub use purchase::{pricing_view, PricingTableConfig, PricingView, PurchaseWidget};
pub use results::{render_results, CallToAction, DisplayOptions, ResultView, PREVIEW_SIZE};
pub use search::{invoke_search, SearchSession, SearchTicket};
pub use trial::{TrialForm, TrialOutcome, TrialView};
pub use variant::{Badge, BadgeVariant, Button, ButtonSize, ButtonVariant};
