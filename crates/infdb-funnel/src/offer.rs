//! Offer page: loads a stored search with its package history and renders
//! it through the same result display as the search page.

use infdb_client::{WebhookClient, WebhookError};
use infdb_core::{country_label, Offer, PackageRecord, SearchResult};
use serde::Serialize;

use crate::error::FunnelError;
use crate::format::{display_datetime, percent, thousands};
use crate::notify::{Notifications, Rendered};
use crate::results::{render_results, DisplayOptions, ResultView};
use crate::search::invoke_search;
use crate::trial::{TrialForm, TrialOutcome, TrialView};
use crate::variant::{Badge, BadgeVariant, Button, ButtonVariant};

const LOAD_FAILED: &str = "Failed to load offer details";
const LOAD_ERROR: &str = "An error occurred while loading the offer";

#[derive(Debug, Clone, PartialEq)]
pub enum OfferPageState {
    Loading,
    NotFound,
    Loaded {
        offer: Box<Offer>,
        sample: SearchResult,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledValue {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageRow {
    pub id: i64,
    pub type_label: &'static str,
    pub status: Badge,
    pub summary: String,
    pub recipient: String,
    pub platform: String,
}

impl PackageRow {
    fn new(record: &PackageRecord) -> Self {
        let created = record
            .created_at
            .as_ref()
            .map_or_else(String::new, |at| format!(" • {}", display_datetime(at)));
        Self {
            id: record.id,
            type_label: record.package_type.label(),
            status: Badge::new(record.status.label(), BadgeVariant::from(record.status)),
            summary: format!("{} influencers{created}", record.record_limit),
            recipient: format!("Sent to: {}", record.email),
            platform: record.platform.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferDetailsView {
    pub id: i64,
    pub heading: String,
    pub created: Option<String>,
    pub filters: Vec<LabeledValue>,
    pub total: String,
    pub total_caption: &'static str,
    pub results: ResultView,
    /// Absent once the offer's free trial has been used.
    pub trial: Option<TrialView>,
    /// Shown after a trial requested from this page succeeds.
    pub trial_confirmation: Option<String>,
    pub packages: Vec<PackageRow>,
    pub package_count: Option<Badge>,
    pub needs_more_packages: bool,
    pub back: Button,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OfferPageView {
    Loading,
    NotFound {
        title: &'static str,
        message: &'static str,
        back: Button,
    },
    Loaded(Box<OfferDetailsView>),
}

#[derive(Debug)]
pub struct OfferPage {
    offer_id: i64,
    state: OfferPageState,
    trial: TrialForm,
    notifications: Notifications,
    options: DisplayOptions,
}

impl OfferPage {
    #[must_use]
    pub fn new(offer_id: i64, options: DisplayOptions) -> Self {
        Self {
            offer_id,
            state: OfferPageState::Loading,
            trial: TrialForm::default(),
            notifications: Notifications::default(),
            options,
        }
    }

    #[must_use]
    pub fn offer_id(&self) -> i64 {
        self.offer_id
    }

    #[must_use]
    pub fn state(&self) -> &OfferPageState {
        &self.state
    }

    #[must_use]
    pub fn offer(&self) -> Option<&Offer> {
        match &self.state {
            OfferPageState::Loaded { offer, .. } => Some(offer),
            _ => None,
        }
    }

    #[must_use]
    pub fn trial(&self) -> &TrialForm {
        &self.trial
    }

    pub fn trial_mut(&mut self) -> &mut TrialForm {
        &mut self.trial
    }

    /// Fetches the offer and its sample accounts.
    ///
    /// When the offer payload carries no sample, one search is run with the
    /// offer's stored filters; the sample is re-keyed to this offer so
    /// purchases reference it. Any failure to fetch the offer leaves the page
    /// in [`OfferPageState::NotFound`] with a queued notification.
    pub async fn load(&mut self, client: &WebhookClient) -> &OfferPageState {
        self.state = OfferPageState::Loading;
        match client.get_offer(self.offer_id).await {
            Ok(offer) => {
                let sample = match offer.sample.clone() {
                    Some(sample) => sample,
                    None => {
                        let mut sample = invoke_search(client, &offer.filters).await;
                        sample.offer_id = Some(offer.id);
                        if sample.platform.is_empty() {
                            sample.platform = offer.filters.platform.as_str().to_string();
                        }
                        sample
                    }
                };
                tracing::info!(
                    offer_id = self.offer_id,
                    total = offer.total,
                    packages = offer.packages.len(),
                    "offer loaded"
                );
                self.state = OfferPageState::Loaded {
                    offer: Box::new(offer),
                    sample,
                };
            }
            Err(e) => {
                tracing::warn!(offer_id = self.offer_id, error = %e, "offer load failed");
                let message = match e {
                    WebhookError::NotFound { .. } | WebhookError::UnexpectedStatus { .. } => {
                        LOAD_FAILED
                    }
                    _ => LOAD_ERROR,
                };
                self.notifications.error(message);
                self.state = OfferPageState::NotFound;
            }
        }
        &self.state
    }

    /// Submits the trial form for this offer and, on success, re-fetches the
    /// offer in place.
    ///
    /// # Errors
    ///
    /// Returns a [`FunnelError`] when submission is blocked.
    pub async fn submit_trial(&mut self, client: &WebhookClient) -> Result<(), FunnelError> {
        let offer_id = self.offer().map(|o| o.id);
        let succeeded = *self.trial.submit(client, offer_id).await? == TrialOutcome::Success;
        if succeeded {
            self.notifications
                .success("Trial package will be sent to your email within 5 minutes");
            self.refresh_after_trial(client).await;
        }
        Ok(())
    }

    /// Re-fetches the offer after a trial, keeping the current sample.
    ///
    /// If the re-fetch fails the trial is still marked as used locally.
    pub async fn refresh_after_trial(&mut self, client: &WebhookClient) {
        let OfferPageState::Loaded { offer, .. } = &mut self.state else {
            return;
        };
        match client.get_offer(self.offer_id).await {
            Ok(mut fresh) => {
                // The trial just succeeded, whatever a lagging backend says.
                fresh.free_trial_used = true;
                fresh.sample = offer.sample.take();
                **offer = fresh;
            }
            Err(e) => {
                tracing::warn!(offer_id = self.offer_id, error = %e, "offer refresh failed");
                offer.free_trial_used = true;
            }
        }
    }

    /// Renders the page and drains pending notifications.
    pub fn render(&mut self) -> Rendered<OfferPageView> {
        Rendered {
            view: self.view(),
            notifications: self.notifications.drain(),
        }
    }

    #[must_use]
    pub fn view(&self) -> OfferPageView {
        match &self.state {
            OfferPageState::Loading => OfferPageView::Loading,
            OfferPageState::NotFound => OfferPageView::NotFound {
                title: "Offer not found",
                message: "The offer you're looking for doesn't exist or has been removed.",
                back: Button::new("Back to Home", ButtonVariant::Hero),
            },
            OfferPageState::Loaded { offer, sample } => {
                OfferPageView::Loaded(Box::new(self.details(offer, sample)))
            }
        }
    }

    fn details(&self, offer: &Offer, sample: &SearchResult) -> OfferDetailsView {
        let filters = &offer.filters;
        let location = if filters.location.is_empty() {
            "Any".to_string()
        } else {
            country_label(&filters.location)
                .map_or_else(|| filters.location.clone(), str::to_string)
        };

        let packages: Vec<PackageRow> = offer.packages.iter().map(PackageRow::new).collect();
        let package_count = (!packages.is_empty()).then(|| {
            Badge::new(
                format!("{} packages", packages.len()),
                BadgeVariant::Secondary,
            )
        });

        OfferDetailsView {
            id: offer.id,
            heading: format!("Offer #{}", offer.id),
            created: offer
                .created_at
                .as_ref()
                .map(|at| format!("Created {}", display_datetime(at))),
            filters: vec![
                LabeledValue {
                    label: "Platform",
                    value: filters.platform.label().to_string(),
                },
                LabeledValue {
                    label: "Size",
                    value: filters.size.label().to_string(),
                },
                LabeledValue {
                    label: "Location",
                    value: location,
                },
                LabeledValue {
                    label: "Category",
                    value: filters.category.clone(),
                },
                LabeledValue {
                    label: "Avg Views",
                    value: thousands(u64::from(filters.avg_views)),
                },
                LabeledValue {
                    label: "Engagement Rate",
                    value: percent(filters.er),
                },
            ],
            total: thousands(offer.total),
            total_caption: "Total matching influencers found",
            results: render_results(Some(sample), false, offer.free_trial_used, &self.options),
            trial: (!offer.free_trial_used).then(|| self.trial.view(Some(offer.id))),
            trial_confirmation: self.trial.confirmation(),
            packages,
            package_count,
            needs_more_packages: offer.needs_more_packages(),
            back: Button::new("Back to Search", ButtonVariant::Ghost),
        }
    }
}

#[cfg(test)]
mod tests {
    use infdb_core::{
        AudienceSize, PackageStatus, PackageType, Platform, SearchQuery,
    };

    use super::*;

    fn offer(free_trial_used: bool) -> Offer {
        Offer {
            id: 77,
            filters: SearchQuery {
                platform: Platform::Youtube,
                size: AudienceSize::Mid,
                location: "ca".to_string(),
                category: "Gaming".to_string(),
                avg_views: 4_000,
                er: 1.1,
            },
            total: 1_200,
            created_at: None,
            updated_at: None,
            free_trial_used,
            packages: vec![PackageRecord {
                id: 3,
                offer_id: 77,
                email: "buyer@example.com".to_string(),
                package_type: PackageType::Free,
                platform: "youtube".to_string(),
                record_limit: 5,
                status: PackageStatus::Failed,
                created_at: None,
            }],
            packages_total: 5,
            sample: None,
        }
    }

    fn loaded(free_trial_used: bool) -> OfferPage {
        let mut page = OfferPage::new(77, DisplayOptions::default());
        page.state = OfferPageState::Loaded {
            offer: Box::new(offer(free_trial_used)),
            sample: SearchResult {
                offer_id: Some(77),
                accounts: Vec::new(),
                total: 1_200,
                platform: "youtube".to_string(),
            },
        };
        page
    }

    #[test]
    fn details_label_filters_and_packages() {
        let OfferPageView::Loaded(details) = loaded(false).view() else {
            panic!("expected loaded view");
        };
        assert_eq!(details.heading, "Offer #77");
        assert_eq!(details.total, "1,200");
        assert_eq!(details.filters[2].value, "Canada");
        assert_eq!(details.filters[4].value, "4,000");
        assert_eq!(details.packages[0].type_label, "Free Trial");
        assert_eq!(details.packages[0].status.variant, BadgeVariant::Destructive);
        assert_eq!(details.packages[0].summary, "5 influencers");
        assert_eq!(details.packages[0].recipient, "Sent to: buyer@example.com");
        assert!(details.needs_more_packages);
        assert!(details.trial.is_some());
    }

    #[test]
    fn used_trial_hides_trial_form() {
        let OfferPageView::Loaded(details) = loaded(true).view() else {
            panic!("expected loaded view");
        };
        assert!(details.trial.is_none());
        let lock = details.results.preview().unwrap().lock.clone().unwrap();
        assert_eq!(lock.call_to_action, crate::results::CallToAction::Purchase);
    }

    #[test]
    fn not_found_view_links_home() {
        let mut page = OfferPage::new(5, DisplayOptions::default());
        page.state = OfferPageState::NotFound;
        let OfferPageView::NotFound { title, back, .. } = page.view() else {
            panic!("expected not found view");
        };
        assert_eq!(title, "Offer not found");
        assert_eq!(back.label, "Back to Home");
    }
}
