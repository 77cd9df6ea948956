//! The search page: filter panel, search session, result display and trial
//! form under one owner.

use std::collections::HashSet;

use infdb_client::WebhookClient;
use infdb_core::{AppConfig, FilterCriteria, SearchPolicy, SearchResult};
use serde::Serialize;

use crate::error::FunnelError;
use crate::filter_panel::{FilterChange, FilterPanel, FilterPanelView};
use crate::notify::{Notifications, Rendered};
use crate::results::{is_displayable, render_results, DisplayOptions, ResultView};
use crate::search::{invoke_search, SearchSession, SearchTicket};
use crate::trial::{TrialForm, TrialOutcome, TrialView};

/// Where the visitor is in the funnel. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelPhase {
    NoSearch,
    Loading,
    EmptyResult,
    /// A preview is shown; the remainder is locked when it exceeds the
    /// preview size.
    PreviewLocked,
    TrialPending,
    TrialSucceeded,
    TrialFailed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPageView {
    pub phase: FunnelPhase,
    pub purchase_ready: bool,
    pub filters: FilterPanelView,
    pub results: ResultView,
    /// Offered while a preview with an identifier is shown and that
    /// offer's trial has not been used.
    pub trial: Option<TrialView>,
    /// Set right after a trial succeeds, e.g. "Trial package of 5
    /// influencers sent to foo@bar.com".
    pub trial_confirmation: Option<String>,
}

#[derive(Debug)]
pub struct SearchPage {
    panel: FilterPanel,
    session: SearchSession,
    trial: TrialForm,
    /// Offers whose trial succeeded during this page's lifetime.
    used_trials: HashSet<i64>,
    notifications: Notifications,
    options: DisplayOptions,
}

impl SearchPage {
    #[must_use]
    pub fn new(policy: SearchPolicy, options: DisplayOptions) -> Self {
        Self {
            panel: FilterPanel::new(policy),
            session: SearchSession::default(),
            trial: TrialForm::default(),
            used_trials: HashSet::new(),
            notifications: Notifications::default(),
            options,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            SearchPolicy {
                require_location: config.require_location,
            },
            DisplayOptions::from_config(config),
        )
    }

    /// Replaces the whole criteria at once, as if every control had been set.
    #[must_use]
    pub fn with_criteria(mut self, criteria: FilterCriteria) -> Self {
        self.panel = FilterPanel::with_criteria(self.panel.policy(), criteria);
        self
    }

    #[must_use]
    pub fn panel(&self) -> &FilterPanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut FilterPanel {
        &mut self.panel
    }

    #[must_use]
    pub fn result(&self) -> Option<&SearchResult> {
        self.session.result()
    }

    #[must_use]
    pub fn trial(&self) -> &TrialForm {
        &self.trial
    }

    pub fn trial_mut(&mut self) -> &mut TrialForm {
        &mut self.trial
    }

    /// True when the current result's offer already had its trial.
    #[must_use]
    pub fn trial_used(&self) -> bool {
        self.result()
            .and_then(|r| r.offer_id)
            .is_some_and(|id| self.used_trials.contains(&id))
    }

    /// Applies a filter change. Any change discards the current result and
    /// abandons an in-flight search.
    pub fn apply_filter(&mut self, change: FilterChange) -> &FilterCriteria {
        self.session.clear();
        self.trial.reset();
        self.panel.apply(change)
    }

    #[must_use]
    pub fn search_enabled(&self) -> bool {
        self.panel.search_enabled() && !self.session.is_loading()
    }

    /// Starts a search for the current criteria.
    ///
    /// # Errors
    ///
    /// Returns [`FunnelError::SearchInFlight`] while a search is loading, or
    /// [`FunnelError::Filter`] while a required filter is empty.
    pub fn begin_search(&mut self) -> Result<SearchTicket, FunnelError> {
        if self.session.is_loading() {
            return Err(FunnelError::SearchInFlight);
        }
        let query = self.panel.query()?;
        self.trial.reset();
        Ok(self.session.begin(query))
    }

    /// Commits a finished search. Returns `false` if the ticket was
    /// superseded and the result dropped.
    pub fn commit_search(&mut self, ticket: &SearchTicket, result: SearchResult) -> bool {
        self.session.commit(ticket, result)
    }

    /// Runs a search end to end. Failures render as an empty result.
    ///
    /// # Errors
    ///
    /// See [`SearchPage::begin_search`]; no request is sent in that case.
    pub async fn search(&mut self, client: &WebhookClient) -> Result<(), FunnelError> {
        let ticket = self.begin_search()?;
        let result = invoke_search(client, ticket.query()).await;
        self.commit_search(&ticket, result);
        Ok(())
    }

    /// Submits the trial form for the current result's offer.
    ///
    /// # Errors
    ///
    /// Returns a [`FunnelError`] when submission is blocked.
    pub async fn submit_trial(&mut self, client: &WebhookClient) -> Result<(), FunnelError> {
        let offer_id = self.result().and_then(|r| r.offer_id);
        if *self.trial.submit(client, offer_id).await? == TrialOutcome::Success {
            self.used_trials.extend(offer_id);
            self.notifications
                .success("Trial package will be sent to your email within 5 minutes");
        }
        Ok(())
    }

    #[must_use]
    pub fn phase(&self) -> FunnelPhase {
        if self.session.is_loading() {
            return FunnelPhase::Loading;
        }
        let Some(result) = self.session.result() else {
            return FunnelPhase::NoSearch;
        };
        if !is_displayable(result, &self.options) {
            return FunnelPhase::EmptyResult;
        }
        match self.trial.outcome() {
            TrialOutcome::Idle => FunnelPhase::PreviewLocked,
            TrialOutcome::Submitting => FunnelPhase::TrialPending,
            TrialOutcome::Success => FunnelPhase::TrialSucceeded,
            TrialOutcome::Error { .. } => FunnelPhase::TrialFailed,
        }
    }

    /// True when a preview with an identifier is shown and the purchase
    /// widget is configured. Coexists with the lock overlay.
    #[must_use]
    pub fn purchase_ready(&self) -> bool {
        !matches!(
            self.phase(),
            FunnelPhase::NoSearch | FunnelPhase::Loading | FunnelPhase::EmptyResult
        ) && self.options.pricing_table.is_some()
            && self.result().and_then(|r| r.offer_id).is_some()
    }

    #[must_use]
    pub fn view(&self) -> SearchPageView {
        let loading = self.session.is_loading();
        let trial_used = self.trial_used();
        let results = render_results(self.result(), loading, trial_used, &self.options);
        let offer_id = results.preview().and_then(|p| p.offer_id);
        let trial = offer_id
            .filter(|_| !trial_used)
            .map(|id| self.trial.view(Some(id)));
        let trial_confirmation = offer_id.and_then(|_| self.trial.confirmation());
        SearchPageView {
            phase: self.phase(),
            purchase_ready: self.purchase_ready(),
            filters: self.panel.view(loading),
            results,
            trial,
            trial_confirmation,
        }
    }

    /// Renders the page and drains pending notifications.
    pub fn render(&mut self) -> Rendered<SearchPageView> {
        Rendered {
            view: self.view(),
            notifications: self.notifications.drain(),
        }
    }
}

#[cfg(test)]
mod tests {
    use infdb_core::{InfluencerSummary, Platform};

    use super::*;

    fn ready_page() -> SearchPage {
        let mut page = SearchPage::new(SearchPolicy::default(), DisplayOptions::default());
        page.apply_filter(FilterChange::Platform(Platform::Instagram));
        page.apply_filter(FilterChange::Category("Fashion".to_string()));
        page
    }

    fn result(total: u64) -> SearchResult {
        SearchResult {
            offer_id: Some(42),
            accounts: (0..5)
                .map(|i| InfluencerSummary {
                    user_id: i.to_string(),
                    full_name: format!("Creator {i}"),
                    username: format!("creator{i}"),
                    picture_url: String::new(),
                    follower_count: 1_000,
                    engagement_rate_percent: 1.0,
                })
                .collect(),
            total,
            platform: "instagram".to_string(),
        }
    }

    #[test]
    fn blocked_search_reports_missing_filters() {
        let mut page = SearchPage::new(SearchPolicy::default(), DisplayOptions::default());
        assert!(!page.search_enabled());
        assert!(matches!(page.begin_search(), Err(FunnelError::Filter(_))));
        assert_eq!(page.phase(), FunnelPhase::NoSearch);
    }

    #[test]
    fn phases_follow_search_lifecycle() {
        let mut page = ready_page();
        let ticket = page.begin_search().unwrap();
        assert_eq!(page.phase(), FunnelPhase::Loading);
        assert!(!page.search_enabled(), "loading gates re-submission");
        assert_eq!(page.begin_search(), Err(FunnelError::SearchInFlight));

        assert!(page.commit_search(&ticket, result(12)));
        assert_eq!(page.phase(), FunnelPhase::PreviewLocked);

        let ticket = page.begin_search().unwrap();
        page.commit_search(&ticket, SearchResult::empty());
        assert_eq!(page.phase(), FunnelPhase::EmptyResult);
    }

    #[test]
    fn filter_change_returns_to_no_search() {
        let mut page = ready_page();
        let ticket = page.begin_search().unwrap();
        page.commit_search(&ticket, result(12));
        page.apply_filter(FilterChange::MinAvgViews(5_000));
        assert_eq!(page.phase(), FunnelPhase::NoSearch);
        assert!(page.result().is_none());
    }

    #[test]
    fn filter_change_mid_search_drops_response() {
        let mut page = ready_page();
        let ticket = page.begin_search().unwrap();
        page.apply_filter(FilterChange::Category("Beauty".to_string()));
        assert!(!page.commit_search(&ticket, result(12)));
        assert_eq!(page.phase(), FunnelPhase::NoSearch);
    }

    #[test]
    fn trial_outcome_drives_phase() {
        let mut page = ready_page();
        let ticket = page.begin_search().unwrap();
        page.commit_search(&ticket, result(12));
        page.trial_mut().set_email("foo@bar.com");
        page.trial_mut().begin(Some(42)).unwrap();
        assert_eq!(page.phase(), FunnelPhase::TrialPending);
        page.trial_mut()
            .finish(&Err(infdb_client::WebhookError::Api(None)));
        assert_eq!(page.phase(), FunnelPhase::TrialFailed);
    }

    #[test]
    fn purchase_ready_requires_pricing_table() {
        let mut page = ready_page();
        let ticket = page.begin_search().unwrap();
        page.commit_search(&ticket, result(12));
        assert!(!page.purchase_ready());

        let mut page = SearchPage::new(
            SearchPolicy::default(),
            DisplayOptions {
                min_display_total: 1,
                pricing_table: Some(crate::purchase::PricingTableConfig {
                    pricing_table_id: "prctbl_1".to_string(),
                    publishable_key: "pk_test".to_string(),
                }),
            },
        )
        .with_criteria(ready_page().panel().criteria().clone());
        let ticket = page.begin_search().unwrap();
        page.commit_search(&ticket, result(12));
        assert!(page.purchase_ready());
        assert!(page.view().purchase_ready);
    }

    #[test]
    fn view_offers_trial_only_with_identifier() {
        let mut page = ready_page();
        let ticket = page.begin_search().unwrap();
        let mut anonymous = result(12);
        anonymous.offer_id = None;
        page.commit_search(&ticket, anonymous);
        assert!(page.view().trial.is_none());

        let ticket = page.begin_search().unwrap();
        page.commit_search(&ticket, result(12));
        assert!(page.view().trial.is_some());
    }
}
