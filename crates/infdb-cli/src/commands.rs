//! Command handlers. Each one drives a funnel page against the live
//! webhooks and prints the resulting view.

use infdb_client::WebhookClient;
use infdb_core::{AppConfig, AudienceSize, Platform, SearchPolicy};
use infdb_funnel::{
    pricing_view, DisplayOptions, FilterChange, FilterPanel, OfferPage, OfferPageState,
    SearchPage, TrialForm, TrialOutcome,
};
use serde::Serialize;

use crate::render;

/// Filter values collected from `search` flags.
#[derive(Debug, Default)]
pub(crate) struct SearchArgs {
    pub platform: Option<Platform>,
    pub size: Option<AudienceSize>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub min_views: Option<u32>,
    pub min_er: Option<f64>,
    pub trial_email: Option<String>,
}

impl SearchArgs {
    /// The panel changes these flags amount to, in panel order.
    pub(crate) fn changes(&self) -> Vec<FilterChange> {
        let mut changes = Vec::new();
        if let Some(platform) = self.platform {
            changes.push(FilterChange::Platform(platform));
        }
        if let Some(size) = self.size {
            changes.push(FilterChange::Size(size));
        }
        if let Some(location) = &self.location {
            changes.push(FilterChange::Location(location.clone()));
        }
        if let Some(category) = &self.category {
            changes.push(FilterChange::Category(category.clone()));
        }
        if let Some(views) = self.min_views {
            changes.push(FilterChange::MinAvgViews(views));
        }
        if let Some(rate) = self.min_er {
            changes.push(FilterChange::MinEngagementRate(rate));
        }
        changes
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run a search and print the preview.
///
/// # Errors
///
/// Returns an error if a required filter is missing or the client cannot be
/// built. Search failures themselves render as an empty result.
pub(crate) async fn run_search(
    config: &AppConfig,
    args: SearchArgs,
    json: bool,
) -> anyhow::Result<()> {
    let client = WebhookClient::from_config(config)?;
    let mut page = SearchPage::from_config(config);
    for change in args.changes() {
        page.apply_filter(change);
    }

    page.search(&client).await?;

    if let Some(email) = args.trial_email {
        page.trial_mut().set_email(email);
        page.submit_trial(&client).await?;
    }

    let rendered = page.render();
    if json {
        print_json(&rendered)
    } else {
        print!("{}", render::search_page(&rendered.view));
        eprint!("{}", render::notifications(&rendered.notifications));
        Ok(())
    }
}

/// Print the locations available for `platform`.
///
/// # Errors
///
/// Returns an error if the locations webhook fails.
pub(crate) async fn run_locations(
    config: &AppConfig,
    platform: Platform,
    json: bool,
) -> anyhow::Result<()> {
    let client = WebhookClient::from_config(config)?;
    let labels = client.locations(platform).await?;

    if json {
        return print_json(&labels);
    }
    if labels.is_empty() {
        println!("no locations available for {}", platform.label());
    }
    for label in &labels {
        println!("{label}");
    }
    Ok(())
}

/// Request the free trial for `offer_id`.
///
/// # Errors
///
/// Returns an error if the email is invalid or the request is rejected.
pub(crate) async fn run_trial(
    config: &AppConfig,
    offer_id: i64,
    email: &str,
    json: bool,
) -> anyhow::Result<()> {
    let client = WebhookClient::from_config(config)?;
    let mut form = TrialForm::default();
    form.set_email(email);
    let outcome = form.submit(&client, Some(offer_id)).await?.clone();

    if json {
        print_json(&form.view(Some(offer_id)))?;
    } else {
        println!("{}", render::trial_outcome(&form.view(Some(offer_id))));
    }
    match outcome {
        TrialOutcome::Error { message } => anyhow::bail!("trial request failed: {message}"),
        _ => Ok(()),
    }
}

/// Load an offer and print its details.
///
/// # Errors
///
/// Returns an error if the offer does not exist.
pub(crate) async fn run_offer(
    config: &AppConfig,
    offer_id: i64,
    trial_email: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let client = WebhookClient::from_config(config)?;
    let mut page = OfferPage::new(offer_id, DisplayOptions::from_config(config));
    page.load(&client).await;

    let loaded = matches!(page.state(), OfferPageState::Loaded { .. });
    if let Some(email) = trial_email.filter(|_| loaded) {
        page.trial_mut().set_email(email);
        page.submit_trial(&client).await?;
    }

    let not_found = matches!(page.state(), OfferPageState::NotFound);
    let rendered = page.render();
    if json {
        print_json(&rendered)?;
    } else {
        print!("{}", render::offer_page(&rendered.view));
        eprint!("{}", render::notifications(&rendered.notifications));
    }
    if not_found {
        anyhow::bail!("offer {offer_id} not found");
    }
    Ok(())
}

/// Print the package catalog.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails.
pub(crate) fn run_pricing(total: u64, records: u32, json: bool) -> anyhow::Result<()> {
    let view = pricing_view(total, records);
    if json {
        return print_json(&view);
    }
    print!("{}", render::pricing(&view));
    Ok(())
}

/// Print the filter catalog and defaults.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails.
pub(crate) fn run_options(
    config: &AppConfig,
    category: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let mut panel = FilterPanel::new(SearchPolicy {
        require_location: config.require_location,
    });
    if let Some(category) = category {
        panel.apply(FilterChange::Category(category));
    }
    let view = panel.view(false);
    if json {
        return print_json(&view);
    }
    print!("{}", render::filter_options(&view));
    Ok(())
}
