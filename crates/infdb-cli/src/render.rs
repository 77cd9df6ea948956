//! Plain-text rendering of funnel view models.

use infdb_funnel::filter_panel::FilterPanelView;
use infdb_funnel::offer::OfferDetailsView;
use infdb_funnel::{
    CallToAction, Notification, OfferPageView, PricingView, ResultView, SearchPageView, Tone,
    TrialOutcome, TrialView,
};

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub(crate) fn results(view: &ResultView) -> Vec<String> {
    match view {
        ResultView::Hidden => Vec::new(),
        ResultView::Loading { message } | ResultView::Empty { message } => {
            vec![(*message).to_string()]
        }
        ResultView::Preview(preview) => {
            let mut lines = vec![preview.headline.clone(), String::new()];
            lines.push(format!(
                "{:<24}{:<24}{:<18}ENGAGEMENT",
                "NAME", "HANDLE", "FOLLOWERS"
            ));
            for row in &preview.rows {
                lines.push(format!(
                    "{:<24}{:<24}{:<18}{}",
                    row.name, row.handle, row.followers, row.engagement
                ));
            }
            for _ in 0..preview.placeholder_rows {
                lines.push(format!("{:<24}{:<24}{:<18}", "████████", "██████", "████"));
            }
            if let Some(lock) = &preview.lock {
                lines.push(String::new());
                lines.push(format!("[locked] {}", lock.message));
                let hint = match lock.call_to_action {
                    CallToAction::RequestTrial => "re-run with --trial-email to get 5 for free",
                    CallToAction::Purchase => "purchase a package to unlock the full list",
                };
                lines.push(format!("  {} ({hint})", lock.button.label));
            }
            if let Some(widget) = &preview.purchase {
                lines.push(String::new());
                lines.push(format!(
                    "Purchase reference: {}",
                    widget.client_reference_id
                ));
            }
            lines
        }
    }
}

pub(crate) fn search_page(view: &SearchPageView) -> String {
    let mut lines = results(&view.results);
    if lines.is_empty() {
        let missing: Vec<String> = view
            .filters
            .missing_fields
            .iter()
            .map(ToString::to_string)
            .collect();
        lines.push(format!("search blocked; missing: {}", missing.join(", ")));
    }
    if let Some(trial) = &view.trial {
        if trial.outcome != TrialOutcome::Idle {
            lines.push(String::new());
            lines.push(trial_outcome(trial));
        }
    }
    if let Some(confirmation) = &view.trial_confirmation {
        lines.push(String::new());
        lines.push(confirmation.clone());
    }
    finish(lines)
}

pub(crate) fn trial_outcome(view: &TrialView) -> String {
    match &view.outcome {
        TrialOutcome::Idle => "trial not requested".to_string(),
        TrialOutcome::Submitting => "trial request in progress".to_string(),
        TrialOutcome::Success => view
            .confirmation
            .clone()
            .unwrap_or_else(|| "trial requested".to_string()),
        TrialOutcome::Error { message } => format!("trial failed: {message}"),
    }
}

fn offer_details(details: &OfferDetailsView) -> Vec<String> {
    let mut lines = vec![details.heading.clone()];
    if let Some(created) = &details.created {
        lines.push(created.clone());
    }
    lines.push(String::new());
    for filter in &details.filters {
        lines.push(format!("{:<18}{}", filter.label, filter.value));
    }
    lines.push(String::new());
    lines.push(format!("{} {}", details.total, details.total_caption));
    lines.push(String::new());
    lines.extend(results(&details.results));
    if let Some(confirmation) = &details.trial_confirmation {
        lines.push(String::new());
        lines.push(confirmation.clone());
    }

    if !details.packages.is_empty() {
        lines.push(String::new());
        lines.push("Your Packages".to_string());
        lines.push(format!("{:<16}{:<12}{:<40}RECIPIENT", "TYPE", "STATUS", "DETAILS"));
        for row in &details.packages {
            lines.push(format!(
                "{:<16}{:<12}{:<40}{}",
                row.type_label, row.status.label, row.summary, row.recipient
            ));
        }
    }
    if details.needs_more_packages {
        lines.push(String::new());
        lines.push("More matching influencers are available for purchase.".to_string());
    }
    lines
}

pub(crate) fn offer_page(view: &OfferPageView) -> String {
    let lines = match view {
        OfferPageView::Loading => vec!["loading offer...".to_string()],
        OfferPageView::NotFound { title, message, .. } => {
            vec![(*title).to_string(), (*message).to_string()]
        }
        OfferPageView::Loaded(details) => offer_details(details),
    };
    finish(lines)
}

pub(crate) fn pricing(view: &PricingView) -> String {
    let mut lines = vec![format!(
        "{:<16}{:<10}{:<10}{:<24}DESCRIPTION",
        "PACKAGE", "RECORDS", "PRICE", "PER RECORD"
    )];
    for tier in &view.tiers {
        let name = if tier.recommended.is_some() {
            format!("{} *", tier.name)
        } else {
            tier.name.to_string()
        };
        lines.push(format!(
            "{:<16}{:<10}{:<10}{:<24}{}",
            name, tier.records, tier.price_label, tier.per_record_label, tier.description
        ));
    }
    match &view.custom {
        Some(custom) => {
            lines.push(String::new());
            lines.push(format!(
                "Custom package ({}-{} records): {}",
                custom.min_records, custom.max_records, custom.caption
            ));
        }
        None => {
            lines.push(String::new());
            lines.push("Custom packages need more than 500 matching influencers.".to_string());
        }
    }
    finish(lines)
}

pub(crate) fn filter_options(view: &FilterPanelView) -> String {
    let join = |options: &[infdb_funnel::filter_panel::SelectOption]| {
        options
            .iter()
            .map(|o| {
                if o.selected {
                    format!("{} [{}]*", o.label, o.value)
                } else {
                    format!("{} [{}]", o.label, o.value)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    };
    let lines = vec![
        format!("Platforms:   {}", join(&view.platforms)),
        format!("Sizes:       {}", join(&view.sizes)),
        format!(
            "Locations:   {}{}",
            join(&view.locations),
            if view.location_required {
                " (required)"
            } else {
                ""
            }
        ),
        format!("Categories:  {}", view.category_suggestions.join(", ")),
        format!(
            "Avg views:   {}-{} step {} ({})",
            view.avg_views.min, view.avg_views.max, view.avg_views.step, view.avg_views.caption
        ),
        format!(
            "Engagement:  {}-{}% step {} ({})",
            view.engagement_rate.min,
            view.engagement_rate.max,
            view.engagement_rate.step,
            view.engagement_rate.caption
        ),
    ];
    finish(lines)
}

pub(crate) fn notifications(items: &[Notification]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let lines = items
        .iter()
        .map(|n| {
            let tag = match n.tone {
                Tone::Info => "info",
                Tone::Success => "ok",
                Tone::Error => "error",
            };
            format!("[{tag}] {}: {}", n.title, n.description)
        })
        .collect();
    finish(lines)
}

#[cfg(test)]
mod tests {
    use infdb_core::{InfluencerSummary, SearchResult};
    use infdb_funnel::{pricing_view, render_results, DisplayOptions};

    use super::*;

    fn preview(total: u64) -> ResultView {
        let result = SearchResult {
            offer_id: Some(9),
            accounts: vec![InfluencerSummary {
                user_id: "1".to_string(),
                full_name: "Emma Johnson".to_string(),
                username: "emmaj_lifestyle".to_string(),
                picture_url: String::new(),
                follower_count: 245_000,
                engagement_rate_percent: 1.8,
            }],
            total,
            platform: "instagram".to_string(),
        };
        render_results(Some(&result), false, false, &DisplayOptions::default())
    }

    #[test]
    fn preview_lists_rows_and_lock_message() {
        let text = results(&preview(12)).join("\n");
        assert!(text.contains("Emma Johnson"));
        assert!(text.contains("@emmaj_lifestyle"));
        assert!(text.contains("245.0K followers"));
        assert!(text.contains("[locked] 7 more influencers match your criteria"));
    }

    #[test]
    fn small_preview_has_no_lock_line() {
        let text = results(&preview(1)).join("\n");
        assert!(!text.contains("[locked]"));
    }

    #[test]
    fn pricing_marks_recommended_tier() {
        let text = pricing(&pricing_view(100, 600));
        assert!(text.contains("Enterprise *"));
        assert!(text.contains("$99"));
        assert!(text.contains("Custom packages need more than 500"));
    }

    #[test]
    fn notifications_are_tagged_by_tone() {
        let text = notifications(&[Notification {
            title: "Error".to_string(),
            description: "Failed to load offer details".to_string(),
            tone: Tone::Error,
        }]);
        assert_eq!(text, "[error] Error: Failed to load offer details\n");
        assert!(notifications(&[]).is_empty());
    }
}
