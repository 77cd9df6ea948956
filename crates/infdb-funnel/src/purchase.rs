//! Purchase hand-off: the embedded pricing-table widget and the package
//! catalog shown next to it.

use infdb_core::pricing::{CUSTOM_MAX_RECORDS, CUSTOM_MIN_RECORDS};
use infdb_core::{custom_quote, PackageType, PurchaseOption, StripeConfig, PACKAGE_TIERS};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::format::thousands;
use crate::variant::{Badge, BadgeVariant, Button, ButtonVariant};

/// Identifiers for the hosted pricing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricingTableConfig {
    pub pricing_table_id: String,
    pub publishable_key: String,
}

impl From<&StripeConfig> for PricingTableConfig {
    fn from(config: &StripeConfig) -> Self {
        Self {
            pricing_table_id: config.pricing_table_id.clone(),
            publishable_key: config.publishable_key.clone(),
        }
    }
}

/// A pricing-table embed bound to one search or offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseWidget {
    pub pricing_table_id: String,
    pub publishable_key: String,
    pub client_reference_id: String,
    pub embed_html: String,
}

impl PricingTableConfig {
    /// Builds the widget whose purchases are correlated to `offer_id`.
    #[must_use]
    pub fn widget_for(&self, offer_id: i64) -> PurchaseWidget {
        let client_reference_id = offer_id.to_string();
        let embed_html = format!(
            r#"<stripe-pricing-table pricing-table-id="{}" publishable-key="{}" client-reference-id="{}"></stripe-pricing-table>"#,
            escape_attr(&self.pricing_table_id),
            escape_attr(&self.publishable_key),
            escape_attr(&client_reference_id),
        );
        PurchaseWidget {
            pricing_table_id: self.pricing_table_id.clone(),
            publishable_key: self.publishable_key.clone(),
            client_reference_id,
            embed_html,
        }
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierView {
    pub package_type: PackageType,
    pub name: &'static str,
    pub records: u32,
    pub price: Decimal,
    pub price_label: String,
    pub per_record_label: String,
    pub description: &'static str,
    pub features: Vec<&'static str>,
    pub recommended: Option<Badge>,
    pub button: Button,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomPackageView {
    pub min_records: u32,
    pub max_records: u32,
    pub option: PurchaseOption,
    pub caption: String,
    pub button: Button,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingView {
    pub tiers: Vec<TierView>,
    /// Present only when the search matched enough records for custom volumes.
    pub custom: Option<CustomPackageView>,
}

/// Renders the package catalog for a search with `match_total` matches and
/// a requested custom volume.
#[must_use]
pub fn pricing_view(match_total: u64, requested_records: u32) -> PricingView {
    let tiers = PACKAGE_TIERS
        .iter()
        .map(|tier| {
            let price = tier.price();
            let per_record = price / Decimal::from(tier.records);
            let variant = if tier.recommended {
                ButtonVariant::Hero
            } else {
                ButtonVariant::Premium
            };
            TierView {
                package_type: tier.package_type,
                name: tier.name,
                records: tier.records,
                price,
                price_label: format!("${}", tier.price_usd),
                per_record_label: format!("${per_record:.2} per influencer"),
                description: tier.description,
                features: tier.features.to_vec(),
                recommended: tier
                    .recommended
                    .then(|| Badge::new("Recommended", BadgeVariant::Default)),
                button: Button::new("Buy Package", variant),
            }
        })
        .collect();

    let custom = custom_quote(requested_records, match_total).map(|option| {
        let max_records = u32::try_from(match_total)
            .unwrap_or(u32::MAX)
            .min(CUSTOM_MAX_RECORDS)
            .max(CUSTOM_MIN_RECORDS);
        let (caption, button) = match &option {
            PurchaseOption::Custom {
                total, per_record, ..
            } => (
                format!("${total:.2} total • ${per_record:.2} per influencer"),
                Button::new("Buy Custom Package", ButtonVariant::Premium),
            ),
            PurchaseOption::ContactSales { .. } => (
                format!(
                    "For orders over {} influencers",
                    thousands(u64::from(CUSTOM_MAX_RECORDS))
                ),
                Button::new("Contact Us", ButtonVariant::Hero),
            ),
        };
        CustomPackageView {
            min_records: CUSTOM_MIN_RECORDS,
            max_records,
            option,
            caption,
            button,
        }
    });

    PricingView { tiers, custom }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PricingTableConfig {
        PricingTableConfig {
            pricing_table_id: "prctbl_123".to_string(),
            publishable_key: "pk_test_abc".to_string(),
        }
    }

    #[test]
    fn widget_carries_offer_id_as_client_reference() {
        let widget = config().widget_for(77);
        assert_eq!(widget.client_reference_id, "77");
        assert_eq!(
            widget.embed_html,
            r#"<stripe-pricing-table pricing-table-id="prctbl_123" publishable-key="pk_test_abc" client-reference-id="77"></stripe-pricing-table>"#
        );
    }

    #[test]
    fn widget_attributes_are_escaped() {
        let widget = PricingTableConfig {
            pricing_table_id: r#"x" onload="alert(1)"#.to_string(),
            publishable_key: "pk<&>".to_string(),
        }
        .widget_for(1);
        assert!(!widget.embed_html.contains(r#"" onload"#));
        assert!(widget.embed_html.contains("&quot; onload=&quot;"));
        assert!(widget.embed_html.contains("pk&lt;&amp;&gt;"));
    }

    #[test]
    fn tiers_render_labels_and_recommendation() {
        let view = pricing_view(100, 600);
        assert_eq!(view.tiers.len(), 3);
        assert_eq!(view.tiers[0].price_label, "$99");
        assert_eq!(view.tiers[0].per_record_label, "$3.30 per influencer");
        assert!(view.tiers[0].recommended.is_none());
        assert!(view.tiers[2].recommended.is_some());
        assert_eq!(view.tiers[2].button.variant, ButtonVariant::Hero);
        assert!(view.custom.is_none(), "100 matches is too few for custom");
    }

    #[test]
    fn custom_package_quotes_clamped_volume() {
        let view = pricing_view(1_500, 400);
        let custom = view.custom.expect("custom should be offered");
        assert_eq!(custom.max_records, 1_500);
        assert_eq!(custom.caption, "$300.00 total • $0.50 per influencer");
        assert!(matches!(
            custom.option,
            PurchaseOption::Custom { records: 600, .. }
        ));
    }

    #[test]
    fn large_volume_falls_back_to_contact() {
        let view = pricing_view(50_000, 10_000);
        let custom = view.custom.expect("custom should be offered");
        assert_eq!(custom.button.label, "Contact Us");
        assert_eq!(custom.caption, "For orders over 10,000 influencers");
    }
}
