//! Closed style variants for badges and buttons.
//!
//! Every variant maps to exactly one class string, so an unknown variant
//! cannot reach a renderer.

use infdb_core::PackageStatus;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeVariant {
    #[default]
    Default,
    Secondary,
    Destructive,
    Outline,
}

impl BadgeVariant {
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            BadgeVariant::Default => "badge bg-primary text-primary-foreground",
            BadgeVariant::Secondary => "badge bg-secondary text-secondary-foreground",
            BadgeVariant::Destructive => "badge bg-destructive text-destructive-foreground",
            BadgeVariant::Outline => "badge border text-foreground",
        }
    }
}

impl From<PackageStatus> for BadgeVariant {
    fn from(status: PackageStatus) -> Self {
        match status {
            PackageStatus::Sent | PackageStatus::Completed => BadgeVariant::Default,
            PackageStatus::Pending | PackageStatus::Unknown => BadgeVariant::Secondary,
            PackageStatus::Failed => BadgeVariant::Destructive,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonVariant {
    #[default]
    Default,
    Hero,
    Premium,
    Outline,
    Secondary,
    Ghost,
    Destructive,
    Link,
}

impl ButtonVariant {
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            ButtonVariant::Default => "btn bg-primary text-primary-foreground",
            ButtonVariant::Hero => "btn bg-gradient-primary text-white shadow-glow",
            ButtonVariant::Premium => "btn bg-gradient-card border border-primary text-foreground",
            ButtonVariant::Outline => "btn border border-input bg-background",
            ButtonVariant::Secondary => "btn bg-secondary text-secondary-foreground",
            ButtonVariant::Ghost => "btn hover:bg-accent",
            ButtonVariant::Destructive => "btn bg-destructive text-destructive-foreground",
            ButtonVariant::Link => "btn text-primary underline-offset-4",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonSize {
    #[default]
    Default,
    Sm,
    Lg,
}

impl ButtonSize {
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            ButtonSize::Default => "h-10 px-4",
            ButtonSize::Sm => "h-9 px-3",
            ButtonSize::Lg => "h-11 px-8",
        }
    }
}

/// A rendered badge: label plus the resolved class string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: String,
    pub variant: BadgeVariant,
    pub class: &'static str,
}

impl Badge {
    #[must_use]
    pub fn new(label: impl Into<String>, variant: BadgeVariant) -> Self {
        Self {
            label: label.into(),
            variant,
            class: variant.class(),
        }
    }
}

/// A rendered button. `enabled == false` means the action is blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub label: String,
    pub variant: ButtonVariant,
    pub size: ButtonSize,
    pub class: String,
    pub enabled: bool,
}

impl Button {
    #[must_use]
    pub fn new(label: impl Into<String>, variant: ButtonVariant) -> Self {
        Self::sized(label, variant, ButtonSize::Default)
    }

    #[must_use]
    pub fn sized(label: impl Into<String>, variant: ButtonVariant, size: ButtonSize) -> Self {
        Self {
            label: label.into(),
            variant,
            size,
            class: format!("{} {}", variant.class(), size.class()),
            enabled: true,
        }
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}
