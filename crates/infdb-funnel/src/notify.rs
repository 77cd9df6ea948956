//! Page-owned notification queue.
//!
//! Pages push notifications while handling events; callers drain them
//! together with the next rendered view.

use std::collections::VecDeque;

use serde::Serialize;

use crate::variant::BadgeVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Info,
    Success,
    Error,
}

impl Tone {
    #[must_use]
    pub const fn variant(self) -> BadgeVariant {
        match self {
            Tone::Info | Tone::Success => BadgeVariant::Default,
            Tone::Error => BadgeVariant::Destructive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub tone: Tone,
}

#[derive(Debug, Default)]
pub struct Notifications {
    queue: VecDeque<Notification>,
}

impl Notifications {
    pub fn push(&mut self, tone: Tone, title: impl Into<String>, description: impl Into<String>) {
        self.queue.push_back(Notification {
            title: title.into(),
            description: description.into(),
            tone,
        });
    }

    pub fn error(&mut self, description: impl Into<String>) {
        self.push(Tone::Error, "Error", description);
    }

    pub fn success(&mut self, description: impl Into<String>) {
        self.push(Tone::Success, "Success!", description);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Removes and returns every queued notification, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.queue.drain(..).collect()
    }
}

/// A view paired with the notifications raised since the previous render.
#[derive(Debug, Clone, Serialize)]
pub struct Rendered<V> {
    pub view: V,
    pub notifications: Vec<Notification>,
}
