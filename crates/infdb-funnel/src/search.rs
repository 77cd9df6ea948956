//! Search invocation and the sequence guard that drops superseded responses.

use infdb_client::WebhookClient;
use infdb_core::{SearchQuery, SearchResult};

/// Handle for one issued search. Only the most recently issued ticket can
/// commit a result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTicket {
    seq: u64,
    query: SearchQuery,
}

impl SearchTicket {
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    #[must_use]
    pub fn query(&self) -> &SearchQuery {
        &self.query
    }
}

/// The page's current search result and the request (if any) that will
/// replace it.
#[derive(Debug, Default)]
pub struct SearchSession {
    issued: u64,
    in_flight: Option<u64>,
    result: Option<SearchResult>,
}

impl SearchSession {
    /// Issues a new search. The previous result is discarded immediately and
    /// any earlier ticket becomes stale.
    pub fn begin(&mut self, query: SearchQuery) -> SearchTicket {
        self.issued += 1;
        self.in_flight = Some(self.issued);
        self.result = None;
        SearchTicket {
            seq: self.issued,
            query,
        }
    }

    /// Stores `result` if `ticket` is still the latest search.
    ///
    /// Returns `false` for a superseded or cancelled ticket; the result is
    /// dropped.
    pub fn commit(&mut self, ticket: &SearchTicket, result: SearchResult) -> bool {
        if self.in_flight != Some(ticket.seq) {
            tracing::warn!(
                seq = ticket.seq,
                latest = self.issued,
                "dropping stale search response"
            );
            return false;
        }
        self.in_flight = None;
        self.result = Some(result);
        true
    }

    /// Drops the current result and abandons any in-flight search.
    pub fn clear(&mut self) {
        self.in_flight = None;
        self.result = None;
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn result(&self) -> Option<&SearchResult> {
        self.result.as_ref()
    }
}

/// Runs one search. Every failure collapses into [`SearchResult::empty`].
pub async fn invoke_search(client: &WebhookClient, query: &SearchQuery) -> SearchResult {
    match client.search(query).await {
        Ok(result) => {
            tracing::debug!(
                offer_id = ?result.offer_id,
                total = result.total,
                accounts = result.accounts.len(),
                "search completed"
            );
            result
        }
        Err(e) => {
            tracing::warn!(error = %e, platform = %query.platform, "search failed; showing empty result");
            SearchResult::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use infdb_core::{AudienceSize, Platform};

    use super::*;

    fn query(category: &str) -> SearchQuery {
        SearchQuery {
            platform: Platform::Instagram,
            size: AudienceSize::Micro,
            location: String::new(),
            category: category.to_string(),
            avg_views: 2_500,
            er: 0.8,
        }
    }

    fn result(total: u64) -> SearchResult {
        SearchResult {
            total,
            ..SearchResult::default()
        }
    }

    #[test]
    fn begin_discards_previous_result() {
        let mut session = SearchSession::default();
        let first = session.begin(query("Fashion"));
        assert!(session.commit(&first, result(3)));
        assert_eq!(session.result().map(|r| r.total), Some(3));

        let _second = session.begin(query("Beauty"));
        assert!(session.result().is_none());
        assert!(session.is_loading());
    }

    #[test]
    fn superseded_ticket_cannot_commit() {
        let mut session = SearchSession::default();
        let first = session.begin(query("Fashion"));
        let second = session.begin(query("Beauty"));
        assert!(second.seq() > first.seq());

        assert!(session.commit(&second, result(12)));
        assert!(!session.commit(&first, result(99)));
        assert_eq!(session.result().map(|r| r.total), Some(12));
    }

    #[test]
    fn late_commit_after_newer_issue_is_dropped() {
        let mut session = SearchSession::default();
        let first = session.begin(query("Fashion"));
        let _second = session.begin(query("Beauty"));
        assert!(!session.commit(&first, result(5)));
        assert!(session.is_loading(), "newer search is still pending");
        assert!(session.result().is_none());
    }

    #[test]
    fn clear_abandons_in_flight_search() {
        let mut session = SearchSession::default();
        let ticket = session.begin(query("Fashion"));
        session.clear();
        assert!(!session.is_loading());
        assert!(!session.commit(&ticket, result(5)));
        assert!(session.result().is_none());
    }
}
