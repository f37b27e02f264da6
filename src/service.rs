/// Search session: query execution and result shaping
///
/// Owns the link between the search provider and the ranking pipeline.
/// Queries may run concurrently; each submission takes a sequence number
/// and only a response newer than the applied one may replace the
/// candidate list, so a slow early response can never overwrite a fast
/// later one. Filtering and pagination never re-query: they re-rank the
/// candidates already held.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::errors::FinderError;
use crate::provider::SearchProvider;
use crate::ranking::{self, Candidate, FilterCriteria, RankedCandidate, UserLocation};

/// One page of ranked results, owned so it can outlive the session lock.
#[derive(Debug, serde::Serialize)]
pub struct ResultPage {
    pub items: Vec<RankedCandidate>,
    pub page: usize,
    pub total_pages: usize,
    /// Matches across all pages, after filters
    pub total_results: usize,
}

#[derive(Default)]
struct SessionState {
    /// Sequence number of the response currently applied
    applied_seq: u64,
    query: String,
    candidates: Vec<Candidate>,
}

pub struct SearchSession {
    provider: Arc<dyn SearchProvider>,
    next_seq: AtomicU64,
    state: RwLock<SessionState>,
}

impl SearchSession {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        SearchSession {
            provider,
            next_seq: AtomicU64::new(0),
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Run a query against the provider and store its candidates.
    ///
    /// Returns the number of candidates the provider sent back. If a
    /// newer submission already applied its response, this one is
    /// dropped and the session keeps the newer results.
    pub async fn search(&self, query: &str) -> Result<usize, FinderError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(FinderError::validation("query", "Query cannot be empty"));
        }

        // The sequence number taken at submission decides recency;
        // completion order does not matter.
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(query = query, seq = seq, "Dispatching search");
        let started = Instant::now();
        let candidates = self.provider.search(query).await?;
        let fetched = candidates.len();
        let duration_ms = started.elapsed().as_millis() as u64;

        let mut state = self.state.write().await;
        if seq <= state.applied_seq {
            tracing::debug!(
                seq = seq,
                applied_seq = state.applied_seq,
                query = query,
                "Dropping stale search response"
            );
            return Ok(fetched);
        }
        state.applied_seq = seq;
        state.query = query.to_string();
        state.candidates = candidates;
        tracing::info!(
            query = query,
            seq = seq,
            candidates = fetched,
            duration_ms = duration_ms,
            "Applied search results"
        );
        Ok(fetched)
    }

    /// Rank the held candidates under the given criteria and return one
    /// page. Pure over the session state: calling this never re-queries
    /// and never mutates what search() stored.
    pub async fn page(
        &self,
        criteria: &FilterCriteria,
        location: Option<UserLocation>,
        page: usize,
        page_size: usize,
    ) -> ResultPage {
        let state = self.state.read().await;
        let ranked = ranking::rank(&state.candidates, criteria, location);
        let total_results = ranked.len();
        let slice = ranking::paginate(&ranked, page, page_size);
        ResultPage {
            items: slice.items.to_vec(),
            page,
            total_pages: slice.total_pages,
            total_results,
        }
    }

    /// Query text of the currently applied results; empty before the
    /// first search.
    pub async fn current_query(&self) -> String {
        self.state.read().await.query.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use crate::ranking::SortKey;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Provider that answers scripted queries, optionally after a delay.
    struct ScriptedProvider {
        responses: HashMap<String, (u64, Vec<Candidate>)>,
    }

    impl ScriptedProvider {
        fn new() -> Self {
            ScriptedProvider {
                responses: HashMap::new(),
            }
        }

        fn respond(mut self, query: &str, delay_ms: u64, candidates: Vec<Candidate>) -> Self {
            self.responses
                .insert(query.to_string(), (delay_ms, candidates));
            self
        }
    }

    #[async_trait]
    impl SearchProvider for ScriptedProvider {
        async fn search(&self, query: &str) -> Result<Vec<Candidate>, ProviderError> {
            match self.responses.get(query) {
                Some((delay_ms, candidates)) => {
                    if *delay_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                    }
                    Ok(candidates.clone())
                }
                None => Err(ProviderError::Upstream(format!(
                    "no scripted response for {}",
                    query
                ))),
            }
        }
    }

    fn eatery(name: &str, semantic: f64) -> Candidate {
        Candidate {
            name: name.to_string(),
            semantic_score: Some(semantic),
            ..Default::default()
        }
    }

    fn names(page: &ResultPage) -> Vec<&str> {
        page.items
            .iter()
            .map(|r| r.candidate.name.as_str())
            .collect()
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected() {
        let session = SearchSession::new(Arc::new(ScriptedProvider::new()));
        for query in ["", "   ", "\t\n"] {
            let result = session.search(query).await;
            assert!(matches!(
                result,
                Err(FinderError::Validation { field: Some(ref f), .. }) if f == "query"
            ));
        }
    }

    #[tokio::test]
    async fn test_search_populates_the_session() {
        let provider = ScriptedProvider::new().respond(
            "phở",
            0,
            vec![eatery("Phở Thìn", 0.9), eatery("Phở Hòa", 0.7)],
        );
        let session = SearchSession::new(Arc::new(provider));

        let fetched = session.search("  phở  ").await.expect("Failed to search");
        assert_eq!(fetched, 2);
        assert_eq!(session.current_query().await, "phở");

        let page = session.page(&FilterCriteria::default(), None, 1, 12).await;
        assert_eq!(names(&page), vec!["Phở Thìn", "Phở Hòa"]);
        assert_eq!(page.total_results, 2);
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn test_newest_submission_wins_the_race() {
        let provider = ScriptedProvider::new()
            .respond("phở", 50, vec![eatery("Phở Cũ", 0.9)])
            .respond("bún", 0, vec![eatery("Bún Chả", 0.8)]);
        let session = SearchSession::new(Arc::new(provider));

        // The first submission completes last; its response must be
        // dropped in favor of the newer one.
        let (slow, fast) = tokio::join!(session.search("phở"), session.search("bún"));
        slow.expect("Failed to run slow search");
        fast.expect("Failed to run fast search");

        assert_eq!(session.current_query().await, "bún");
        let page = session.page(&FilterCriteria::default(), None, 1, 12).await;
        assert_eq!(names(&page), vec!["Bún Chả"]);
    }

    #[tokio::test]
    async fn test_provider_failure_surfaces_as_provider_error() {
        let session = SearchSession::new(Arc::new(ScriptedProvider::new()));
        let result = session.search("unscripted").await;
        assert!(matches!(result, Err(FinderError::Provider(_))));
    }

    #[tokio::test]
    async fn test_pages_recompute_without_requerying() {
        let provider = ScriptedProvider::new().respond(
            "quán",
            0,
            vec![
                eatery("Bánh Mì", 0.2),
                eatery("Ăn Vặt", 0.9),
                eatery("Chè Ba Màu", 0.5),
            ],
        );
        let session = SearchSession::new(Arc::new(provider));
        session.search("quán").await.expect("Failed to search");

        let by_score = session.page(&FilterCriteria::default(), None, 1, 12).await;
        assert_eq!(names(&by_score), vec!["Ăn Vặt", "Chè Ba Màu", "Bánh Mì"]);

        let by_name = session
            .page(
                &FilterCriteria::default().with_sort(SortKey::Name),
                None,
                1,
                12,
            )
            .await;
        assert_eq!(names(&by_name), vec!["Ăn Vặt", "Bánh Mì", "Chè Ba Màu"]);

        // The held candidates are untouched by either pass
        let again = session.page(&FilterCriteria::default(), None, 1, 12).await;
        assert_eq!(names(&again), vec!["Ăn Vặt", "Chè Ba Màu", "Bánh Mì"]);
    }

    #[tokio::test]
    async fn test_pagination_splits_results() {
        let provider = ScriptedProvider::new().respond(
            "cơm",
            0,
            (0..5).map(|i| eatery(&format!("Quán {}", i), 0.5)).collect(),
        );
        let session = SearchSession::new(Arc::new(provider));
        session.search("cơm").await.expect("Failed to search");

        let first = session.page(&FilterCriteria::default(), None, 1, 2).await;
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_results, 5);

        let last = session.page(&FilterCriteria::default(), None, 3, 2).await;
        assert_eq!(names(&last), vec!["Quán 4"]);

        let beyond = session.page(&FilterCriteria::default(), None, 9, 2).await;
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_pages, 3);
    }
}
