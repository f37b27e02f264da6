/// reqwest-backed search provider
///
/// Talks to the eatery search service: GET {base_url}?q={query}. The
/// response is either the API-proxy envelope {"success", "total", "data"}
/// or a bare JSON array of hits. Elements decode one at a time; a hit
/// without a usable name is skipped rather than failing the batch.
///
/// After decode, hits below the relevance threshold are dropped unless
/// the query text literally appears in the hit's name or flattened menu
/// and the lower keyword threshold is met. Both thresholds are service
/// contract values carried in the config, not ranking logic.
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{ProviderError, SearchProvider};
use crate::config::SearchConfig;
use crate::ranking::score::hybrid_score;
use crate::ranking::Candidate;

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

/// Envelope from the API proxy, or a bare hit array from the service.
#[derive(Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    Envelope {
        success: bool,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        data: Vec<serde_json::Value>,
    },
    Hits(Vec<serde_json::Value>),
}

/// One upstream hit: a candidate plus the contract fields that never
/// reach the ranking layer.
#[derive(Deserialize)]
struct RawHit {
    #[serde(flatten)]
    candidate: Candidate,

    /// Fused relevance computed by the search service
    #[serde(default)]
    final_score: Option<f64>,

    /// Older deployments report the fused score under this name
    #[serde(default)]
    relevance_score: Option<f64>,

    /// Flattened menu text, used for the keyword-match threshold
    #[serde(default)]
    menu_flat: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

pub struct HttpSearchProvider {
    client: reqwest::Client,
    base_url: String,
    min_score: f64,
    min_score_keyword_match: f64,
}

impl HttpSearchProvider {
    pub fn new(config: &SearchConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ProviderError::Transport(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(HttpSearchProvider {
            client,
            base_url: config.base_url.clone(),
            min_score: config.min_score,
            min_score_keyword_match: config.min_score_keyword_match,
        })
    }

    /// Relevance used for thresholding: the service's fused score when
    /// present, else the hybrid blend of the per-signal scores.
    fn relevance(hit: &RawHit) -> f64 {
        hit.final_score
            .or(hit.relevance_score)
            .unwrap_or_else(|| {
                hybrid_score(hit.candidate.semantic_score, hit.candidate.tfidf_score)
            })
    }

    /// A non-positive min_score disables thresholding entirely.
    fn passes_threshold(&self, hit: &RawHit, query_lower: &str) -> bool {
        if self.min_score <= 0.0 {
            return true;
        }
        let score = Self::relevance(hit);
        if score >= self.min_score {
            return true;
        }
        let keyword_hit = hit.candidate.name.to_lowercase().contains(query_lower)
            || hit
                .menu_flat
                .as_deref()
                .is_some_and(|menu| menu.to_lowercase().contains(query_lower));
        keyword_hit && score >= self.min_score_keyword_match
    }
}

#[async_trait]
impl SearchProvider for HttpSearchProvider {
    async fn search(&self, query: &str) -> Result<Vec<Candidate>, ProviderError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| ProviderError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ProviderError::Http { status, message });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(format!("Failed to parse response: {}", e)))?;

        let values = match body {
            SearchResponse::Envelope {
                success: false,
                message,
                ..
            } => {
                return Err(ProviderError::Upstream(
                    message.unwrap_or_else(|| "upstream reported failure".to_string()),
                ));
            }
            SearchResponse::Envelope { data, .. } => data,
            SearchResponse::Hits(values) => values,
        };

        let total = values.len();
        let query_lower = query.to_lowercase();
        let mut candidates = Vec::with_capacity(total);
        let mut skipped = 0usize;
        for value in values {
            match serde_json::from_value::<RawHit>(value) {
                Ok(hit) => {
                    if self.passes_threshold(&hit, &query_lower) {
                        candidates.push(hit.candidate);
                    }
                }
                Err(e) => {
                    skipped += 1;
                    tracing::debug!(error = %e, "Skipping unusable search hit");
                }
            }
        }
        if skipped > 0 {
            tracing::debug!(
                skipped = skipped,
                total = total,
                "Dropped unusable hits from search response"
            );
        }

        tracing::debug!(
            query = query,
            returned = candidates.len(),
            total = total,
            "Search provider returned candidates"
        );
        Ok(candidates)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
