/// Hybrid relevance blending
///
/// The upstream search service returns two independent relevance signals per
/// eatery: a semantic (embedding) score and a TF-IDF keyword score, both in
/// [0, 1]. Ranking blends them with fixed weights into one hybrid score.
/// The blend is recomputed on every pass and never stored.

/// Weight of the semantic (embedding) score in the hybrid blend.
pub const SEMANTIC_WEIGHT: f64 = 0.6;

/// Weight of the TF-IDF keyword score in the hybrid blend.
pub const TFIDF_WEIGHT: f64 = 0.4;

/// Blend semantic and TF-IDF relevance into a single hybrid score.
///
/// Absent sub-scores count as 0.0, so a candidate missing one or both
/// signals still gets a well-defined score.
pub fn hybrid_score(semantic: Option<f64>, tfidf: Option<f64>) -> f64 {
    SEMANTIC_WEIGHT * semantic.unwrap_or(0.0) + TFIDF_WEIGHT * tfidf.unwrap_or(0.0)
}
