/// Candidate ranking pipeline
///
/// Turns the unordered candidate list from the search provider plus the
/// user's criteria and optional location into an ordered list. The whole
/// pipeline is pure: no I/O, no mutation of the input, and identical inputs
/// always produce identical output. Malformed candidates never fail a pass;
/// absent fields degrade to neutral defaults at each step.

pub mod collate;
pub mod criteria;
pub mod district;
pub mod geo;
pub mod page;
pub mod price;
pub mod score;

// Re-export the types callers actually touch
pub use criteria::{FilterCriteria, PriceBucket, SortKey, ALL};
pub use page::{paginate, Page};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Candidate data
// ---------------------------------------------------------------------------

/// An eatery as returned by the upstream search service.
///
/// Deserialization is deliberately forgiving: apart from the name, every
/// field may be absent or null. Unknown upstream fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Candidate {
    /// Upstream document id (Mongo-style `_id`).
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "null_to_default")]
    pub id: String,
    /// Display name; the one field a usable candidate must carry.
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Free-text address; the only source of district information.
    #[serde(default, deserialize_with = "null_to_default")]
    pub address: String,
    /// Average rating in [0, 5] when present.
    #[serde(default)]
    pub avg_rating: Option<f64>,
    /// Display string such as "50k - 100k/người" or "Đang cập nhật".
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    /// Semantic relevance in [0, 1]; absent counts as 0.
    #[serde(default)]
    pub semantic_score: Option<f64>,
    /// TF-IDF relevance in [0, 1]; absent counts as 0.
    #[serde(default)]
    pub tfidf_score: Option<f64>,
}

/// Accept an explicit JSON null where a default would do.
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let value = Option::<T>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// A candidate plus the values derived for one ranking pass.
///
/// Serializes flat so CLI output mirrors the upstream row shape.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    /// Hybrid relevance, recomputed every pass (see score module).
    pub hybrid_score: f64,
    /// Haversine km from the user location; None when no location was
    /// supplied or the candidate lacks coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// A user location in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub lat: f64,
    pub lon: f64,
}

// ---------------------------------------------------------------------------
// Ranking pipeline
// ---------------------------------------------------------------------------

/// Filter and sort candidates into a ranked list.
///
/// Steps, in this order:
/// 1. Attach derived values: hybrid score always, distance only when a
///    location was supplied and the candidate has both coordinates.
/// 2. Category filter (exact label match; skipped for "All").
/// 3. Price bucket filter.
/// 4. Minimum rating filter (skipped at 0; unrated candidates excluded
///    when active).
/// 5. District filter (skipped for "All").
/// 6. Distance cap (needs a location; unknown distances are excluded).
/// 7. Stable sort by the criteria's sort key.
pub fn rank(
    candidates: &[Candidate],
    criteria: &FilterCriteria,
    location: Option<UserLocation>,
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .iter()
        .map(|c| {
            let distance_km = location.and_then(|loc| match (c.lat, c.lon) {
                (Some(lat), Some(lon)) => Some(geo::haversine_km(loc.lat, loc.lon, lat, lon)),
                _ => None,
            });
            RankedCandidate {
                hybrid_score: score::hybrid_score(c.semantic_score, c.tfidf_score),
                distance_km,
                candidate: c.clone(),
            }
        })
        .collect();

    if criteria.category != ALL {
        ranked.retain(|r| r.candidate.category.as_deref() == Some(criteria.category.as_str()));
    }

    if criteria.price_bucket != PriceBucket::All {
        ranked.retain(|r| {
            criteria
                .price_bucket
                .matches(price::extract_price(r.candidate.price_range.as_deref()))
        });
    }

    if criteria.min_rating > 0.0 {
        ranked.retain(|r| {
            r.candidate
                .avg_rating
                .is_some_and(|rating| rating >= criteria.min_rating)
        });
    }

    if criteria.district != ALL {
        ranked.retain(|r| district::matches_district(&r.candidate.address, &criteria.district));
    }

    if let (Some(max_km), Some(_)) = (criteria.max_distance_km, location) {
        ranked.retain(|r| r.distance_km.is_some_and(|d| d <= max_km));
    }

    sort_ranked(&mut ranked, criteria.sort, location.is_some());
    ranked
}

/// Stable sort by the requested key; ties keep their incoming order.
fn sort_ranked(ranked: &mut [RankedCandidate], sort: SortKey, has_location: bool) {
    match sort {
        SortKey::Hybrid => {
            ranked.sort_by(|a, b| desc(a.hybrid_score, b.hybrid_score));
        }
        SortKey::Semantic => {
            ranked.sort_by(|a, b| {
                desc(
                    a.candidate.semantic_score.unwrap_or(0.0),
                    b.candidate.semantic_score.unwrap_or(0.0),
                )
            });
        }
        SortKey::Tfidf => {
            ranked.sort_by(|a, b| {
                desc(
                    a.candidate.tfidf_score.unwrap_or(0.0),
                    b.candidate.tfidf_score.unwrap_or(0.0),
                )
            });
        }
        SortKey::Rating => {
            ranked.sort_by(|a, b| {
                desc(
                    a.candidate.avg_rating.unwrap_or(0.0),
                    b.candidate.avg_rating.unwrap_or(0.0),
                )
            });
        }
        SortKey::Distance => {
            // No location means no distances were attached; keep the order
            if !has_location {
                return;
            }
            ranked.sort_by(|a, b| {
                let da = a.distance_km.unwrap_or(f64::INFINITY);
                let db = b.distance_km.unwrap_or(f64::INFINITY);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        SortKey::Name => {
            ranked.sort_by(|a, b| collate::compare_names(&a.candidate.name, &b.candidate.name));
        }
    }
}

/// Descending comparison for f64 scores.
fn desc(a: f64, b: f64) -> std::cmp::Ordering {
    b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
