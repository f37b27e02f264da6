/// Filter criteria for a ranking pass
///
/// A criteria value is immutable input to rank(): category and district
/// labels (with the "All" sentinel meaning no filtering), a closed price
/// bucket vocabulary, a minimum rating, one of six sort keys, and an
/// optional distance cap. Unknown sort or bucket strings fall back to the
/// safe defaults with a warning instead of failing the request; callers
/// that want the error use the strict FromStr impls.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel label that disables the category and district filters.
pub const ALL: &str = "All";

/// Sort key for the ranking pass. Score and rating sorts are descending,
/// distance and name ascending. All sorts are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Hybrid,
    Semantic,
    Tfidf,
    Rating,
    Distance,
    Name,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Hybrid => write!(f, "hybrid"),
            SortKey::Semantic => write!(f, "semantic"),
            SortKey::Tfidf => write!(f, "tfidf"),
            SortKey::Rating => write!(f, "rating"),
            SortKey::Distance => write!(f, "distance"),
            SortKey::Name => write!(f, "name"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hybrid" => Ok(SortKey::Hybrid),
            "semantic" => Ok(SortKey::Semantic),
            "tfidf" => Ok(SortKey::Tfidf),
            "rating" => Ok(SortKey::Rating),
            "distance" => Ok(SortKey::Distance),
            "name" => Ok(SortKey::Name),
            other => Err(format!("Unknown sort key: {}", other)),
        }
    }
}

impl SortKey {
    /// Parse a sort key, falling back to `Hybrid` on unknown input.
    pub fn parse_lenient(s: &str) -> SortKey {
        s.parse().unwrap_or_else(|_| {
            tracing::warn!(value = %s, "Unknown sort key, falling back to hybrid");
            SortKey::Hybrid
        })
    }
}

/// Closed price bucket vocabulary. Boundary ownership is part of the
/// contract: 100k belongs to both adjacent buckets, 50k only to the
/// 50k-100k bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceBucket {
    #[serde(rename = "all")]
    All,
    #[serde(rename = "under-50k")]
    Under50k,
    #[serde(rename = "50k-100k")]
    From50kTo100k,
    #[serde(rename = "100k-200k")]
    From100kTo200k,
    #[serde(rename = "200k-500k")]
    From200kTo500k,
    #[serde(rename = "over-500k")]
    Over500k,
}

impl PriceBucket {
    /// Whether an extracted price falls in this bucket.
    ///
    /// `All` matches everything, including candidates whose price could not
    /// be extracted; every other bucket rejects an absent price.
    pub fn matches(&self, price: Option<i64>) -> bool {
        let Some(p) = price else {
            return matches!(self, PriceBucket::All);
        };
        match self {
            PriceBucket::All => true,
            PriceBucket::Under50k => p < 50_000,
            PriceBucket::From50kTo100k => (50_000..=100_000).contains(&p),
            PriceBucket::From100kTo200k => (100_000..=200_000).contains(&p),
            PriceBucket::From200kTo500k => (200_000..=500_000).contains(&p),
            PriceBucket::Over500k => p > 500_000,
        }
    }

    /// Parse a bucket slug, falling back to `All` on unknown input.
    pub fn parse_lenient(s: &str) -> PriceBucket {
        s.parse().unwrap_or_else(|_| {
            tracing::warn!(value = %s, "Unknown price bucket, falling back to all");
            PriceBucket::All
        })
    }
}

impl fmt::Display for PriceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceBucket::All => write!(f, "all"),
            PriceBucket::Under50k => write!(f, "under-50k"),
            PriceBucket::From50kTo100k => write!(f, "50k-100k"),
            PriceBucket::From100kTo200k => write!(f, "100k-200k"),
            PriceBucket::From200kTo500k => write!(f, "200k-500k"),
            PriceBucket::Over500k => write!(f, "over-500k"),
        }
    }
}

impl FromStr for PriceBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(PriceBucket::All),
            "under-50k" => Ok(PriceBucket::Under50k),
            "50k-100k" => Ok(PriceBucket::From50kTo100k),
            "100k-200k" => Ok(PriceBucket::From100kTo200k),
            "200k-500k" => Ok(PriceBucket::From200kTo500k),
            "over-500k" => Ok(PriceBucket::Over500k),
            other => Err(format!("Unknown price bucket: {}", other)),
        }
    }
}

/// The full set of user-selected ranking criteria.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Category label, or "All" for no category filtering.
    pub category: String,
    pub price_bucket: PriceBucket,
    /// Minimum average rating; 0 disables. When active, candidates without
    /// a rating are excluded.
    pub min_rating: f64,
    /// District label, or "All" for no district filtering.
    pub district: String,
    pub sort: SortKey,
    /// Distance cap in km; only meaningful when a user location exists.
    pub max_distance_km: Option<f64>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria {
            category: ALL.to_string(),
            price_bucket: PriceBucket::All,
            min_rating: 0.0,
            district: ALL.to_string(),
            sort: SortKey::Hybrid,
            max_distance_km: None,
        }
    }
}

impl FilterCriteria {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_price_bucket(mut self, bucket: PriceBucket) -> Self {
        self.price_bucket = bucket;
        self
    }

    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = min_rating;
        self
    }

    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        self.district = district.into();
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_max_distance_km(mut self, km: f64) -> Self {
        self.max_distance_km = Some(km);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_criteria_filter_nothing() {
        let c = FilterCriteria::default();
        assert_eq!(c.category, ALL);
        assert_eq!(c.price_bucket, PriceBucket::All);
        assert_eq!(c.min_rating, 0.0);
        assert_eq!(c.district, ALL);
        assert_eq!(c.sort, SortKey::Hybrid);
        assert!(c.max_distance_km.is_none());
    }

    #[test]
    fn test_sort_key_round_trip() {
        for key in [
            SortKey::Hybrid,
            SortKey::Semantic,
            SortKey::Tfidf,
            SortKey::Rating,
            SortKey::Distance,
            SortKey::Name,
        ] {
            assert_eq!(key.to_string().parse::<SortKey>(), Ok(key));
        }
    }

    #[test]
    fn test_sort_key_lenient_fallback() {
        assert_eq!(SortKey::parse_lenient("rating"), SortKey::Rating);
        assert_eq!(SortKey::parse_lenient("popularity"), SortKey::Hybrid);
        assert_eq!(SortKey::parse_lenient(""), SortKey::Hybrid);
    }

    #[test]
    fn test_bucket_round_trip() {
        for bucket in [
            PriceBucket::All,
            PriceBucket::Under50k,
            PriceBucket::From50kTo100k,
            PriceBucket::From100kTo200k,
            PriceBucket::From200kTo500k,
            PriceBucket::Over500k,
        ] {
            assert_eq!(bucket.to_string().parse::<PriceBucket>(), Ok(bucket));
        }
    }

    #[test]
    fn test_bucket_lenient_fallback() {
        assert_eq!(PriceBucket::parse_lenient("50k-100k"), PriceBucket::From50kTo100k);
        assert_eq!(PriceBucket::parse_lenient("cheap"), PriceBucket::All);
    }

    #[test]
    fn test_bucket_rejects_absent_price_except_all() {
        assert!(PriceBucket::All.matches(None));
        assert!(!PriceBucket::Under50k.matches(None));
        assert!(!PriceBucket::Over500k.matches(None));
    }

    #[test]
    fn test_bucket_boundary_at_50k() {
        // 50k belongs to 50k-100k, not under-50k
        assert!(!PriceBucket::Under50k.matches(Some(50_000)));
        assert!(PriceBucket::From50kTo100k.matches(Some(50_000)));
        assert!(PriceBucket::Under50k.matches(Some(49_999)));
    }

    #[test]
    fn test_bucket_boundaries_are_inclusive_on_shared_edges() {
        // 100k and 200k each belong to both adjacent buckets
        assert!(PriceBucket::From50kTo100k.matches(Some(100_000)));
        assert!(PriceBucket::From100kTo200k.matches(Some(100_000)));
        assert!(PriceBucket::From100kTo200k.matches(Some(200_000)));
        assert!(PriceBucket::From200kTo500k.matches(Some(200_000)));
    }

    #[test]
    fn test_bucket_boundary_at_500k() {
        assert!(PriceBucket::From200kTo500k.matches(Some(500_000)));
        assert!(!PriceBucket::Over500k.matches(Some(500_000)));
        assert!(PriceBucket::Over500k.matches(Some(500_001)));
    }
}
