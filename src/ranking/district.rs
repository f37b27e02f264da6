/// District extraction from free-text addresses
///
/// Addresses carry the district as "Quận 7", "Q.3", or a named district
/// such as "Quận Bình Thạnh". Abbreviations are normalized first, numbered
/// districts win over named ones, and named districts come back without the
/// "Quận " prefix (matching the filter vocabulary, which lists "Quận 1" but
/// bare "Bình Thạnh").

use regex::Regex;
use std::sync::LazyLock;

static ABBREV_Q: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)Q\.\s*").unwrap());
static ABBREV_P: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)P\.\s*").unwrap());

static NUMBERED_DISTRICT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Quận\s+(\d+)").unwrap());

/// Named district up to a delimiter. The terminator is a consuming
/// alternation because the regex crate has no lookahead.
static NAMED_DISTRICT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Quận\s+([\p{L}\s]+?)(?:,|\s*-|\s+P\b|\s+Phường|$)").unwrap()
});

/// Extract the district from an address, or an empty string when none is
/// recognizable.
///
/// Numbered districts return prefixed ("Quận 7"), named districts return
/// the bare name ("Bình Thạnh"), capped at three words.
pub fn extract_district(address: &str) -> String {
    if address.is_empty() {
        return String::new();
    }

    let normalized = ABBREV_Q.replace_all(address, "Quận ");
    let normalized = ABBREV_P.replace_all(&normalized, "Phường ");
    let normalized = normalized.trim();

    if let Some(caps) = NUMBERED_DISTRICT.captures(normalized) {
        return format!("Quận {}", &caps[1]);
    }

    if let Some(caps) = NAMED_DISTRICT.captures(normalized) {
        let name = caps[1].split_whitespace().collect::<Vec<_>>().join(" ");
        let word_count = name.split(' ').count();
        if !name.is_empty() && word_count <= 3 {
            return name;
        }
    }

    String::new()
}

/// Flexible district comparison between an address and a filter value.
///
/// Exact equality first, then "Quận N" prefix tolerance in both directions,
/// then case-insensitive equality or containment for named districts. The
/// "All" sentinel is the caller's concern; this function always compares.
pub fn matches_district(address: &str, filter: &str) -> bool {
    let extracted = extract_district(address);
    if extracted.is_empty() {
        return false;
    }

    if extracted == filter {
        return true;
    }

    // Filter "Quận X" against a bare extraction, and the reverse
    if let Some(bare) = filter.strip_prefix("Quận ") {
        return bare == extracted;
    }
    if let Some(bare) = extracted.strip_prefix("Quận ") {
        return bare == filter;
    }

    let extracted = extracted.to_lowercase();
    let filter = filter.trim().to_lowercase();
    extracted == filter || extracted.contains(&filter) || filter.contains(&extracted)
}
