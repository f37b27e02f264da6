/// Price extraction from free-text price ranges
///
/// Upstream price fields are display strings ("50k - 100k/người", "150000đ")
/// or the crawler placeholder "Đang cập nhật" when no price is known yet.
/// Bucket filtering needs a number, so the first integer token is taken and
/// a trailing k/K multiplies it by 1000.

use regex::Regex;
use std::sync::LazyLock;

/// Placeholder text the crawler writes while an eatery has no price data.
const PRICE_PENDING: &str = "đang cập nhật";

/// First integer token with an optional k suffix ("50k", "150000").
static PRICE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)(k?)").unwrap());

/// Extract a numeric price (in đồng) from a free-text price range.
///
/// Returns `None` for empty text, the update-pending placeholder, or text
/// without any digit token. A k/K directly after the digits multiplies by
/// 1000; a bare number is taken at face value.
pub fn extract_price(price_range: Option<&str>) -> Option<i64> {
    let text = price_range?.trim();
    if text.is_empty() || text.to_lowercase() == PRICE_PENDING {
        return None;
    }

    let caps = PRICE_TOKEN.captures(text)?;
    let value: i64 = caps[1].parse().ok()?;
    if caps[2].is_empty() {
        Some(value)
    } else {
        Some(value * 1000)
    }
}
