//! Comparison primitives for listing factors
//!
//! All functions answer a yes/no question. Ratios guard their denominator
//! and never yield credit for a zero, NaN or infinite ratio.

/// `|difference| / denominator < tolerance`, false when the denominator is zero
#[inline]
pub fn ratio_below(difference: f64, denominator: f64, tolerance: f64) -> bool {
    if denominator == 0.0 {
        return false;
    }
    let ratio = difference.abs() / denominator;
    ratio.is_finite() && ratio < tolerance
}

/// Relative difference of `candidate` against `base`
///
/// # Returns
/// `true` when `|candidate - base| / base < tolerance`; `false` when `base` is zero
#[inline]
pub fn relative_difference_within(candidate: f64, base: f64, tolerance: f64) -> bool {
    ratio_below(candidate - base, base, tolerance)
}

/// Absolute difference of two counts is at most `tolerance`
#[inline]
pub fn within_absolute(a: u32, b: u32, tolerance: u32) -> bool {
    a.abs_diff(b) <= tolerance
}

/// Both values present and equal. Two absent values do not match.
#[inline]
pub fn present_and_equal<T: PartialEq>(candidate: Option<T>, base: Option<T>) -> bool {
    match (candidate, base) {
        (Some(c), Some(b)) => c == b,
        _ => false,
    }
}

/// Exact text equality where the base value must be non-empty
pub fn equal_nonempty(base: Option<&str>, candidate: Option<&str>) -> bool {
    match (base, candidate) {
        (Some(b), Some(c)) => !b.is_empty() && b == c,
        _ => false,
    }
}

/// `haystack` contains `needle` as a substring and `needle` is non-empty
pub fn contains_nonempty(haystack: Option<&str>, needle: Option<&str>) -> bool {
    match (haystack, needle) {
        (Some(h), Some(n)) => !n.is_empty() && h.contains(n),
        _ => false,
    }
}

/// First whitespace-delimited token of an address, e.g. the province
///
/// Returns `None` for a blank address.
pub fn region_token(address: &str) -> Option<&str> {
    address.split_whitespace().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_below() {
        assert!(ratio_below(29.0, 100.0, 0.3));
        assert!(!ratio_below(30.0, 100.0, 0.3));
        assert!(ratio_below(-29.0, 100.0, 0.3));
    }

    #[test]
    fn test_ratio_zero_denominator_never_matches() {
        assert!(!ratio_below(0.0, 0.0, 0.3));
        assert!(!ratio_below(5.0, 0.0, 0.3));
        assert!(!relative_difference_within(0.0, 0.0, 0.3));
    }

    #[test]
    fn test_ratio_nan_never_matches() {
        assert!(!ratio_below(f64::NAN, 100.0, 0.3));
        assert!(!relative_difference_within(f64::INFINITY, 100.0, 0.3));
    }

    #[test]
    fn test_relative_difference_is_against_base() {
        // 1000 -> 1299 is 29.9% of the base; 1299 -> 1000 is 23% of 1299
        assert!(relative_difference_within(1299.0, 1000.0, 0.3));
        assert!(!relative_difference_within(700.0, 1000.0, 0.3));
        assert!(relative_difference_within(1000.0, 1299.0, 0.3));
    }

    #[test]
    fn test_within_absolute() {
        assert!(within_absolute(3, 5, 2));
        assert!(within_absolute(5, 3, 2));
        assert!(!within_absolute(0, 3, 2));
    }

    #[test]
    fn test_present_and_equal() {
        assert!(present_and_equal(Some(2), Some(2)));
        assert!(!present_and_equal(Some(2), Some(3)));
        assert!(!present_and_equal::<u32>(None, None));
        assert!(!present_and_equal(None, Some(2)));
        assert!(!present_and_equal(Some(2), None));
    }

    #[test]
    fn test_equal_nonempty() {
        assert!(equal_nonempty(Some("금속가공"), Some("금속가공")));
        assert!(!equal_nonempty(Some(""), Some("")));
        assert!(!equal_nonempty(None, None));
        assert!(!equal_nonempty(Some("금속가공"), Some("식품")));
    }

    #[test]
    fn test_contains_nonempty() {
        assert!(contains_nonempty(Some("자동차 볼트, 너트"), Some("볼트")));
        assert!(!contains_nonempty(Some("자동차 볼트"), Some("")));
        assert!(!contains_nonempty(None, Some("볼트")));
        assert!(!contains_nonempty(Some("볼트"), None));
    }

    #[test]
    fn test_region_token() {
        assert_eq!(region_token("경기도 화성시 팔탄면"), Some("경기도"));
        assert_eq!(region_token("  충청남도  아산시"), Some("충청남도"));
        assert_eq!(region_token("   "), None);
    }
}
