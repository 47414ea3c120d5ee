//! Province/state normalization for provider-facing addresses.
//!
//! The dispatch provider wants two-letter region codes. Storefront address
//! forms deliver anything from "BC" to "british columbia." — this module maps
//! full Canadian and US names to their codes and passes codes through.

/// Canadian provinces and territories, full name → code.
const CA_REGIONS: &[(&str, &str)] = &[
    ("alberta", "AB"),
    ("british columbia", "BC"),
    ("manitoba", "MB"),
    ("new brunswick", "NB"),
    ("newfoundland and labrador", "NL"),
    ("northwest territories", "NT"),
    ("nova scotia", "NS"),
    ("nunavut", "NU"),
    ("ontario", "ON"),
    ("prince edward island", "PE"),
    ("quebec", "QC"),
    ("saskatchewan", "SK"),
    ("yukon", "YT"),
];

/// US states and federal district, full name → code.
const US_REGIONS: &[(&str, &str)] = &[
    ("alabama", "AL"),
    ("alaska", "AK"),
    ("arizona", "AZ"),
    ("arkansas", "AR"),
    ("california", "CA"),
    ("colorado", "CO"),
    ("connecticut", "CT"),
    ("delaware", "DE"),
    ("district of columbia", "DC"),
    ("florida", "FL"),
    ("georgia", "GA"),
    ("hawaii", "HI"),
    ("idaho", "ID"),
    ("illinois", "IL"),
    ("indiana", "IN"),
    ("iowa", "IA"),
    ("kansas", "KS"),
    ("kentucky", "KY"),
    ("louisiana", "LA"),
    ("maine", "ME"),
    ("maryland", "MD"),
    ("massachusetts", "MA"),
    ("michigan", "MI"),
    ("minnesota", "MN"),
    ("mississippi", "MS"),
    ("missouri", "MO"),
    ("montana", "MT"),
    ("nebraska", "NE"),
    ("nevada", "NV"),
    ("new hampshire", "NH"),
    ("new jersey", "NJ"),
    ("new mexico", "NM"),
    ("new york", "NY"),
    ("north carolina", "NC"),
    ("north dakota", "ND"),
    ("ohio", "OH"),
    ("oklahoma", "OK"),
    ("oregon", "OR"),
    ("pennsylvania", "PA"),
    ("rhode island", "RI"),
    ("south carolina", "SC"),
    ("south dakota", "SD"),
    ("tennessee", "TN"),
    ("texas", "TX"),
    ("utah", "UT"),
    ("vermont", "VT"),
    ("virginia", "VA"),
    ("washington", "WA"),
    ("west virginia", "WV"),
    ("wisconsin", "WI"),
    ("wyoming", "WY"),
];

/// Normalize a raw province/state value to a region code.
///
/// Values of three characters or fewer are assumed to already be codes and
/// are upper-cased as-is. Longer values are matched case-insensitively with
/// punctuation stripped against the Canada/US tables; unrecognized values
/// come back trimmed but otherwise untouched.
#[must_use]
pub fn normalize_region(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= 3 {
        return trimmed.to_ascii_uppercase();
    }

    let key = fold_name(trimmed);
    CA_REGIONS
        .iter()
        .chain(US_REGIONS)
        .find(|(name, _)| *name == key)
        .map_or_else(|| trimmed.to_string(), |(_, code)| (*code).to_string())
}

/// Normalize a postal code for the provider: upper-cased, single-spaced.
#[must_use]
pub fn normalize_postal_code(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}

/// Lower-case and strip punctuation, collapsing whitespace runs.
fn fold_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_names_map_to_codes() {
        assert_eq!(normalize_region("British Columbia"), "BC");
        assert_eq!(normalize_region("newfoundland and labrador"), "NL");
        assert_eq!(normalize_region("New York"), "NY");
        assert_eq!(normalize_region("Québec"), "Québec"); // accented form not in table
        assert_eq!(normalize_region("Quebec"), "QC");
    }

    #[test]
    fn test_short_values_pass_through_uppercased() {
        assert_eq!(normalize_region("ab"), "AB");
        assert_eq!(normalize_region(" on "), "ON");
        assert_eq!(normalize_region("NY"), "NY");
    }

    #[test]
    fn test_punctuation_is_ignored() {
        assert_eq!(normalize_region("British-Columbia."), "BC");
        assert_eq!(normalize_region("prince  edward   island"), "PE");
    }

    #[test]
    fn test_unrecognized_comes_back_trimmed() {
        assert_eq!(normalize_region("  Greater Gotham  "), "Greater Gotham");
    }

    #[test]
    fn test_postal_code_normalization() {
        assert_eq!(normalize_postal_code("m5v  2t6"), "M5V 2T6");
        assert_eq!(normalize_postal_code(" 90210 "), "90210");
    }
}
