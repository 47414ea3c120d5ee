//! Structured mailing addresses.

use serde::{Deserialize, Serialize};

/// A structured mailing address.
///
/// Addresses are copied by value onto quotes and delivery records at request
/// time; they are not tracked entities and carry no ID of their own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Ordered street lines (unit, street number, etc.).
    #[serde(default)]
    pub street_lines: Vec<String>,
    /// City or municipality.
    #[serde(default)]
    pub city: String,
    /// Province or state, either a code ("BC") or a full name ("British Columbia").
    #[serde(default)]
    pub region: String,
    /// Postal or ZIP code.
    #[serde(default)]
    pub postal_code: String,
    /// ISO 3166-1 alpha-2 country code. Empty means "use the configured default".
    #[serde(default)]
    pub country: String,
}

impl Address {
    /// Whether the address carries at least one non-empty street line.
    ///
    /// Geocoding requires this; an address without a street line cannot be
    /// resolved to a point.
    #[must_use]
    pub fn has_street_line(&self) -> bool {
        self.street_lines.iter().any(|line| !line.trim().is_empty())
    }

    /// Non-empty, trimmed street lines in order.
    pub fn street_lines_trimmed(&self) -> impl Iterator<Item = &str> {
        self.street_lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_street_line() {
        let mut address = Address::default();
        assert!(!address.has_street_line());

        address.street_lines = vec![String::new(), "  ".to_string()];
        assert!(!address.has_street_line());

        address.street_lines.push("123 Main St".to_string());
        assert!(address.has_street_line());
    }

    #[test]
    fn test_street_lines_trimmed_skips_blanks() {
        let address = Address {
            street_lines: vec![
                " Unit 4 ".to_string(),
                String::new(),
                "55 King St W".to_string(),
            ],
            ..Address::default()
        };

        let lines: Vec<&str> = address.street_lines_trimmed().collect();
        assert_eq!(lines, vec!["Unit 4", "55 King St W"]);
    }
}
