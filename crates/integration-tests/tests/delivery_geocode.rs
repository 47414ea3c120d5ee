//! Integration tests for geocode query building and the resolver's guardrails.
//!
//! The outbound HTTP path is exercised in staging against the real provider;
//! here we pin the query construction the fallback chain depends on.

use plateful_core::Address;
use plateful_delivery::GeoResolver;
use plateful_delivery::geocode::candidate_queries;

fn address(street: &str, city: &str, region: &str, postal: &str, country: &str) -> Address {
    Address {
        street_lines: if street.is_empty() {
            Vec::new()
        } else {
            vec![street.to_string()]
        },
        city: city.to_string(),
        region: region.to_string(),
        postal_code: postal.to_string(),
        country: country.to_string(),
    }
}

#[test]
fn test_staged_queries_full_then_reduced() {
    let queries = candidate_queries(
        &address("55 King St W", "Toronto", "ON", "M5K 1A1", "CA"),
        "CA",
    );
    assert_eq!(
        queries,
        vec![
            "55 King St W, Toronto, ON, M5K 1A1, CA",
            "Toronto, M5K 1A1, CA",
            "Toronto, ON, CA",
        ]
    );
}

#[test]
fn test_missing_country_uses_configured_default() {
    let queries = candidate_queries(&address("1 Main St", "Halifax", "NS", "B3J 1A1", ""), "CA");
    assert!(queries.iter().all(|q| q.ends_with(", CA")), "{queries:?}");
}

#[test]
fn test_region_postal_repair_in_queries() {
    // Province field holding "ON M5V 2T6" with no separate postal code:
    // the last token moves into the postal position
    let queries = candidate_queries(&address("1 Blue Jays Way", "Toronto", "ON M5V 2T6", "", "CA"), "CA");
    assert_eq!(
        queries.first().map(String::as_str),
        Some("1 Blue Jays Way, Toronto, ON M5V, 2T6, CA")
    );
}

#[test]
fn test_duplicate_reductions_collapse() {
    // No postal code and no region: both reductions collapse to city+country
    let queries = candidate_queries(&address("1 Main St", "Regina", "", "", "CA"), "CA");
    assert_eq!(queries, vec!["1 Main St, Regina, CA", "Regina, CA"]);
}

#[tokio::test]
async fn test_resolver_refuses_address_without_street_line() {
    let resolver = GeoResolver::new("CA").expect("resolver builds");
    let no_street = address("", "Toronto", "ON", "M5V 2T6", "CA");
    // Never issues a lookup, so this is instant and offline-safe
    assert!(resolver.resolve(&no_street).await.is_none());
}
