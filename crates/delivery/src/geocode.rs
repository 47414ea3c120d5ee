//! Forward geocoding with staged fallback queries and a bounded cache.
//!
//! Resolution fails softly: network errors, parse errors, and empty provider
//! results all come back as `None`. An address the geocoder cannot place is a
//! missing-fee condition for the caller, never a request failure.

use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache;
use plateful_core::{Address, GeoPoint};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// Public geocoding endpoint (Nominatim-compatible search API).
const GEOCODE_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Identifies this application to the geocoding provider.
///
/// The provider's usage policy requires a custom User-Agent naming the
/// application and a contact address. Hard requirement, not a preference.
const GEOCODE_USER_AGENT: &str = "plateful-delivery/0.1 (ops@plateful.dev)";

/// Per-call timeout for geocode lookups.
const GEOCODE_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound on cached queries.
const CACHE_CAPACITY: u64 = 10_000;

/// Lifetime of a cached hit.
const HIT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Lifetime of a cached miss.
///
/// Misses are cached too: a persistently un-geocodable address otherwise
/// costs three outbound calls on every request. The short TTL keeps recovery
/// quick after provider hiccups.
const MISS_TTL: Duration = Duration::from_secs(10 * 60);

/// One result row from the geocoding provider.
///
/// Coordinates arrive as decimal strings.
#[derive(Debug, Deserialize)]
struct GeocodeRow {
    lat: String,
    lon: String,
}

/// Gives hits a long lifetime and misses a short one.
struct GeocodeExpiry;

impl Expiry<String, Option<GeoPoint>> for GeocodeExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Option<GeoPoint>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(if value.is_some() { HIT_TTL } else { MISS_TTL })
    }
}

/// Resolves postal addresses to coordinates, with an in-process cache.
pub struct GeoResolver {
    client: reqwest::Client,
    cache: Cache<String, Option<GeoPoint>>,
    default_country: String,
}

impl GeoResolver {
    /// Create a resolver.
    ///
    /// `default_country` is the ISO country code substituted when an address
    /// carries none.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(default_country: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(GEOCODE_USER_AGENT)
            .timeout(GEOCODE_TIMEOUT)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .expire_after(GeocodeExpiry)
            .build();

        Ok(Self {
            client,
            cache,
            default_country: default_country.into(),
        })
    }

    /// Resolve an address to a point, or `None` if it cannot be placed.
    ///
    /// Tries the full query first, then two reduced fallbacks (city + postal
    /// + country, then city + region + country). The first non-empty result
    /// wins and is cached under the full query.
    #[instrument(skip(self, address), fields(city = %address.city))]
    pub async fn resolve(&self, address: &Address) -> Option<GeoPoint> {
        if !address.has_street_line() {
            return None;
        }

        let queries = candidate_queries(address, &self.default_country);
        let primary = queries.first()?;
        let key = cache_key(primary);

        if let Some(cached) = self.cache.get(&key).await {
            debug!(hit = cached.is_some(), "Geocode cache hit");
            return cached;
        }

        let mut found = None;
        for query in &queries {
            if let Some(point) = self.lookup(query).await {
                found = Some(point);
                break;
            }
        }

        self.cache.insert(key, found).await;
        found
    }

    /// One lookup against the provider. Soft-fails to `None`.
    async fn lookup(&self, query: &str) -> Option<GeoPoint> {
        let request = self
            .client
            .get(GEOCODE_URL)
            .query(&[("q", query), ("format", "json"), ("limit", "1")]);

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "Geocode request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "Geocode returned non-success");
            return None;
        }

        let rows: Vec<GeocodeRow> = match response.json().await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(error = %err, "Geocode response did not parse");
                return None;
            }
        };

        let row = rows.first()?;
        let point = GeoPoint::new(row.lat.parse().ok()?, row.lon.parse().ok()?);
        point.is_valid().then_some(point)
    }
}

/// Cache key: case-insensitive, whitespace-normalized query string.
fn cache_key(query: &str) -> String {
    query
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the staged query list for an address: full, then two reductions.
///
/// Duplicate and empty stages are dropped.
#[must_use]
pub fn candidate_queries(address: &Address, default_country: &str) -> Vec<String> {
    let country = if address.country.trim().is_empty() {
        default_country
    } else {
        address.country.trim()
    };

    let (region, postal) = split_region_postal(&address.region, &address.postal_code);
    let city = address.city.trim();

    let full = join_fields(
        address
            .street_lines_trimmed()
            .chain([city, region.as_str(), postal.as_str(), country]),
    );
    let city_postal = join_fields([city, postal.as_str(), country]);
    let city_region = join_fields([city, region.as_str(), country]);

    let mut queries = Vec::with_capacity(3);
    for query in [full, city_postal, city_region] {
        if !query.is_empty() && !queries.contains(&query) {
            queries.push(query);
        }
    }
    queries
}

/// Repair a region field that holds both province and postal code.
///
/// A common data-entry error puts "ON M5V 2T6" in the province field and
/// leaves the postal code blank. When the region mixes digits with letters
/// and no separate postal code exists, the last whitespace-delimited token
/// moves to the postal code and the remainder stays as the region.
fn split_region_postal(region: &str, postal_code: &str) -> (String, String) {
    let region = region.trim();
    let postal = postal_code.trim();

    if !postal.is_empty() {
        return (region.to_string(), postal.to_string());
    }

    let mixed = region.chars().any(|c| c.is_ascii_digit())
        && region.chars().any(char::is_alphabetic);
    if !mixed {
        return (region.to_string(), String::new());
    }

    let mut tokens: Vec<&str> = region.split_whitespace().collect();
    match tokens.pop() {
        Some(last) => (tokens.join(" "), last.to_string()),
        None => (String::new(), String::new()),
    }
}

/// Comma-join non-empty fields.
fn join_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    fields
        .into_iter()
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
