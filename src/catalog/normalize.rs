//! Normalization of raw, schema-inconsistent records into [`Product`]s.
//!
//! Every field has a documented default, so normalization has no failure
//! path: any JSON value, object or not, yields a valid product. The clock
//! used for missing or broken dates is fixed per [`Normalizer`], which keeps
//! a batch consistent and makes the output reproducible in tests.

use crate::catalog::models::{
    Dimensions, Product, RawProduct, NOT_AVAILABLE, NO_DESCRIPTION, UNCATEGORIZED, UNKNOWN_STATUS,
    UNNAMED,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rand::Rng;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, trace, warn};

/// Keys checked for the product name, in priority order.
const NAME_KEYS: [&str; 3] = ["productName", "title", "name"];

/// Keys checked for the price, in priority order.
const PRICE_KEYS: [&str; 3] = ["price", "value", "cost"];

/// Date string some sources emit instead of leaving the field out.
const INVALID_DATE: &str = "invalid_date";

const GENERATED_ID_LEN: usize = 9;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Normalizes raw records against a fixed reference time.
#[derive(Debug, Clone)]
pub struct Normalizer {
    now: DateTime<Utc>,
}

impl Normalizer {
    /// Creates a normalizer that uses the current time for missing dates.
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Creates a normalizer with an explicit fallback time.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Returns the fallback time applied to missing or broken dates.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Normalizes one raw record.
    pub fn normalize(&self, raw: &RawProduct) -> Product {
        let id = explicit_id(raw).unwrap_or_else(generate_id);

        let name = NAME_KEYS
            .iter()
            .find_map(|key| raw.get(*key).and_then(scalar_text))
            .unwrap_or_else(|| UNNAMED.to_string());

        let dimensions = Dimensions {
            width: text_at(raw, &["details", "dimensions", "width"], NOT_AVAILABLE),
            height: text_at(raw, &["details", "dimensions", "height"], NOT_AVAILABLE),
            depth: text_at(raw, &["details", "dimensions", "depth"], NOT_AVAILABLE),
        };

        let product = Product {
            id,
            name,
            price: resolve_price(raw),
            category: text_at(raw, &["category"], UNCATEGORIZED),
            description: text_at(raw, &["details", "description"], NO_DESCRIPTION),
            weight: text_at(raw, &["details", "weight"], NOT_AVAILABLE),
            dimensions,
            created_at: self.resolve_created_at(raw),
            is_available: resolve_availability(raw),
            status: text_at(raw, &["status"], UNKNOWN_STATUS),
            tags: resolve_tags(raw),
        };

        trace!("Normalized product: {} - {}", product.id, product.name);
        product
    }

    /// Normalizes a batch and guarantees ids are unique within it.
    ///
    /// Generated ids are re-rolled on collision. A repeated explicit id keeps
    /// its first occurrence; later ones get a `-2`, `-3`, ... suffix.
    pub fn normalize_all(&self, records: &[RawProduct]) -> Vec<Product> {
        let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
        let mut products = Vec::with_capacity(records.len());

        for raw in records {
            let mut product = self.normalize(raw);

            if seen.contains(&product.id) {
                if explicit_id(raw).is_some() {
                    let renamed = suffixed_id(&product.id, &seen);
                    warn!("Duplicate product id '{}', renamed to '{}'", product.id, renamed);
                    product.id = renamed;
                } else {
                    while seen.contains(&product.id) {
                        product.id = generate_id();
                    }
                }
            }

            seen.insert(product.id.clone());
            products.push(product);
        }

        debug!("Normalized {} records", products.len());
        products
    }

    fn resolve_created_at(&self, raw: &RawProduct) -> DateTime<Utc> {
        match raw.get("created_at") {
            Some(Value::Number(n)) => {
                n.as_f64().filter(|secs| *secs != 0.0).and_then(from_epoch_seconds).unwrap_or(self.now)
            }
            Some(Value::String(s)) if s != INVALID_DATE => parse_date(s).unwrap_or_else(|| {
                debug!("Unparseable created_at '{}', using fallback time", s);
                self.now
            }),
            _ => self.now,
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalizes one record against the current time.
pub fn normalize(raw: &RawProduct) -> Product {
    Normalizer::new().normalize(raw)
}

/// Follows `path` through nested objects, treating `null` as absent.
fn lookup<'a>(raw: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(raw, |value, key| value.get(*key)).filter(|v| !v.is_null())
}

/// Renders a scalar as display text. Blank strings count as absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text_at(raw: &Value, path: &[&str], default: &str) -> String {
    lookup(raw, path).and_then(scalar_text).unwrap_or_else(|| default.to_string())
}

fn explicit_id(raw: &Value) -> Option<String> {
    lookup(raw, &["metadata", "id"]).and_then(scalar_text)
}

fn generate_id() -> String {
    let mut rng = rand::rng();
    (0..GENERATED_ID_LEN)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

fn suffixed_id(base: &str, taken: &HashSet<String>) -> String {
    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(generate_id)
}

/// Resolves the price from the first non-null price key.
///
/// The first present key wins even if its value does not parse; anything
/// that is not a finite, non-negative number becomes 0.
fn resolve_price(raw: &Value) -> f64 {
    let Some(candidate) = PRICE_KEYS.iter().find_map(|key| lookup(raw, &[*key])) else {
        return 0.0;
    };

    let parsed = match candidate {
        Value::String(s) if s == "free" => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };

    match parsed {
        Some(price) if price.is_finite() && price >= 0.0 => price,
        _ => {
            debug!("Unusable price {}, using 0", candidate);
            0.0
        }
    }
}

fn resolve_availability(raw: &Value) -> bool {
    match raw.get("isAvailable") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(s)) => s == "yes",
        _ => false,
    }
}

fn resolve_tags(raw: &Value) -> Vec<String> {
    lookup(raw, &["metadata", "tags"])
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|tag| match tag {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    Value::Bool(b) => Some(b.to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((secs * 1000.0).round() as i64)
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_750_000_000, 0).unwrap()
    }

    fn normalizer() -> Normalizer {
        Normalizer::at(fixed_now())
    }

    fn assert_valid(product: &Product) {
        assert!(!product.id.is_empty());
        assert!(!product.name.is_empty());
        assert!(product.price.is_finite() && product.price >= 0.0);
        assert!(!product.category.is_empty());
        assert!(!product.description.is_empty());
        assert!(!product.weight.is_empty());
        assert!(!product.status.is_empty());
    }

    #[test]
    fn test_empty_record_uses_all_defaults() {
        let product = normalizer().normalize(&json!({}));

        assert_valid(&product);
        assert_eq!(product.id.len(), 9);
        assert!(product.id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(product.name, UNNAMED);
        assert_eq!(product.price, 0.0);
        assert_eq!(product.category, UNCATEGORIZED);
        assert_eq!(product.description, NO_DESCRIPTION);
        assert_eq!(product.weight, "N/A");
        assert_eq!(product.dimensions, Dimensions::default());
        assert_eq!(product.created_at, fixed_now());
        assert!(!product.is_available);
        assert_eq!(product.status, "unknown");
        assert!(product.tags.is_empty());
    }

    #[test]
    fn test_non_object_records_normalize() {
        for raw in [json!(null), json!(42), json!("product"), json!([1, 2, 3]), json!(true)] {
            let product = normalizer().normalize(&raw);
            assert_valid(&product);
            assert_eq!(product.name, UNNAMED);
        }
    }

    #[test]
    fn test_full_record() {
        let raw = json!({
            "productName": "Trail Backpack",
            "price": "89.90",
            "category": "outdoor",
            "details": {
                "description": "40L pack",
                "weight": "1.2kg",
                "dimensions": { "width": "30cm", "height": "60cm", "depth": "20cm" }
            },
            "created_at": "2024-03-01T10:00:00Z",
            "isAvailable": true,
            "status": "active",
            "metadata": { "id": "bp-1", "tags": ["popular", "eco"] }
        });

        let product = normalizer().normalize(&raw);
        assert_eq!(product.id, "bp-1");
        assert_eq!(product.name, "Trail Backpack");
        assert_eq!(product.price, 89.9);
        assert_eq!(product.category, "outdoor");
        assert_eq!(product.description, "40L pack");
        assert_eq!(product.weight, "1.2kg");
        assert_eq!(product.dimensions.width, "30cm");
        assert_eq!(product.dimensions.height, "60cm");
        assert_eq!(product.dimensions.depth, "20cm");
        assert_eq!(product.created_at.to_rfc3339(), "2024-03-01T10:00:00+00:00");
        assert!(product.is_available);
        assert_eq!(product.status, "active");
        assert_eq!(product.tags, vec!["popular", "eco"]);
    }

    #[test]
    fn test_name_precedence() {
        let n = normalizer();
        let raw = json!({ "productName": "A", "title": "B", "name": "C" });
        assert_eq!(n.normalize(&raw).name, "A");

        let raw = json!({ "title": "B", "name": "C" });
        assert_eq!(n.normalize(&raw).name, "B");

        let raw = json!({ "name": "C" });
        assert_eq!(n.normalize(&raw).name, "C");

        // Blank and null values are skipped
        let raw = json!({ "productName": "", "title": null, "name": "C" });
        assert_eq!(n.normalize(&raw).name, "C");

        let raw = json!({ "productName": "   " });
        assert_eq!(n.normalize(&raw).name, UNNAMED);
    }

    #[test]
    fn test_price_precedence() {
        let n = normalizer();
        assert_eq!(n.normalize(&json!({ "price": 10, "value": 20, "cost": 30 })).price, 10.0);
        assert_eq!(n.normalize(&json!({ "value": 20, "cost": 30 })).price, 20.0);
        assert_eq!(n.normalize(&json!({ "cost": "30.5" })).price, 30.5);
        assert_eq!(n.normalize(&json!({ "price": null, "value": 20 })).price, 20.0);
    }

    #[test]
    fn test_price_free_under_every_key() {
        let n = normalizer();
        for key in PRICE_KEYS {
            let mut raw = json!({});
            raw[key] = json!("free");
            assert_eq!(n.normalize(&raw).price, 0.0, "key {}", key);
        }
        // "free" wins over a later key
        assert_eq!(n.normalize(&json!({ "price": "free", "value": 99 })).price, 0.0);
    }

    #[test]
    fn test_unusable_prices_resolve_to_zero() {
        let n = normalizer();
        for value in [json!("abc"), json!(""), json!("$12"), json!(-5), json!("-3.5"), json!("NaN"), json!("inf"), json!(true), json!({"amount": 3})] {
            let product = n.normalize(&json!({ "price": value }));
            assert_eq!(product.price, 0.0, "value {}", value);
        }
    }

    #[test]
    fn test_unparseable_first_key_does_not_fall_through() {
        let product = normalizer().normalize(&json!({ "price": "call us", "value": 25 }));
        assert_eq!(product.price, 0.0);
    }

    #[test]
    fn test_availability() {
        let n = normalizer();
        assert!(n.normalize(&json!({ "isAvailable": true })).is_available);
        assert!(n.normalize(&json!({ "isAvailable": "yes" })).is_available);
        assert!(!n.normalize(&json!({ "isAvailable": false })).is_available);
        assert!(!n.normalize(&json!({ "isAvailable": "no" })).is_available);
        assert!(!n.normalize(&json!({ "isAvailable": "YES" })).is_available);
        assert!(!n.normalize(&json!({ "isAvailable": 1 })).is_available);
        assert!(!n.normalize(&json!({ "isAvailable": "true" })).is_available);
    }

    #[test]
    fn test_created_at_numeric_seconds() {
        let product = normalizer().normalize(&json!({ "created_at": 1_700_000_000 }));
        assert_eq!(product.created_at, DateTime::from_timestamp(1_700_000_000, 0).unwrap());

        let product = normalizer().normalize(&json!({ "created_at": 1_700_000_000.5 }));
        assert_eq!(product.created_at.timestamp_millis(), 1_700_000_000_500);
    }

    #[test]
    fn test_created_at_fallbacks() {
        let n = normalizer();
        for value in [json!("invalid_date"), json!("not a date"), json!(""), json!(0), json!(null), json!([2024]), json!(1e300)] {
            let product = n.normalize(&json!({ "created_at": value }));
            assert_eq!(product.created_at, fixed_now(), "value {}", value);
        }
    }

    #[test]
    fn test_created_at_string_formats() {
        let n = normalizer();
        let expected = DateTime::parse_from_rfc3339("2023-05-10T00:00:00Z").unwrap();

        for value in ["2023-05-10", "2023-05-10T00:00:00", "2023-05-10 00:00:00", "2023-05-10T02:00:00+02:00"] {
            let product = n.normalize(&json!({ "created_at": value }));
            assert_eq!(product.created_at, expected, "value {}", value);
        }
    }

    #[test]
    fn test_tags_drop_nulls_and_keep_order() {
        let raw = json!({ "metadata": { "tags": ["sale", null, "new", null, "eco"] } });
        let product = normalizer().normalize(&raw);
        assert_eq!(product.tags, vec!["sale", "new", "eco"]);
    }

    #[test]
    fn test_tags_not_an_array() {
        let product = normalizer().normalize(&json!({ "metadata": { "tags": "sale" } }));
        assert!(product.tags.is_empty());

        let product = normalizer().normalize(&json!({ "metadata": null }));
        assert!(product.tags.is_empty());
    }

    #[test]
    fn test_partial_dimensions() {
        let raw = json!({ "details": { "dimensions": { "width": "10cm", "depth": 4 } } });
        let product = normalizer().normalize(&raw);
        assert_eq!(product.dimensions.width, "10cm");
        assert_eq!(product.dimensions.height, "N/A");
        assert_eq!(product.dimensions.depth, "4");
    }

    #[test]
    fn test_unreachable_nested_paths() {
        let raw = json!({ "details": "none", "metadata": 7 });
        let product = normalizer().normalize(&raw);
        assert_valid(&product);
        assert_eq!(product.description, NO_DESCRIPTION);
        assert_eq!(product.dimensions, Dimensions::default());
        assert_eq!(product.id.len(), 9);
    }

    #[test]
    fn test_numeric_id_is_stringified() {
        let product = normalizer().normalize(&json!({ "metadata": { "id": 1234 } }));
        assert_eq!(product.id, "1234");
    }

    #[test]
    fn test_normalize_all_generates_unique_ids() {
        let records: Vec<RawProduct> = (0..200).map(|_| json!({})).collect();
        let products = normalizer().normalize_all(&records);

        let ids: HashSet<_> = products.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_normalize_all_suffixes_duplicate_ids() {
        let records = vec![
            json!({ "name": "first", "metadata": { "id": "dup" } }),
            json!({ "name": "second", "metadata": { "id": "dup" } }),
            json!({ "name": "third", "metadata": { "id": "dup" } }),
        ];
        let products = normalizer().normalize_all(&records);

        assert_eq!(products[0].id, "dup");
        assert_eq!(products[1].id, "dup-2");
        assert_eq!(products[2].id, "dup-3");
        assert_eq!(products[2].name, "third");
    }

    #[test]
    fn test_normalize_all_preserves_order() {
        let records = vec![json!({ "name": "a" }), json!({ "name": "b" }), json!({ "name": "c" })];
        let names: Vec<_> =
            normalizer().normalize_all(&records).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_normalize_free_function() {
        let product = normalize(&json!({ "title": "Mug", "price": 4 }));
        assert_eq!(product.name, "Mug");
        assert_eq!(product.price, 4.0);
    }
}
