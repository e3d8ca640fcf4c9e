//! Monthly rate series keyed by `YYYY-MM` period.

use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Number of decimals retained for every rate.
pub const RATE_DECIMALS: i32 = 4;

/// Rounds a rate half away from zero to [`RATE_DECIMALS`] places.
///
/// Magnitudes too large to scale without overflowing have no fractional
/// digits left to round and are returned unchanged.
pub fn round_rate(rate: f64) -> f64 {
    let factor = 10f64.powi(RATE_DECIMALS);
    let scaled = rate * factor;
    if !scaled.is_finite() {
        return rate;
    }
    scaled.round() / factor
}

/// Checks that `period` is a `YYYY-MM` month identifier with a valid month.
pub fn validate_period(period: &str) -> Result<()> {
    let bytes = period.as_bytes();
    let shape_ok = bytes.len() == 7
        && bytes[4] == b'-'
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[5..].iter().all(u8::is_ascii_digit);
    if !shape_ok {
        bail!("Period '{period}' is not in YYYY-MM format");
    }
    if NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d").is_err() {
        bail!("Period '{period}' has an invalid month");
    }
    Ok(())
}

/// Chronological `period -> rate` mapping for a single tenor.
///
/// `YYYY-MM` keys sort lexicographically in calendar order, so the inner
/// `BTreeMap` keeps the series ascending regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series(BTreeMap<String, f64>);

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a rate for `period`, rounding it to the retained precision.
    /// Fails on malformed periods, non-finite rates and duplicate periods.
    pub fn insert(&mut self, period: &str, rate: f64) -> Result<()> {
        validate_period(period)?;
        if !rate.is_finite() {
            bail!("Rate for period {period} is not a finite number: {rate}");
        }
        match self.0.entry(period.to_string()) {
            Entry::Occupied(_) => bail!("Duplicate observation for period {period}"),
            Entry::Vacant(slot) => {
                slot.insert(round_rate(rate));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, period: &str) -> Option<f64> {
        self.0.get(period).copied()
    }

    pub fn first(&self) -> Option<(&str, f64)> {
        self.0.first_key_value().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn last(&self) -> Option<(&str, f64)> {
        self.0.last_key_value().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_rate() {
        assert_eq!(round_rate(3.14159), 3.1416);
        assert_eq!(round_rate(3.105), 3.105);
        assert_eq!(round_rate(-0.54321), -0.5432);
        assert_eq!(round_rate(2.0), 2.0);
    }

    #[test]
    fn test_round_rate_keeps_huge_values_finite() {
        assert_eq!(round_rate(1e305), 1e305);
        assert_eq!(round_rate(-1e305), -1e305);
        assert_eq!(round_rate(f64::MAX), f64::MAX);

        let mut series = Series::new();
        series.insert("2020-01", 1e305).unwrap();
        assert_eq!(series.get("2020-01"), Some(1e305));
        let json = serde_json::to_string(&series).unwrap();
        assert!(!json.contains("null"), "{json}");
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["2020-01"].as_f64(), Some(1e305));
    }

    #[test]
    fn test_validate_period() {
        assert!(validate_period("1999-01").is_ok());
        assert!(validate_period("2024-12").is_ok());
        assert!(validate_period("2024-13").is_err());
        assert!(validate_period("2024-00").is_err());
        assert!(validate_period("2024-1").is_err());
        assert!(validate_period("2024/01").is_err());
        assert!(validate_period("2024-01-01").is_err());
        assert!(validate_period("").is_err());
    }

    #[test]
    fn test_insert_keeps_chronological_order() {
        let mut series = Series::new();
        series.insert("2020-03", 2.998).unwrap();
        series.insert("2019-12", 1.5).unwrap();
        series.insert("2020-01", 3.10549).unwrap();

        let keys: Vec<&str> = series.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["2019-12", "2020-01", "2020-03"]);
        assert_eq!(series.get("2020-01"), Some(3.1055));
        assert_eq!(series.first(), Some(("2019-12", 1.5)));
        assert_eq!(series.last(), Some(("2020-03", 2.998)));
    }

    #[test]
    fn test_insert_rejects_invalid_entries() {
        let mut series = Series::new();
        series.insert("2020-01", 1.0).unwrap();

        let err = series.insert("2020-01", 2.0).unwrap_err();
        assert!(err.to_string().contains("Duplicate observation"));
        assert!(series.insert("2020-02", f64::NAN).is_err());
        assert!(series.insert("2020-02", f64::INFINITY).is_err());
        assert!(series.insert("20-02", 1.0).is_err());
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let mut series = Series::new();
        series.insert("2020-02", 0.5).unwrap();
        series.insert("2020-01", -0.25).unwrap();
        assert_eq!(
            serde_json::to_string(&series).unwrap(),
            r#"{"2020-01":-0.25,"2020-02":0.5}"#
        );
    }
}
