//! Minimal SDMX-JSON document model for single-series ECB responses.

use crate::core::series::Series;
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Series key of the only series returned when a query fully qualifies every
/// dimension.
pub const SINGLE_SERIES_KEY: &str = "0:0:0:0:0:0:0";

#[derive(Debug, Deserialize)]
pub struct SdmxDocument {
    #[serde(rename = "dataSets")]
    data_sets: Vec<DataSet>,
    structure: Structure,
}

#[derive(Debug, Deserialize)]
struct DataSet {
    series: HashMap<String, SeriesBlock>,
}

#[derive(Debug, Deserialize)]
struct SeriesBlock {
    // Each observation is `[value, attribute indices...]`; only the value is used.
    observations: HashMap<String, Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct Structure {
    dimensions: Dimensions,
}

#[derive(Debug, Deserialize)]
struct Dimensions {
    observation: Vec<Dimension>,
}

#[derive(Debug, Deserialize)]
struct Dimension {
    values: Vec<DimensionValue>,
}

#[derive(Debug, Deserialize)]
struct DimensionValue {
    id: String,
}

impl SdmxDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Response is not a valid SDMX-JSON document")
    }

    /// Joins observations with the time-period dimension and returns the
    /// non-null rates as a [`Series`].
    ///
    /// Observation keys are positional indices into the period list; keys that
    /// are not integers or fall outside that list are rejected.
    pub fn into_series(self) -> Result<Series> {
        let data_set = self
            .data_sets
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("SDMX document has no dataSets"))?;
        let mut series_map = data_set.series;
        let block = series_map
            .remove(SINGLE_SERIES_KEY)
            .ok_or_else(|| anyhow!("SDMX dataSet has no series '{SINGLE_SERIES_KEY}'"))?;
        let periods = self
            .structure
            .dimensions
            .observation
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("SDMX structure has no observation dimension"))?
            .values;

        let mut series = Series::new();
        let mut skipped = 0usize;
        for (key, obs) in &block.observations {
            let index: usize = key
                .parse()
                .with_context(|| format!("Observation key '{key}' is not a period index"))?;
            let period = periods.get(index).ok_or_else(|| {
                anyhow!(
                    "Observation index {index} is out of range ({} periods)",
                    periods.len()
                )
            })?;

            let rate = match obs.first() {
                None | Some(Value::Null) => {
                    skipped += 1;
                    continue;
                }
                Some(value) => value.as_f64().ok_or_else(|| {
                    anyhow!("Observation for {} is not a number: {value}", period.id)
                })?,
            };

            series
                .insert(&period.id, rate)
                .with_context(|| format!("Invalid observation at index {index}"))?;
        }

        debug!(
            retained = series.len(),
            skipped, "Parsed SDMX observations"
        );
        Ok(series)
    }
}
