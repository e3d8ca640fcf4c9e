use crate::core::config::{META_KEY, MetadataConfig};
use crate::core::series::Series;
use anyhow::{Result, bail};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub const UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meta {
    pub updated: String,
    pub source: String,
    pub unit: String,
}

impl Meta {
    /// Metadata stamped with the current local wall-clock time.
    pub fn now(metadata: &MetadataConfig) -> Self {
        let updated = chrono::Local::now().format(UPDATED_FORMAT).to_string();
        Self::with_timestamp(metadata, updated)
    }

    pub fn with_timestamp(metadata: &MetadataConfig, updated: String) -> Self {
        Meta {
            updated,
            source: metadata.source.clone(),
            unit: metadata.unit.clone(),
        }
    }
}

/// All downloaded tenors plus the `_meta` block, serialized in insertion
/// order with `_meta` last.
#[derive(Debug, Clone)]
pub struct Bundle {
    tenors: Vec<(String, Series)>,
    meta: Meta,
}

impl Bundle {
    pub fn new(meta: Meta) -> Self {
        Bundle {
            tenors: Vec::new(),
            meta,
        }
    }

    pub fn insert(&mut self, label: &str, series: Series) -> Result<()> {
        if label == META_KEY {
            bail!("Tenor label '{META_KEY}' is reserved for metadata");
        }
        if self.get(label).is_some() {
            bail!("Tenor {label} is already present in the bundle");
        }
        self.tenors.push((label.to_string(), series));
        Ok(())
    }

    pub fn get(&self, label: &str) -> Option<&Series> {
        self.tenors
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, series)| series)
    }

    pub fn tenors(&self) -> impl Iterator<Item = (&str, &Series)> {
        self.tenors.iter().map(|(l, s)| (l.as_str(), s))
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }
}

impl Serialize for Bundle {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tenors.len() + 1))?;
        for (label, series) in &self.tenors {
            map.serialize_entry(label, series)?;
        }
        map.serialize_entry(META_KEY, &self.meta)?;
        map.end()
    }
}
