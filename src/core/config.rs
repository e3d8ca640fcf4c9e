use crate::core::series::validate_period;
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::{fs, path::PathBuf};
use tracing::debug;

/// Key reserved for the metadata block in the exported bundle.
pub const META_KEY: &str = "_meta";

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct EcbProviderConfig {
    pub base_url: String,
    pub dataflow: String,
    pub timeout_secs: u64,
}

impl Default for EcbProviderConfig {
    fn default() -> Self {
        EcbProviderConfig {
            base_url: "https://data-api.ecb.europa.eu".to_string(),
            dataflow: "FM".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub ecb: EcbProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TenorConfig {
    /// Label used as the bundle key, e.g. `1M`
    pub label: String,
    /// SDMX series key inside the dataflow
    pub series_key: String,
}

impl TenorConfig {
    pub fn new(label: &str, series_key: &str) -> Self {
        Self {
            label: label.to_string(),
            series_key: series_key.to_string(),
        }
    }
}

fn default_tenors() -> Vec<TenorConfig> {
    vec![
        TenorConfig::new("1M", "M.U2.EUR.RT.MM.EURIBOR1MD_.HSTA"),
        TenorConfig::new("3M", "M.U2.EUR.RT.MM.EURIBOR3MD_.HSTA"),
    ]
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub json_path: PathBuf,
    pub script_path: PathBuf,
    pub variable: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            json_path: PathBuf::from("euribor_data.json"),
            script_path: PathBuf::from("euribor_data.js"),
            variable: "EURIBOR_LOCAL_DATA".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct MetadataConfig {
    pub source: String,
    pub unit: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        MetadataConfig {
            source: "BCE (European Central Bank)".to_string(),
            unit: "% annuo".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub providers: ProvidersConfig,
    pub start_period: String,
    pub tenors: Vec<TenorConfig>,
    pub output: OutputConfig,
    pub metadata: MetadataConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            start_period: "1999-01".to_string(),
            tenors: default_tenors(),
            output: OutputConfig::default(),
            metadata: MetadataConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config from `path` when given, otherwise from the default
    /// location if a file exists there, otherwise falls back to built-in defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_path(path)?,
            None => {
                let default_path = Self::default_config_path()?;
                if default_path.exists() {
                    Self::load_from_path(&default_path)?
                } else {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "euribor-update")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tenors.is_empty() {
            bail!("At least one tenor must be configured");
        }

        let mut seen = HashSet::new();
        for tenor in &self.tenors {
            if tenor.label.trim().is_empty() {
                bail!("Tenor label cannot be empty");
            }
            if tenor.label == META_KEY {
                bail!("Tenor label '{META_KEY}' is reserved for metadata");
            }
            if tenor.series_key.trim().is_empty() {
                bail!("Tenor {} has an empty series_key", tenor.label);
            }
            if !seen.insert(tenor.label.as_str()) {
                bail!("Duplicate tenor label: {}", tenor.label);
            }
        }

        validate_period(&self.start_period)
            .with_context(|| format!("Invalid start_period: {}", self.start_period))?;

        if !is_js_identifier(&self.output.variable) {
            bail!(
                "Output variable is not a valid identifier: {}",
                self.output.variable
            );
        }

        if self.providers.ecb.timeout_secs == 0 {
            bail!("providers.ecb.timeout_secs must be greater than zero");
        }

        Ok(())
    }
}

fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
