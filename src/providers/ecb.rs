use crate::core::config::{EcbProviderConfig, TenorConfig};
use crate::core::sdmx::SdmxDocument;
use crate::core::{RateProvider, Series};
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Fetches monthly rate series from the ECB Data Portal in SDMX-JSON format.
pub struct EcbProvider {
    base_url: String,
    dataflow: String,
    start_period: String,
    client: reqwest::Client,
}

impl EcbProvider {
    pub fn new(config: &EcbProviderConfig, start_period: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("euribor-update/1.0")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(EcbProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            dataflow: config.dataflow.clone(),
            start_period: start_period.to_string(),
            client,
        })
    }
}

#[async_trait]
impl RateProvider for EcbProvider {
    fn source_url(&self, tenor: &TenorConfig) -> String {
        format!(
            "{}/service/data/{}/{}?format=jsondata&startPeriod={}",
            self.base_url, self.dataflow, tenor.series_key, self.start_period
        )
    }

    #[instrument(
        name = "EcbSeriesFetch",
        skip(self, tenor),
        fields(label = %tenor.label)
    )]
    async fn fetch_series(&self, tenor: &TenorConfig) -> Result<Series> {
        let url = self.source_url(tenor);
        debug!("Requesting rate series from {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for tenor: {} URL: {}", e, tenor.label, url))?;

        let status = response.status();
        if status != StatusCode::OK {
            bail!("HTTP error: {} for tenor: {}", status, tenor.label);
        }

        let response_text = response
            .text()
            .await
            .with_context(|| format!("Failed to get response text for tenor: {}", tenor.label))?;

        let document = match SdmxDocument::from_json(&response_text) {
            Ok(document) => document,
            Err(e) => {
                error!(error = ?e, bytes = response_text.len(), "Failed to parse ECB response");
                return Err(e).with_context(|| {
                    format!("Failed to parse ECB response for tenor: {}", tenor.label)
                });
            }
        };

        let series = document
            .into_series()
            .with_context(|| format!("Unexpected ECB response for tenor: {}", tenor.label))?;
        debug!(months = series.len(), "Fetched rate series");
        Ok(series)
    }
}
