//! Rate series abstractions

use crate::core::config::TenorConfig;
use crate::core::series::Series;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// URL the provider will request for `tenor`.
    fn source_url(&self, tenor: &TenorConfig) -> String;

    async fn fetch_series(&self, tenor: &TenorConfig) -> Result<Series>;
}
