use super::ui;
use crate::core::config::AppConfig;
use crate::core::{Bundle, Meta, RateProvider, output};
use anyhow::{Context, Result, bail};
use comfy_table::{Cell, Table};
use tracing::info;

/// Downloads every configured tenor, then writes both output files.
///
/// Files are only written once every tenor has been fetched, so a failure
/// leaves previous outputs untouched.
pub async fn run(
    config: &AppConfig,
    provider: &(dyn RateProvider + Send + Sync),
) -> Result<Bundle> {
    ui::print_separator();
    println!(
        "  {}",
        ui::style_text("Euribor update from the ECB", ui::StyleType::Title)
    );
    ui::print_separator();

    let mut fetched = Vec::with_capacity(config.tenors.len());
    for tenor in &config.tenors {
        println!("\nEuribor {}:", tenor.label);
        let url = provider.source_url(tenor);
        println!(
            "  {}",
            ui::style_text(
                &format!("Downloading from: {}", ui::truncate(&url, 80)),
                ui::StyleType::Subtle
            )
        );

        let pb = ui::new_spinner(&format!("Fetching {}", tenor.label));
        let result = provider.fetch_series(tenor).await;
        pb.finish_and_clear();

        let series = match result {
            Ok(series) => series,
            Err(e) => {
                println!(
                    "  {}",
                    ui::style_text(&format!("Download failed: {e}"), ui::StyleType::Error)
                );
                return Err(e).with_context(|| format!("Failed to fetch Euribor {}", tenor.label));
            }
        };

        let (Some((first, _)), Some((last, _))) = (series.first(), series.last()) else {
            bail!("ECB returned no observations for Euribor {}", tenor.label);
        };
        println!(
            "  {}",
            ui::style_text(
                &format!("{} months downloaded ({first} → {last})", series.len()),
                ui::StyleType::Success
            )
        );
        info!(tenor = %tenor.label, months = series.len(), "Series downloaded");
        fetched.push((tenor.label.clone(), series));
    }

    let mut bundle = Bundle::new(Meta::now(&config.metadata));
    for (label, series) in fetched {
        bundle.insert(&label, series)?;
    }

    output::write_outputs(&bundle, &config.output)?;
    info!("Output files written");

    println!("\n{}", summary_table(&bundle, &config.metadata.unit));
    println!(
        "\nSaved: {} + {}",
        config.output.json_path.display(),
        config.output.script_path.display()
    );
    println!("Last update: {}", bundle.meta().updated);
    ui::print_separator();

    Ok(bundle)
}

fn summary_table(bundle: &Bundle, unit: &str) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Tenor"),
        ui::header_cell("Months"),
        ui::header_cell("From"),
        ui::header_cell("To"),
        ui::header_cell(&format!("Latest ({unit})")),
    ]);

    for (label, series) in bundle.tenors() {
        let first = series.first().map_or("N/A", |(period, _)| period);
        let (last, latest) = series
            .last()
            .map_or(("N/A", "N/A".to_string()), |(period, rate)| {
                (period, format!("{rate:.4}"))
            });
        table.add_row(vec![
            Cell::new(label),
            ui::number_cell(series.len().to_string()),
            Cell::new(first),
            Cell::new(last),
            ui::number_cell(latest),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Series;
    use crate::core::config::{OutputConfig, TenorConfig};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct StaticProvider {
        series: HashMap<String, Vec<(&'static str, f64)>>,
        calls: Mutex<Vec<String>>,
    }

    impl StaticProvider {
        fn new(series: &[(&str, Vec<(&'static str, f64)>)]) -> Self {
            Self {
                series: series
                    .iter()
                    .map(|(label, obs)| (label.to_string(), obs.clone()))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RateProvider for StaticProvider {
        fn source_url(&self, tenor: &TenorConfig) -> String {
            format!("memory://{}", tenor.series_key)
        }

        async fn fetch_series(&self, tenor: &TenorConfig) -> Result<Series> {
            self.calls.lock().unwrap().push(tenor.label.clone());
            let observations = self
                .series
                .get(&tenor.label)
                .ok_or_else(|| anyhow!("boom"))?;
            let mut series = Series::new();
            for (period, rate) in observations {
                series.insert(period, *rate)?;
            }
            Ok(series)
        }
    }

    fn config_in(dir: &TempDir) -> AppConfig {
        AppConfig {
            output: OutputConfig {
                json_path: dir.path().join("euribor_data.json"),
                script_path: dir.path().join("euribor_data.js"),
                ..OutputConfig::default()
            },
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_run_fetches_tenors_in_order_and_writes_outputs() -> Result<()> {
        let dir = TempDir::new()?;
        let config = config_in(&dir);
        let provider = StaticProvider::new(&[
            ("1M", vec![("2020-02", 0.1), ("2020-01", 0.2)]),
            ("3M", vec![("2020-01", 0.3)]),
        ]);

        let bundle = run(&config, &provider).await?;

        assert_eq!(*provider.calls.lock().unwrap(), vec!["1M", "3M"]);
        let labels: Vec<&str> = bundle.tenors().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["1M", "3M"]);
        assert_eq!(bundle.get("1M").map(|s| s.len()), Some(2));
        assert!(config.output.json_path.exists());
        assert!(config.output.script_path.exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_failure_leaves_outputs_untouched() -> Result<()> {
        let dir = TempDir::new()?;
        let config = config_in(&dir);
        std::fs::write(&config.output.json_path, "previous")?;
        let provider = StaticProvider::new(&[("1M", vec![("2020-01", 0.2)])]);

        let err = run(&config, &provider).await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to fetch Euribor 3M");
        assert_eq!(std::fs::read_to_string(&config.output.json_path)?, "previous");
        assert!(!config.output.script_path.exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_series_is_an_error() -> Result<()> {
        let dir = TempDir::new()?;
        let config = config_in(&dir);
        let provider = StaticProvider::new(&[("1M", vec![("2020-01", 0.2)]), ("3M", vec![])]);

        let err = run(&config, &provider).await.unwrap_err();

        assert!(err.to_string().contains("no observations"), "{err}");
        assert!(!config.output.json_path.exists());
        Ok(())
    }

    #[test]
    fn test_summary_table() {
        let mut series = Series::new();
        series.insert("1999-01", 3.1).unwrap();
        series.insert("2024-06", 3.72519).unwrap();
        let meta = Meta::with_timestamp(
            &crate::core::config::MetadataConfig::default(),
            "2025-01-31 08:00:00".to_string(),
        );
        let mut bundle = Bundle::new(meta);
        bundle.insert("3M", series).unwrap();

        let rendered = summary_table(&bundle, "% annuo").to_string();
        assert!(rendered.contains("1999-01"));
        assert!(rendered.contains("2024-06"));
        assert!(rendered.contains("3.7252"));
    }
}
