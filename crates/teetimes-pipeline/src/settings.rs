use std::time::Duration;

use teetimes_core::AppConfig;
use teetimes_scraper::ExtractSettings;

/// Tunables for one collection batch.
#[derive(Debug, Clone)]
pub struct CollectSettings {
    /// Host substituted into the facility URL template.
    pub site_host: String,
    /// Maximum number of render sessions open at once.
    pub max_concurrent: usize,
    pub extract: ExtractSettings,
}

impl CollectSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            site_host: config.site_host.clone(),
            max_concurrent: config.max_concurrent_facilities.max(1),
            extract: ExtractSettings {
                marker_selector: config.marker_selector.clone(),
                wait_budget: Duration::from_secs(config.wait_budget_secs),
                poll_interval: Duration::from_millis(config.poll_interval_ms),
            },
        }
    }
}
