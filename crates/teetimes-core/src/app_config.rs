use std::path::PathBuf;

/// Outbound report delivery settings.
#[derive(Clone, Default)]
pub struct NotifyConfig {
    /// Message relay endpoint. `None` means deliveries are only logged.
    pub relay_url: Option<String>,
    pub token: Option<String>,
    pub sender: String,
    pub recipient: Option<String>,
}

impl std::fmt::Debug for NotifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyConfig")
            .field("relay_url", &self.relay_url)
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub facilities_path: PathBuf,
    pub output_path: PathBuf,
    pub log_level: String,
    pub site_host: String,
    pub webdriver_url: String,
    pub headless: bool,
    pub max_concurrent_facilities: usize,
    pub wait_budget_secs: u64,
    pub poll_interval_ms: u64,
    pub navigation_timeout_secs: u64,
    pub marker_selector: String,
    pub renderer_max_retries: u32,
    pub renderer_retry_backoff_ms: u64,
    pub report_schedule: String,
    pub notify: NotifyConfig,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("facilities_path", &self.facilities_path)
            .field("output_path", &self.output_path)
            .field("log_level", &self.log_level)
            .field("site_host", &self.site_host)
            .field("webdriver_url", &self.webdriver_url)
            .field("headless", &self.headless)
            .field(
                "max_concurrent_facilities",
                &self.max_concurrent_facilities,
            )
            .field("wait_budget_secs", &self.wait_budget_secs)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("navigation_timeout_secs", &self.navigation_timeout_secs)
            .field("marker_selector", &self.marker_selector)
            .field("renderer_max_retries", &self.renderer_max_retries)
            .field(
                "renderer_retry_backoff_ms",
                &self.renderer_retry_backoff_ms,
            )
            .field("report_schedule", &self.report_schedule)
            .field("notify", &self.notify)
            .finish()
    }
}
