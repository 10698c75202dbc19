pub mod calendar;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod preview;
pub mod search;
pub mod time;

#[cfg(test)]
pub(crate) mod testing;

pub use calendar::Calendar;
pub use error::CalendarError;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone, Default)]
    pub struct Settings {
        pub base_url: Option<String>,
        pub data_dir: Option<String>,
        pub http_timeout_secs: Option<u64>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let http_timeout_secs = match std::env::var("EARNINGS_HTTP_TIMEOUT_SECS") {
                Ok(s) if !s.trim().is_empty() => Some(
                    s.trim()
                        .parse::<u64>()
                        .with_context(|| format!("EARNINGS_HTTP_TIMEOUT_SECS is not a number: {s}"))?,
                ),
                _ => None,
            };

            Ok(Self {
                base_url: non_empty_var("EARNINGS_BASE_URL"),
                data_dir: non_empty_var("EARNINGS_DATA_DIR"),
                http_timeout_secs,
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }

        pub fn require_base_url(&self) -> anyhow::Result<&str> {
            self.base_url
                .as_deref()
                .context("EARNINGS_BASE_URL is required")
        }

        pub fn require_data_dir(&self) -> anyhow::Result<&str> {
            self.data_dir
                .as_deref()
                .context("EARNINGS_DATA_DIR is required")
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.trim().is_empty())
    }
}
