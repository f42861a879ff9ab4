use std::str::FromStr;
use std::time::Duration;

use log::warn;

use crate::whatsapp::Timing;

pub struct Config {
    pub host: String,
    pub port: u16,
    pub timing: Timing,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Timing::default();
        let host = lookup("WHATSAPP_API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "WHATSAPP_API_PORT", 8000);
        let wait_time = parse_or(&lookup, "WHATSAPP_WAIT_TIME", defaults.wait_time.as_secs());
        let tab_close = parse_or(&lookup, "WHATSAPP_TAB_CLOSE", defaults.tab_close);
        let close_time = parse_or(&lookup, "WHATSAPP_CLOSE_TIME", defaults.close_time.as_secs());

        Self {
            host,
            port,
            timing: Timing {
                wait_time: Duration::from_secs(wait_time),
                tab_close,
                close_time: Duration::from_secs(close_time),
            },
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `RUST_LOG` filters, `info` when unset.
pub fn log_filters() -> String {
    log_filters_from(|key| std::env::var(key).ok())
}

fn log_filters_from(lookup: impl Fn(&str) -> Option<String>) -> String {
    lookup("RUST_LOG")
        .filter(|filters| !filters.trim().is_empty())
        .unwrap_or_else(|| "info".to_string())
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}, using default", key, raw);
            default
        }),
    }
}
