//! Runtime configuration read from the environment (and `.env`).

use std::env;
use std::time::Duration;

use crate::assistant::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TYPST_BIN: &str = "typst";
const DEFAULT_SETTLE_MS: u64 = 500;
const DEFAULT_SCHOOL_NAME: &str = "TK ISLAM ANWAARUL HIDAYAH AL-FALAH";
const DEFAULT_SCHOOL_ADDRESS: &str = "Perum Green Sejahtera, Desa Jatisela, Kec.Gunungsari";

/// Credential variables, first non-empty wins.
const API_KEY_VARS: [&str; 3] = ["API_KEY", "GEMINI_API_KEY", "VITE_API_KEY"];

/// Letterhead printed at the top of every report.
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolProfile {
    pub name: String,
    pub address: String,
}

impl Default for SchoolProfile {
    fn default() -> Self {
        Self {
            name: DEFAULT_SCHOOL_NAME.to_string(),
            address: DEFAULT_SCHOOL_ADDRESS.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub host: String,
    pub port: u16,
    pub school: SchoolProfile,
    pub typst_bin: String,
    pub settle_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_api_base: DEFAULT_API_BASE.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            school: SchoolProfile::default(),
            typst_bin: DEFAULT_TYPST_BIN.to_string(),
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_MS),
        }
    }
}

impl AppConfig {
    /// Read the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let api_key = API_KEY_VARS.iter().find_map(|key| get(key));
        if api_key.is_none() {
            log::warn!("No API key set (API_KEY / GEMINI_API_KEY / VITE_API_KEY); narrative generation is disabled");
        }

        let port = match get("RAPOR_PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("RAPOR_PORT '{}' is not a port number, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let settle_ms = match get("CAPTURE_SETTLE_MS") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!(
                    "CAPTURE_SETTLE_MS '{}' is not a number, using {}",
                    raw,
                    DEFAULT_SETTLE_MS
                );
                DEFAULT_SETTLE_MS
            }),
            None => DEFAULT_SETTLE_MS,
        };

        Self {
            api_key,
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_api_base: get("GEMINI_API_BASE").unwrap_or(defaults.gemini_api_base),
            host: get("RAPOR_HOST").unwrap_or(defaults.host),
            port,
            school: SchoolProfile {
                name: get("RAPOR_SCHOOL_NAME").unwrap_or(defaults.school.name),
                address: get("RAPOR_SCHOOL_ADDRESS").unwrap_or(defaults.school.address),
            },
            typst_bin: get("TYPST_BIN").unwrap_or(defaults.typst_bin),
            settle_delay: Duration::from_millis(settle_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.settle_delay, Duration::from_millis(500));
        assert_eq!(cfg.gemini_model, "gemini-2.5-flash");
    }

    #[test]
    fn test_first_non_empty_key_wins() {
        let cfg = config(&[("API_KEY", " "), ("GEMINI_API_KEY", "g"), ("VITE_API_KEY", "v")]);
        assert_eq!(cfg.api_key.as_deref(), Some("g"));
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let cfg = config(&[("RAPOR_PORT", "delapan"), ("CAPTURE_SETTLE_MS", "-1")]);
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.settle_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("RAPOR_PORT", "9000"),
            ("RAPOR_SCHOOL_NAME", "TK Pelita"),
            ("TYPST_BIN", "/opt/typst"),
            ("CAPTURE_SETTLE_MS", "0"),
        ]);
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.school.name, "TK Pelita");
        assert_eq!(cfg.school.address, DEFAULT_SCHOOL_ADDRESS);
        assert_eq!(cfg.typst_bin, "/opt/typst");
        assert!(cfg.settle_delay.is_zero());
    }
}
