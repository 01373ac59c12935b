//! Service configuration from environment variables.

use std::path::PathBuf;

/// Runtime settings for the affinity service and its CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffinityConfig {
    /// JSON reader snapshot (`AFFINITY_READERS`).
    pub readers_path: Option<PathBuf>,
    /// Rebuild from the source before answering a connection-path report
    /// (`AFFINITY_REFRESH_BEFORE_PATH`).
    pub refresh_before_path: bool,
    /// Result cap for ranking queries (`AFFINITY_DEFAULT_LIMIT`).
    pub default_limit: usize,
    /// Radius for neighborhood queries (`AFFINITY_DEFAULT_HOPS`).
    pub default_hops: usize,
}

impl Default for AffinityConfig {
    fn default() -> Self {
        Self {
            readers_path: None,
            refresh_before_path: true,
            default_limit: 10,
            default_hops: 3,
        }
    }
}

impl AffinityConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable values fall back to the default with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            readers_path: lookup("AFFINITY_READERS")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            refresh_before_path: parse_or(
                &lookup,
                "AFFINITY_REFRESH_BEFORE_PATH",
                defaults.refresh_before_path,
                parse_bool,
            ),
            default_limit: parse_or(&lookup, "AFFINITY_DEFAULT_LIMIT", defaults.default_limit, |s| {
                s.parse().ok()
            }),
            default_hops: parse_or(&lookup, "AFFINITY_DEFAULT_HOPS", defaults.default_hops, |s| {
                s.parse().ok()
            }),
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_or<F, T, P>(lookup: &F, key: &str, default: T, parse: P) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::fmt::Debug,
    P: Fn(&str) -> Option<T>,
{
    match lookup(key) {
        None => default,
        Some(raw) => parse(raw.trim()).unwrap_or_else(|| {
            tracing::warn!(key, value = %raw, ?default, "invalid config value, using default");
            default
        }),
    }
}
