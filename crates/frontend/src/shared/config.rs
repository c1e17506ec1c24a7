use serde::Deserialize;
use thiserror::Error;

/// Таймауты и лимиты клиентского рантайма.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Minimum gap between two loads of the same key.
    pub debounce_ms: i64,
    pub cache_ttl_ms: i64,
    /// A loading flag older than this is considered leaked.
    pub stale_after_ms: i64,
    pub stale_sweep_interval_ms: u32,
    pub cache_sweep_interval_ms: u32,
    pub history_limit: usize,
    /// Delay before post-navigation cleanup of the shown section.
    pub cleanup_delay_ms: u32,
    /// Delay before cleanup triggered by a section guard.
    pub guard_delay_ms: u32,
}

/// Overrides stored by the user; every field is optional.
#[derive(Debug, Deserialize, Clone, Default)]
struct RuntimeConfigOverride {
    debounce_ms: Option<i64>,
    cache_ttl_ms: Option<i64>,
    stale_after_ms: Option<i64>,
    stale_sweep_interval_ms: Option<u32>,
    cache_sweep_interval_ms: Option<u32>,
    history_limit: Option<usize>,
    cleanup_delay_ms: Option<u32>,
    guard_delay_ms: Option<u32>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid runtime config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
debounce_ms = 300
cache_ttl_ms = 30000
stale_after_ms = 10000
stale_sweep_interval_ms = 5000
cache_sweep_interval_ms = 60000
history_limit = 50
cleanup_delay_ms = 100
guard_delay_ms = 100
"#;

const CONFIG_STORAGE_KEY: &str = "bioma_runtime_config";

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            cache_ttl_ms: 30_000,
            stale_after_ms: 10_000,
            stale_sweep_interval_ms: 5_000,
            cache_sweep_interval_ms: 60_000,
            history_limit: 50,
            cleanup_delay_ms: 100,
            guard_delay_ms: 100,
        }
    }
}

impl RuntimeConfig {
    /// Parses the embedded defaults and applies `overrides` (TOML) on top.
    pub fn from_toml(overrides: &str) -> Result<Self, ConfigError> {
        let mut config: RuntimeConfig = toml::from_str(DEFAULT_CONFIG)?;
        let o: RuntimeConfigOverride = toml::from_str(overrides)?;

        if let Some(v) = o.debounce_ms {
            config.debounce_ms = v;
        }
        if let Some(v) = o.cache_ttl_ms {
            config.cache_ttl_ms = v;
        }
        if let Some(v) = o.stale_after_ms {
            config.stale_after_ms = v;
        }
        if let Some(v) = o.stale_sweep_interval_ms {
            config.stale_sweep_interval_ms = v;
        }
        if let Some(v) = o.cache_sweep_interval_ms {
            config.cache_sweep_interval_ms = v;
        }
        if let Some(v) = o.history_limit {
            config.history_limit = v.max(1);
        }
        if let Some(v) = o.cleanup_delay_ms {
            config.cleanup_delay_ms = v;
        }
        if let Some(v) = o.guard_delay_ms {
            config.guard_delay_ms = v;
        }
        Ok(config)
    }

    /// Load configuration for the running page
    ///
    /// Search order:
    /// 1. `localStorage["bioma_runtime_config"]` (TOML, partial)
    /// 2. Falls back to embedded default config
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|storage| storage.get_item(CONFIG_STORAGE_KEY).ok().flatten());

        match stored {
            Some(text) => match Self::from_toml(&text) {
                Ok(config) => {
                    log::info!("⚙️ Runtime config loaded from localStorage");
                    config
                }
                Err(e) => {
                    log::warn!("⚠️ {e}; using default runtime config");
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }
}
