//! Cache configuration module

use serde::{Deserialize, Serialize};

/// Redis cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Connection timeout in seconds
    pub connection_timeout: u64,

    /// Maximum retry attempts for a failed command
    pub max_retries: u32,

    /// Base delay between retries in milliseconds (doubled per retry)
    pub retry_delay_ms: u64,

    /// Cache key prefix
    pub key_prefix: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            connection_timeout: 5,
            max_retries: 3,
            retry_delay_ms: 100,
            key_prefix: None,
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let url = std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let max_retries = std::env::var("REDIS_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        Self {
            url,
            max_retries,
            key_prefix: std::env::var("CACHE_KEY_PREFIX").ok().filter(|p| !p.is_empty()),
            ..Default::default()
        }
    }

    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the key prefix for all cache keys
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Generate a cache key with prefix
    pub fn make_key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }
}

/// In-memory store configuration (for development/testing)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MemoryCacheConfig {
    /// Interval in seconds between sweeps of expired entries
    pub cleanup_interval: u64,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: 60,
        }
    }
}

/// Cache strategy configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheStrategyConfig {
    /// Which backend holds OTP state
    pub cache_type: CacheType,

    /// Redis configuration
    pub redis: CacheConfig,

    /// Memory store configuration
    pub memory: MemoryCacheConfig,
}

/// Cache type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheType {
    Redis,
    Memory,
}

impl std::str::FromStr for CacheType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(CacheType::Redis),
            "memory" | "in-memory" => Ok(CacheType::Memory),
            _ => Err(format!("Invalid cache type: {}", s)),
        }
    }
}

impl Default for CacheStrategyConfig {
    fn default() -> Self {
        Self {
            cache_type: CacheType::Redis,
            redis: CacheConfig::default(),
            memory: MemoryCacheConfig::default(),
        }
    }
}

impl CacheStrategyConfig {
    /// In-process store, nothing to connect to
    pub fn memory() -> Self {
        Self {
            cache_type: CacheType::Memory,
            ..Default::default()
        }
    }

    /// Overlay `CACHE_TYPE` and the Redis variables on top of `base`
    pub fn from_env_or(base: Self) -> Self {
        let cache_type = std::env::var("CACHE_TYPE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(base.cache_type);

        Self {
            cache_type,
            redis: CacheConfig::from_env(),
            memory: base.memory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.url, "redis://localhost:6379");
        assert_eq!(config.max_retries, 3);
        assert!(config.key_prefix.is_none());
    }

    #[test]
    fn test_cache_config_with_prefix() {
        let config = CacheConfig::new("redis://cache:6379").with_prefix("portal");
        assert_eq!(config.make_key("otp:+254700000000"), "portal:otp:+254700000000");
    }

    #[test]
    fn test_cache_key_without_prefix() {
        let config = CacheConfig::default();
        assert_eq!(config.make_key("otp:x"), "otp:x");
    }

    #[test]
    fn test_cache_type_from_str() {
        assert_eq!("redis".parse::<CacheType>().unwrap(), CacheType::Redis);
        assert_eq!("Memory".parse::<CacheType>().unwrap(), CacheType::Memory);
        assert!("memcached".parse::<CacheType>().is_err());
    }
}
