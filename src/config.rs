use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;

/// 服务配置，全部来自环境变量（支持 .env）
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// 模拟网络延迟，搜索条件变化后等待这么久再出结果
    pub search_delay_ms: u64,
    pub session_idle_secs: u64,
    pub session_capacity: u64,
    pub seed_fixtures: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: "sqlite:./faceup.db?mode=rwc".to_string(),
            search_delay_ms: 500,
            session_idle_secs: 30 * 60,
            session_capacity: 10_000,
            seed_fixtures: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取，解析失败时回退默认值
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", &lookup, defaults.port),
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            search_delay_ms: parse_or("SEARCH_DELAY_MS", &lookup, defaults.search_delay_ms),
            session_idle_secs: parse_or("SESSION_IDLE_SECS", &lookup, defaults.session_idle_secs),
            session_capacity: parse_or("SESSION_CAPACITY", &lookup, defaults.session_capacity),
            seed_fixtures: parse_or("SEED_FIXTURES", &lookup, defaults.seed_fixtures),
        }
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Invalid value for {}: {:?}, using default", key, raw);
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.port, 3000);
        assert_eq!(config.search_delay(), Duration::from_millis(500));
        assert!(config.seed_fixtures);
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let env: HashMap<&str, &str> = [
            ("PORT", "8080"),
            ("SEARCH_DELAY_MS", "fast"),
            ("SEED_FIXTURES", "false"),
            ("HOST", "127.0.0.1"),
        ]
        .into_iter()
        .collect();
        let config = AppConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.port, 8080);
        assert_eq!(config.search_delay_ms, 500);
        assert!(!config.seed_fixtures);
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
    }
}
