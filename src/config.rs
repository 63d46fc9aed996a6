use motodash_shared::{DurationSecs, TOKEN_COOKIE_NAME};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

// =========================================================
// 默认值
// =========================================================

/// 同源部署，经前端代理转发到后端
const DEFAULT_API_BASE: &str = "";
const DEFAULT_CHECK_INTERVAL: DurationSecs = DurationSecs::from_mins(1);
const DEFAULT_SETTLE_DELAY_MS: u64 = 100;

pub const VAR_API_BASE: &str = "MOTODASH_API_BASE";
pub const VAR_TOKEN_COOKIE: &str = "MOTODASH_TOKEN_COOKIE";
pub const VAR_CHECK_INTERVAL_SECS: &str = "MOTODASH_CHECK_INTERVAL_SECS";
pub const VAR_SETTLE_DELAY_MS: &str = "MOTODASH_SETTLE_DELAY_MS";

/// 会话管理器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// 后端地址前缀，为空时使用相对路径
    pub api_base: String,
    /// 存放令牌的 Cookie 名
    pub token_cookie: String,
    /// 周期性过期检查的间隔
    pub check_interval: DurationSecs,
    /// 登录成功后等待 Cookie 可读的时间
    pub settle_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token_cookie: TOKEN_COOKIE_NAME.to_string(),
            check_interval: DEFAULT_CHECK_INTERVAL,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

impl SessionConfig {
    /// 从变量表读取配置，缺失的项使用默认值
    ///
    /// 浏览器中没有进程环境变量，前端传入编译期的 `option_env!` 值；
    /// 其他宿主可以直接传 `|k| std::env::var(k).ok()`。
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base) = lookup(VAR_API_BASE) {
            config.api_base = base;
        }

        if let Some(name) = lookup(VAR_TOKEN_COOKIE) {
            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigError::Empty {
                    name: VAR_TOKEN_COOKIE,
                });
            }
            config.token_cookie = name.to_string();
        }

        if let Some(secs) = lookup(VAR_CHECK_INTERVAL_SECS) {
            let secs = parse_u64(VAR_CHECK_INTERVAL_SECS, &secs)?;
            if secs == 0 {
                return Err(ConfigError::Zero {
                    name: VAR_CHECK_INTERVAL_SECS,
                });
            }
            config.check_interval = DurationSecs::from_secs(secs);
        }

        if let Some(ms) = lookup(VAR_SETTLE_DELAY_MS) {
            config.settle_delay_ms = parse_u64(VAR_SETTLE_DELAY_MS, &ms)?;
        }

        Ok(config)
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    pub fn with_token_cookie(mut self, name: impl Into<String>) -> Self {
        self.token_cookie = name.into();
        self
    }

    pub fn with_check_interval(mut self, interval: DurationSecs) -> Self {
        self.check_interval = interval;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

fn parse_u64(name: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.api_base, "");
        assert_eq!(config.token_cookie, "token");
        assert_eq!(Duration::from(config.check_interval), Duration::from_secs(60));
        assert_eq!(config.settle_delay(), Duration::from_millis(100));
    }

    #[test]
    fn test_from_vars_overrides() {
        let env = vars(&[
            (VAR_API_BASE, "https://api.motodash.test"),
            (VAR_TOKEN_COOKIE, "session"),
            (VAR_CHECK_INTERVAL_SECS, "15"),
            (VAR_SETTLE_DELAY_MS, " 250 "),
        ]);
        let config = SessionConfig::from_vars(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.api_base, "https://api.motodash.test");
        assert_eq!(config.token_cookie, "session");
        assert_eq!(config.check_interval.as_secs(), 15);
        assert_eq!(config.settle_delay_ms, 250);
    }

    #[test]
    fn test_from_vars_missing_uses_defaults() {
        let config = SessionConfig::from_vars(|_| None).unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_from_vars_rejects_bad_number() {
        let env = vars(&[(VAR_CHECK_INTERVAL_SECS, "soon")]);
        let err = SessionConfig::from_vars(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                name: VAR_CHECK_INTERVAL_SECS,
                ..
            }
        ));
    }

    #[test]
    fn test_from_vars_rejects_zero_interval() {
        let env = vars(&[(VAR_CHECK_INTERVAL_SECS, "0")]);
        let err = SessionConfig::from_vars(|k| env.get(k).cloned()).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ZERO");
    }

    #[test]
    fn test_with_settle_delay_saturates() {
        let config = SessionConfig::default().with_settle_delay(Duration::MAX);
        assert_eq!(config.settle_delay_ms, u64::MAX);
        let config = SessionConfig::default().with_settle_delay(Duration::from_millis(250));
        assert_eq!(config.settle_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_from_vars_rejects_empty_cookie_name() {
        let env = vars(&[(VAR_TOKEN_COOKIE, "  ")]);
        assert!(SessionConfig::from_vars(|k| env.get(k).cloned()).is_err());
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"check_interval":30,"api_base":"/proxy"}"#).unwrap();
        assert_eq!(config.check_interval.as_secs(), 30);
        assert_eq!(config.api_base, "/proxy");
        assert_eq!(config.token_cookie, "token");
        assert_eq!(config.settle_delay_ms, 100);
    }
}
