//! 时间类型模块
//!
//! - `Timestamp`: 毫秒时间戳，会话过期判断统一使用它
//! - `Date`: 读取当前墙钟时间（wasm32 下走 `js_sys::Date`）

use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;
use std::time::Duration;

// =========================================================
// Timestamp - 可传输的时间戳类型
// =========================================================

/// 毫秒时间戳
///
/// 内部存储为 `i64`，表示自 Unix 纪元以来的毫秒数
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    #[inline]
    pub const fn new(ms: i64) -> Self {
        Self(ms)
    }

    /// 从秒创建（JWT 中的 `exp` / `iat` 均为秒）
    #[inline]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs.saturating_mul(1000))
    }

    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = Duration;

    /// 两个时间戳的差值，负数截断为 0
    fn sub(self, rhs: Timestamp) -> Self::Output {
        let diff_ms = self.0.saturating_sub(rhs.0).max(0);
        Duration::from_millis(diff_ms as u64)
    }
}

/// 以 RFC 3339 (UTC) 输出，超出范围时退回原始毫秒数
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::from_timestamp_millis(self.0) {
            Some(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            None => write!(f, "{}ms", self.0),
        }
    }
}

// =========================================================
// Date - 墙钟
// =========================================================

pub struct Date;

impl Date {
    /// 获取当前时间的毫秒时间戳
    #[cfg(target_arch = "wasm32")]
    #[inline]
    pub fn now_timestamp() -> Timestamp {
        Timestamp(js_sys::Date::now() as i64)
    }

    /// 获取当前时间的毫秒时间戳
    #[cfg(not(target_arch = "wasm32"))]
    pub fn now_timestamp() -> Timestamp {
        use std::time::{SystemTime, UNIX_EPOCH};

        let ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or_default();
        Timestamp(ms)
    }
}
