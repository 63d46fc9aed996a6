//! 定时器封装模块
//!
//! 用 `gloo-timers` 实现会话核心的 `Platform`：`Interval` 被 drop 时自动清除。

use gloo_timers::callback::Interval;
use gloo_timers::future::TimeoutFuture;
use motodash::Platform;
use motodash_shared::date::{Date, Timestamp};
use std::time::Duration;

/// 浏览器调度能力
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserPlatform;

/// 浏览器把超过 `i32::MAX` 毫秒的延迟当作 1 毫秒
const MAX_DELAY_MS: u32 = i32::MAX as u32;

fn as_millis_u32(d: Duration) -> u32 {
    u32::try_from(d.as_millis())
        .unwrap_or(MAX_DELAY_MS)
        .min(MAX_DELAY_MS)
}

#[async_trait::async_trait(?Send)]
impl Platform for BrowserPlatform {
    type Interval = Interval;

    fn now(&self) -> Timestamp {
        Date::now_timestamp()
    }

    async fn sleep(&self, duration: Duration) {
        TimeoutFuture::new(as_millis_u32(duration)).await;
    }

    fn interval(&self, period: Duration, tick: Box<dyn Fn()>) -> Interval {
        Interval::new(as_millis_u32(period), move || tick())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_clamp_to_browser_limit() {
        assert_eq!(as_millis_u32(Duration::from_secs(60)), 60_000);
        // 30 天超过 i32::MAX 毫秒
        assert_eq!(as_millis_u32(Duration::from_secs(30 * 86_400)), MAX_DELAY_MS);
        assert_eq!(as_millis_u32(Duration::from_secs(u64::MAX / 1000)), MAX_DELAY_MS);
    }
}
