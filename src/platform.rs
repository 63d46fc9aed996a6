//! 运行环境抽象：墙钟、延时与周期定时器

use motodash_shared::date::Timestamp;
use std::rc::Rc;
use std::time::Duration;

/// 会话管理器依赖的调度能力
///
/// `interval` 返回的句柄被 drop 时必须停止定时器。
#[async_trait::async_trait(?Send)]
pub trait Platform {
    type Interval;

    /// 当前墙钟时间
    fn now(&self) -> Timestamp;

    /// 挂起当前任务，不阻塞线程
    async fn sleep(&self, duration: Duration);

    /// 每隔 `period` 调用一次 `tick`
    fn interval(&self, period: Duration, tick: Box<dyn Fn()>) -> Self::Interval;
}

#[async_trait::async_trait(?Send)]
impl<T: Platform> Platform for Rc<T> {
    type Interval = T::Interval;

    fn now(&self) -> Timestamp {
        (**self).now()
    }

    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await
    }

    fn interval(&self, period: Duration, tick: Box<dyn Fn()>) -> Self::Interval {
        (**self).interval(period, tick)
    }
}

// =========================================================
// 测试环境实现 (Mock)
// =========================================================
