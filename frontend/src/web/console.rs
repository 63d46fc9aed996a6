//! 浏览器控制台日志
//!
//! 把 `tracing` 事件转发到 `console.*`，并安装 panic hook。

use std::fmt::Write as _;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

/// 输出到浏览器控制台的 `tracing` 层
pub struct ConsoleLayer {
    max_level: Level,
}

impl ConsoleLayer {
    pub fn new(max_level: Level) -> Self {
        Self { max_level }
    }
}

/// 拼接 `message` 与其余字段
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        // Level 越详细越"大"
        if *meta.level() > self.max_level {
            return;
        }

        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        let line = format!(
            "[{}] {}: {}{}",
            meta.level(),
            meta.target(),
            visitor.message,
            visitor.fields
        );
        let value = wasm_bindgen::JsValue::from_str(&line);

        match *meta.level() {
            Level::ERROR => web_sys::console::error_1(&value),
            Level::WARN => web_sys::console::warn_1(&value),
            Level::INFO => web_sys::console::info_1(&value),
            _ => web_sys::console::debug_1(&value),
        }
    }
}

/// 安装 panic hook 与控制台日志
///
/// 可重复调用，只有第一次生效。
pub fn install(max_level: Level) {
    console_error_panic_hook::set_once();
    let _ = tracing_subscriber::registry()
        .with(ConsoleLayer::new(max_level))
        .try_init();
}
