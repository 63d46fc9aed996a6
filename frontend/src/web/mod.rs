//! 浏览器能力封装
//!
//! 会话核心只依赖抽象，这里给出基于浏览器 API 的实现。

mod console;
mod cookie;
mod http;
mod timer;

pub use console::{ConsoleLayer, install as install_console};
pub use cookie::{CookieStore, parse_cookie};
pub use http::FetchHttpClient;
pub use timer::BrowserPlatform;
