//! motodash 前端会话绑定
//!
//! - `web`: Cookie、fetch、定时器与控制台日志的浏览器实现
//! - `auth`: Leptos Context 中的认证状态

mod auth;
pub mod web;

pub use auth::{AuthContext, BrowserSessionManager, provide_auth, use_auth};

use leptos::prelude::*;
use motodash::SessionConfig;
use motodash::config::{
    VAR_API_BASE, VAR_CHECK_INTERVAL_SECS, VAR_SETTLE_DELAY_MS, VAR_TOKEN_COOKIE,
};

/// 构建期注入的配置变量
fn build_var(name: &str) -> Option<String> {
    let value = match name {
        VAR_API_BASE => option_env!("MOTODASH_API_BASE"),
        VAR_TOKEN_COOKIE => option_env!("MOTODASH_TOKEN_COOKIE"),
        VAR_CHECK_INTERVAL_SECS => option_env!("MOTODASH_CHECK_INTERVAL_SECS"),
        VAR_SETTLE_DELAY_MS => option_env!("MOTODASH_SETTLE_DELAY_MS"),
        _ => None,
    };
    value.map(str::to_string)
}

/// 运行时配置，变量非法时回退到默认值
pub fn runtime_config() -> SessionConfig {
    SessionConfig::from_vars(build_var).unwrap_or_else(|e| {
        tracing::warn!(code = e.error_code(), error = %e, "invalid build config, using defaults");
        SessionConfig::default()
    })
}

/// 为子组件提供认证上下文
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    web::install_console(tracing::Level::INFO);
    provide_auth(runtime_config());
    children()
}
