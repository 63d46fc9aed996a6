//! motodash 会话核心
//!
//! 后台管理端的客户端会话：从 Cookie 中的 JWT 推导当前用户、跟踪过期、
//! 周期性失效检查，以及登录 / 登出流程。
//!
//! - `codec`: 令牌解码（不校验签名）
//! - `session`: 会话状态与生命周期
//! - `api` / `request`: 认证接口与 HTTP 抽象
//! - `store` / `platform`: 注入的令牌存储与调度能力

pub mod api;
pub mod codec;
pub mod config;
pub mod error;
pub mod platform;
pub mod request;
pub mod session;
pub mod store;

pub use config::SessionConfig;
pub use error::{AuthError, ConfigError, TokenError};
pub use motodash_shared::{Claims, Identity};
pub use platform::Platform;
pub use request::{HttpClient, HttpError, HttpRequest, HttpResponse};
pub use session::{Session, SessionManager, SessionPhase};
pub use store::{CredentialStore, MemoryStore};
