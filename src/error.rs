use crate::request::HttpError;

// =========================================================
// 令牌解码错误
// =========================================================

/// 令牌无法解码的原因
///
/// 只在 codec 内部和日志中出现，会话层一律按“无有效令牌”处理。
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token must have 3 segments, found {0}")]
    SegmentCount(usize),
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not valid claims JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl TokenError {
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::SegmentCount(_) => "TOKEN_SEGMENTS",
            TokenError::Base64(_) => "TOKEN_BASE64",
            TokenError::Json(_) => "TOKEN_JSON",
        }
    }
}

// =========================================================
// 登录错误
// =========================================================

/// 网络失败时展示给用户的固定文案，不暴露底层细节
pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to reach the server. Please check your connection and try again.";
pub const TOKEN_UNREADABLE_MESSAGE: &str = "Failed to load user data from token";

/// 登录失败的分类
///
/// `Display` 输出即会话的 `last_error` 文案。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// 后端拒绝（非 2xx），消息为响应体原文
    #[error("{}", rejected_message(.status, .message))]
    Rejected { status: u16, message: String },
    /// 请求没有得到响应
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network(#[source] HttpError),
    /// 登录成功但读不到可用的令牌：客户端与服务端的约定不一致
    #[error("{}", TOKEN_UNREADABLE_MESSAGE)]
    TokenUnreadable,
    /// 结算前已有更新的登录或登出，本次结果被丢弃
    #[error("login attempt was superseded")]
    Superseded,
}

fn rejected_message(status: &u16, body: &str) -> String {
    if body.trim().is_empty() {
        format!("Login failed (HTTP {})", status)
    } else {
        body.to_string()
    }
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Rejected { .. } => "LOGIN_REJECTED",
            AuthError::Network(_) => "NETWORK_ERROR",
            AuthError::TokenUnreadable => "TOKEN_UNREADABLE",
            AuthError::Superseded => "SUPERSEDED",
        }
    }
}

impl From<HttpError> for AuthError {
    fn from(e: HttpError) -> Self {
        AuthError::Network(e)
    }
}

// =========================================================
// 配置错误
// =========================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{name} must not be empty")]
    Empty { name: &'static str },
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::InvalidNumber { .. } => "CONFIG_INVALID_NUMBER",
            ConfigError::Empty { .. } => "CONFIG_EMPTY",
            ConfigError::Zero { .. } => "CONFIG_ZERO",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_uses_body_verbatim() {
        let err = AuthError::Rejected {
            status: 401,
            message: "Bad credentials".to_string(),
        };
        assert_eq!(err.to_string(), "Bad credentials");
        assert_eq!(err.error_code(), "LOGIN_REJECTED");
    }

    #[test]
    fn test_rejected_empty_body_falls_back_to_status() {
        let err = AuthError::Rejected {
            status: 503,
            message: "  ".to_string(),
        };
        assert_eq!(err.to_string(), "Login failed (HTTP 503)");
    }

    #[test]
    fn test_network_message_does_not_leak_details() {
        let err = AuthError::from(HttpError::Network("TypeError: dns lookup 10.0.0.7".into()));
        assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
        assert!(std::error::Error::source(&err).is_some());
    }
}
