use motodash_shared::protocol::{ApiRequest, LoginRequest, LogoutRequest};
use tracing::debug;

use crate::error::AuthError;
use crate::request::{HttpClient, HttpError, HttpRequest};

/// 认证接口客户端
///
/// 会话令牌由后端通过 Set-Cookie 下发，因此所有请求都携带凭据。
pub struct AuthApi<C> {
    base_url: String,
    client: C,
}

impl<C: HttpClient> AuthApi<C> {
    pub fn new(base_url: &str, client: C) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn request<R: ApiRequest>(&self, body: &R) -> Result<HttpRequest, HttpError> {
        Ok(HttpRequest::new(&self.url(R::PATH), R::METHOD)
            .with_json(body)?
            .with_credentials())
    }

    /// 用邮箱和密码换取会话 Cookie
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let res = self.client.send(self.request(&body)?).await?;

        if res.is_success() {
            Ok(())
        } else {
            debug!(status = res.status, "login rejected by backend");
            Err(AuthError::Rejected {
                status: res.status,
                message: res.body,
            })
        }
    }

    /// 通知后端注销；非 2xx 同样作为错误返回，由调用方决定是否忽略
    pub async fn logout(&self) -> Result<(), AuthError> {
        // 注销不需要请求体
        let req = HttpRequest::new(&self.url(LogoutRequest::PATH), LogoutRequest::METHOD)
            .with_credentials();
        let res = self.client.send(req).await?;
        if res.is_success() {
            Ok(())
        } else {
            Err(AuthError::Rejected {
                status: res.status,
                message: res.body,
            })
        }
    }
}
