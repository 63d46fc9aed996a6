use serde::Serialize;
use std::collections::HashMap;

pub use motodash_shared::protocol::HttpMethod;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// HTTP 传输错误
///
/// 只表示“请求没有得到响应”；非 2xx 响应属于正常返回。
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// 请求构建失败（序列化请求体、非法 Header 等）
    #[error("request build failed: {0}")]
    RequestBuild(String),
    /// 网络不可达、CORS 拒绝等
    #[error("network error: {0}")]
    Network(String),
}

impl HttpError {
    pub fn error_code(&self) -> &'static str {
        match self {
            HttpError::RequestBuild(_) => "REQUEST_BUILD_FAILED",
            HttpError::Network(_) => "NETWORK_ERROR",
        }
    }
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
    /// 跨域时是否携带 Cookie（fetch 的 `credentials: "include"`）
    pub with_credentials: bool,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
            with_credentials: false,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    /// 序列化为 JSON 请求体，并设置 Content-Type
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, HttpError> {
        let json =
            serde_json::to_string(body).map_err(|e| HttpError::RequestBuild(e.to_string()))?;
        self.body = Some(json);
        Ok(self.with_header("Content-Type", "application/json"))
    }

    pub fn with_credentials(mut self) -> Self {
        self.with_credentials = true;
        self
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 客户端特性 (Trait)
/// 浏览器环境下的 Future 不是 Send 的，因此使用 (?Send)
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError>;
}

#[async_trait::async_trait(?Send)]
impl<T: HttpClient> HttpClient for std::rc::Rc<T> {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        (**self).send(req).await
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
pub mod mock {
    use super::*;
    use futures::channel::oneshot;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// 预设的一次响应
    pub enum MockReply {
        Respond(u16, String),
        Fail(String),
        /// 挂起直到测试通过 sender 放行
        Gated(oneshot::Receiver<(u16, String)>),
    }

    /// 按 URL 排队返回预设响应，并记录所有请求
    pub struct MockHttpClient {
        replies: RefCell<HashMap<String, VecDeque<MockReply>>>,
        pub requests: RefCell<Vec<HttpRequest>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self {
                replies: RefCell::new(HashMap::new()),
                requests: RefCell::new(Vec::new()),
            }
        }

        fn push(&self, url: &str, reply: MockReply) {
            self.replies
                .borrow_mut()
                .entry(url.to_string())
                .or_default()
                .push_back(reply);
        }

        pub fn mock_response(&self, url: &str, status: u16, body: &str) {
            self.push(url, MockReply::Respond(status, body.to_string()));
        }

        pub fn mock_network_error(&self, url: &str) {
            self.push(url, MockReply::Fail("connection refused".to_string()));
        }

        /// 返回一个 sender，测试调用 `send((status, body))` 后请求才完成
        pub fn mock_gated(&self, url: &str) -> oneshot::Sender<(u16, String)> {
            let (tx, rx) = oneshot::channel();
            self.push(url, MockReply::Gated(rx));
            tx
        }

        pub fn request_count(&self, url: &str) -> usize {
            self.requests
                .borrow()
                .iter()
                .filter(|r| r.url == url)
                .count()
        }
    }

    #[async_trait::async_trait(?Send)]
    impl HttpClient for MockHttpClient {
        async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
            let url = req.url.clone();
            self.requests.borrow_mut().push(req);

            // borrow 不能跨越 await
            let reply = self
                .replies
                .borrow_mut()
                .get_mut(&url)
                .and_then(|q| q.pop_front());

            match reply {
                Some(MockReply::Respond(status, body)) => Ok(HttpResponse { status, body }),
                Some(MockReply::Fail(msg)) => Err(HttpError::Network(msg)),
                Some(MockReply::Gated(rx)) => match rx.await {
                    Ok((status, body)) => Ok(HttpResponse { status, body }),
                    Err(_) => Err(HttpError::Network("gate dropped".to_string())),
                },
                None => Ok(HttpResponse {
                    status: 404,
                    body: "Not Found".to_string(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success_range() {
        let ok = HttpResponse {
            status: 204,
            body: String::new(),
        };
        let redirect = HttpResponse {
            status: 302,
            body: String::new(),
        };
        let denied = HttpResponse {
            status: 401,
            body: "Bad credentials".to_string(),
        };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
        assert!(!denied.is_success());
    }

    #[test]
    fn test_with_json_sets_body_and_content_type() {
        let req = HttpRequest::new("/api/auth/login", HttpMethod::Post)
            .with_json(&serde_json::json!({ "email": "u@x.com" }))
            .unwrap()
            .with_credentials();

        assert_eq!(req.body.as_deref(), Some(r#"{"email":"u@x.com"}"#));
        assert_eq!(
            req.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert!(req.with_credentials);
    }
}
