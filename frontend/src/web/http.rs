//! HTTP 请求封装模块
//!
//! 基于 `gloo-net` 的 fetch 实现会话核心的 `HttpClient`。

use gloo_net::http::Request;
use motodash::request::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse};
use web_sys::RequestCredentials;

/// 浏览器 fetch 客户端
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchHttpClient;

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = match req.method {
            HttpMethod::Get => Request::get(&req.url),
            HttpMethod::Post => Request::post(&req.url),
            HttpMethod::Put => Request::put(&req.url),
            HttpMethod::Delete => Request::delete(&req.url),
        };

        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        // Cookie 经代理跨域时必须显式携带
        if req.with_credentials {
            builder = builder.credentials(RequestCredentials::Include);
        }

        let request = match req.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| HttpError::RequestBuild(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::Network(e.to_string()))?;

        let status = response.status();
        // 响应体读取失败时按空字符串处理，状态码已经足够判断结果
        let body = response.text().await.unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}
