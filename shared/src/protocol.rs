use serde::{Deserialize, Serialize};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// A trait that defines the endpoint metadata for an API request body.
pub trait ApiRequest: Serialize {
    /// The URL path (or suffix).
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
}

// =========================================================
// Request Definitions
// =========================================================

/// Exchange credentials for a session cookie.
///
/// The backend answers with `Set-Cookie: token=...`; the body carries nothing
/// the client relies on.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    const PATH: &'static str = "/api/auth/login";
    const METHOD: HttpMethod = HttpMethod::Post;
}

// Password stays out of logs.
impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Invalidate the session cookie on the backend.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LogoutRequest;

impl ApiRequest for LogoutRequest {
    const PATH: &'static str = "/api/auth/logout";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_wire_format() {
        let req = LoginRequest {
            email: "u@x.com".to_string(),
            password: "pw".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({ "email": "u@x.com", "password": "pw" }));
        assert_eq!(LoginRequest::PATH, "/api/auth/login");
        assert_eq!(LoginRequest::METHOD, HttpMethod::Post);
    }

    #[test]
    fn test_login_request_debug_redacts_password() {
        let req = LoginRequest {
            email: "u@x.com".to_string(),
            password: "hunter2".to_string(),
        };
        let shown = format!("{:?}", req);
        assert!(shown.contains("u@x.com"));
        assert!(!shown.contains("hunter2"));
    }
}
