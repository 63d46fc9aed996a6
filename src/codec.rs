//! 令牌解码
//!
//! 只解析 JWT 的载荷段，不校验签名：签名由后端在每次请求时验证。
//! 所有失败都降级为“无效令牌”，不会向调用方抛出。

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use motodash_shared::date::Timestamp;
use motodash_shared::{Claims, DEFAULT_ROLE, Identity, normalize_role};
use tracing::debug;

use crate::error::TokenError;

/// 解码载荷段，返回具体的失败原因
pub fn try_decode(token: &str) -> Result<Claims, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::SegmentCount(parts.len()));
    }

    let mut payload = parts[1].to_string();
    while payload.len() % 4 != 0 {
        payload.push('=');
    }

    // JWT 使用 base64url；部分后端会输出标准字母表
    let bytes = match URL_SAFE.decode(&payload) {
        Ok(bytes) => bytes,
        Err(url_err) => STANDARD.decode(&payload).map_err(|_| url_err)?,
    };

    Ok(serde_json::from_slice(&bytes)?)
}

/// 解码载荷段，失败时记录日志并返回 `None`
pub fn decode(token: &str) -> Option<Claims> {
    match try_decode(token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            debug!(code = e.error_code(), "discarding undecodable token: {}", e);
            None
        }
    }
}

/// 令牌是否已过期
///
/// 无法解码或缺少 `exp` 时视为已过期。`now >= exp` 即过期。
pub fn is_expired(token: &str, now: Timestamp) -> bool {
    match decode(token).and_then(|claims| claims.exp) {
        Some(exp) => now >= Timestamp::from_secs(exp),
        None => true,
    }
}

/// 从令牌推导界面使用的用户信息
pub fn to_identity(token: &str) -> Option<Identity> {
    let claims = decode(token)?;
    identity_from_claims(claims)
}

/// 既没有 `sub` 也没有用户名时无法标识用户，返回 `None`
pub fn identity_from_claims(claims: Claims) -> Option<Identity> {
    let principal = claims.sub.clone().or_else(|| claims.username.clone())?;

    let name_source = claims.username.as_deref().unwrap_or(&principal);
    let display_name = match name_source.split('@').next() {
        Some(local) if !local.is_empty() => local.to_string(),
        _ => principal.clone(),
    };

    let role = claims
        .roles
        .first()
        .map(|r| normalize_role(r))
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| DEFAULT_ROLE.to_string());

    Some(Identity {
        id: principal.clone(),
        email: principal,
        display_name,
        role,
        issued_at: claims.iat,
        expires_at: claims.exp,
    })
}
