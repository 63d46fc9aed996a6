use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

pub mod date;
pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 存放会话令牌的 Cookie 名称
pub const TOKEN_COOKIE_NAME: &str = "token";
/// 后端角色名的惯用前缀，如 `ROLE_ADMIN`
pub const ROLE_PREFIX: &str = "ROLE_";
/// 令牌中没有任何角色时使用的默认角色
pub const DEFAULT_ROLE: &str = "user";
pub const ADMIN_ROLE: &str = "admin";

// =========================================================
// 时间长度 (DurationSecs)
// =========================================================

/// 以秒为单位的时间长度，序列化为纯整数
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationSecs(u64);

impl DurationSecs {
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub const fn from_mins(mins: u64) -> Self {
        Self(mins * 60)
    }

    pub const fn as_secs(&self) -> u64 {
        self.0
    }
}

impl From<DurationSecs> for Duration {
    fn from(d: DurationSecs) -> Self {
        Duration::from_secs(d.0)
    }
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 令牌载荷（JWT 的第二段）
///
/// 只描述客户端关心的字段，其余字段在反序列化时忽略。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// 主体标识，通常是邮箱
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// 原始用户名
    #[serde(
        default,
        alias = "user_name",
        alias = "preferred_username",
        skip_serializing_if = "Option::is_none"
    )]
    pub username: Option<String>,
    /// 签发时间（秒）
    #[serde(
        default,
        deserialize_with = "numeric_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub iat: Option<i64>,
    /// 过期时间（秒）
    #[serde(
        default,
        deserialize_with = "numeric_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub exp: Option<i64>,
    /// 角色列表，按后端给出的顺序；`null` 与缺失等价
    #[serde(default, deserialize_with = "null_as_empty")]
    pub roles: Vec<String>,
}

/// JWT 的 NumericDate 允许小数秒，向下取整
#[derive(Deserialize)]
#[serde(untagged)]
enum NumericDate {
    Int(i64),
    Float(f64),
}

fn numeric_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(Option::<NumericDate>::deserialize(d)?.map(|date| match date {
        NumericDate::Int(secs) => secs,
        NumericDate::Float(secs) => secs.floor() as i64,
    }))
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(d)?.unwrap_or_default())
}

/// 面向界面的用户信息，由 [`Claims`] 推导而来
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub display_name: String,
    pub email: String,
    /// 去掉前缀并转为小写的单一角色
    pub role: String,
    pub issued_at: Option<i64>,
    pub expires_at: Option<i64>,
}

impl Identity {
    /// 检查角色，忽略大小写和 `ROLE_` 前缀
    pub fn has_role(&self, role: &str) -> bool {
        normalize_role(role) == self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// 将后端角色名规范化为界面使用的形式：`ROLE_ADMIN` -> `admin`
pub fn normalize_role(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = match trimmed.get(..ROLE_PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(ROLE_PREFIX) => &trimmed[ROLE_PREFIX.len()..],
        _ => trimmed,
    };
    stripped.to_lowercase()
}
