//! Cookie 封装模块
//!
//! 使用 `web_sys::HtmlDocument` 读写 `document.cookie`，实现会话核心的 `CredentialStore`。
//! HttpOnly Cookie 对脚本不可见，读取时视为不存在。

use motodash::CredentialStore;
use wasm_bindgen::JsCast;

/// 浏览器 Cookie 存储
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieStore;

impl CookieStore {
    fn document() -> Option<web_sys::HtmlDocument> {
        web_sys::window()?.document()?.dyn_into().ok()
    }

    fn raw() -> Option<String> {
        Self::document()?.cookie().ok()
    }

    fn write(cookie: &str) {
        if let Some(doc) = Self::document() {
            // 写入失败只会发生在沙箱文档中，此时没有可用的会话
            let _ = doc.set_cookie(cookie);
        }
    }
}

impl CredentialStore for CookieStore {
    fn get(&self, name: &str) -> Option<String> {
        parse_cookie(&Self::raw()?, name)
    }

    fn set(&self, name: &str, value: &str) {
        Self::write(&format!("{name}={value}; Path=/; SameSite=Lax"));
    }

    fn clear(&self, name: &str) {
        Self::write(&format!(
            "{name}=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT"
        ));
    }
}

/// 从 `a=1; b=2` 形式的字符串中取出指定 Cookie
///
/// 空值视为不存在。
pub fn parse_cookie(raw: &str, name: &str) -> Option<String> {
    raw.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookie_finds_named_value() {
        let raw = "theme=dark; token=aaa.bbb.ccc; lang=en";
        assert_eq!(parse_cookie(raw, "token").as_deref(), Some("aaa.bbb.ccc"));
        assert_eq!(parse_cookie(raw, "lang").as_deref(), Some("en"));
    }

    #[test]
    fn test_parse_cookie_missing_or_empty() {
        assert_eq!(parse_cookie("", "token"), None);
        assert_eq!(parse_cookie("theme=dark", "token"), None);
        assert_eq!(parse_cookie("token=; theme=dark", "token"), None);
    }

    #[test]
    fn test_parse_cookie_exact_name() {
        // 前缀相同的名字不能误匹配
        let raw = "token_old=stale; token=fresh";
        assert_eq!(parse_cookie(raw, "token").as_deref(), Some("fresh"));
        assert_eq!(parse_cookie("xtoken=1", "token"), None);
    }

    #[test]
    fn test_parse_cookie_keeps_equals_in_value() {
        let raw = "token=abc==";
        assert_eq!(parse_cookie(raw, "token").as_deref(), Some("abc=="));
    }
}
