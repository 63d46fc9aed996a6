//! 令牌存储抽象
//!
//! 浏览器中由 Cookie 实现，测试和非浏览器宿主使用 [`MemoryStore`]。

use std::cell::RefCell;
use std::collections::HashMap;

/// 按名称读写字符串凭据的存储
///
/// 只有会话管理器会写入；读取失败一律视为不存在。
pub trait CredentialStore {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&self, name: &str, value: &str);
    fn clear(&self, name: &str);
}

/// 进程内存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(name: &str, value: &str) -> Self {
        let store = Self::new();
        store.set(name, value);
        store
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.borrow().contains_key(name)
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, name: &str) -> Option<String> {
        self.map.borrow().get(name).cloned()
    }

    fn set(&self, name: &str, value: &str) {
        self.map
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn clear(&self, name: &str) {
        self.map.borrow_mut().remove(name);
    }
}

impl<T: CredentialStore + ?Sized> CredentialStore for std::rc::Rc<T> {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }

    fn set(&self, name: &str, value: &str) {
        (**self).set(name, value)
    }

    fn clear(&self, name: &str) {
        (**self).clear(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_set_get_clear() {
        let store = MemoryStore::new();
        assert_eq!(store.get("token"), None);

        store.set("token", "a.b.c");
        assert_eq!(store.get("token").as_deref(), Some("a.b.c"));

        store.set("token", "d.e.f");
        assert_eq!(store.get("token").as_deref(), Some("d.e.f"));

        store.clear("token");
        assert!(!store.contains("token"));
    }

    #[test]
    fn test_clear_missing_key_is_noop() {
        let store = MemoryStore::with("other", "x");
        store.clear("token");
        assert_eq!(store.get("other").as_deref(), Some("x"));
    }
}
