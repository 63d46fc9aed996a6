//! 认证模块
//!
//! 把会话管理器挂到 Leptos 的 Context 上：管理器的每次变化写入信号，
//! 组件只读信号，操作经由 `AuthContext` 转发给管理器。

use crate::web::{BrowserPlatform, CookieStore, FetchHttpClient};
use leptos::prelude::*;
use leptos::task::spawn_local;
use motodash::{AuthError, Identity, Session, SessionConfig, SessionManager};

/// 浏览器中使用的会话管理器
pub type BrowserSessionManager = SessionManager<CookieStore, FetchHttpClient, BrowserPlatform>;

/// 认证上下文
///
/// 通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 会话状态（只读）
    pub state: ReadSignal<Session>,
    manager: StoredValue<BrowserSessionManager, LocalStorage>,
}

impl AuthContext {
    /// 获取认证状态信号（用于路由守卫）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().is_authenticated)
    }

    /// 当前用户
    pub fn identity(&self) -> Signal<Option<Identity>> {
        let state = self.state;
        Signal::derive(move || state.get().identity)
    }

    /// 当前用户是否具有指定角色，接受 `ROLE_ADMIN` / `admin` 两种写法
    pub fn has_role(&self, role: &'static str) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || {
            state.with(|s| s.identity.as_ref().is_some_and(|i| i.has_role(role)))
        })
    }

    /// 登录；错误同时写入 `state.last_error`
    pub async fn login(&self, email: String, password: String) -> Result<Identity, AuthError> {
        let manager = self.manager.get_value();
        manager.login(&email, &password).await
    }

    /// 注销，后台完成
    pub fn logout(&self) {
        let manager = self.manager.get_value();
        spawn_local(async move {
            manager.logout().await;
        });
    }

    /// 立即按当前 Cookie 重新推导会话
    pub fn refresh(&self) -> Option<Identity> {
        self.manager.with_value(|m| m.current_user())
    }
}

/// 创建会话管理器并注入 Context
///
/// 当前 Owner 被清理时停止周期检查。
pub fn provide_auth(config: SessionConfig) -> AuthContext {
    let manager = BrowserSessionManager::new(
        config,
        CookieStore,
        FetchHttpClient,
        BrowserPlatform,
    );

    let (state, set_state) = signal(manager.snapshot());
    manager.subscribe(move |session| {
        // 信号已随 Owner 释放时忽略
        let _ = set_state.try_set(session.clone());
    });
    manager.start();

    let ctx = AuthContext {
        state,
        manager: StoredValue::new_local(manager),
    };
    provide_context(ctx);

    let stored = ctx.manager;
    on_cleanup(move || {
        stored.try_with_value(|m| m.stop());
    });

    ctx
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}
