//! 会话管理
//!
//! 会话是存储中令牌的投影：启动时、登录成功后和登出时重新推导，本身不持久化。
//! 周期检查只会降级。只有这里会清除存储中的令牌。
//!
//! 单线程协作式模型：除网络请求和登录后的结算延迟外，所有操作都是同步的。

use motodash_shared::Identity;
use motodash_shared::date::Timestamp;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::api::AuthApi;
use crate::codec;
use crate::config::SessionConfig;
use crate::error::AuthError;
use crate::platform::Platform;
use crate::request::HttpClient;
use crate::store::CredentialStore;


// =========================================================
// 会话快照
// =========================================================

/// 会话所处的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// 首次从令牌加载完成之前
    Initializing,
    Anonymous,
    Authenticated,
    /// 登录请求进行中
    LoggingIn,
}

/// 界面读取的会话状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub identity: Option<Identity>,
    /// 为 true 时 `identity` 一定存在
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub is_initializing: bool,
    pub last_error: Option<String>,
}

impl Session {
    /// 管理器启动前的初始状态
    pub fn initializing() -> Self {
        Self {
            is_initializing: true,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.is_initializing {
            SessionPhase::Initializing
        } else if self.is_loading {
            SessionPhase::LoggingIn
        } else if self.is_authenticated {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }

    fn set_identity(&mut self, identity: Option<Identity>) {
        self.is_authenticated = identity.is_some();
        self.identity = identity;
    }
}

// =========================================================
// 会话管理器
// =========================================================

type Listener = Box<dyn Fn(&Session)>;

struct Inner<S, C, P: Platform> {
    config: SessionConfig,
    store: S,
    api: AuthApi<C>,
    platform: P,
    session: RefCell<Session>,
    /// 周期检查定时器，drop 即取消
    ticker: RefCell<Option<P::Interval>>,
    /// 每次登录或登出加一，用来识别过期的登录结果
    epoch: Cell<u64>,
    /// 最近一次登出时的 epoch
    logout_epoch: Cell<u64>,
    listeners: RefCell<Vec<Listener>>,
}

/// 会话管理器
///
/// 克隆得到的是同一个管理器的句柄。最后一个句柄被 drop 时定时器随之释放。
pub struct SessionManager<S, C, P: Platform> {
    inner: Rc<Inner<S, C, P>>,
}

impl<S, C, P: Platform> Clone for SessionManager<S, C, P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S, C, P> SessionManager<S, C, P>
where
    S: CredentialStore + 'static,
    C: HttpClient + 'static,
    P: Platform + 'static,
{
    pub fn new(config: SessionConfig, store: S, client: C, platform: P) -> Self {
        let api = AuthApi::new(&config.api_base, client);
        Self {
            inner: Rc::new(Inner {
                config,
                store,
                api,
                platform,
                session: RefCell::new(Session::initializing()),
                ticker: RefCell::new(None),
                epoch: Cell::new(0),
                logout_epoch: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// 当前会话的副本
    pub fn snapshot(&self) -> Session {
        self.inner.session.borrow().clone()
    }

    /// 周期检查是否在运行
    pub fn is_running(&self) -> bool {
        self.inner.ticker.borrow().is_some()
    }

    /// 注册监听器，每次会话发生变化后以新快照调用
    ///
    /// 监听器内不能再调用 `subscribe`。
    pub fn subscribe(&self, listener: impl Fn(&Session) + 'static) {
        self.inner.listeners.borrow_mut().push(Box::new(listener));
    }

    // --- 生命周期 ---

    /// 从令牌加载一次会话，然后启动周期检查
    ///
    /// 重复调用会替换掉之前的定时器。
    pub fn start(&self) {
        self.update(|s| s.is_initializing = true);
        self.load_from_token();
        self.update(|s| s.is_initializing = false);

        let weak = Rc::downgrade(&self.inner);
        let period = Duration::from(self.inner.config.check_interval);
        let handle = self.inner.platform.interval(
            period,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    SessionManager { inner }.check_expiry();
                }
            }),
        );

        let previous = self.inner.ticker.replace(Some(handle));
        drop(previous);
        debug!(period_secs = period.as_secs(), "session check timer armed");
    }

    /// 停止周期检查
    pub fn stop(&self) {
        let handle = self.inner.ticker.borrow_mut().take();
        if handle.is_some() {
            debug!("session check timer stopped");
        }
        drop(handle);
    }

    // --- 会话推导 ---

    /// 从存储中的令牌重新推导会话
    ///
    /// 令牌不存在、已过期（同时清除）或无法得到用户信息时进入匿名状态。
    pub fn load_from_token(&self) -> Option<Identity> {
        let name = self.inner.config.token_cookie.as_str();

        let identity = match self.inner.store.get(name) {
            None => None,
            Some(token) if codec::is_expired(&token, self.inner.platform.now()) => {
                info!("stored token is expired or unreadable, clearing it");
                self.inner.store.clear(name);
                None
            }
            Some(token) => {
                let identity = codec::to_identity(&token);
                if identity.is_none() {
                    warn!("unexpired token carries no usable identity");
                }
                identity
            }
        };

        self.update(|s| s.set_identity(identity.clone()));
        identity
    }

    /// `load_from_token` 的别名，供“刷新当前用户”使用
    pub fn current_user(&self) -> Option<Identity> {
        self.load_from_token()
    }

    /// 周期检查：只会降级，不会把匿名会话提升为已认证
    fn check_expiry(&self) {
        let name = self.inner.config.token_cookie.as_str();
        let still_valid = match self.inner.store.get(name) {
            None => false,
            Some(token) if codec::is_expired(&token, self.inner.platform.now()) => {
                info!("stored token expired, clearing it");
                self.inner.store.clear(name);
                false
            }
            Some(_) => true,
        };

        let was_authenticated = self.inner.session.borrow().is_authenticated;
        if !still_valid && was_authenticated {
            info!("session no longer valid, demoted to anonymous");
            self.update(|s| s.set_identity(None));
        }
    }

    // --- 登录 / 登出 ---

    /// 登录
    ///
    /// 成功时后端通过 Set-Cookie 写入令牌；等待结算延迟后重新读取令牌。
    /// 错误只体现在返回值和 `last_error` 中。
    ///
    /// 多个登录重叠时以最后发起的那次为准，而不是最后完成的那次。
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let attempt = self.next_epoch();
        self.update(|s| {
            s.is_loading = true;
            s.last_error = None;
        });
        debug!(attempt, "login started");

        let result = self.perform_login(attempt, email, password).await;

        if !self.is_current(attempt) {
            debug!(attempt, "login result superseded, discarding");
            // 之后没有新的登录：迟到响应写入的 Cookie 不能留下
            if self.inner.logout_epoch.get() == self.inner.epoch.get() {
                self.inner.store.clear(&self.inner.config.token_cookie);
            }
            return Err(AuthError::Superseded);
        }

        match &result {
            Ok(identity) => {
                match identity.expires_at.map(Timestamp::from_secs) {
                    Some(exp) => info!(
                        role = %identity.role,
                        expires_at = %exp,
                        remaining_secs = (exp - self.inner.platform.now()).as_secs(),
                        "login succeeded"
                    ),
                    None => info!(role = %identity.role, "login succeeded"),
                }
                self.update(|s| s.is_loading = false);
            }
            Err(e) => {
                warn!(code = e.error_code(), error = ?e, "login failed");
                let message = e.to_string();
                self.update(|s| {
                    s.is_loading = false;
                    s.set_identity(None);
                    s.last_error = Some(message);
                });
            }
        }
        result
    }

    async fn perform_login(
        &self,
        attempt: u64,
        email: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        self.inner.api.login(email, password).await?;

        self.inner
            .platform
            .sleep(self.inner.config.settle_delay())
            .await;

        // 结算期间发生了登出或新的登录，不能再写会话
        if !self.is_current(attempt) {
            return Err(AuthError::Superseded);
        }

        self.load_from_token().ok_or(AuthError::TokenUnreadable)
    }

    /// 登出
    ///
    /// 后端请求只是尽力而为：无论结果如何，本地会话和令牌都会被清除。
    pub async fn logout(&self) {
        let epoch = self.next_epoch();
        self.inner.logout_epoch.set(epoch);

        if let Err(e) = self.inner.api.logout().await {
            debug!(code = e.error_code(), error = ?e, "logout request failed, clearing locally");
        }

        self.update(|s| {
            s.set_identity(None);
            s.is_loading = false;
        });
        self.inner.store.clear(&self.inner.config.token_cookie);
        info!("logged out");
    }

    // --- 内部工具 ---

    fn next_epoch(&self) -> u64 {
        let next = self.inner.epoch.get() + 1;
        self.inner.epoch.set(next);
        next
    }

    fn is_current(&self, attempt: u64) -> bool {
        self.inner.epoch.get() == attempt
    }

    /// 修改会话；有变化时通知监听器
    fn update(&self, f: impl FnOnce(&mut Session)) {
        let snapshot = {
            let mut session = self.inner.session.borrow_mut();
            let before = session.clone();
            f(&mut session);
            if *session == before {
                return;
            }
            session.clone()
        };

        for listener in self.inner.listeners.borrow().iter() {
            listener(&snapshot);
        }
    }
}
