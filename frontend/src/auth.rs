//! 认证模块
//!
//! 管理登录会话状态，与路由系统解耦。
//! 路由服务通过注入的会话信号按角色执行守卫。
//! 持久化策略："记住我" 走 LocalStorage，否则走 SessionStorage。

use leptos::prelude::*;

use ems_shared::session::validate_credentials;
use ems_shared::{
    Role, Session, STORAGE_EMAIL_KEY, STORAGE_ROLE_KEY, STORAGE_TOKEN_KEY,
};

use crate::api::EmsApi;
use crate::web::{LocalStorage, SessionStorage};

/// 会话持久化存储
///
/// 统一封装两个存储作用域。写入只进其中一个，清除两个都擦，
/// 避免旧会话残留在另一个作用域里。
pub struct SessionStore;

impl SessionStore {
    /// 恢复持久化的会话
    ///
    /// 先查 LocalStorage（记住我），再查 SessionStorage。
    /// token 和角色必须同时存在才算有效会话。
    pub fn load() -> Session {
        if let (Some(token), Some(role)) = (
            LocalStorage::get(STORAGE_TOKEN_KEY),
            LocalStorage::get(STORAGE_ROLE_KEY).and_then(|t| Role::from_str_tag(&t)),
        ) {
            return Session::authenticated(token, role, true);
        }
        if let (Some(token), Some(role)) = (
            SessionStorage::get(STORAGE_TOKEN_KEY),
            SessionStorage::get(STORAGE_ROLE_KEY).and_then(|t| Role::from_str_tag(&t)),
        ) {
            return Session::authenticated(token, role, false);
        }
        Session::default()
    }

    /// 持久化会话到对应作用域
    pub fn persist(session: &Session) {
        let (Some(token), Some(role)) = (&session.token, session.role) else {
            return;
        };
        if session.remember {
            LocalStorage::set(STORAGE_TOKEN_KEY, token);
            LocalStorage::set(STORAGE_ROLE_KEY, role.as_str());
        } else {
            SessionStorage::set(STORAGE_TOKEN_KEY, token);
            SessionStorage::set(STORAGE_ROLE_KEY, role.as_str());
        }
    }

    /// 清除两个作用域的会话数据
    pub fn clear() {
        LocalStorage::delete(STORAGE_TOKEN_KEY);
        LocalStorage::delete(STORAGE_ROLE_KEY);
        SessionStorage::delete(STORAGE_TOKEN_KEY);
        SessionStorage::delete(STORAGE_ROLE_KEY);
    }

    /// 记住的登录邮箱（仅用于表单自动填充）
    pub fn remembered_email() -> Option<String> {
        LocalStorage::get(STORAGE_EMAIL_KEY)
    }

    pub fn remember_email(email: &str) {
        LocalStorage::set(STORAGE_EMAIL_KEY, email);
    }

    pub fn forget_email() {
        LocalStorage::delete(STORAGE_EMAIL_KEY);
    }
}

/// 认证状态
#[derive(Clone, Default)]
pub struct AuthState {
    /// 当前会话
    pub session: Session,
    /// 是否正在执行登录请求
    pub is_loading: bool,
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthState>,
    /// 设置认证状态（写入）
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    /// 创建新的认证上下文
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState::default());
        Self { state, set_state }
    }

    /// 获取会话信号（用于路由服务注入）
    pub fn session_signal(&self) -> Signal<Session> {
        let state = self.state;
        Signal::derive(move || state.get().session)
    }

    /// 用当前会话的 token 构造 API 客户端
    pub fn api(&self) -> EmsApi {
        EmsApi::new(self.state.get_untracked().session.token.clone())
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 从持久化存储恢复上次的会话。路由服务会根据恢复后的
/// 会话信号自动落到正确的页面。
pub fn init_auth(ctx: &AuthContext) {
    let session = SessionStore::load();
    ctx.set_state.update(|state| {
        state.session = session;
        state.is_loading = false;
    });
}

/// 登录并保存会话
///
/// 先做本地校验（空字段、邮箱格式、密码长度），不通过则不发请求。
///
/// # Returns
/// 失败时返回面向用户的错误文案
pub async fn login(
    ctx: &AuthContext,
    role: Role,
    email: &str,
    password: &str,
    remember: bool,
) -> Result<(), String> {
    validate_credentials(email, password).map_err(|e| e.to_string())?;

    ctx.set_state.update(|state| state.is_loading = true);

    let api = EmsApi::new(None);
    let result = api.login(role, email, password).await;

    match result {
        Ok(token) => {
            let session = Session::authenticated(token, role, remember);
            SessionStore::persist(&session);
            if remember {
                SessionStore::remember_email(email);
            } else {
                SessionStore::forget_email();
            }

            ctx.set_state.update(|state| {
                state.session = session;
                state.is_loading = false;
            });
            Ok(())
        }
        Err(err) => {
            ctx.set_state.update(|state| state.is_loading = false);
            Err(err.user_message())
        }
    }
}

/// 注销并清除会话
///
/// 导航将由路由服务的会话状态监听自动处理。
pub fn logout(ctx: &AuthContext) {
    SessionStore::clear();
    ctx.set_state.update(|state| {
        state.session = Session::default();
        state.is_loading = false;
    });
    // 注意：不需要手动导航，路由服务会监听会话变化并自动重定向
}

/// 会话过期处理（收到 401 时调用）
///
/// 与注销等价，单独命名以便调用处表达意图。
pub fn expire_session(ctx: &AuthContext) {
    web_sys::console::warn_1(&"[Auth] Session expired, clearing credentials.".into());
    logout(ctx);
}
