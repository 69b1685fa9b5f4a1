//! EMS 控制台前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型，含角色访问要求）
//! - `web::router`: 路由服务（核心引擎，注入会话信号实现守卫）
//! - `auth`: 会话状态管理（注入式 SessionStore）
//! - `api`: 后端 REST 客户端
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod attendance;
    pub mod dashboard;
    pub mod emp_dashboard;
    mod icons;
    pub mod login;
    pub mod send_email;
}

use crate::auth::{AuthContext, init_auth};
use crate::components::attendance::AttendancePage;
use crate::components::dashboard::DashboardPage;
use crate::components::emp_dashboard::EmpDashboardPage;
use crate::components::login::LoginPage;
use crate::components::send_email::SendEmailPage;
use ems_shared::Role;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 对 History / Storage / 定时器的操作都集中在此，组件层不直接碰 window。
pub(crate) mod web {
    pub mod route;
    pub mod router;
    mod storage;
    mod timer;

    pub use storage::{LocalStorage, SessionStorage};
    pub use timer::{Clock, Interval};
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::AdminLogin => view! { <LoginPage role=Role::Admin /> }.into_any(),
        AppRoute::EmployeeLogin => view! { <LoginPage role=Role::Employee /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::SendEmail => view! { <SendEmailPage /> }.into_any(),
        AppRoute::EmployeeDashboard => view! { <EmpDashboardPage /> }.into_any(),
        AppRoute::Attendance => view! { <AttendancePage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page Not Found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文（注入 SessionStore）
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 恢复持久化的会话（记住我 → LocalStorage，否则 SessionStorage）
    init_auth(&auth_ctx);

    // 3. 获取会话信号，用于注入路由服务（解耦！）
    let session = auth_ctx.session_signal();

    view! {
        // 4. 路由器组件：注入会话信号实现角色守卫
        <Router session=session>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
