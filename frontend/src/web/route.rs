//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其角色访问要求。

use std::fmt::Display;

use ems_shared::{Role, RouteAccess};

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 管理员登录页面 (默认路由)
    #[default]
    AdminLogin,
    /// 员工登录页面
    EmployeeLogin,
    /// 管理员控制面板 (需要管理员角色)
    Dashboard,
    /// 邮件群发页面 (需要管理员角色)
    SendEmail,
    /// 员工面板 (需要员工角色)
    EmployeeDashboard,
    /// 员工考勤页面 (需要员工角色)
    Attendance,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" => Self::AdminLogin,
            "/emplogin" => Self::EmployeeLogin,
            "/dashboard" => Self::Dashboard,
            "/send" => Self::SendEmail,
            "/empdashboard" => Self::EmployeeDashboard,
            "/empattendance" => Self::Attendance,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::AdminLogin => "/",
            Self::EmployeeLogin => "/emplogin",
            Self::Dashboard => "/dashboard",
            Self::SendEmail => "/send",
            Self::EmployeeDashboard => "/empdashboard",
            Self::Attendance => "/empattendance",
            Self::NotFound => "/404",
        }
    }

    /// **核心守卫逻辑：定义该路由的访问要求**
    pub fn access(&self) -> RouteAccess {
        match self {
            Self::AdminLogin => RouteAccess::LoginFor(Role::Admin),
            Self::EmployeeLogin => RouteAccess::LoginFor(Role::Employee),
            Self::Dashboard | Self::SendEmail => RouteAccess::RequiresRole(Role::Admin),
            Self::EmployeeDashboard | Self::Attendance => {
                RouteAccess::RequiresRole(Role::Employee)
            }
            Self::NotFound => RouteAccess::Public,
        }
    }

    /// 获取指定角色的登录页路由
    pub fn login_for(role: Role) -> Self {
        match role {
            Role::Admin => Self::AdminLogin,
            Role::Employee => Self::EmployeeLogin,
        }
    }

    /// 获取指定角色的面板路由
    pub fn dashboard_for(role: Role) -> Self {
        match role {
            Role::Admin => Self::Dashboard,
            Role::Employee => Self::EmployeeDashboard,
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
