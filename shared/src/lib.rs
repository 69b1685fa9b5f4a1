//! EMS 共享领域模型
//!
//! 前端与测试共用的纯逻辑层，不依赖 DOM 或 web_sys：
//! - `session`: 会话、角色与路由访问策略
//! - `greeting`: 按小时分段的问候语
//! - `email`: 邮件草稿向导状态机与历史记录解码
//! - `pagination`: 客户端分页计算
//! - `attendance`: 模拟考勤生成（可注入随机源）
//! - `date`: 展示用日期/时间格式化

pub mod attendance;
pub mod date;
pub mod email;
pub mod greeting;
pub mod pagination;
pub mod session;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 默认后端地址（部署默认值，可被 LocalStorage 覆盖）
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// 统一存储键方案（取代原先 token/adminToken/empToken 混用）
pub const STORAGE_TOKEN_KEY: &str = "ems_token";
pub const STORAGE_ROLE_KEY: &str = "ems_role";
pub const STORAGE_EMAIL_KEY: &str = "ems_email";
pub const STORAGE_API_URL_KEY: &str = "ems_api_url";

/// 历史记录每页条数（客户端分页）
pub const HISTORY_PAGE_SIZE: usize = 10;

pub use email::{
    AttachmentKind, EmailDraft, EmailGroups, EmailHistoryRecord, GroupsResponse, HistoryView,
    SendEmailResponse, WizardStep,
};
pub use session::{
    EmployeeIdentity, EmployeeProfile, ProfileResponse, Role, RouteAccess, RouteDecision, Session,
    TokenClaims,
};
