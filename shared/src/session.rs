//! 会话与路由访问策略模块
//!
//! 纯业务逻辑层：持有会话状态的定义、Token 声明解码，
//! 以及路由守卫的决策函数。不接触浏览器存储本身，
//! 存储读写由前端注入的 SessionStore 负责。

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use std::fmt;

// =========================================================
// 角色与会话
// =========================================================

/// 客户端持有的角色标签，决定哪些视图可达
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }

    /// 从存储中的角色标签解析，未知标签视为无角色
    pub fn from_str_tag(tag: &str) -> Option<Self> {
        match tag {
            "admin" => Some(Role::Admin),
            "employee" => Some(Role::Employee),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 客户端会话状态
///
/// 不变量：`role` 仅在 `token` 存在时有意义；
/// 有 token 但角色缺失/不匹配时，对角色门控视图一律视为未认证。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<Role>,
    /// 登录时是否勾选了"记住我"（决定持久化范围）
    pub remember: bool,
}

impl Session {
    pub fn authenticated(token: String, role: Role, remember: bool) -> Self {
        Self {
            token: Some(token),
            role: Some(role),
            remember,
        }
    }

    /// 有效角色：token 与 role 同时存在才算认证
    pub fn effective_role(&self) -> Option<Role> {
        match (&self.token, self.role) {
            (Some(_), Some(role)) => Some(role),
            _ => None,
        }
    }

    pub fn is_authenticated_as(&self, role: Role) -> bool {
        self.effective_role() == Some(role)
    }
}

// =========================================================
// Token 声明解码
// =========================================================

/// 嵌在 token 中间段里的声明（JWT 形状，但 token 本身视为不透明凭据）
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TokenClaims {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Token 声明解码错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    /// token 不是 `header.payload.signature` 形状
    MalformedToken,
    /// base64 解码失败
    InvalidEncoding,
    /// 声明 JSON 缺少必需字段或无法解析
    InvalidClaims,
}

impl fmt::Display for ClaimsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimsError::MalformedToken => write!(f, "token is not in a decodable format"),
            ClaimsError::InvalidEncoding => write!(f, "token payload is not valid base64"),
            ClaimsError::InvalidClaims => write!(f, "token payload is missing expected claims"),
        }
    }
}

impl std::error::Error for ClaimsError {}

impl TokenClaims {
    /// 从 token 的中间段解码声明
    ///
    /// 容忍带 `=` 填充的 base64url 负载。
    pub fn decode(token: &str) -> Result<Self, ClaimsError> {
        let mut segments = token.split('.');
        let payload = match (segments.next(), segments.next()) {
            (Some(_), Some(payload)) if !payload.is_empty() => payload,
            _ => return Err(ClaimsError::MalformedToken),
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|_| ClaimsError::InvalidEncoding)?;

        serde_json::from_slice(&bytes).map_err(|_| ClaimsError::InvalidClaims)
    }
}

// =========================================================
// 员工身份
// =========================================================

/// 员工档案的线上字段（可能不完整）
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct EmployeeProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// `GET /api/employee/:id` 的两种形状：`{data: {...}}` 包装或裸对象
///
/// 包装分支必须排在前面，否则全可选字段的裸对象会吞掉一切输入。
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProfileResponse {
    Wrapped { data: EmployeeProfile },
    Bare(EmployeeProfile),
}

impl ProfileResponse {
    pub fn normalize(self) -> EmployeeProfile {
        match self {
            ProfileResponse::Wrapped { data } => data,
            ProfileResponse::Bare(profile) => profile,
        }
    }
}

/// 展示用身份：档案 → token 声明 → 占位值，逐级回退
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeIdentity {
    pub name: String,
    pub email: String,
}

impl EmployeeIdentity {
    pub const FALLBACK_NAME: &'static str = "Employee";

    pub fn resolve(profile: Option<&EmployeeProfile>, claims: Option<&TokenClaims>) -> Self {
        let name = profile
            .and_then(|p| p.name.clone())
            .or_else(|| claims.and_then(|c| c.name.clone()))
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| Self::FALLBACK_NAME.to_string());
        let email = profile
            .and_then(|p| p.email.clone())
            .or_else(|| claims.and_then(|c| c.email.clone()))
            .unwrap_or_default();
        Self { name, email }
    }
}

// =========================================================
// 路由访问策略
// =========================================================

/// 路由的访问要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// 任何人可达（如 404 页）
    Public,
    /// 仅持有匹配角色的已认证会话可达
    RequiresRole(Role),
    /// 某角色的登录页：已认证的同角色会话应前向跳转
    LoginFor(Role),
}

/// 守卫决策结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// 渲染目标视图
    Allow,
    /// 跳转到对应角色的登录页
    RedirectToLogin(Role),
    /// 已认证，前向跳转到对应角色的面板
    RedirectToDashboard(Role),
}

/// **核心守卫逻辑：根据访问要求与当前会话做出决策**
pub fn decide(access: RouteAccess, session: &Session) -> RouteDecision {
    match access {
        RouteAccess::Public => RouteDecision::Allow,
        RouteAccess::RequiresRole(role) => {
            if session.is_authenticated_as(role) {
                RouteDecision::Allow
            } else {
                RouteDecision::RedirectToLogin(role)
            }
        }
        RouteAccess::LoginFor(role) => {
            if session.is_authenticated_as(role) {
                RouteDecision::RedirectToDashboard(role)
            } else {
                RouteDecision::Allow
            }
        }
    }
}

// =========================================================
// 登录表单本地校验
// =========================================================

/// 登录前的本地校验错误（不触发网络请求）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    EmptyFields,
    InvalidEmail,
    PasswordTooShort,
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::EmptyFields => write!(f, "Please fill in all fields"),
            CredentialError::InvalidEmail => write!(f, "Please enter a valid email address"),
            CredentialError::PasswordTooShort => {
                write!(f, "Password must be at least 6 characters")
            }
        }
    }
}

pub const MIN_PASSWORD_LEN: usize = 6;

/// 校验凭据形状：非空、邮箱形状合理、密码达到最小长度
pub fn validate_credentials(email: &str, password: &str) -> Result<(), CredentialError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(CredentialError::EmptyFields);
    }
    if !plausible_email(email) {
        return Err(CredentialError::InvalidEmail);
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(CredentialError::PasswordTooShort);
    }
    Ok(())
}

/// 语法上说得过去的邮箱：local@domain.tld，无空白
fn plausible_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn fake_token(claims: &str) -> String {
        let payload = URL_SAFE_NO_PAD.encode(claims.as_bytes());
        format!("eyJhbGciOiJIUzI1NiJ9.{payload}.sig")
    }

    // =========================================================
    // 会话不变量
    // =========================================================

    #[test]
    fn token_without_role_is_unauthenticated() {
        let session = Session {
            token: Some("abc".to_string()),
            role: None,
            remember: false,
        };
        assert_eq!(session.effective_role(), None);
        assert!(!session.is_authenticated_as(Role::Admin));
        assert!(!session.is_authenticated_as(Role::Employee));
    }

    #[test]
    fn role_without_token_is_unauthenticated() {
        let session = Session {
            token: None,
            role: Some(Role::Admin),
            remember: true,
        };
        assert_eq!(session.effective_role(), None);
    }

    #[test]
    fn authenticated_session_has_effective_role() {
        let session = Session::authenticated("abc".to_string(), Role::Admin, false);
        assert_eq!(session.effective_role(), Some(Role::Admin));
        assert!(session.is_authenticated_as(Role::Admin));
        assert!(!session.is_authenticated_as(Role::Employee));
    }

    // =========================================================
    // 守卫决策
    // =========================================================

    #[test]
    fn admin_login_stores_session_and_employee_routes_stay_gated() {
        // 场景：用 stub 返回的 {token:"abc"} 完成管理员登录
        let session = Session::authenticated("abc".to_string(), Role::Admin, false);
        assert_eq!(session.effective_role(), Some(Role::Admin));

        // 随后访问员工专属路由必须被重定向到员工登录页
        let decision = decide(RouteAccess::RequiresRole(Role::Employee), &session);
        assert_eq!(decision, RouteDecision::RedirectToLogin(Role::Employee));
    }

    #[test]
    fn gated_route_allows_matching_role() {
        let session = Session::authenticated("abc".to_string(), Role::Employee, true);
        assert_eq!(
            decide(RouteAccess::RequiresRole(Role::Employee), &session),
            RouteDecision::Allow
        );
    }

    #[test]
    fn gated_route_redirects_anonymous_to_login() {
        let session = Session::default();
        assert_eq!(
            decide(RouteAccess::RequiresRole(Role::Admin), &session),
            RouteDecision::RedirectToLogin(Role::Admin)
        );
    }

    #[test]
    fn login_page_forwards_already_authenticated_role() {
        let session = Session::authenticated("abc".to_string(), Role::Admin, false);
        assert_eq!(
            decide(RouteAccess::LoginFor(Role::Admin), &session),
            RouteDecision::RedirectToDashboard(Role::Admin)
        );
        // 另一角色的登录页不受影响
        assert_eq!(
            decide(RouteAccess::LoginFor(Role::Employee), &session),
            RouteDecision::Allow
        );
    }

    #[test]
    fn public_route_is_always_reachable() {
        assert_eq!(
            decide(RouteAccess::Public, &Session::default()),
            RouteDecision::Allow
        );
    }

    // =========================================================
    // Token 声明解码
    // =========================================================

    #[test]
    fn decode_extracts_id_name_email() {
        let token = fake_token(r#"{"id":"emp-42","name":"Asha","email":"asha@company.com"}"#);
        let claims = TokenClaims::decode(&token).unwrap();
        assert_eq!(claims.id, "emp-42");
        assert_eq!(claims.name.as_deref(), Some("Asha"));
        assert_eq!(claims.email.as_deref(), Some("asha@company.com"));
    }

    #[test]
    fn decode_tolerates_missing_optional_claims() {
        let token = fake_token(r#"{"id":"emp-7"}"#);
        let claims = TokenClaims::decode(&token).unwrap();
        assert_eq!(claims.id, "emp-7");
        assert_eq!(claims.name, None);
        assert_eq!(claims.email, None);
    }

    #[test]
    fn decode_rejects_opaque_token() {
        assert_eq!(
            TokenClaims::decode("not-a-jwt"),
            Err(ClaimsError::MalformedToken)
        );
    }

    #[test]
    fn decode_rejects_missing_id_claim() {
        let token = fake_token(r#"{"sub":"someone"}"#);
        assert_eq!(TokenClaims::decode(&token), Err(ClaimsError::InvalidClaims));
    }

    #[test]
    fn decode_tolerates_padded_payload() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(r#"{"id":"emp-9"}"#);
        let token = format!("h.{payload}.s");
        assert_eq!(TokenClaims::decode(&token).unwrap().id, "emp-9");
    }

    // =========================================================
    // 本地凭据校验
    // =========================================================

    #[test]
    fn validation_rejects_empty_fields() {
        assert_eq!(
            validate_credentials("", "secret1"),
            Err(CredentialError::EmptyFields)
        );
        assert_eq!(
            validate_credentials("a@b.co", ""),
            Err(CredentialError::EmptyFields)
        );
    }

    #[test]
    fn validation_rejects_implausible_email() {
        for bad in ["plainaddress", "no@tld", "two@@at.com", "has space@x.co"] {
            assert_eq!(
                validate_credentials(bad, "secret1"),
                Err(CredentialError::InvalidEmail),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn validation_rejects_short_password() {
        assert_eq!(
            validate_credentials("admin@company.com", "12345"),
            Err(CredentialError::PasswordTooShort)
        );
    }

    #[test]
    fn validation_accepts_plausible_credentials() {
        assert!(validate_credentials("admin@company.com", "123456").is_ok());
    }

    // =========================================================
    // 员工身份
    // =========================================================

    #[test]
    fn profile_response_accepts_both_shapes() {
        let wrapped: ProfileResponse =
            serde_json::from_str(r#"{"data":{"name":"Asha","email":"a@c.com"}}"#).unwrap();
        assert_eq!(wrapped.normalize().name.as_deref(), Some("Asha"));

        let bare: ProfileResponse =
            serde_json::from_str(r#"{"name":"Ravi","email":"r@c.com"}"#).unwrap();
        assert_eq!(bare.normalize().email.as_deref(), Some("r@c.com"));
    }

    #[test]
    fn identity_prefers_profile_then_claims_then_placeholder() {
        let profile = EmployeeProfile {
            name: Some("Asha".to_string()),
            email: None,
        };
        let claims = TokenClaims {
            id: "emp-1".to_string(),
            name: Some("asha-claim".to_string()),
            email: Some("asha@company.com".to_string()),
        };

        let identity = EmployeeIdentity::resolve(Some(&profile), Some(&claims));
        assert_eq!(identity.name, "Asha");
        assert_eq!(identity.email, "asha@company.com");

        let identity = EmployeeIdentity::resolve(None, Some(&claims));
        assert_eq!(identity.name, "asha-claim");

        let identity = EmployeeIdentity::resolve(None, None);
        assert_eq!(identity.name, EmployeeIdentity::FALLBACK_NAME);
        assert_eq!(identity.email, "");
    }

    #[test]
    fn role_tag_round_trip() {
        assert_eq!(Role::from_str_tag("admin"), Some(Role::Admin));
        assert_eq!(Role::from_str_tag("employee"), Some(Role::Employee));
        assert_eq!(Role::from_str_tag("root"), None);
        assert_eq!(Role::Admin.as_str(), "admin");
    }
}
