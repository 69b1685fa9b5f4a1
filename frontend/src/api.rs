//! 后端 REST 客户端
//!
//! 所有 HTTP 请求都集中在此模块，组件层只消费强类型结果。
//! 错误按状态码归类，401 由调用方统一走会话过期流程。

use futures::FutureExt;
use gloo_net::http::{Request, RequestBuilder, Response};
use gloo_timers::future::TimeoutFuture;
use serde::Deserialize;
use serde::Serialize;

use ems_shared::{
    EmailDraft, GroupsResponse, HistoryView, ProfileResponse, Role, SendEmailResponse,
    DEFAULT_API_BASE, STORAGE_API_URL_KEY,
};

use crate::web::LocalStorage;

/// 员工资料请求超时（毫秒）
const PROFILE_TIMEOUT_MS: u32 = 5_000;

/// API 错误分类
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiError {
    /// 401：凭据无效或会话过期
    Unauthorized,
    /// 403：权限不足
    Forbidden,
    /// 429：请求过于频繁
    RateLimited,
    /// 网络层失败（无法连接、超时等）
    Network(String),
    /// 响应体无法按预期解码
    Decode(String),
    /// 其他非 2xx 状态
    Server { status: u16, message: String },
}

impl ApiError {
    /// 面向用户的提示文案
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized => "Invalid email or password".to_string(),
            Self::Forbidden => "You are not authorized to perform this action.".to_string(),
            Self::RateLimited => "Too many attempts. Please try again later.".to_string(),
            Self::Network(_) => "Cannot reach the server. Check your connection.".to_string(),
            Self::Decode(_) => "Received an unexpected response from the server.".to_string(),
            Self::Server { message, .. } if !message.is_empty() => message.clone(),
            Self::Server { status, .. } => format!("Request failed with status {status}"),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::RateLimited => write!(f, "rate limited"),
            Self::Network(e) => write!(f, "network error: {e}"),
            Self::Decode(e) => write!(f, "decode error: {e}"),
            Self::Server { status, message } => write!(f, "server error {status}: {message}"),
        }
    }
}

/// 后端错误响应体
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// 登录请求体
#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// 登录响应体
#[derive(Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

/// EMS 后端客户端
#[derive(Clone, Debug, PartialEq)]
pub struct EmsApi {
    pub base_url: String,
    token: Option<String>,
}

impl EmsApi {
    /// 创建客户端
    ///
    /// 后端地址优先取 LocalStorage 覆盖值，否则用部署默认值。
    pub fn new(token: Option<String>) -> Self {
        let base_url = LocalStorage::get(STORAGE_API_URL_KEY)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { base_url, token }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    // 认证头（统一 Bearer 方案）
    fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
            None => builder,
        }
    }

    /// 把非 2xx 响应转换为分类错误
    async fn classify_error(res: Response) -> ApiError {
        let status = res.status();
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            429 => ApiError::RateLimited,
            _ => {
                let message = res
                    .json::<ErrorBody>()
                    .await
                    .map(|b| b.message)
                    .unwrap_or_default();
                ApiError::Server { status, message }
            }
        }
    }

    /// 登录（两个角色走不同端点，响应结构相同）
    ///
    /// 成功时返回 token；响应缺少 token 字段视为解码失败。
    pub async fn login(
        &self,
        role: Role,
        email: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        let path = match role {
            Role::Admin => "/api/auth/login",
            Role::Employee => "/api/employee/emplogin",
        };
        let body = LoginRequest { email, password };
        let res = Request::post(&self.url(path))
            .header("Content-Type", "application/json")
            .json(&body)
            .map_err(|e| ApiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !res.ok() {
            return Err(Self::classify_error(res).await);
        }

        let parsed = res
            .json::<LoginResponse>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        parsed
            .token
            .ok_or_else(|| ApiError::Decode("login response missing token".to_string()))
    }

    /// 获取员工资料
    ///
    /// 与 5 秒超时赛跑，超时按网络错误处理。
    pub async fn employee_profile(&self, id: &str) -> Result<ProfileResponse, ApiError> {
        let url = self.url(&format!("/api/employee/{id}"));
        let builder = self.with_auth(Request::get(&url));
        let request = async move {
            let res = builder
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            if !res.ok() {
                return Err(Self::classify_error(res).await);
            }
            res.json::<ProfileResponse>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()))
        };

        futures::select! {
            res = Box::pin(request).fuse() => res,
            _ = TimeoutFuture::new(PROFILE_TIMEOUT_MS).fuse() => {
                Err(ApiError::Network("profile request timed out".to_string()))
            }
        }
    }

    /// 获取收件人分组及人数
    pub async fn email_groups(&self) -> Result<GroupsResponse, ApiError> {
        let res = self
            .with_auth(Request::get(&self.url("/api/email/groups")))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !res.ok() {
            return Err(Self::classify_error(res).await);
        }

        res.json::<GroupsResponse>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// 获取发送历史
    ///
    /// 响应可能是裸数组或带 history 字段的对象，统一归一化。
    pub async fn email_history(&self) -> Result<HistoryView, ApiError> {
        let res = self
            .with_auth(Request::get(&self.url("/api/email/history")))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !res.ok() {
            return Err(Self::classify_error(res).await);
        }

        let parsed = res
            .json::<ems_shared::email::HistoryResponse>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(parsed.normalize())
    }

    /// 发送群发邮件（multipart 表单）
    ///
    /// 字段名与后端约定一致：subject / text / selectedGroups[] / attachments。
    pub async fn send_email(
        &self,
        draft: &EmailDraft,
        attachments: &[web_sys::File],
    ) -> Result<SendEmailResponse, ApiError> {
        let form = web_sys::FormData::new()
            .map_err(|_| ApiError::Network("failed to build form data".to_string()))?;
        form.append_with_str("subject", draft.subject.trim())
            .map_err(|_| ApiError::Network("failed to build form data".to_string()))?;
        form.append_with_str("text", draft.body.trim())
            .map_err(|_| ApiError::Network("failed to build form data".to_string()))?;
        for group in &draft.selected_groups {
            form.append_with_str("selectedGroups[]", group)
                .map_err(|_| ApiError::Network("failed to build form data".to_string()))?;
        }
        for file in attachments {
            form.append_with_blob_and_filename("attachments", file, &file.name())
                .map_err(|_| ApiError::Network("failed to build form data".to_string()))?;
        }

        let res = self
            .with_auth(Request::post(&self.url("/api/email/send")))
            .body(form)
            .map_err(|e| ApiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !res.ok() {
            return Err(Self::classify_error(res).await);
        }

        res.json::<SendEmailResponse>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// 附件静态文件地址
    ///
    /// 文件名可能带空格或 # 等字符，作为路径分段编码。
    pub fn attachment_url(&self, record_id: &str, filename: &str) -> String {
        let encoded = String::from(js_sys::encode_uri_component(filename));
        self.url(&format!("/uploads/{record_id}/{encoded}"))
    }
}
