//! 邮件模块
//!
//! 包含两部分：
//! - 撰写向导的纯状态机 `EmailDraft`（两步：正文 → 收件人与附件）
//! - 历史记录与分组目录的线上格式解码（在 API 边界归一化为单一形状）

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

// =========================================================
// 分组目录
// =========================================================

/// 分组目录：分组名 -> 收件人数量
///
/// 用 BTreeMap 保证渲染顺序稳定。
pub type EmailGroups = BTreeMap<String, u32>;

/// `GET /api/email/groups` 的响应形状 `{ "groups": { name: count } }`
#[derive(Debug, Clone, Deserialize)]
pub struct GroupsResponse {
    pub groups: EmailGroups,
}

// =========================================================
// 撰写向导状态机
// =========================================================

/// 向导步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    /// 第一步：主题与正文
    #[default]
    Compose,
    /// 第二步：收件分组与附件
    Recipients,
}

/// 邮件草稿
///
/// 附件的文件句柄属于视图层（web_sys::File），草稿只管理可纯测的部分。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
    pub selected_groups: Vec<String>,
    pub step: WizardStep,
}

impl EmailDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// 第一步放行条件：主题与正文都非空
    pub fn can_advance(&self) -> bool {
        !self.subject.trim().is_empty() && !self.body.trim().is_empty()
    }

    /// 手动前进到第二步；条件不满足时停在原地
    pub fn advance(&mut self) -> bool {
        if self.step == WizardStep::Compose && self.can_advance() {
            self.step = WizardStep::Recipients;
            true
        } else {
            false
        }
    }

    /// 返回第一步总是允许
    pub fn back(&mut self) {
        self.step = WizardStep::Compose;
    }

    /// 切换分组选择：再点一次即取消（幂等对）
    pub fn toggle_group(&mut self, group: &str) {
        if let Some(pos) = self.selected_groups.iter().position(|g| g == group) {
            self.selected_groups.remove(pos);
        } else {
            self.selected_groups.push(group.to_string());
        }
    }

    pub fn is_selected(&self, group: &str) -> bool {
        self.selected_groups.iter().any(|g| g == group)
    }

    /// 已选分组的收件人总数（每次切换后重算）
    pub fn total_recipients(&self, groups: &EmailGroups) -> u64 {
        self.selected_groups
            .iter()
            .map(|g| u64::from(groups.get(g).copied().unwrap_or(0)))
            .sum()
    }

    /// 提交条件：至少一个分组，且没有进行中的发送
    pub fn can_submit(&self, sending: bool) -> bool {
        !sending && !self.selected_groups.is_empty()
    }

    /// 发送成功或显式重置后回到空白第一步
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// =========================================================
// 发送响应
// =========================================================

/// `POST /api/email/send` 的成功响应
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponse {
    pub receivers_count: u64,
}

// =========================================================
// 历史记录
// =========================================================

/// 一条已发送邮件的历史记录（只读，永不本地修改）
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmailHistoryRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub subject: String,
    #[serde(default)]
    pub sent_at: String,
    #[serde(default)]
    pub sent_to_groups: Vec<String>,
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub text: String,
}

/// `GET /api/email/history` 的两种线上形状：裸数组或 `{ history: [...] }`
///
/// 其它形状在反序列化时直接失败（响亮地），不会静默当成空列表。
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HistoryResponse {
    Bare(Vec<EmailHistoryRecord>),
    Wrapped {
        history: Vec<EmailHistoryRecord>,
        #[serde(default)]
        count: Option<u64>,
    },
}

/// 归一化后的历史视图
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryView {
    pub records: Vec<EmailHistoryRecord>,
    /// 已发送总数：优先取包装形状里的 count，否则用记录条数
    pub sent_count: u64,
}

impl HistoryResponse {
    /// 在 API 边界归一化为单一形状
    pub fn normalize(self) -> HistoryView {
        match self {
            HistoryResponse::Bare(records) => {
                let sent_count = records.len() as u64;
                HistoryView {
                    records,
                    sent_count,
                }
            }
            HistoryResponse::Wrapped { history, count } => {
                let sent_count = count.unwrap_or(history.len() as u64);
                HistoryView {
                    records: history,
                    sent_count,
                }
            }
        }
    }
}

// =========================================================
// 附件类型判定
// =========================================================

/// 按扩展名判定附件的预览能力
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// 可在预览弹窗内联渲染
    Image,
    Pdf,
    /// 只提供下载
    Other,
}

impl AttachmentKind {
    pub fn classify(filename: &str) -> Self {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "bmp" | "webp" => AttachmentKind::Image,
            "pdf" => AttachmentKind::Pdf,
            _ => AttachmentKind::Other,
        }
    }

    /// 历史详情里是否提供"预览"入口（图片与 PDF；PDF 弹窗内是占位提示）
    pub fn previewable(&self) -> bool {
        matches!(self, AttachmentKind::Image | AttachmentKind::Pdf)
    }
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentKind::Image => write!(f, "image"),
            AttachmentKind::Pdf => write!(f, "pdf"),
            AttachmentKind::Other => write!(f, "file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogue() -> EmailGroups {
        let mut groups = EmailGroups::new();
        groups.insert("Engineering".to_string(), 12);
        groups.insert("HR".to_string(), 3);
        groups.insert("Sales".to_string(), 7);
        groups
    }

    // =========================================================
    // 向导状态机
    // =========================================================

    #[test]
    fn advance_requires_subject_and_body() {
        let mut draft = EmailDraft::new();
        assert!(!draft.advance());
        assert_eq!(draft.step, WizardStep::Compose);

        draft.subject = "Quarterly update".to_string();
        assert!(!draft.advance());

        draft.body = "Hello all".to_string();
        assert!(draft.advance());
        assert_eq!(draft.step, WizardStep::Recipients);
    }

    #[test]
    fn whitespace_only_fields_do_not_advance() {
        let mut draft = EmailDraft::new();
        draft.subject = "   ".to_string();
        draft.body = "\n".to_string();
        assert!(!draft.can_advance());
    }

    #[test]
    fn back_is_always_allowed() {
        let mut draft = EmailDraft::new();
        draft.subject = "s".to_string();
        draft.body = "b".to_string();
        draft.advance();
        draft.back();
        assert_eq!(draft.step, WizardStep::Compose);
        // 草稿内容保留
        assert_eq!(draft.subject, "s");
    }

    #[test]
    fn toggle_twice_restores_prior_selection() {
        let mut draft = EmailDraft::new();
        draft.toggle_group("HR");
        let before = draft.selected_groups.clone();
        draft.toggle_group("Engineering");
        draft.toggle_group("Engineering");
        assert_eq!(draft.selected_groups, before);
    }

    #[test]
    fn total_recipients_is_sum_over_selection() {
        let groups = catalogue();
        let mut draft = EmailDraft::new();
        assert_eq!(draft.total_recipients(&groups), 0);

        draft.toggle_group("Engineering");
        draft.toggle_group("Sales");
        assert_eq!(draft.total_recipients(&groups), 19);

        draft.toggle_group("Sales");
        assert_eq!(draft.total_recipients(&groups), 12);

        // 目录中不存在的分组计 0
        draft.toggle_group("Ghosts");
        assert_eq!(draft.total_recipients(&groups), 12);
    }

    #[test]
    fn submit_blocked_with_zero_groups_or_in_flight() {
        let mut draft = EmailDraft::new();
        assert!(!draft.can_submit(false));

        draft.toggle_group("HR");
        assert!(draft.can_submit(false));
        assert!(!draft.can_submit(true));
    }

    #[test]
    fn reset_clears_everything_back_to_step_one() {
        let mut draft = EmailDraft::new();
        draft.subject = "s".to_string();
        draft.body = "b".to_string();
        draft.advance();
        draft.toggle_group("HR");

        draft.reset();
        assert_eq!(draft, EmailDraft::new());
        assert_eq!(draft.step, WizardStep::Compose);
    }

    // =========================================================
    // 线上格式解码
    // =========================================================

    #[test]
    fn groups_response_decodes_name_count_map() {
        let parsed: GroupsResponse =
            serde_json::from_str(r#"{"groups":{"HR":3,"Engineering":12}}"#).unwrap();
        assert_eq!(parsed.groups.get("HR"), Some(&3));
        assert_eq!(parsed.groups.get("Engineering"), Some(&12));
    }

    #[test]
    fn history_accepts_bare_array() {
        let json = r#"[{"_id":"a1","subject":"Hi","sentAt":"2026-08-01T09:00:00Z"}]"#;
        let view = serde_json::from_str::<HistoryResponse>(json)
            .unwrap()
            .normalize();
        assert_eq!(view.records.len(), 1);
        assert_eq!(view.records[0].id, "a1");
        assert_eq!(view.sent_count, 1);
    }

    #[test]
    fn history_accepts_wrapped_array_with_count() {
        let json = r#"{"history":[{"id":"a1","subject":"Hi"},{"id":"a2","subject":"Yo"}],"count":17}"#;
        let view = serde_json::from_str::<HistoryResponse>(json)
            .unwrap()
            .normalize();
        assert_eq!(view.records.len(), 2);
        assert_eq!(view.sent_count, 17);
    }

    #[test]
    fn history_wrapped_without_count_falls_back_to_len() {
        let json = r#"{"history":[{"id":"a1","subject":"Hi"}]}"#;
        let view = serde_json::from_str::<HistoryResponse>(json)
            .unwrap()
            .normalize();
        assert_eq!(view.sent_count, 1);
    }

    #[test]
    fn history_rejects_unrecognized_shape() {
        // 既不是数组也不是 {history} 包装：必须响亮失败
        assert!(serde_json::from_str::<HistoryResponse>(r#"{"items":[]}"#).is_err());
        assert!(serde_json::from_str::<HistoryResponse>(r#""oops""#).is_err());
    }

    #[test]
    fn history_record_tolerates_missing_arrays() {
        let json = r#"{"id":"a1","subject":"Hi"}"#;
        let record: EmailHistoryRecord = serde_json::from_str(json).unwrap();
        assert!(record.to.is_empty());
        assert!(record.attachments.is_empty());
        assert!(record.sent_to_groups.is_empty());
    }

    #[test]
    fn send_response_decodes_receivers_count() {
        let parsed: SendEmailResponse = serde_json::from_str(r#"{"receiversCount":42}"#).unwrap();
        assert_eq!(parsed.receivers_count, 42);
    }

    // =========================================================
    // 附件判定
    // =========================================================

    #[test]
    fn classify_is_case_insensitive_on_extension() {
        assert_eq!(AttachmentKind::classify("photo.JPG"), AttachmentKind::Image);
        assert_eq!(AttachmentKind::classify("scan.webp"), AttachmentKind::Image);
        assert_eq!(AttachmentKind::classify("report.PDF"), AttachmentKind::Pdf);
        assert_eq!(
            AttachmentKind::classify("notes.docx"),
            AttachmentKind::Other
        );
        assert_eq!(AttachmentKind::classify("README"), AttachmentKind::Other);
    }

    #[test]
    fn only_images_and_pdfs_offer_preview() {
        assert!(AttachmentKind::Image.previewable());
        assert!(AttachmentKind::Pdf.previewable());
        assert!(!AttachmentKind::Other.previewable());
    }
}
