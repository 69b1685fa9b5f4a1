//! 撰写向导的表单状态模块
//!
//! 将零散的 signal 整合为 `ComposerState` 结构体，负责：
//! - 草稿状态机（共享层的 `EmailDraft`）的持有
//! - 附件文件句柄（`web_sys::File` 属于视图层，不进共享层）
//! - 发送进行中标志与结果提示

use ems_shared::{EmailDraft, EmailGroups};
use leptos::prelude::*;

/// 撰写向导状态结构体
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，非常适合作为 Props 在组件间传递。
#[derive(Clone, Copy)]
pub struct ComposerState {
    /// 草稿（主题、正文、已选分组、当前步骤）
    pub draft: RwSignal<EmailDraft>,
    /// 待上传的附件文件句柄
    pub attachments: RwSignal<Vec<web_sys::File>>,
    /// 分组目录（名称 -> 人数），挂载后从后端加载
    pub groups: RwSignal<EmailGroups>,
    /// 发送请求进行中
    pub sending: RwSignal<bool>,
    /// 结果提示（文案, 是否出错）
    pub status: RwSignal<Option<(String, bool)>>,
}

impl ComposerState {
    pub fn new() -> Self {
        Self {
            draft: RwSignal::new(EmailDraft::new()),
            attachments: RwSignal::new(Vec::new()),
            groups: RwSignal::new(EmailGroups::new()),
            sending: RwSignal::new(false),
            status: RwSignal::new(None),
        }
    }

    /// 发送成功后回到空白第一步；分组目录保留
    pub fn reset_draft(&self) {
        self.draft.update(|d| d.reset());
        self.attachments.set(Vec::new());
    }

    /// 追加文件选择器选中的文件
    pub fn add_files(&self, files: Option<web_sys::FileList>) {
        let Some(files) = files else {
            return;
        };
        self.attachments.update(|list| {
            for i in 0..files.length() {
                if let Some(file) = files.item(i) {
                    list.push(file);
                }
            }
        });
    }

    /// 按下标移除一个附件
    pub fn remove_file(&self, index: usize) {
        self.attachments.update(|list| {
            if index < list.len() {
                list.remove(index);
            }
        });
    }
}

impl Default for ComposerState {
    fn default() -> Self {
        Self::new()
    }
}
