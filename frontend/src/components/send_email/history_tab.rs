//! 历史标签页：分页表格、详情弹窗、附件预览与下载

use crate::auth::use_auth;
use crate::components::icons::{Download, Eye, FileText, X};
use ems_shared::pagination::Page;
use ems_shared::{date, AttachmentKind, EmailHistoryRecord, HISTORY_PAGE_SIZE};
use leptos::prelude::*;

fn open_in_new_tab(url: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.open_with_url_and_target(url, "_blank");
    }
}

#[component]
pub fn HistoryTab(
    records: Signal<Vec<EmailHistoryRecord>>,
    loading: Signal<bool>,
    error: Signal<Option<String>>,
    #[prop(into)] on_retry: Callback<()>,
) -> impl IntoView {
    let auth_ctx = use_auth();

    let (current_page, set_current_page) = signal(1usize);
    let (details, set_details) = signal(Option::<EmailHistoryRecord>::None);
    // 预览目标：(记录 id, 文件名)
    let (preview, set_preview) = signal(Option::<(String, String)>::None);

    let page = Signal::derive(move || {
        Page::paginate(records.with(|r| r.len()), HISTORY_PAGE_SIZE, current_page.get())
    });

    let visible_records = move || {
        let p = page.get();
        records.with(|list| list.get(p.start..p.end).map(<[_]>::to_vec).unwrap_or_default())
    };

    let attachment_url = move |record_id: &str, filename: &str| {
        auth_ctx.api().attachment_url(record_id, filename)
    };

    view! {
        <div class="space-y-4">
            <Show when=move || error.get().is_some()>
                <div role="alert" class="alert alert-error">
                    <span>{move || error.get().unwrap_or_default()}</span>
                    <button class="btn btn-sm btn-outline" on:click=move |_| on_retry.run(())>
                        "Retry"
                    </button>
                </div>
            </Show>

            <div class="overflow-x-auto w-full">
                <table class="table table-zebra w-full">
                    <thead>
                        <tr>
                            <th>"Subject"</th>
                            <th class="hidden md:table-cell">"Groups"</th>
                            <th class="hidden md:table-cell">"Recipients"</th>
                            <th>"Sent At"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <Show when=move || loading.get()>
                            <tr>
                                <td colspan="5" class="text-center py-8 text-base-content/50">
                                    <span class="loading loading-spinner loading-md"></span>
                                    " Loading history..."
                                </td>
                            </tr>
                        </Show>
                        <Show when=move || {
                            !loading.get() && error.get().is_none() && records.with(|r| r.is_empty())
                        }>
                            <tr>
                                <td colspan="5" class="text-center py-8 text-base-content/50">
                                    "No emails sent yet."
                                </td>
                            </tr>
                        </Show>
                        <For
                            each=visible_records
                            key=|r| r.id.clone()
                            children=move |record| {
                                let row = record.clone();
                                view! {
                                    <tr>
                                        <td class="font-medium">{record.subject.clone()}</td>
                                        <td class="hidden md:table-cell">
                                            <div class="flex flex-wrap gap-1">
                                                {record
                                                    .sent_to_groups
                                                    .iter()
                                                    .map(|g| view! {
                                                        <span class="badge badge-outline badge-sm">
                                                            {g.clone()}
                                                        </span>
                                                    })
                                                    .collect_view()}
                                            </div>
                                        </td>
                                        <td class="hidden md:table-cell">{record.to.len()}</td>
                                        <td class="text-sm text-base-content/70">
                                            {date::format_history_timestamp(&record.sent_at)}
                                        </td>
                                        <td>
                                            <button
                                                class="btn btn-ghost btn-sm"
                                                on:click=move |_| set_details.set(Some(row.clone()))
                                            >
                                                <FileText attr:class="h-4 w-4" /> "Details"
                                            </button>
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </div>

            // 分页控件
            <Show when={move || page.get().total_pages > 1}>
                <div class="flex justify-center">
                    <div class="join">
                        <button
                            class="join-item btn btn-sm"
                            disabled=move || page.get().is_first()
                            on:click=move |_| set_current_page.update(|p| *p = p.saturating_sub(1).max(1))
                        >
                            "«"
                        </button>
                        <button class="join-item btn btn-sm btn-active">
                            {move || {
                                let p = page.get();
                                format!("Page {} / {}", p.current, p.total_pages)
                            }}
                        </button>
                        <button
                            class="join-item btn btn-sm"
                            disabled=move || page.get().is_last()
                            on:click=move |_| set_current_page.update(|p| *p += 1)
                        >
                            "»"
                        </button>
                    </div>
                </div>
            </Show>

            // 详情弹窗
            {move || details.get().map(|record| {
                let record_id = record.id.clone();
                view! {
                    <div class="modal modal-open">
                        <div class="modal-box max-w-2xl">
                            <div class="flex items-start justify-between">
                                <h3 class="font-bold text-lg">{record.subject.clone()}</h3>
                                <button
                                    class="btn btn-ghost btn-sm btn-circle"
                                    on:click=move |_| set_details.set(None)
                                >
                                    <X attr:class="h-4 w-4" />
                                </button>
                            </div>
                            <p class="text-sm text-base-content/50 mt-1">
                                {date::format_history_timestamp(&record.sent_at)}
                            </p>

                            <div class="py-4 whitespace-pre-wrap">{record.text.clone()}</div>

                            <Show when={
                                let has_groups = !record.sent_to_groups.is_empty();
                                move || has_groups
                            }>
                                <div class="flex flex-wrap gap-1 mb-3">
                                    {record
                                        .sent_to_groups
                                        .iter()
                                        .map(|g| view! {
                                            <span class="badge badge-outline">{g.clone()}</span>
                                        })
                                        .collect_view()}
                                </div>
                            </Show>

                            <Show when={
                                let has_attachments = !record.attachments.is_empty();
                                move || has_attachments
                            }>
                                <h4 class="font-bold text-sm mb-2">"Attachments"</h4>
                                <ul class="space-y-2">
                                    {record
                                        .attachments
                                        .iter()
                                        .map(|filename| {
                                            let kind = AttachmentKind::classify(filename);
                                            let name = filename.clone();
                                            let preview_name = filename.clone();
                                            let preview_id = record_id.clone();
                                            let download_url =
                                                attachment_url(&record_id, filename);
                                            view! {
                                                <li class="flex items-center gap-2 bg-base-200 rounded-lg px-3 py-2 text-sm">
                                                    <span class="grow truncate">{name}</span>
                                                    <Show when=move || kind.previewable()>
                                                        <button
                                                            class="btn btn-ghost btn-xs gap-1"
                                                            on:click={
                                                                let id = preview_id.clone();
                                                                let file = preview_name.clone();
                                                                move |_| set_preview.set(Some((
                                                                    id.clone(),
                                                                    file.clone(),
                                                                )))
                                                            }
                                                        >
                                                            <Eye attr:class="h-3 w-3" /> "Preview"
                                                        </button>
                                                    </Show>
                                                    <button
                                                        class="btn btn-ghost btn-xs gap-1"
                                                        on:click={
                                                            let url = download_url.clone();
                                                            move |_| open_in_new_tab(&url)
                                                        }
                                                    >
                                                        <Download attr:class="h-3 w-3" /> "Download"
                                                    </button>
                                                </li>
                                            }
                                        })
                                        .collect_view()}
                                </ul>
                            </Show>
                        </div>
                        <div class="modal-backdrop" on:click=move |_| set_details.set(None)></div>
                    </div>
                }
            })}

            // 附件预览弹窗
            {move || preview.get().map(|(record_id, filename)| {
                let kind = AttachmentKind::classify(&filename);
                let url = attachment_url(&record_id, &filename);
                view! {
                    <div class="modal modal-open">
                        <div class="modal-box max-w-3xl">
                            <div class="flex items-start justify-between mb-4">
                                <h3 class="font-bold text-lg truncate">{filename.clone()}</h3>
                                <button
                                    class="btn btn-ghost btn-sm btn-circle"
                                    on:click=move |_| set_preview.set(None)
                                >
                                    <X attr:class="h-4 w-4" />
                                </button>
                            </div>
                            {match kind {
                                AttachmentKind::Image => view! {
                                    <img src=url.clone() alt=filename.clone() class="max-w-full rounded-lg mx-auto" />
                                }
                                .into_any(),
                                // PDF 不内嵌渲染，给下载指引
                                _ => view! {
                                    <div class="text-center py-12 space-y-4">
                                        <FileText attr:class="h-16 w-16 mx-auto opacity-30" />
                                        <p class="text-base-content/70">
                                            "Preview is not available for this file type."
                                        </p>
                                        <button
                                            class="btn btn-primary gap-2"
                                            on:click={
                                                let url = url.clone();
                                                move |_| open_in_new_tab(&url)
                                            }
                                        >
                                            <Download attr:class="h-4 w-4" /> "Download"
                                        </button>
                                    </div>
                                }
                                .into_any(),
                            }}
                        </div>
                        <div class="modal-backdrop" on:click=move |_| set_preview.set(None)></div>
                    </div>
                }
            })}
        </div>
    }
}
