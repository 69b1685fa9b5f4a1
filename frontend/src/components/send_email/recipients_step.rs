//! 向导第二步：收件分组与附件

use super::form_state::ComposerState;
use crate::components::icons::{Paperclip, Users, X};
use leptos::prelude::*;

#[component]
pub fn RecipientsStep(
    state: ComposerState,
    #[prop(into)] on_send: Callback<()>,
    /// 分组目录拉取失败的文案
    #[prop(into)]
    groups_error: Signal<Option<String>>,
    #[prop(into)] on_reload_groups: Callback<()>,
) -> impl IntoView {
    let draft = state.draft;
    let groups = state.groups;
    let attachments = state.attachments;
    let sending = state.sending;

    let total_recipients = move || draft.with(|d| groups.with(|g| d.total_recipients(g)));
    let can_submit = move || draft.with(|d| d.can_submit(sending.get()));

    let on_pick_files = move |ev: leptos::web_sys::Event| {
        let input = event_target::<leptos::web_sys::HtmlInputElement>(&ev);
        state.add_files(input.files());
        // 清空 value，同一文件可再次选择
        input.set_value("");
    };

    view! {
        <div class="space-y-6">
            // 分组选择卡片
            <div>
                <h4 class="font-bold mb-2 flex items-center gap-2">
                    <Users attr:class="h-4 w-4" /> "Recipient Groups"
                </h4>
                <Show when=move || groups_error.get().is_some()>
                    <div role="alert" class="alert alert-error mb-3">
                        <span>{move || groups_error.get().unwrap_or_default()}</span>
                        <button
                            class="btn btn-sm btn-outline"
                            on:click=move |_| on_reload_groups.run(())
                        >
                            "Retry"
                        </button>
                    </div>
                </Show>
                <Show
                    when=move || groups.with(|g| !g.is_empty())
                    fallback=|| view! {
                        <p class="text-base-content/50 text-sm">"No recipient groups available."</p>
                    }
                >
                    <div class="grid grid-cols-2 md:grid-cols-3 gap-3">
                        <For
                            each={move || groups.get().into_iter().collect::<Vec<_>>()}
                            key=|(name, _)| name.clone()
                            children=move |(name, count)| {
                                let toggle_name = name.clone();
                                let check_name = name.clone();
                                view! {
                                    <div
                                        class=move || {
                                            let selected = draft.with(|d| d.is_selected(&check_name));
                                            if selected {
                                                "card bg-primary/10 border-2 border-primary cursor-pointer"
                                            } else {
                                                "card bg-base-200 border-2 border-transparent cursor-pointer"
                                            }
                                        }
                                        on:click=move |_| {
                                            draft.update(|d| d.toggle_group(&toggle_name));
                                        }
                                    >
                                        <div class="card-body p-4">
                                            <span class="font-bold">{name.clone()}</span>
                                            <span class="text-sm text-base-content/70">
                                                {count} " recipients"
                                            </span>
                                        </div>
                                    </div>
                                }
                            }
                        />
                    </div>
                </Show>
                <p class="text-sm mt-2 text-base-content/70">
                    "Total recipients: "
                    <span class="font-bold text-primary">{total_recipients}</span>
                </p>
            </div>

            // 附件
            <div>
                <h4 class="font-bold mb-2 flex items-center gap-2">
                    <Paperclip attr:class="h-4 w-4" /> "Attachments"
                </h4>
                <input
                    type="file"
                    multiple
                    class="file-input file-input-bordered w-full max-w-md"
                    on:change=on_pick_files
                />
                <Show when=move || attachments.with(|a| !a.is_empty())>
                    <ul class="mt-3 space-y-2">
                        <For
                            each=move || {
                                attachments
                                    .get()
                                    .into_iter()
                                    .enumerate()
                                    .map(|(i, f)| (i, f.name()))
                                    .collect::<Vec<_>>()
                            }
                            key=|(idx, name)| (*idx, name.clone())
                            children=move |(idx, name)| {
                                view! {
                                    <li class="flex items-center gap-2 bg-base-200 rounded-lg px-3 py-2 text-sm">
                                        <Paperclip attr:class="h-3 w-3 opacity-50" />
                                        <span class="grow truncate">{name}</span>
                                        <button
                                            class="btn btn-ghost btn-xs btn-circle"
                                            on:click=move |_| state.remove_file(idx)
                                        >
                                            <X attr:class="h-3 w-3" />
                                        </button>
                                    </li>
                                }
                            }
                        />
                    </ul>
                </Show>
            </div>

            <div class="flex justify-between">
                <button
                    class="btn btn-ghost"
                    disabled=move || sending.get()
                    on:click=move |_| draft.update(|d| d.back())
                >
                    "Back"
                </button>
                <button
                    class="btn btn-primary"
                    disabled=move || !can_submit()
                    on:click=move |_| on_send.run(())
                >
                    {move || if sending.get() {
                        view! { <span class="loading loading-spinner"></span> "Sending..." }.into_any()
                    } else {
                        "Send Email".into_any()
                    }}
                </button>
            </div>
        </div>
    }
}
