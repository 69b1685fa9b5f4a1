use crate::auth::{expire_session, logout, use_auth};
use crate::components::icons::{ChevronLeft, History as HistoryIcon, LogOut, Send};
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use ems_shared::{EmailHistoryRecord, WizardStep};
use leptos::prelude::*;
use leptos::task::spawn_local;

mod compose_step;
mod form_state;
mod history_tab;
mod recipients_step;

use compose_step::ComposeStep;
use form_state::ComposerState;
use history_tab::HistoryTab;
use recipients_step::RecipientsStep;

/// 页面标签
#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Send,
    History,
}

/// 邮件群发页
///
/// 分组目录挂载后即加载；历史记录推迟到第一次切到 History 标签才拉取，
/// 发送成功后标记过期，下次进入重新拉取。
#[component]
pub fn SendEmailPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let router = use_router();

    let state = ComposerState::new();
    let (active_tab, set_active_tab) = signal(Tab::Send);

    // 历史标签页状态
    let history_records = RwSignal::new(Vec::<EmailHistoryRecord>::new());
    let (history_loading, set_history_loading) = signal(false);
    let (history_error, set_history_error) = signal(Option::<String>::None);
    let (history_fresh, set_history_fresh) = signal(false);

    // 分组目录：失败时在第二步留下内联重试入口
    let (groups_error, set_groups_error) = signal(Option::<String>::None);
    let load_groups = move || {
        let api = auth_ctx.api();
        set_groups_error.set(None);
        spawn_local(async move {
            match api.email_groups().await {
                Ok(response) => state.groups.set(response.groups),
                Err(e) if e.is_unauthorized() => expire_session(&auth_ctx),
                Err(e) => set_groups_error.set(Some(e.user_message())),
            }
        });
    };

    Effect::new(move |_| {
        load_groups();
    });

    let load_history = move || {
        let api = auth_ctx.api();
        set_history_loading.set(true);
        set_history_error.set(None);
        spawn_local(async move {
            match api.email_history().await {
                Ok(view) => {
                    history_records.set(view.records);
                    set_history_fresh.set(true);
                }
                Err(e) if e.is_unauthorized() => expire_session(&auth_ctx),
                Err(e) => set_history_error.set(Some(e.user_message())),
            }
            set_history_loading.set(false);
        });
    };

    let on_select_history = move |_| {
        set_active_tab.set(Tab::History);
        // 只有缓存过期才重新拉取
        if !history_fresh.get_untracked() && !history_loading.get_untracked() {
            load_history();
        }
    };

    let on_send = move |_: ()| {
        if !state.draft.with_untracked(|d| d.can_submit(state.sending.get_untracked())) {
            return;
        }
        state.sending.set(true);
        state.status.set(None);

        let api = auth_ctx.api();
        let draft = state.draft.get_untracked();
        let attachments = state.attachments.get_untracked();
        spawn_local(async move {
            match api.send_email(&draft, &attachments).await {
                Ok(response) => {
                    state.status.set(Some((
                        format!("Email sent to {} recipients", response.receivers_count),
                        false,
                    )));
                    state.reset_draft();
                    // 历史有了新条目
                    set_history_fresh.set(false);
                }
                Err(e) if e.is_unauthorized() => expire_session(&auth_ctx),
                // 失败时草稿原样保留，用户可以直接重试
                Err(e) => state.status.set(Some((e.user_message(), true))),
            }
            state.sending.set(false);
        });
    };

    // 3秒后清除结果提示
    Effect::new(move |_| {
        if state.status.get().is_some() {
            set_timeout(
                move || state.status.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-4xl mx-auto space-y-8">
                <Show when=move || state.status.get().is_some()>
                    <div class="toast toast-top toast-end z-50">
                        <div class=move || {
                            let is_err = state.status.get().map(|(_, e)| e).unwrap_or(false);
                            if is_err {
                                "alert alert-error shadow-lg"
                            } else {
                                "alert alert-success shadow-lg"
                            }
                        }>
                            <span>
                                {move || state.status.get().map(|(msg, _)| msg).unwrap_or_default()}
                            </span>
                        </div>
                    </div>
                </Show>

                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <button
                            class="btn btn-ghost btn-circle"
                            on:click=move |_| router.navigate_to(AppRoute::Dashboard)
                        >
                            <ChevronLeft attr:class="h-5 w-5" />
                        </button>
                        <Send attr:class="text-primary h-6 w-6" />
                        <a class="btn btn-ghost text-xl">"Email Campaigns"</a>
                    </div>
                    <div class="flex-none">
                        <button
                            on:click=move |_| logout(&auth_ctx)
                            class="btn btn-outline btn-error gap-2"
                        >
                            <LogOut attr:class="h-4 w-4" /> "Logout"
                        </button>
                    </div>
                </div>

                <div role="tablist" class="tabs tabs-boxed bg-base-100 shadow">
                    <a
                        role="tab"
                        class=move || if active_tab.get() == Tab::Send { "tab tab-active" } else { "tab" }
                        on:click=move |_| set_active_tab.set(Tab::Send)
                    >
                        <Send attr:class="h-4 w-4 mr-2" /> "Send Email"
                    </a>
                    <a
                        role="tab"
                        class=move || if active_tab.get() == Tab::History { "tab tab-active" } else { "tab" }
                        on:click=on_select_history
                    >
                        <HistoryIcon attr:class="h-4 w-4 mr-2" /> "History"
                    </a>
                </div>

                {move || match active_tab.get() {
                    Tab::Send => view! {
                        <div class="card bg-base-100 shadow-xl">
                            <div class="card-body">
                                <ul class="steps mb-6">
                                    // 第一步始终点亮
                                    <li class="step step-primary">"Compose"</li>
                                    <li class=move || {
                                        if state.draft.with(|d| d.step == WizardStep::Recipients) {
                                            "step step-primary"
                                        } else {
                                            "step"
                                        }
                                    }>
                                        "Recipients & Attachments"
                                    </li>
                                </ul>

                                {move || match state.draft.with(|d| d.step) {
                                    WizardStep::Compose => {
                                        view! { <ComposeStep state=state /> }.into_any()
                                    }
                                    WizardStep::Recipients => {
                                        view! {
                                            <RecipientsStep
                                                state=state
                                                on_send=on_send
                                                groups_error=groups_error
                                                on_reload_groups=move |_: ()| load_groups()
                                            />
                                        }
                                        .into_any()
                                    }
                                }}
                            </div>
                        </div>
                    }
                    .into_any(),
                    Tab::History => view! {
                        <div class="card bg-base-100 shadow-xl">
                            <div class="card-body">
                                <HistoryTab
                                    records=Signal::derive(move || history_records.get())
                                    loading=history_loading.into()
                                    error=history_error.into()
                                    on_retry=move |_: ()| load_history()
                                />
                            </div>
                        </div>
                    }
                    .into_any(),
                }}
            </div>
        </div>
    }
}
