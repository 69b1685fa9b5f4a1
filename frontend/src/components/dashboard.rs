use crate::auth::{expire_session, logout, use_auth};
use crate::components::icons::{Clock as ClockIcon, LogOut, Mail, Send, Users};
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use crate::web::{Clock, Interval};
use ems_shared::{date, greeting::greeting};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 管理员控制面板
///
/// 实时时钟每秒走一针；发信统计从历史接口取数，
/// 失败时给出重试入口，401 则走会话过期流程。
#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let router = use_router();

    // 实时时钟（组件卸载时 Interval 随 on_cleanup 释放）
    let (now, set_now) = signal(Clock::now());
    let ticker = leptos::__reexports::send_wrapper::SendWrapper::new(Interval::new(
        1_000,
        move || set_now.set(Clock::now()),
    ));
    on_cleanup(move || drop(ticker));

    // 发信统计
    let (sent_count, set_sent_count) = signal(Option::<u64>::None);
    let (count_loading, set_count_loading) = signal(true);
    let (count_error, set_count_error) = signal(Option::<String>::None);

    let load_sent_count = move || {
        let api = auth_ctx.api();
        set_count_loading.set(true);
        set_count_error.set(None);
        spawn_local(async move {
            match api.email_history().await {
                Ok(view) => set_sent_count.set(Some(view.sent_count)),
                Err(e) if e.is_unauthorized() => expire_session(&auth_ctx),
                Err(e) => set_count_error.set(Some(e.user_message())),
            }
            set_count_loading.set(false);
        });
    };

    // 初始加载
    Effect::new(move |_| {
        load_sent_count();
    });

    let on_logout = move |_| {
        logout(&auth_ctx);
        // 导航由路由服务的会话监听处理
    };

    let greeting_line = move || {
        let g = greeting(now.get().hour);
        format!("{} {}, Admin", g.text, g.emoji)
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <Users attr:class="text-primary h-6 w-6" />
                        <a class="btn btn-ghost text-xl">"EMS Admin Console"</a>
                    </div>
                    <div class="flex-none gap-2">
                        <button
                            on:click=move |_| router.navigate_to(AppRoute::SendEmail)
                            class="btn btn-primary gap-2"
                        >
                            <Send attr:class="h-4 w-4" /> "Send Email"
                        </button>
                        <button on:click=on_logout class="btn btn-outline btn-error gap-2">
                            <LogOut attr:class="h-4 w-4" /> "Logout"
                        </button>
                    </div>
                </div>

                // 问候区 + 实时时钟
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body flex-row items-center justify-between flex-wrap gap-4">
                        <div>
                            <h2 class="text-3xl font-bold">{greeting_line}</h2>
                            <p class="text-base-content/70 mt-1">
                                {move || date::format_long_date(now.get().date)}
                            </p>
                        </div>
                        <div class="flex items-center gap-3 text-primary">
                            <ClockIcon attr:class="h-8 w-8" />
                            <span class="font-mono text-4xl font-bold tabular-nums">
                                {move || {
                                    let c = now.get();
                                    date::format_clock(c.hour, c.minute, c.second)
                                }}
                            </span>
                        </div>
                    </div>
                </div>

                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <div class="stat">
                        <div class="stat-figure text-primary">
                            <Mail attr:class="inline-block w-8 h-8" />
                        </div>
                        <div class="stat-title">"Emails Sent"</div>
                        <div class="stat-value text-primary">
                            {move || {
                                if count_loading.get() {
                                    view! { <span class="loading loading-spinner loading-md"></span> }.into_any()
                                } else if let Some(count) = sent_count.get() {
                                    count.to_string().into_any()
                                } else {
                                    "--".into_any()
                                }
                            }}
                        </div>
                        <Show when=move || count_error.get().is_some()>
                            <div class="stat-desc text-error mt-1">
                                {move || count_error.get().unwrap_or_default()}
                            </div>
                            <div class="stat-actions">
                                <button
                                    class="btn btn-sm btn-outline"
                                    on:click=move |_| load_sent_count()
                                >
                                    "Retry"
                                </button>
                            </div>
                        </Show>
                    </div>

                    <div class="stat">
                        <div class="stat-figure text-success">
                            <Users attr:class="inline-block w-8 h-8" />
                        </div>
                        <div class="stat-title">"System Status"</div>
                        <div class="stat-value text-success">"Online"</div>
                        <div class="stat-desc">"All services operational"</div>
                    </div>
                </div>

                // 快捷入口
                <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                    <div
                        class="card bg-base-100 shadow-xl cursor-pointer hover:shadow-2xl transition-shadow"
                        on:click=move |_| router.navigate_to(AppRoute::SendEmail)
                    >
                        <div class="card-body flex-row items-center gap-4">
                            <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                                <Send attr:class="h-8 w-8" />
                            </div>
                            <div>
                                <h3 class="card-title">"Send Email"</h3>
                                <p class="text-base-content/70 text-sm">
                                    "Compose and send a campaign to employee groups."
                                </p>
                            </div>
                        </div>
                    </div>
                    <div class="card bg-base-100 shadow-xl opacity-60">
                        <div class="card-body flex-row items-center gap-4">
                            <div class="p-3 bg-secondary/10 rounded-2xl text-secondary">
                                <Users attr:class="h-8 w-8" />
                            </div>
                            <div>
                                <h3 class="card-title">"Employee Directory"</h3>
                                <p class="text-base-content/70 text-sm">"Coming soon."</p>
                            </div>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
