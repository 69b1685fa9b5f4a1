use crate::auth::{expire_session, logout, use_auth};
use crate::components::icons::{Briefcase, Calendar, LogOut, Mail, User};
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use crate::web::{Clock, Interval};
use ems_shared::{date, greeting::greeting, EmployeeIdentity, TokenClaims};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 资料加载状态（三态互斥）
#[derive(Clone)]
enum ProfileState {
    Loading,
    Failed(String),
    Ready(EmployeeIdentity),
}

/// 员工面板
///
/// 从 token 声明里取员工 id，再拉取资料接口补全姓名邮箱。
/// 资料接口失败不致命：降级到 token 里的声明，最后兜底占位名。
#[component]
pub fn EmpDashboardPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let router = use_router();

    let (now, set_now) = signal(Clock::now());
    let ticker = leptos::__reexports::send_wrapper::SendWrapper::new(Interval::new(
        1_000,
        move || set_now.set(Clock::now()),
    ));
    on_cleanup(move || drop(ticker));

    let (profile_state, set_profile_state) = signal(ProfileState::Loading);

    let load_profile = move || {
        let token = auth_ctx.state.get_untracked().session.token.clone();
        let Some(token) = token else {
            expire_session(&auth_ctx);
            return;
        };

        // token 解不出员工 id，等同会话失效
        let Ok(claims) = TokenClaims::decode(&token) else {
            expire_session(&auth_ctx);
            return;
        };
        let id = claims.id.clone();

        set_profile_state.set(ProfileState::Loading);
        let api = auth_ctx.api();
        spawn_local(async move {
            match api.employee_profile(&id).await {
                Ok(response) => {
                    let profile = response.normalize();
                    let identity = EmployeeIdentity::resolve(Some(&profile), Some(&claims));
                    set_profile_state.set(ProfileState::Ready(identity));
                }
                Err(e) if e.is_unauthorized() => {
                    expire_session(&auth_ctx);
                }
                Err(e) => {
                    set_profile_state.set(ProfileState::Failed(e.user_message()));
                }
            }
        });
    };

    Effect::new(move |_| {
        load_profile();
    });

    let on_logout = move |_| {
        logout(&auth_ctx);
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-5xl mx-auto space-y-8">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <Briefcase attr:class="text-primary h-6 w-6" />
                        <a class="btn btn-ghost text-xl">"EMS Workspace"</a>
                    </div>
                    <div class="flex-none gap-2">
                        <button
                            on:click=move |_| router.navigate_to(AppRoute::Attendance)
                            class="btn btn-primary gap-2"
                        >
                            <Calendar attr:class="h-4 w-4" /> "My Attendance"
                        </button>
                        <button on:click=on_logout class="btn btn-outline btn-error gap-2">
                            <LogOut attr:class="h-4 w-4" /> "Logout"
                        </button>
                    </div>
                </div>

                {move || match profile_state.get() {
                    ProfileState::Loading => view! {
                        <div class="flex items-center justify-center py-24">
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                        </div>
                    }
                    .into_any(),
                    ProfileState::Failed(msg) => view! {
                        <div class="card bg-base-100 shadow-xl">
                            <div class="card-body items-center text-center">
                                <div role="alert" class="alert alert-error max-w-md">
                                    <span>{msg}</span>
                                </div>
                                <div class="card-actions mt-4">
                                    <button class="btn btn-outline" on:click=move |_| load_profile()>
                                        "Retry"
                                    </button>
                                    <button
                                        class="btn btn-error"
                                        on:click=move |_| expire_session(&auth_ctx)
                                    >
                                        "Back to login"
                                    </button>
                                </div>
                            </div>
                        </div>
                    }
                    .into_any(),
                    ProfileState::Ready(identity) => {
                        let name = identity.name.clone();
                        let email = identity.email.clone();
                        view! {
                            <div class="card bg-base-100 shadow-xl">
                                <div class="card-body flex-row items-center justify-between flex-wrap gap-4">
                                    <div>
                                        <h2 class="text-3xl font-bold">
                                            {move || {
                                                let g = greeting(now.get().hour);
                                                format!("{} {}, {}", g.text, g.emoji, name)
                                            }}
                                        </h2>
                                        <p class="text-base-content/70 mt-1">
                                            {move || date::format_long_date(now.get().date)}
                                        </p>
                                    </div>
                                    <span class="font-mono text-4xl font-bold text-primary tabular-nums">
                                        {move || {
                                            let c = now.get();
                                            date::format_clock(c.hour, c.minute, c.second)
                                        }}
                                    </span>
                                </div>
                            </div>

                            <div class="card bg-base-100 shadow-xl mt-8">
                                <div class="card-body">
                                    <h3 class="card-title mb-2">"My Profile"</h3>
                                    <div class="flex items-center gap-3">
                                        <User attr:class="h-5 w-5 opacity-50" />
                                        <span>{identity.name.clone()}</span>
                                    </div>
                                    <div class="flex items-center gap-3">
                                        <Mail attr:class="h-5 w-5 opacity-50" />
                                        <span>
                                            {if email.is_empty() {
                                                "No email on record".to_string()
                                            } else {
                                                email.clone()
                                            }}
                                        </span>
                                    </div>
                                </div>
                            </div>
                        }
                        .into_any()
                    }
                }}
            </div>
        </div>
    }
}
