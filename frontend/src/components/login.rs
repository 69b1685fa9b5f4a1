use crate::auth::{login, use_auth, SessionStore};
use crate::components::icons::{Eye, EyeOff, Lock, Mail, User};
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use ems_shared::Role;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 登录页（管理员与员工共用，按角色定制文案和端点）
#[component]
pub fn LoginPage(role: Role) -> impl IntoView {
    let auth_ctx = use_auth();
    let router = use_router();

    let (email, set_email) = signal(SessionStore::remembered_email().unwrap_or_default());
    let (password, set_password) = signal(String::new());
    let (show_password, set_show_password) = signal(false);
    let (remember, set_remember) = signal(false);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let (title, subtitle, other_label) = match role {
        Role::Admin => (
            "Admin Portal",
            "Sign in to manage your team",
            "Employee login",
        ),
        Role::Employee => (
            "Employee Portal",
            "Sign in to view your workspace",
            "Admin login",
        ),
    };
    let other_route = AppRoute::login_for(match role {
        Role::Admin => Role::Employee,
        Role::Employee => Role::Admin,
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get() {
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            let result = login(
                &auth_ctx,
                role,
                email.get_untracked().trim(),
                &password.get_untracked(),
                remember.get_untracked(),
            )
            .await;
            if let Err(msg) = result {
                set_error_msg.set(Some(msg));
            }
            // 成功时无需手动导航，路由服务监听会话变化自动跳转
            set_is_submitting.set(false);
        });
    };

    let on_switch_portal = move |ev: leptos::web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate_to(other_route);
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <User attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">{title}</h1>
                        <p class="text-base-content/70">{subtitle}</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <label class="input input-bordered flex items-center gap-2">
                                <Mail attr:class="h-4 w-4 opacity-50" />
                                <input
                                    id="email"
                                    type="email"
                                    class="grow"
                                    placeholder="you@company.com"
                                    on:input=move |ev| set_email.set(event_target_value(&ev))
                                    prop:value=email
                                    required
                                />
                            </label>
                        </div>

                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <label class="input input-bordered flex items-center gap-2">
                                <Lock attr:class="h-4 w-4 opacity-50" />
                                <input
                                    id="password"
                                    type=move || if show_password.get() { "text" } else { "password" }
                                    class="grow"
                                    placeholder="••••••••"
                                    on:input=move |ev| set_password.set(event_target_value(&ev))
                                    prop:value=password
                                    required
                                />
                                <button
                                    type="button"
                                    class="btn btn-ghost btn-xs btn-circle"
                                    on:click=move |_| set_show_password.update(|v| *v = !*v)
                                >
                                    {move || if show_password.get() {
                                        view! { <EyeOff attr:class="h-4 w-4" /> }.into_any()
                                    } else {
                                        view! { <Eye attr:class="h-4 w-4" /> }.into_any()
                                    }}
                                </button>
                            </label>
                        </div>

                        <div class="form-control">
                            <label class="label cursor-pointer justify-start gap-2">
                                <input
                                    type="checkbox"
                                    class="checkbox checkbox-sm checkbox-primary"
                                    on:change=move |ev| set_remember.set(event_target_checked(&ev))
                                    prop:checked=remember
                                />
                                <span class="label-text">"Remember me"</span>
                            </label>
                        </div>

                        <div class="form-control mt-4">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Sign In".into_any()
                                }}
                            </button>
                        </div>

                        <div class="text-center mt-2">
                            <a href=other_route.to_path() class="link link-primary text-sm" on:click=on_switch_portal>
                                {other_label}
                            </a>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
