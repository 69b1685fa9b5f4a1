use crate::auth::{logout, use_auth};
use crate::components::icons::{Calendar as CalendarIcon, ChevronLeft, CircleCheck, LogOut};
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use crate::web::Clock;
use chrono::{Datelike, NaiveDate};
use ems_shared::attendance::{
    already_marked, can_mark, generate_month, mark_today, AttendanceRecord, AttendanceStats,
    AttendanceStatus, SeededRandom,
};
use ems_shared::date;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 模拟打卡的延迟（毫秒），让交互有真实请求的手感
const MARK_LATENCY_MS: u32 = 800;

fn status_badge_class(status: AttendanceStatus) -> &'static str {
    match status {
        AttendanceStatus::Present => "badge badge-success",
        AttendanceStatus::Late => "badge badge-warning",
        AttendanceStatus::Absent => "badge badge-error",
        AttendanceStatus::Weekend => "badge badge-ghost",
    }
}

fn status_cell_class(status: AttendanceStatus, selected: bool) -> String {
    let base = match status {
        AttendanceStatus::Present => "bg-success/20 text-success-content",
        AttendanceStatus::Late => "bg-warning/20 text-warning-content",
        AttendanceStatus::Absent => "bg-error/20 text-error-content",
        AttendanceStatus::Weekend => "bg-base-200 text-base-content/50",
    };
    let ring = if selected { " ring-2 ring-primary" } else { "" };
    format!(
        "aspect-square rounded-lg flex items-center justify-center cursor-pointer text-sm font-medium {base}{ring}"
    )
}

/// 员工考勤页
///
/// 整月记录在挂载时一次性生成（墙钟毫秒播种），
/// 之后只有打卡会改动记录集。
#[component]
pub fn AttendancePage() -> impl IntoView {
    let auth_ctx = use_auth();
    let router = use_router();

    let today = Clock::now().date;
    let (year, month) = (today.year(), today.month());

    let records = RwSignal::new({
        let mut rng = SeededRandom::from_seed(Clock::now_millis());
        generate_month(year, month, &mut rng)
    });
    let (selected_date, set_selected_date) = signal(today);
    let (marking, set_marking) = signal(false);
    let (notice, set_notice) = signal(Option::<(String, bool)>::None); // 文案, 是否出错

    let stats = Signal::derive(move || records.with(|r| AttendanceStats::compute(r)));
    let today_marked = Signal::derive(move || records.with(|r| already_marked(r, today)));
    // 只有日历上选中今天时才放行打卡
    let markable =
        Signal::derive(move || records.with(|r| can_mark(r, selected_date.get(), today)));

    let on_mark = move |_| {
        if marking.get() || !markable.get() {
            return;
        }
        set_marking.set(true);
        set_notice.set(None);
        spawn_local(async move {
            TimeoutFuture::new(MARK_LATENCY_MS).await;

            let clock = Clock::now();
            let now_time = date::format_time_12h(clock.hour, clock.minute);
            let mut rng = SeededRandom::from_seed(Clock::now_millis());
            let result =
                records.with_untracked(|list| mark_today(list, today, now_time, &mut rng));
            match result {
                Ok(marked) => {
                    let label = marked.status.label();
                    records.update(|list| {
                        // 打卡覆盖当天的周末异常记录，不产生重复日期
                        if let Some(pos) = list.iter().position(|r| r.date == today) {
                            list[pos] = marked;
                        } else {
                            list.push(marked);
                        }
                    });
                    set_notice.set(Some((format!("Attendance marked: {label}"), false)));
                }
                Err(e) => set_notice.set(Some((e.to_string(), true))),
            }
            set_marking.set(false);
        });
    };

    // 3秒后清除通知
    Effect::new(move |_| {
        if notice.get().is_some() {
            set_timeout(
                move || set_notice.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    // 日历网格：1号之前的空位 + 当月所有日期
    let grid_cells = move || {
        let first_offset = NaiveDate::from_ymd_opt(year, month, 1)
            .map(|d| d.weekday().num_days_from_sunday() as usize)
            .unwrap_or(0);
        let mut cells: Vec<Option<AttendanceRecord>> = vec![None; first_offset];
        records.with(|list| cells.extend(list.iter().cloned().map(Some)));
        cells
    };

    let selected_record = move || {
        let day = selected_date.get();
        records.with(|list| list.iter().find(|r| r.date == day).cloned())
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-6xl mx-auto space-y-8">
                <Show when=move || notice.get().is_some()>
                    <div class="toast toast-top toast-end z-50">
                        <div class=move || {
                            let is_err = notice.get().map(|(_, e)| e).unwrap_or(false);
                            if is_err {
                                "alert alert-error shadow-lg"
                            } else {
                                "alert alert-success shadow-lg"
                            }
                        }>
                            <span>{move || notice.get().map(|(msg, _)| msg).unwrap_or_default()}</span>
                        </div>
                    </div>
                </Show>

                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <button
                            class="btn btn-ghost btn-circle"
                            on:click=move |_| router.navigate_to(AppRoute::EmployeeDashboard)
                        >
                            <ChevronLeft attr:class="h-5 w-5" />
                        </button>
                        <CalendarIcon attr:class="text-primary h-6 w-6" />
                        <a class="btn btn-ghost text-xl">"My Attendance"</a>
                        <span class="badge badge-neutral hidden md:inline-flex">
                            {date::month_title(year, month)}
                        </span>
                    </div>
                    <div class="flex-none gap-2">
                        <button
                            class="btn btn-primary gap-2"
                            disabled=move || marking.get() || !markable.get()
                            on:click=on_mark
                        >
                            {move || if marking.get() {
                                view! { <span class="loading loading-spinner loading-sm"></span> "Marking..." }.into_any()
                            } else if today_marked.get() {
                                view! { <CircleCheck attr:class="h-4 w-4" /> "Marked Today" }.into_any()
                            } else {
                                "Mark Attendance".into_any()
                            }}
                        </button>
                        <button
                            on:click=move |_| logout(&auth_ctx)
                            class="btn btn-outline btn-error gap-2"
                        >
                            <LogOut attr:class="h-4 w-4" /> "Logout"
                        </button>
                    </div>
                </div>

                // 月度统计
                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <div class="stat">
                        <div class="stat-title">"Present"</div>
                        <div class="stat-value text-success">{move || stats.get().present}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Late"</div>
                        <div class="stat-value text-warning">{move || stats.get().late}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Absent"</div>
                        <div class="stat-value text-error">{move || stats.get().absent}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Attendance Rate"</div>
                        <div class="stat-value text-primary">
                            {move || format!("{}%", stats.get().percentage)}
                        </div>
                        <div class="stat-desc">
                            {move || format!("{} working days", stats.get().working_days)}
                        </div>
                    </div>
                </div>

                <div class="grid grid-cols-1 lg:grid-cols-3 gap-8">
                    // 日历
                    <div class="card bg-base-100 shadow-xl lg:col-span-2">
                        <div class="card-body">
                            <h3 class="card-title mb-2">{date::month_title(year, month)}</h3>
                            <div class="grid grid-cols-7 gap-2 text-center text-xs font-bold text-base-content/50 mb-1">
                                <span>"Sun"</span>
                                <span>"Mon"</span>
                                <span>"Tue"</span>
                                <span>"Wed"</span>
                                <span>"Thu"</span>
                                <span>"Fri"</span>
                                <span>"Sat"</span>
                            </div>
                            <div class="grid grid-cols-7 gap-2">
                                <For
                                    each={move || grid_cells().into_iter().enumerate().collect::<Vec<_>>()}
                                    // 键里带上状态与时间，打卡覆盖当天记录后单元格能重建
                                    key=|(idx, cell)| {
                                        (
                                            *idx,
                                            cell.as_ref().map(|r| (r.status.label(), r.time.clone())),
                                        )
                                    }
                                    children=move |(_, cell)| {
                                        match cell {
                                            None => view! { <div></div> }.into_any(),
                                            Some(record) => {
                                                let day = record.date;
                                                view! {
                                                    <div
                                                        class=move || status_cell_class(
                                                            record.status,
                                                            selected_date.get() == day,
                                                        )
                                                        on:click=move |_| set_selected_date.set(day)
                                                    >
                                                        {day.day()}
                                                    </div>
                                                }
                                                .into_any()
                                            }
                                        }
                                    }
                                />
                            </div>

                            // 图例
                            <div class="flex flex-wrap gap-4 mt-4 text-sm">
                                <span class="flex items-center gap-2">
                                    <span class="w-3 h-3 rounded bg-success/60"></span> "Present"
                                </span>
                                <span class="flex items-center gap-2">
                                    <span class="w-3 h-3 rounded bg-warning/60"></span> "Late"
                                </span>
                                <span class="flex items-center gap-2">
                                    <span class="w-3 h-3 rounded bg-error/60"></span> "Absent"
                                </span>
                                <span class="flex items-center gap-2">
                                    <span class="w-3 h-3 rounded bg-base-300"></span> "Weekend"
                                </span>
                            </div>
                        </div>
                    </div>

                    // 选中日详情
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <h3 class="card-title mb-2">"Day Details"</h3>
                            {move || match selected_record() {
                                Some(record) => view! {
                                    <div class="space-y-3">
                                        <p class="text-lg font-bold">
                                            {date::format_long_date(record.date)}
                                        </p>
                                        <span class=status_badge_class(record.status)>
                                            {record.status.label()}
                                        </span>
                                        <Show when={
                                            let has_time = !record.time.is_empty();
                                            move || has_time
                                        }>
                                            <p class="text-base-content/70">
                                                "Clock-in: " {record.time.clone()}
                                            </p>
                                        </Show>
                                    </div>
                                }
                                .into_any(),
                                None => view! {
                                    <p class="text-base-content/50">"No record for this day."</p>
                                }
                                .into_any(),
                            }}
                        </div>
                    </div>
                </div>

                // 明细表（按日期倒序）
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body p-0">
                        <div class="p-6 pb-2">
                            <h3 class="card-title">"Monthly Records"</h3>
                        </div>
                        <div class="overflow-x-auto w-full">
                            <table class="table table-zebra w-full">
                                <thead>
                                    <tr>
                                        <th>"Date"</th>
                                        <th>"Day"</th>
                                        <th>"Status"</th>
                                        <th>"Clock-in"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <For
                                        each=move || {
                                            let mut list = records.get();
                                            list.sort_by(|a, b| b.date.cmp(&a.date));
                                            list
                                        }
                                        key=|r| (r.date.day(), r.status.label())
                                        children=move |record| {
                                            view! {
                                                <tr>
                                                    <td>{date::format_short_date(record.date)}</td>
                                                    <td>{date::weekday_name(record.date)}</td>
                                                    <td>
                                                        <span class=status_badge_class(record.status)>
                                                            {record.status.label()}
                                                        </span>
                                                    </td>
                                                    <td class="font-mono text-sm">
                                                        {if record.time.is_empty() {
                                                            "-".to_string()
                                                        } else {
                                                            record.time.clone()
                                                        }}
                                                    </td>
                                                </tr>
                                            }
                                        }
                                    />
                                </tbody>
                            </table>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
