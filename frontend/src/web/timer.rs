//! 定时器与时钟封装模块
//!
//! `Interval` 封装 `setInterval`，drop 时自动清除，保证视图卸载后
//! 不会留下泄漏的回调；`Clock` 从 js 时钟读取当前时间的各个分量。

use chrono::NaiveDate;
use wasm_bindgen::prelude::*;

/// 周期性定时器
///
/// 封装 `setInterval` API。当 `Interval` 被 drop 时，自动清除定时器。
pub struct Interval {
    handle: i32,
    #[allow(dead_code)]
    closure: Closure<dyn Fn()>,
}

impl Interval {
    /// 创建新的周期性定时器
    ///
    /// # Panics
    /// 如果无法获取 window 对象或设置定时器失败
    pub fn new<F>(millis: u32, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        let closure = Closure::new(callback);
        let window = web_sys::window().expect("no window object");

        let handle = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis as i32,
            )
            .expect("failed to set interval");

        Self { handle, closure }
    }

    /// 取消定时器（通常不需要手动调用，drop 时自动清除）
    pub fn cancel(&self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.handle);
        }
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// 墙钟的一次读数（本地时区）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    pub date: NaiveDate,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl Clock {
    /// 读取当前本地时间
    ///
    /// js 的月份是 0 起的，这里转成日历月份。
    pub fn now() -> Self {
        let js = js_sys::Date::new_0();
        let date = NaiveDate::from_ymd_opt(
            js.get_full_year() as i32,
            js.get_month() + 1,
            js.get_date(),
        )
        .unwrap_or_default();
        Self {
            date,
            hour: js.get_hours(),
            minute: js.get_minutes(),
            second: js.get_seconds(),
        }
    }

    /// 当前毫秒时间戳（用作随机种子等）
    pub fn now_millis() -> u64 {
        js_sys::Date::now() as u64
    }
}
