//! 展示用日期/时间格式化模块
//!
//! 纯字符串组装，固定英文格式（与源 UI 的 moment 格式对齐），
//! 不依赖运行环境的 locale。"当前时间"由前端从 js 时钟取值后传入。

use chrono::{DateTime, Datelike, NaiveDate, Timelike};

/// 12 小时制的 (小时, 上午/下午) 拆分
fn split_12h(hour: u32) -> (u32, &'static str) {
    let meridiem = if hour < 12 { "AM" } else { "PM" };
    let h12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    (h12, meridiem)
}

/// "hh:mm AM" —— 考勤到达时间格式（小时补零）
pub fn format_time_12h(hour: u32, minute: u32) -> String {
    let (h12, meridiem) = split_12h(hour);
    format!("{h12:02}:{minute:02} {meridiem}")
}

/// "3:05:09 PM" —— 面板时钟格式（小时不补零）
pub fn format_clock(hour: u32, minute: u32, second: u32) -> String {
    let (h12, meridiem) = split_12h(hour);
    format!("{h12}:{minute:02}:{second:02} {meridiem}")
}

/// 英文序数后缀：1st, 2nd, 3rd, 4th, ... 11th–13th 特判
fn ordinal_suffix(day: u32) -> &'static str {
    match day % 100 {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

/// "Saturday, August 30th 2026" —— 面板抬头日期
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{}, {} {}{} {}",
        date.format("%A"),
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}

/// "30 Aug 2026" —— 表格里的短日期
pub fn format_short_date(date: NaiveDate) -> String {
    format!("{:02} {} {}", date.day(), date.format("%b"), date.year())
}

/// "Saturday"
pub fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// "August 2026" —— 月历标题
pub fn month_title(year: i32, month: u32) -> String {
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(first) => format!("{} {}", first.format("%B"), year),
        None => format!("{month:02}/{year}"),
    }
}

/// 历史记录的发送时间："Aug 30, 2026, 09:41 AM"
///
/// 输入是后端给的 RFC3339 字符串；解析失败时原样回显，不让视图崩溃。
pub fn format_history_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => {
            let (h12, meridiem) = split_12h(dt.hour());
            format!(
                "{} {}, {}, {:02}:{:02} {}",
                dt.format("%b"),
                dt.day(),
                dt.year(),
                h12,
                dt.minute(),
                meridiem
            )
        }
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn time_12h_pads_hour_and_minute() {
        assert_eq!(format_time_12h(8, 5), "08:05 AM");
        assert_eq!(format_time_12h(10, 59), "10:59 AM");
    }

    #[test]
    fn noon_and_midnight_render_as_twelve() {
        assert_eq!(format_time_12h(0, 15), "12:15 AM");
        assert_eq!(format_time_12h(12, 0), "12:00 PM");
        assert_eq!(format_clock(0, 0, 0), "12:00:00 AM");
    }

    #[test]
    fn clock_hour_is_not_padded() {
        assert_eq!(format_clock(15, 5, 9), "3:05:09 PM");
        assert_eq!(format_clock(9, 41, 0), "9:41:00 AM");
    }

    #[test]
    fn long_date_uses_english_ordinals() {
        assert_eq!(format_long_date(date(2026, 8, 1)), "Saturday, August 1st 2026");
        assert_eq!(format_long_date(date(2026, 8, 2)), "Sunday, August 2nd 2026");
        assert_eq!(format_long_date(date(2026, 8, 3)), "Monday, August 3rd 2026");
        assert_eq!(
            format_long_date(date(2026, 8, 11)),
            "Tuesday, August 11th 2026"
        );
        assert_eq!(
            format_long_date(date(2026, 8, 21)),
            "Friday, August 21st 2026"
        );
    }

    #[test]
    fn short_date_and_weekday() {
        assert_eq!(format_short_date(date(2026, 8, 5)), "05 Aug 2026");
        assert_eq!(weekday_name(date(2026, 8, 5)), "Wednesday");
    }

    #[test]
    fn month_title_is_name_plus_year() {
        assert_eq!(month_title(2026, 8), "August 2026");
    }

    #[test]
    fn history_timestamp_parses_rfc3339() {
        assert_eq!(
            format_history_timestamp("2026-08-30T09:41:00Z"),
            "Aug 30, 2026, 09:41 AM"
        );
        assert_eq!(
            format_history_timestamp("2026-01-05T15:02:00+00:00"),
            "Jan 5, 2026, 03:02 PM"
        );
    }

    #[test]
    fn history_timestamp_falls_back_to_raw_string() {
        assert_eq!(format_history_timestamp("yesterday"), "yesterday");
        assert_eq!(format_history_timestamp(""), "");
    }
}
