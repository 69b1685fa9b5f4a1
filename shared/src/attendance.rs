//! 模拟考勤模块
//!
//! 纯客户端生成当月考勤记录（无后端依赖）。随机性收拢在
//! `RandomSource` 后面，测试可以注入脚本化序列断言精确输出。
//!
//! 生成分布（非周末工作日）：80% 出勤 / 15% 缺勤 / 5% 周末异常；
//! 出勤时在 08:00–10:59 均匀抽到达时间，9 点及以后改判迟到。

use crate::date::format_time_12h;
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;

// =========================================================
// 领域类型
// =========================================================

/// 单日考勤状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    Weekend,
}

impl AttendanceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Late => "Late",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Weekend => "Weekend",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 一条考勤记录
///
/// 不变量：每个日期至多一条非周末记录。
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    /// 到达时间（如 "08:42 AM"）；缺勤与周末为空串
    pub time: String,
}

// =========================================================
// 随机源
// =========================================================

/// 可注入的随机源：返回 [0,1) 区间的 f64
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

/// 可播种的默认随机源
///
/// 生产路径用墙钟毫秒播种；测试用固定种子得到可复现序列。
pub struct SeededRandom(SmallRng);

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}

// =========================================================
// 月度生成
// =========================================================

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(30)
}

/// 为给定月份生成完整的模拟考勤记录
///
/// 周六/周日恒为 Weekend 且时间为空。每个工作日消耗一次状态抽样；
/// 出勤时再消耗小时、分钟各一次抽样（顺序固定，便于脚本化测试）。
pub fn generate_month(year: i32, month: u32, rng: &mut dyn RandomSource) -> Vec<AttendanceRecord> {
    let mut records = Vec::new();

    for day in 1..=days_in_month(year, month) {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };

        if is_weekend(date) {
            records.push(AttendanceRecord {
                date,
                status: AttendanceStatus::Weekend,
                time: String::new(),
            });
            continue;
        }

        let roll = rng.next_f64();
        let record = if roll < 0.8 {
            // 08:00–10:59 均匀到达；9 点及以后改判迟到
            let hour = 8 + (rng.next_f64() * 3.0) as u32;
            let minute = ((rng.next_f64() * 60.0) as u32).min(59);
            let status = if hour >= 9 {
                AttendanceStatus::Late
            } else {
                AttendanceStatus::Present
            };
            AttendanceRecord {
                date,
                status,
                time: format_time_12h(hour, minute),
            }
        } else if roll < 0.95 {
            AttendanceRecord {
                date,
                status: AttendanceStatus::Absent,
                time: String::new(),
            }
        } else {
            // 工作日的周末异常（源数据演示用的 5% 分支）
            AttendanceRecord {
                date,
                status: AttendanceStatus::Weekend,
                time: String::new(),
            }
        };
        records.push(record);
    }

    records
}

// =========================================================
// 统计
// =========================================================

/// 月度汇总，记录集变化后重算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttendanceStats {
    pub present: usize,
    pub late: usize,
    pub absent: usize,
    /// 非周末记录数
    pub working_days: usize,
    /// 出勤率 = present / working_days，四舍五入为整数百分比
    pub percentage: u32,
}

impl AttendanceStats {
    pub fn compute(records: &[AttendanceRecord]) -> Self {
        let mut stats = Self::default();
        for record in records {
            match record.status {
                AttendanceStatus::Present => stats.present += 1,
                AttendanceStatus::Late => stats.late += 1,
                AttendanceStatus::Absent => stats.absent += 1,
                AttendanceStatus::Weekend => continue,
            }
            stats.working_days += 1;
        }
        if stats.working_days > 0 {
            stats.percentage =
                ((stats.present as f64 / stats.working_days as f64) * 100.0).round() as u32;
        }
        stats
    }
}

// =========================================================
// 打卡
// =========================================================

/// 打卡失败原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkError {
    AlreadyMarked,
}

impl fmt::Display for MarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkError::AlreadyMarked => write!(f, "Attendance already marked for today"),
        }
    }
}

impl std::error::Error for MarkError {}

/// 当天是否已有非周末记录（有则不可再打卡）
pub fn already_marked(records: &[AttendanceRecord], today: NaiveDate) -> bool {
    records
        .iter()
        .any(|r| r.date == today && r.status != AttendanceStatus::Weekend)
}

/// 打卡入口的放行判定：日历上选中的必须是今天，且今天尚未打卡
pub fn can_mark(records: &[AttendanceRecord], selected: NaiveDate, today: NaiveDate) -> bool {
    selected == today && !already_marked(records, today)
}

/// 为今天补一条打卡记录：80% 出勤 / 20% 迟到，时间取当前时刻
pub fn mark_today(
    records: &[AttendanceRecord],
    today: NaiveDate,
    now_time: String,
    rng: &mut dyn RandomSource,
) -> Result<AttendanceRecord, MarkError> {
    if already_marked(records, today) {
        return Err(MarkError::AlreadyMarked);
    }
    let status = if rng.next_f64() > 0.2 {
        AttendanceStatus::Present
    } else {
        AttendanceStatus::Late
    };
    Ok(AttendanceRecord {
        date: today,
        status,
        time: now_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 回放固定序列的随机源，耗尽后返回 0
    struct ScriptedRandom {
        values: Vec<f64>,
        next: usize,
    }

    impl ScriptedRandom {
        fn new(values: Vec<f64>) -> Self {
            Self { values, next: 0 }
        }
    }

    impl RandomSource for ScriptedRandom {
        fn next_f64(&mut self) -> f64 {
            let v = self.values.get(self.next).copied().unwrap_or(0.0);
            self.next += 1;
            v
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // =========================================================
    // 月度生成
    // =========================================================

    #[test]
    fn weekends_are_exact_for_generated_month() {
        let mut rng = SeededRandom::from_seed(7);
        // 2026-08-01 是周六
        let records = generate_month(2026, 8, &mut rng);
        assert_eq!(records.len(), 31);

        for record in &records {
            if matches!(record.date.weekday(), Weekday::Sat | Weekday::Sun) {
                assert_eq!(record.status, AttendanceStatus::Weekend, "{}", record.date);
                assert!(record.time.is_empty());
            }
        }
    }

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let mut a = SeededRandom::from_seed(42);
        let mut b = SeededRandom::from_seed(42);
        assert_eq!(
            generate_month(2026, 2, &mut a),
            generate_month(2026, 2, &mut b)
        );
    }

    #[test]
    fn scripted_draws_control_status_and_time() {
        // 2026-06 从周一开始；前三个工作日脚本化：
        // 日1: 出勤 08:00；日2: 出勤但 hour=9 → 迟到；日3: 缺勤
        let mut rng = ScriptedRandom::new(vec![
            0.0, 0.0, 0.0, // Mon: present, hour 8, minute 0
            0.5, 0.5, 0.5, // Tue: present branch, hour 9 -> late, minute 30
            0.9, // Wed: absent
        ]);
        let records = generate_month(2026, 6, &mut rng);

        assert_eq!(records[0].date, date(2026, 6, 1));
        assert_eq!(records[0].status, AttendanceStatus::Present);
        assert_eq!(records[0].time, "08:00 AM");

        assert_eq!(records[1].status, AttendanceStatus::Late);
        assert_eq!(records[1].time, "09:30 AM");

        assert_eq!(records[2].status, AttendanceStatus::Absent);
        assert!(records[2].time.is_empty());
    }

    #[test]
    fn weekday_anomaly_branch_produces_weekend_status() {
        let mut rng = ScriptedRandom::new(vec![0.96]);
        let records = generate_month(2026, 6, &mut rng);
        assert_eq!(records[0].status, AttendanceStatus::Weekend);
        assert!(records[0].time.is_empty());
    }

    #[test]
    fn month_lengths_follow_the_calendar() {
        let mut rng = SeededRandom::from_seed(1);
        assert_eq!(generate_month(2026, 2, &mut rng).len(), 28);
        assert_eq!(generate_month(2028, 2, &mut rng).len(), 29);
        assert_eq!(generate_month(2026, 4, &mut rng).len(), 30);
        assert_eq!(generate_month(2026, 12, &mut rng).len(), 31);
    }

    // =========================================================
    // 统计
    // =========================================================

    #[test]
    fn stats_count_only_non_weekend_records() {
        let records = vec![
            AttendanceRecord {
                date: date(2026, 8, 3),
                status: AttendanceStatus::Present,
                time: "08:10 AM".to_string(),
            },
            AttendanceRecord {
                date: date(2026, 8, 4),
                status: AttendanceStatus::Late,
                time: "09:20 AM".to_string(),
            },
            AttendanceRecord {
                date: date(2026, 8, 5),
                status: AttendanceStatus::Absent,
                time: String::new(),
            },
            AttendanceRecord {
                date: date(2026, 8, 8),
                status: AttendanceStatus::Weekend,
                time: String::new(),
            },
        ];
        let stats = AttendanceStats::compute(&records);
        assert_eq!(stats.present, 1);
        assert_eq!(stats.late, 1);
        assert_eq!(stats.absent, 1);
        assert_eq!(stats.working_days, 3);
        assert_eq!(stats.percentage, 33);
    }

    #[test]
    fn stats_on_empty_or_weekend_only_month_are_zero() {
        assert_eq!(AttendanceStats::compute(&[]).percentage, 0);
        let weekend_only = vec![AttendanceRecord {
            date: date(2026, 8, 1),
            status: AttendanceStatus::Weekend,
            time: String::new(),
        }];
        let stats = AttendanceStats::compute(&weekend_only);
        assert_eq!(stats.working_days, 0);
        assert_eq!(stats.percentage, 0);
    }

    // =========================================================
    // 打卡
    // =========================================================

    #[test]
    fn mark_rejected_when_non_weekend_record_exists() {
        let today = date(2026, 8, 3);
        let records = vec![AttendanceRecord {
            date: today,
            status: AttendanceStatus::Absent,
            time: String::new(),
        }];
        let mut rng = ScriptedRandom::new(vec![0.9]);
        assert_eq!(
            mark_today(&records, today, "10:00 AM".to_string(), &mut rng),
            Err(MarkError::AlreadyMarked)
        );
    }

    #[test]
    fn mark_allowed_over_weekend_anomaly_record() {
        let today = date(2026, 8, 3);
        let records = vec![AttendanceRecord {
            date: today,
            status: AttendanceStatus::Weekend,
            time: String::new(),
        }];
        let mut rng = ScriptedRandom::new(vec![0.9]);
        let marked = mark_today(&records, today, "10:00 AM".to_string(), &mut rng).unwrap();
        assert_eq!(marked.status, AttendanceStatus::Present);
        assert_eq!(marked.time, "10:00 AM");
    }

    #[test]
    fn mark_allowed_only_when_today_is_selected() {
        let today = date(2026, 8, 20);
        assert!(can_mark(&[], today, today));
        // 选中别的日子时即便今天没打卡也不放行
        assert!(!can_mark(&[], date(2026, 8, 5), today));
    }

    #[test]
    fn mark_blocked_once_today_has_a_record() {
        let today = date(2026, 8, 20);
        let records = vec![AttendanceRecord {
            date: today,
            status: AttendanceStatus::Present,
            time: "08:30 AM".to_string(),
        }];
        assert!(!can_mark(&records, today, today));

        // 周末异常记录不算已打卡
        let anomaly = vec![AttendanceRecord {
            date: today,
            status: AttendanceStatus::Weekend,
            time: String::new(),
        }];
        assert!(can_mark(&anomaly, today, today));
    }

    #[test]
    fn mark_uses_biased_present_late_split() {
        let today = date(2026, 8, 3);
        let mut present_rng = ScriptedRandom::new(vec![0.21]);
        let mut late_rng = ScriptedRandom::new(vec![0.2]);
        assert_eq!(
            mark_today(&[], today, "09:00 AM".to_string(), &mut present_rng)
                .unwrap()
                .status,
            AttendanceStatus::Present
        );
        assert_eq!(
            mark_today(&[], today, "09:00 AM".to_string(), &mut late_rng)
                .unwrap()
                .status,
            AttendanceStatus::Late
        );
    }
}
