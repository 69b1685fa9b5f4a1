//! 问候语模块
//!
//! 问候文案是墙钟小时的纯函数，五个分段，下界闭、上界开。

/// 问候语：文案 + 表情
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Greeting {
    pub text: &'static str,
    pub emoji: &'static str,
}

/// 按小时分段的问候语
///
/// 分段边界：5 / 12 / 17 / 21（闭开区间）。
/// 传入超出 0..24 的小时按深夜处理。
pub fn greeting(hour: u32) -> Greeting {
    if hour < 5 {
        Greeting {
            text: "Good Night",
            emoji: "🌙",
        }
    } else if hour < 12 {
        Greeting {
            text: "Good Morning",
            emoji: "☀️",
        }
    } else if hour < 17 {
        Greeting {
            text: "Good Afternoon",
            emoji: "🌤️",
        }
    } else if hour < 21 {
        Greeting {
            text: "Good Evening",
            emoji: "🌆",
        }
    } else {
        Greeting {
            text: "Good Night",
            emoji: "🌃",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_hour_maps_to_exactly_one_band() {
        for hour in 0..24 {
            let g = greeting(hour);
            let expected = match hour {
                0..=4 => "Good Night",
                5..=11 => "Good Morning",
                12..=16 => "Good Afternoon",
                17..=20 => "Good Evening",
                _ => "Good Night",
            };
            assert_eq!(g.text, expected, "hour {hour}");
        }
    }

    #[test]
    fn boundaries_are_closed_open_on_lower_bound() {
        assert_eq!(greeting(4).text, "Good Night");
        assert_eq!(greeting(5).text, "Good Morning");
        assert_eq!(greeting(11).text, "Good Morning");
        assert_eq!(greeting(12).text, "Good Afternoon");
        assert_eq!(greeting(16).text, "Good Afternoon");
        assert_eq!(greeting(17).text, "Good Evening");
        assert_eq!(greeting(20).text, "Good Evening");
        assert_eq!(greeting(21).text, "Good Night");
    }

    #[test]
    fn late_night_and_early_night_use_distinct_emoji() {
        assert_eq!(greeting(2).emoji, "🌙");
        assert_eq!(greeting(23).emoji, "🌃");
    }
}
