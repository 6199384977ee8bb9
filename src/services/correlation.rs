//! 评分关联 - 业务能力层
//!
//! 将讲师评分通过课程名称映射到其他表单的选项上，纯函数，无 I/O

use crate::models::{
    AmbiguousMatch, CourseCorrelation, OptionEntity, Rating, RatingAssignment, SecondaryRatingMap,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, warn};

/// 多个讲师匹配同一选项且评分不一致时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// 按采集顺序，最后一个匹配的讲师生效
    #[default]
    LastWins,
    /// 不赋值（使用默认评分），并记录为歧义
    FlagAmbiguous,
}

impl FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last_wins" => Ok(TieBreak::LastWins),
            "flag_ambiguous" => Ok(TieBreak::FlagAmbiguous),
            other => Err(format!("unknown tie-break policy '{}'", other)),
        }
    }
}

/// 两个名称是否互为子串（忽略大小写）
///
/// 空名称不参与匹配
pub fn labels_overlap(course: &str, option_label: &str) -> bool {
    let course = course.trim().to_lowercase();
    let option_label = option_label.trim().to_lowercase();
    if course.is_empty() || option_label.is_empty() {
        return false;
    }
    option_label.contains(&course) || course.contains(&option_label)
}

/// 计算其他表单选项的评分
///
/// # 参数
/// - `ratings`: 讲师评分（按采集顺序遍历）
/// - `courses`: 讲师课程名称
/// - `secondary`: 其他表单的选项
/// - `tie_break`: 评分冲突时的处理方式
///
/// # 返回
/// 只包含匹配到的选项；未匹配的选项由调用方使用默认评分
pub fn correlate(
    ratings: &RatingAssignment,
    courses: &CourseCorrelation,
    secondary: &[OptionEntity],
    tie_break: TieBreak,
) -> SecondaryRatingMap {
    // option value -> [(instructor value, rating)]，按采集顺序
    let mut matches: BTreeMap<&str, Vec<(&str, Rating)>> = BTreeMap::new();

    for (instructor, rating) in ratings.iter() {
        let Some(course) = courses.get(instructor) else {
            continue;
        };
        for option in secondary {
            if labels_overlap(course, &option.label) {
                debug!("关联: {} ({}) -> {} = {}", instructor, course, option.label, rating);
                matches
                    .entry(option.value.as_str())
                    .or_default()
                    .push((instructor, rating));
            }
        }
    }

    let mut resolved = BTreeMap::new();
    let mut ambiguous = Vec::new();

    for option in secondary {
        let Some(candidates) = matches.get(option.value.as_str()) else {
            continue;
        };
        let Some(&(_, last)) = candidates.last() else {
            continue;
        };

        let conflicting = candidates.iter().any(|(_, r)| *r != last);
        if conflicting {
            warn!(
                "⚠️ 选项 '{}' 同时匹配 {} 位讲师且评分不一致",
                option.label,
                candidates.len()
            );
            ambiguous.push(AmbiguousMatch {
                option_value: option.value.clone(),
                option_label: option.label.clone(),
                candidates: candidates.iter().map(|(v, _)| v.to_string()).collect(),
            });
            if tie_break == TieBreak::FlagAmbiguous {
                continue;
            }
        }
        resolved.insert(option.value.clone(), last);
    }

    SecondaryRatingMap::new(resolved, ambiguous)
}
