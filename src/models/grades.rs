//! 评分映射
//!
//! - `RatingAssignment`：讲师 value → 评分（按采集顺序，写入后不可覆盖）
//! - `CourseCorrelation`：讲师 value → 课程名称
//! - `SecondaryRatingMap`：其他表单的 value → 评分（由关联引擎生成，只读）

use crate::models::rating::Rating;
use std::collections::BTreeMap;

/// 讲师评分（保持采集顺序）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingAssignment {
    entries: Vec<(String, Rating)>,
}

impl RatingAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录评分；同一 value 已有评分时保持原值并返回 `false`
    pub fn record(&mut self, value: impl Into<String>, rating: Rating) -> bool {
        let value = value.into();
        if self.contains(&value) {
            return false;
        }
        self.entries.push((value, rating));
        true
    }

    pub fn get(&self, value: &str) -> Option<Rating> {
        self.entries
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, r)| *r)
    }

    /// 取评分，没有时返回默认值
    pub fn rating_or(&self, value: &str, default: Rating) -> Rating {
        self.get(value).unwrap_or(default)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.entries.iter().any(|(v, _)| v == value)
    }

    /// 按采集顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, Rating)> {
        self.entries.iter().map(|(v, r)| (v.as_str(), *r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 讲师对应的课程名称
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseCorrelation {
    entries: Vec<(String, String)>,
}

impl CourseCorrelation {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录课程名称，重复记录时覆盖
    pub fn record(&mut self, value: impl Into<String>, course: impl Into<String>) {
        let value = value.into();
        let course = course.into();
        match self.entries.iter_mut().find(|(v, _)| *v == value) {
            Some(entry) => entry.1 = course,
            None => self.entries.push((value, course)),
        }
    }

    pub fn get(&self, value: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, c)| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 自定义评分阶段的结果，由驱动器独占
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedGrades {
    pub ratings: RatingAssignment,
    pub courses: CourseCorrelation,
}

impl CapturedGrades {
    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

/// 一个被多个讲师同时匹配的选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousMatch {
    pub option_value: String,
    pub option_label: String,
    /// 匹配到的讲师 value，按处理顺序
    pub candidates: Vec<String>,
}

/// 其他表单选项的评分映射
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecondaryRatingMap {
    ratings: BTreeMap<String, Rating>,
    ambiguous: Vec<AmbiguousMatch>,
}

impl SecondaryRatingMap {
    pub fn new(ratings: BTreeMap<String, Rating>, ambiguous: Vec<AmbiguousMatch>) -> Self {
        Self { ratings, ambiguous }
    }

    pub fn get(&self, value: &str) -> Option<Rating> {
        self.ratings.get(value).copied()
    }

    pub fn rating_or(&self, value: &str, default: Rating) -> Rating {
        self.get(value).unwrap_or(default)
    }

    pub fn ambiguous(&self) -> &[AmbiguousMatch] {
        &self.ambiguous
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}
