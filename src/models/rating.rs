//! 评分等级
//!
//! 固定的四级量表：A = Strongly Agree ... D = Strongly Disagree

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 评分等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum Rating {
    /// Strongly Agree
    #[default]
    A,
    /// Agree
    B,
    /// Disagree
    C,
    /// Strongly Disagree
    D,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::A, Rating::B, Rating::C, Rating::D];

    /// 表单字段中使用的值
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::A => "A",
            Rating::B => "B",
            Rating::C => "C",
            Rating::D => "D",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Rating::A => "Strongly Agree",
            Rating::B => "Agree",
            Rating::C => "Disagree",
            Rating::D => "Strongly Disagree",
        }
    }

    /// 量表说明，如 `A = Strongly Agree | B = Agree | ...`
    pub fn legend() -> String {
        Self::ALL
            .iter()
            .map(|r| format!("{} = {}", r.as_str(), r.description()))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 无效的评分输入
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not one of A, B, C, D")]
pub struct InvalidRating(pub String);

impl FromStr for Rating {
    type Err = InvalidRating;

    /// 忽略大小写和首尾空白
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Rating::A),
            "B" => Ok(Rating::B),
            "C" => Ok(Rating::C),
            "D" => Ok(Rating::D),
            _ => Err(InvalidRating(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_lowercase_and_whitespace() {
        assert_eq!(" b ".parse::<Rating>().unwrap(), Rating::B);
        assert_eq!("d".parse::<Rating>().unwrap(), Rating::D);
    }

    #[test]
    fn test_parse_rejects_outside_scale() {
        assert!("E".parse::<Rating>().is_err());
        assert!("".parse::<Rating>().is_err());
        assert!("AB".parse::<Rating>().is_err());
    }

    #[test]
    fn test_invalid_rating_message() {
        let err = "E".parse::<Rating>().unwrap_err();
        assert_eq!(err.to_string(), "'E' is not one of A, B, C, D");
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_legend() {
        assert_eq!(
            Rating::legend(),
            "A = Strongly Agree | B = Agree | C = Disagree | D = Strongly Disagree"
        );
    }
}
