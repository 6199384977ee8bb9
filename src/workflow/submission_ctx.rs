//! 提交上下文
//!
//! 封装"我正在提交哪份表单的第几项"这一信息

use crate::models::ProformaKind;
use std::fmt::Display;

/// 提交上下文（仅用于日志与提示）
#[derive(Debug, Clone)]
pub struct SubmissionCtx {
    pub kind: ProformaKind,
    /// 当前项序号（从 1 开始）
    pub index: usize,
    pub total: usize,
    pub label: String,
}

impl SubmissionCtx {
    pub fn new(kind: ProformaKind, index: usize, total: usize, label: impl Into<String>) -> Self {
        Self {
            kind,
            index,
            total,
            label: label.into(),
        }
    }
}

impl Display for SubmissionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} #{}/{} {}]",
            self.kind, self.index, self.total, self.label
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let ctx = SubmissionCtx::new(ProformaKind::OnlineLearning, 2, 5, "Compilers");
        assert_eq!(ctx.to_string(), "[p10a #2/5 Compilers]");
    }
}
