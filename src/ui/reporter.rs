use crate::error::AppResult;
use crate::models::Rating;

/// 评分进度表中一行的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    /// 尚未轮到
    Waiting,
    /// 正在等待输入
    Pending,
    /// 已评分
    Graded(Rating),
}

/// 评分进度表的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRow {
    /// 序号（从 1 开始）
    pub number: usize,
    pub name: String,
    pub course: String,
    pub status: RowStatus,
}

/// 终端交互能力
///
/// `prompt_*` 在输入流关闭时返回错误，调用方据此结束运行
pub trait Reporter {
    fn report_line(&self, text: &str);
    fn report_success(&self, text: &str);
    fn report_failure(&self, text: &str);
    fn prompt_text(&self, label: &str) -> AppResult<String>;
    fn prompt_secret(&self, label: &str) -> AppResult<String>;
    fn render_progress_table(&self, title: &str, rows: &[ProgressRow]);
}
