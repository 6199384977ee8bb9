//! 评价表提交流程 - 流程层
//!
//! 核心职责：定义"一份评价表"的完整提交流程
//!
//! 流程顺序：
//! 1. GET 表单页，扫描下拉框（为空则表示已填写）
//! 2. 计算每项的评分（关联讲师评分或直接使用讲师评分）
//! 3. 逐项：选中回发 → 完整提交，令牌由上一次响应提供

use std::fmt;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, ErrorScope};
use crate::infrastructure::Transport;
use crate::models::{CapturedGrades, OptionEntity, Proforma, ProformaKind, Rating, RatingSource};
use crate::services::correlation::correlate;
use crate::services::option_scanner;
use crate::services::PostbackSession;
use crate::ui::Reporter;
use crate::workflow::submission_ctx::SubmissionCtx;

/// 一份评价表的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// 下拉框为空，表单已填写
    AlreadyFilled,
    /// 所有项都已尝试
    Completed { submitted: usize, failed: usize },
    /// 中途放弃
    Aborted {
        submitted: usize,
        failed: usize,
        reason: String,
    },
}

impl StageOutcome {
    pub fn submitted(&self) -> usize {
        match self {
            StageOutcome::AlreadyFilled => 0,
            StageOutcome::Completed { submitted, .. } | StageOutcome::Aborted { submitted, .. } => {
                *submitted
            }
        }
    }

    pub fn failed(&self) -> usize {
        match self {
            StageOutcome::AlreadyFilled => 0,
            StageOutcome::Completed { failed, .. } | StageOutcome::Aborted { failed, .. } => *failed,
        }
    }
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageOutcome::AlreadyFilled => write!(f, "already filled"),
            StageOutcome::Completed { submitted, failed } => {
                write!(f, "submitted {}, failed {}", submitted, failed)
            }
            StageOutcome::Aborted {
                submitted,
                failed,
                reason,
            } => write!(
                f,
                "aborted after {} submitted, {} failed: {}",
                submitted, failed, reason
            ),
        }
    }
}

/// 重新加载表单页以取得新令牌
pub async fn resync<T: Transport>(session: &mut PostbackSession<T>, url: &str) -> AppResult<()> {
    session.load_authenticated(url).await?;
    if session.tokens().is_none() {
        return Err(AppError::tokens_missing(url));
    }
    Ok(())
}

/// 评价表提交流程
///
/// - 不持有会话，只借用
/// - 单项失败按网络策略处理：跳过单项 / 放弃表单 / 终止运行
pub struct ProformaFlow<'a, R: Reporter> {
    config: &'a Config,
    reporter: &'a R,
}

impl<'a, R: Reporter> ProformaFlow<'a, R> {
    pub fn new(config: &'a Config, reporter: &'a R) -> Self {
        Self { config, reporter }
    }

    /// 处理一份评价表
    ///
    /// # 返回
    /// 表单级问题返回 `Ok(StageOutcome::Aborted)`；只有需要终止整个运行的错误才返回 `Err`
    pub async fn run<T: Transport>(
        &self,
        session: &mut PostbackSession<T>,
        proforma: &Proforma,
        grades: &CapturedGrades,
    ) -> AppResult<StageOutcome> {
        let url = self.config.page_url(proforma.path)?;
        let body = session.load_authenticated(&url).await?;

        let options = option_scanner::scan(&body, proforma.dropdown);
        if options.is_empty() {
            info!("[{}] 下拉框为空，表单已填写", proforma.kind);
            self.reporter.report_line(proforma.already_filled_message);
            return Ok(StageOutcome::AlreadyFilled);
        }
        if session.tokens().is_none() {
            return Err(AppError::tokens_missing(&url));
        }

        info!("[{}] 找到 {} 个待提交项", proforma.kind, options.len());
        let ratings = self.resolve_ratings(proforma, &options, grades);

        let total = options.len();
        let mut submitted = 0;
        let mut failed = 0;

        for (index, (option, rating)) in options.iter().zip(ratings).enumerate() {
            let ctx = SubmissionCtx::new(proforma.kind, index + 1, total, option.label.as_str());
            let is_last = index + 1 == total;

            match self
                .submit_one(session, &url, proforma, option, rating, &ctx)
                .await
            {
                Ok(()) => {
                    submitted += 1;
                    self.report_submitted(proforma.kind, option, rating);
                    if is_last || session.tokens().is_some() {
                        continue;
                    }
                    // 提交后的页面没有令牌，重新加载
                    warn!("{} 提交响应中没有令牌，重新加载页面", ctx);
                    if let Err(e) = resync(session, &url).await {
                        return self.stop(e, submitted, failed);
                    }
                }
                Err(e) => {
                    failed += 1;
                    error!("{} ❌ 提交失败: {}", ctx, e);
                    if self.config.network_policy.scope_for(&e) != ErrorScope::Item {
                        return self.stop(e, submitted, failed);
                    }
                    self.reporter
                        .report_failure(&format!("Skipped {}: {}", option.label, e));
                    if is_last {
                        continue;
                    }
                    if let Err(e) = resync(session, &url).await {
                        return self.stop(e, submitted, failed);
                    }
                }
            }
        }

        if failed == 0 {
            self.reporter.report_success(proforma.completed_message);
        } else {
            self.reporter.report_failure(&format!(
                "{} finished with {} of {} submissions failed.",
                proforma.title, failed, total
            ));
        }
        Ok(StageOutcome::Completed { submitted, failed })
    }

    /// 计算每项的评分，与 `options` 一一对应
    fn resolve_ratings(
        &self,
        proforma: &Proforma,
        options: &[OptionEntity],
        grades: &CapturedGrades,
    ) -> Vec<Rating> {
        let default = self.config.default_rating;
        match proforma.rating_source {
            RatingSource::Captured => options
                .iter()
                .map(|o| grades.ratings.rating_or(&o.value, default))
                .collect(),
            RatingSource::Correlated => {
                let secondary =
                    correlate(&grades.ratings, &grades.courses, options, self.config.tie_break);
                for ambiguous in secondary.ambiguous() {
                    self.reporter.report_line(&format!(
                        "      [!] '{}' matches {} teachers with different grades",
                        ambiguous.option_label,
                        ambiguous.candidates.len()
                    ));
                }
                options
                    .iter()
                    .map(|o| secondary.rating_or(&o.value, default))
                    .collect()
            }
        }
    }

    /// 选中回发后完整提交
    async fn submit_one<T: Transport>(
        &self,
        session: &mut PostbackSession<T>,
        url: &str,
        proforma: &Proforma,
        option: &OptionEntity,
        rating: Rating,
        ctx: &SubmissionCtx,
    ) -> AppResult<()> {
        info!("{} 📤 选中并提交，评分 {}", ctx, rating);
        session.postback(url, proforma.reveal_form(option)).await?;
        session
            .postback(url, proforma.submission_form(option, rating))
            .await?;
        Ok(())
    }

    fn report_submitted(&self, kind: ProformaKind, option: &OptionEntity, rating: Rating) {
        let line = match kind {
            ProformaKind::Instructor => {
                format!("      [-] Submitted for {} (Grade: {})", option.label, rating)
            }
            _ => format!("      [-] Submitted for {}", option.label),
        };
        self.reporter.report_line(&line);
    }

    /// 放弃当前表单；需要终止运行的错误原样返回
    fn stop(&self, err: AppError, submitted: usize, failed: usize) -> AppResult<StageOutcome> {
        if self.config.network_policy.scope_for(&err) == ErrorScope::Run {
            return Err(err);
        }
        self.reporter.report_failure(&format!("Stage aborted: {}", err));
        Ok(StageOutcome::Aborted {
            submitted,
            failed,
            reason: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_counts() {
        assert_eq!(StageOutcome::AlreadyFilled.submitted(), 0);
        let aborted = StageOutcome::Aborted {
            submitted: 2,
            failed: 1,
            reason: "timeout".to_string(),
        };
        assert_eq!(aborted.submitted(), 2);
        assert_eq!(aborted.failed(), 1);
        assert!(aborted.to_string().contains("timeout"));
    }
}
