//! 自定义评分采集 - 编排层
//!
//! ## 职责
//!
//! 逐个选中讲师，读取其课程名称，并向操作者询问评分。
//!
//! ## 核心功能
//!
//! 1. **扫描讲师**：读取讲师评价页的下拉框
//! 2. **操作者选择**：是否自定义评分（默认否，全部使用默认评分）
//! 3. **逐个采集**：选中回发 → 读取课程 → 刷新进度表 → 询问评分
//! 4. **记录结果**：评分与课程名称，供后续表单使用

use crate::config::Config;
use crate::error::{AppResult, ErrorScope};
use crate::infrastructure::Transport;
use crate::models::proforma::COURSE_LABEL_ID;
use crate::models::{CapturedGrades, OptionEntity, Proforma, Rating};
use crate::services::{option_scanner, PostbackSession};
use crate::ui::{ProgressRow, Reporter, RowStatus};
use crate::workflow::resync;
use tracing::{info, warn};

pub const CAPTURE_PROMPT: &str = "Do you want to give custom grades? (default 'n') [y/n]";
pub const GRADE_PROMPT: &str = "Enter the Grade";
const TABLE_TITLE: &str = "Custom Grade Assignment";
const UNKNOWN_COURSE: &str = "Unknown";

/// 采集讲师评分
///
/// # 返回
/// 操作者拒绝或没有讲师时返回空结果；只有需要终止运行的错误才返回 `Err`
pub async fn capture_ratings<T: Transport, R: Reporter>(
    session: &mut PostbackSession<T>,
    config: &Config,
    reporter: &R,
) -> AppResult<CapturedGrades> {
    let proforma = Proforma::instructor();
    let url = config.page_url(proforma.path)?;
    let body = session.load_authenticated(&url).await?;
    let instructors = option_scanner::scan(&body, proforma.dropdown);

    let mut grades = CapturedGrades::default();

    if instructors.is_empty() {
        info!("没有待评价的讲师，跳过自定义评分");
        return Ok(grades);
    }

    let choice = reporter.prompt_text(CAPTURE_PROMPT)?;
    if !choice.trim().eq_ignore_ascii_case("y") {
        info!("操作者选择不自定义评分，全部使用 {}", config.default_rating);
        return Ok(grades);
    }

    if session.tokens().is_none() {
        resync(session, &url).await?;
    }

    let mut rows = initial_rows(&instructors);

    for (index, instructor) in instructors.iter().enumerate() {
        if grades.ratings.contains(&instructor.value) {
            continue;
        }

        let course = match session.postback(&url, proforma.reveal_form(instructor)).await {
            Ok(body) => option_scanner::scrape_label(&body, COURSE_LABEL_ID),
            Err(e) => {
                let scope = config.network_policy.scope_for(&e);
                if scope == ErrorScope::Run {
                    return Err(e);
                }
                warn!("⚠️ 读取 {} 的课程失败: {}", instructor.label, e);
                reporter.report_failure(&format!(
                    "Could not load course for {}: {}",
                    instructor.label, e
                ));
                if scope == ErrorScope::Stage {
                    break;
                }
                if let Err(e) = resync(session, &url).await {
                    if config.network_policy.scope_for(&e) == ErrorScope::Run {
                        return Err(e);
                    }
                    reporter.report_failure(&format!("Custom grade capture stopped: {}", e));
                    break;
                }
                None
            }
        };

        let course_display = course.clone().unwrap_or_else(|| UNKNOWN_COURSE.to_string());
        rows[index].course = course_display.clone();
        rows[index].status = RowStatus::Pending;
        reporter.render_progress_table(TABLE_TITLE, &rows);
        reporter.report_line(&format!(
            "Grade for {} ({})",
            instructor.label, course_display
        ));
        reporter.report_line(&Rating::legend());

        let rating = prompt_rating(reporter)?;
        rows[index].status = RowStatus::Graded(rating);

        grades.ratings.record(instructor.value.as_str(), rating);
        if let Some(course) = course {
            grades.courses.record(instructor.value.as_str(), course);
        }
        info!("✓ {} ({}) 评分 {}", instructor.label, course_display, rating);
    }

    reporter.render_progress_table(TABLE_TITLE, &rows);
    reporter.report_success("Custom grades recorded.");

    Ok(grades)
}

/// 询问评分，输入无效时重新询问
pub fn prompt_rating<R: Reporter>(reporter: &R) -> AppResult<Rating> {
    loop {
        let input = reporter.prompt_text(GRADE_PROMPT)?;
        if let Ok(rating) = input.parse::<Rating>() {
            return Ok(rating);
        }
    }
}

fn initial_rows(instructors: &[OptionEntity]) -> Vec<ProgressRow> {
    instructors
        .iter()
        .enumerate()
        .map(|(i, instructor)| ProgressRow {
            number: i + 1,
            name: instructor.label.clone(),
            course: "...".to_string(),
            status: RowStatus::Waiting,
        })
        .collect()
}
