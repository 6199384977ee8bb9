/// 日志工具模块
///
/// 提供运行阶段日志的辅助函数
use crate::config::Config;
use crate::models::Proforma;
use crate::workflow::StageOutcome;
use tracing::info;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 评价表自动填写");
    info!(
        "启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 门户地址: {}", config.base_url);
    info!(
        "📊 默认评分: {} | 关联策略: {:?} | 网络错误策略: {:?}",
        config.default_rating, config.tie_break, config.network_policy
    );
    info!("{}", "=".repeat(60));
}

/// 记录表单开始处理
pub fn log_stage_start(proforma: &Proforma) {
    info!("\n{}", "=".repeat(60));
    info!("📋 开始处理 {} ({})", proforma.title, proforma.kind);
    info!("{}", "=".repeat(60));
}

/// 记录表单处理结果
pub fn log_stage_complete(proforma: &Proforma, outcome: &StageOutcome) {
    info!("\n{}", "─".repeat(60));
    info!("✓ {} ({}): {}", proforma.title, proforma.kind, outcome);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `outcomes`: 每个表单的处理结果
pub fn print_final_stats(outcomes: &[(Proforma, StageOutcome)]) {
    let submitted: usize = outcomes.iter().map(|(_, o)| o.submitted()).sum();
    let failed: usize = outcomes.iter().map(|(_, o)| o.failed()).sum();

    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    for (proforma, outcome) in outcomes {
        info!("{} ({}): {}", proforma.title, proforma.kind, outcome);
    }
    info!("✅ 已提交: {}", submitted);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Data Structures", 4), "Data...");
        assert_eq!(truncate_text("Lab", 4), "Lab");
    }
}
