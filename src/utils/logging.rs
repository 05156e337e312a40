/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use crate::config::Config;
use crate::models::StudentRecord;
use crate::orchestrator::BatchReport;
use tracing::info;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 班级成绩汇总");
    info!("📚 班级: {} | 年份: {} | 考试: {}", config.section, config.year, config.exam_id);
    info!("📊 最大并发请求数: {}", config.max_concurrent_requests);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_complete(report: &BatchReport) {
    info!("{}", "─".repeat(60));
    info!(
        "✓ 批次完成: 共 {} 个学号 | 成绩 {} | 扣留 {} | 无成绩 {} | 失败 {}",
        report.total, report.found, report.withheld, report.not_found, report.failed
    );
    info!("{}", "─".repeat(60));
}

/// 打印排名前 `top` 名
pub fn log_ranking(records: &[StudentRecord], top: usize) {
    for (rank, record) in records.iter().take(top).enumerate() {
        info!(
            "{:>3}. {} {:<30} SGPA {:>8} {}",
            rank + 1,
            record.identifier,
            truncate_text(&record.name, 30),
            record.score,
            record.verdict()
        );
    }
}

/// 打印最终统计信息
pub fn print_final_stats(records: usize, output_path: &str) {
    info!("{}", "=".repeat(60));
    info!("📊 全部处理完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("✅ 导出记录: {}", records);
    info!("📄 导出文件: {}", output_path);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
