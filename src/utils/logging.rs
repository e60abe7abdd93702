use crate::error::{AppError, AppResult};
use crate::models::PipelineOutput;
/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则为 `info`（详细模式下为 `debug`）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 将一次批改结果写入日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
/// - `output`: 批改产出
pub fn write_run_log(log_file_path: &str, output: &PipelineOutput) -> AppResult<()> {
    let content = format!(
        "{}\n批改日志 - {}\n{}\n\n[识别文本]\n{}\n\n[批改报告]\n{}\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60),
        output.extracted_text,
        output.report.content()
    );
    fs::write(log_file_path, content).map_err(|e| AppError::file_write_failed(log_file_path, e))?;
    Ok(())
}

/// 记录批改开始信息
///
/// # 参数
/// - `total_pages`: 总页数
/// - `max_concurrent`: 最大并发数
pub fn log_run_start(total_pages: usize, max_concurrent: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 开始批改 - 共 {} 页", total_pages);
    info!("📊 最大并发识别数: {}", max_concurrent);
    info!("{}", "=".repeat(60));
}

/// 记录识别阶段完成信息
///
/// # 参数
/// - `success`: 成功页数
/// - `total`: 总页数
pub fn log_extraction_complete(success: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 识别完成: 成功 {}/{}", success, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `output`: 批改产出
/// - `total_pages`: 总页数
pub fn print_final_stats(output: &PipelineOutput, total_pages: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 批改完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!(
        "✅ 识别成功: {}/{}",
        total_pages - output.failed_pages.len(),
        total_pages
    );
    if !output.failed_pages.is_empty() {
        info!("❌ 识别失败的页: {:?}", output.failed_pages);
    }
    match output.report.total_score() {
        Some(score) if !output.report.is_error() => info!("🏆 总分: {}", score),
        _ => info!("🏆 总分: 未找到"),
    }
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
    use crate::models::GradingReport;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("第一题答案", 3), "第一题...");
        assert_eq!(truncate_text("short", 10), "short");
    }

    #[test]
    fn test_write_run_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let output = PipelineOutput {
            extracted_text: "Q1: 42".to_string(),
            report: GradingReport::new("TOTAL SCORE: 3/3"),
            failed_pages: vec![],
        };

        write_run_log(path.to_str().unwrap(), &output).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[识别文本]\nQ1: 42"));
        assert!(written.contains("[批改报告]\nTOTAL SCORE: 3/3"));
    }
}
