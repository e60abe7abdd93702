use anyhow::Result;
use clap::Parser;
use quiz_grader::models::{load_image_file, load_images_from_dir, load_job};
use quiz_grader::utils::logging;
use quiz_grader::{AppError, Config, Credentials, GradingSession, ImageSource};
use std::path::PathBuf;
use tracing::{info, warn};

/// 拍照试卷自动批改
#[derive(Debug, Parser)]
#[command(name = "quiz-grader", version, about)]
struct Cli {
    /// 试卷图片（按页序）
    images: Vec<PathBuf>,

    /// 批改任务文件（TOML）
    #[arg(long)]
    job: Option<PathBuf>,

    /// 读取文件夹中的所有图片（按文件名排序）
    #[arg(long)]
    dir: Option<PathBuf>,

    /// 评分标准文本
    #[arg(long, conflicts_with_all = ["rubric_file", "rubric_image"])]
    rubric_text: Option<String>,

    /// 评分标准文本文件
    #[arg(long, conflicts_with = "rubric_image")]
    rubric_file: Option<PathBuf>,

    /// 评分标准图片
    #[arg(long)]
    rubric_image: Option<PathBuf>,

    /// OCR 密钥（默认读取 GEMINI_API_KEY）
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    ocr_key: Option<String>,

    /// 批改密钥（默认读取 OPENAI_API_KEY）
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    grading_key: Option<String>,

    /// 将识别文本和报告写入文件
    #[arg(long)]
    output: Option<String>,

    /// 以 JSON 输出结果
    #[arg(long)]
    json: bool,

    /// 显示详细日志
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::from_env();
    config.verbose_logging |= cli.verbose;
    if cli.output.is_some() {
        config.output_log_file = cli.output.clone();
    }

    // 初始化日志
    logging::init(config.verbose_logging);
    config.validate()?;

    let mut session = GradingSession::from_config(&config);

    // ========== 收集试卷图片 ==========
    if let Some(job_path) = &cli.job {
        let job = load_job(job_path).await?;
        for path in &job.pages {
            session.submit_images([load_image_file(path, ImageSource::Upload).await?]);
        }
        // load_job 已保证 text 与 image 不会同时出现
        match (job.rubric.text, &job.rubric.image) {
            (Some(text), _) => session.set_rubric_text(text),
            (None, Some(path)) => {
                session.set_rubric_image(load_image_file(path, ImageSource::Upload).await?)
            }
            (None, None) => {}
        }
    }
    if let Some(dir) = &cli.dir {
        session.submit_images(load_images_from_dir(dir).await?);
    }
    for path in &cli.images {
        session.submit_images([load_image_file(path, ImageSource::Upload).await?]);
    }

    // ========== 评分标准（命令行优先于任务文件） ==========
    if let Some(text) = &cli.rubric_text {
        session.set_rubric_text(text.clone());
    } else if let Some(path) = &cli.rubric_file {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        session.set_rubric_text(text);
    } else if let Some(path) = &cli.rubric_image {
        session.set_rubric_image(load_image_file(path, ImageSource::Upload).await?);
    }

    let env_credentials = Credentials::from_env();
    let credentials = Credentials::new(
        cli.ocr_key.unwrap_or(env_credentials.ocr_api_key),
        cli.grading_key.unwrap_or(env_credentials.grading_api_key),
    );

    // ========== 批改 ==========
    let output = session
        .run_pipeline(&credentials, &mut |done, total| {
            info!("⏳ 识别进度: {}/{}", done, total);
        })
        .await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("========== 识别文本 ==========");
        println!("{}", output.extracted_text);
        println!("\n========== 批改报告 ==========");
        println!("{}", output.report.content());
        if !output.report.is_error() {
            if let Some(score) = output.report.total_score() {
                println!("\n最终得分: {}", score);
            }
        }
    }

    if output.report.is_error() {
        warn!("⚠️ 批改失败，以上报告为错误信息");
    }

    if let Some(log_file) = &config.output_log_file {
        logging::write_run_log(log_file, &output)?;
        info!("日志已保存至: {}", log_file);
    }

    if session.take_completion_signal() {
        info!("🎉 批改完成");
    }

    Ok(())
}
