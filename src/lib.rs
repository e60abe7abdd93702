//! # Quiz Grader
//!
//! 拍照试卷自动批改：识别多页试卷图片，按评分标准批改并给出逐题反馈与总分。
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 外部能力层（Clients）
//! - `clients/` - 只暴露"识别"和"批改"两个能力
//! - `OcrCapability` / `GradingCapability` - 核心流程依赖的抽象
//! - `VisionOcrClient` / `ChatGradingClient` - 基于 `async-openai` 的实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单张图片或单次批改
//! - `ExtractionService` - 识别能力，失败转换为错误标记
//! - `GradingService` - 批改能力，失败转换为 `Error:` 报告
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一页"的处理流程
//! - `PageCtx` - 上下文封装（页号 + 指纹）
//! - `PageFlow` - 单页识别与日志
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/pipeline` - 批改流程状态机
//! - `orchestrator/batch_extractor` - 并发识别，保持页序
//!
//! ### ⑤ 会话层（Session）
//! - `session/` - 去重图片集合、评分标准、批改结果与拍摄编号
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod session;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, RejectReason};
pub use models::{
    Credentials, ExtractionResult, GradingReport, ImageSource, PipelineOutput, QuizImage,
    RubricMode, RubricSource,
};
pub use orchestrator::{PipelineOrchestrator, PipelineStage};
pub use session::{GradingSession, ImageCollection};
