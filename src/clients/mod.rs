//! 外部能力客户端
//!
//! 核心流程只依赖下面两个 trait；具体实现基于 `async-openai`，
//! 可对接任何兼容 OpenAI Chat Completions 的服务（OpenAI、Gemini 等）。

pub mod grading_client;
pub mod ocr_client;
pub mod prompts;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::QuizImage;

pub use grading_client::ChatGradingClient;
pub use ocr_client::VisionOcrClient;

/// OCR 能力：图片 → 文本
#[async_trait]
pub trait OcrCapability: Send + Sync {
    /// 识别图片中的全部文字，`image` 携带原始字节与 MIME 类型
    async fn transcribe(&self, image: &QuizImage, credential: &str) -> Result<String>;
}

/// 批改能力：(学生答案, 评分标准) → 批改报告
#[async_trait]
pub trait GradingCapability: Send + Sync {
    async fn grade_text(
        &self,
        student_text: &str,
        rubric_text: &str,
        credential: &str,
    ) -> Result<String>;
}
