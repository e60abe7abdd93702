//! 批改会话
//!
//! 对外（界面 / 命令行）暴露的唯一入口。每个会话独占自己的图片集合与状态，
//! `run_pipeline` 需要 `&mut self`，同一会话不可能同时运行两次批改。

pub mod image_collection;
pub mod state;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{Credentials, GradingReport, PipelineOutput, QuizImage, RubricMode, RubricSource};
use crate::orchestrator::{PipelineOrchestrator, PipelineStage, ProgressFn};

pub use image_collection::ImageCollection;
pub use state::SessionState;

/// 一次拍摄的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOutcome {
    /// 是否加入了集合（重复时为 `false`）
    pub added: bool,
    /// 拍摄输入框的新编号
    pub next_slot: u64,
}

/// 批改会话
pub struct GradingSession {
    state: SessionState,
    orchestrator: PipelineOrchestrator,
}

impl GradingSession {
    pub fn new(orchestrator: PipelineOrchestrator) -> Self {
        Self {
            state: SessionState::new(),
            orchestrator,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(PipelineOrchestrator::from_config(config))
    }

    // ========== 图片 ==========

    /// 批量加入图片，返回实际加入的数量
    pub fn submit_images(&mut self, images: impl IntoIterator<Item = QuizImage>) -> usize {
        let mut added = 0;
        for image in images {
            let fingerprint = image.fingerprint();
            if self.state.images.add(image) {
                added += 1;
            } else {
                debug!("跳过重复图片 #{}", fingerprint.short());
            }
        }
        info!(
            "✓ 新增 {} 张图片，当前共 {} 张",
            added,
            self.state.images.len()
        );
        added
    }

    /// 接受一张拍摄图片
    ///
    /// 无论是否重复，拍摄编号都会递增，使拍摄输入框重新初始化。
    pub fn capture_image(&mut self, image: QuizImage) -> CaptureOutcome {
        let fingerprint = image.fingerprint();
        let added = self.state.images.add(image);
        if !added {
            debug!("跳过重复拍摄 #{}", fingerprint.short());
        }
        let next_slot = self.state.advance_capture_slot();

        CaptureOutcome { added, next_slot }
    }

    /// 当前拍摄输入框的键
    pub fn capture_slot_key(&self) -> String {
        format!("camera_{}", self.state.capture_slot())
    }

    pub fn capture_slot(&self) -> u64 {
        self.state.capture_slot()
    }

    pub fn remove_image(&mut self, index: usize) -> AppResult<QuizImage> {
        let image = self.state.images.remove_at(index)?;
        info!("🗑️ 已删除第 {} 页", index + 1);
        Ok(image)
    }

    pub fn images(&self) -> &ImageCollection {
        &self.state.images
    }

    // ========== 评分标准 ==========

    pub fn set_rubric_text(&mut self, text: impl Into<String>) {
        self.state.rubric.set_text(text);
    }

    pub fn set_rubric_image(&mut self, image: QuizImage) {
        self.state.rubric.set_image(image);
    }

    pub fn select_rubric_mode(&mut self, mode: RubricMode) {
        self.state.rubric.select_mode(mode);
    }

    pub fn rubric(&self) -> &RubricSource {
        &self.state.rubric
    }

    // ========== 批改 ==========

    /// 运行完整批改流程
    ///
    /// 被拒绝时会话状态保持不变；成功后保存识别文本与报告，并设置完成信号。
    pub async fn run_pipeline(
        &mut self,
        credentials: &Credentials,
        progress: &mut ProgressFn<'_>,
    ) -> AppResult<PipelineOutput> {
        let output = self
            .orchestrator
            .run(&self.state.images, &self.state.rubric, credentials, progress)
            .await?;

        self.state.extracted_text = output.extracted_text.clone();
        self.state.grading_report = Some(output.report.clone());
        self.state.mark_complete();

        Ok(output)
    }

    pub fn pipeline_stage(&self) -> PipelineStage {
        self.orchestrator.stage()
    }

    pub fn extracted_text(&self) -> &str {
        &self.state.extracted_text
    }

    pub fn grading_report(&self) -> Option<&GradingReport> {
        self.state.grading_report.as_ref()
    }

    /// 批改完成信号，每次批改只返回一次 `true`
    pub fn take_completion_signal(&mut self) -> bool {
        self.state.take_completion_signal()
    }

    /// 清空会话（拍摄编号除外）
    pub fn reset_session(&mut self) {
        self.state.reset();
        info!("🔄 会话已重置");
    }
}
