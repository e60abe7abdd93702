//! 批改流程 - 编排层
//!
//! ## 状态
//!
//! ```text
//! Idle → ValidatingInput → ResolvingRubric → ExtractingPages → Grading → Complete
//!              ↓                  ↓
//!           Rejected            Halted
//! ```
//!
//! - 校验失败在任何外部调用之前返回，不产生副作用
//! - 评分标准解析失败是致命的
//! - 单页识别失败不中断批次，错误标记原样参与批改
//! - 批改失败以 `Error:` 报告的形式返回
//! - 任何外部调用都不重试

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::clients::{ChatGradingClient, GradingCapability, OcrCapability, VisionOcrClient};
use crate::config::Config;
use crate::error::{AppResult, RejectReason};
use crate::models::{join_pages, Credentials, PipelineOutput, QuizImage, RubricSource};
use crate::orchestrator::batch_extractor::BatchExtractor;
use crate::orchestrator::ProgressFn;
use crate::services::{ExtractionService, GradingService};
use crate::session::ImageCollection;
use crate::utils::logging::{log_extraction_complete, log_run_start, print_final_stats};
use crate::workflow::PageFlow;

/// 流程所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    ValidatingInput,
    ResolvingRubric,
    ExtractingPages,
    Grading,
    Complete,
    /// 输入校验未通过
    Rejected,
    /// 评分标准解析失败
    Halted,
}

/// 批改流程编排器
pub struct PipelineOrchestrator {
    extraction: Arc<ExtractionService>,
    batch: BatchExtractor,
    grading: GradingService,
    max_concurrent_pages: usize,
    max_pages: usize,
    max_image_bytes: usize,
    stage: PipelineStage,
}

impl PipelineOrchestrator {
    /// 使用给定的外部能力创建编排器
    pub fn new(
        config: &Config,
        ocr: Arc<dyn OcrCapability>,
        grader: Arc<dyn GradingCapability>,
    ) -> Self {
        let timeout = config.request_timeout();
        let extraction = Arc::new(ExtractionService::new(ocr, timeout));
        let flow = PageFlow::new(extraction.clone(), config.verbose_logging);

        Self {
            extraction,
            batch: BatchExtractor::new(flow, config.max_concurrent_pages),
            grading: GradingService::new(grader, timeout),
            max_concurrent_pages: config.max_concurrent_pages,
            max_pages: config.max_pages,
            max_image_bytes: config.max_image_bytes,
            stage: PipelineStage::Idle,
        }
    }

    /// 使用 OpenAI 兼容端点创建编排器
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config,
            Arc::new(VisionOcrClient::new(config)),
            Arc::new(ChatGradingClient::new(config)),
        )
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// 执行一次完整批改
    pub async fn run(
        &mut self,
        images: &ImageCollection,
        rubric: &RubricSource,
        credentials: &Credentials,
        progress: &mut ProgressFn<'_>,
    ) -> AppResult<PipelineOutput> {
        // ========== 校验输入 ==========
        self.transition(PipelineStage::ValidatingInput);
        if let Err(reason) = self.validate(images, rubric, credentials) {
            warn!("⚠️ 批改请求被拒绝: {}", reason);
            self.transition(PipelineStage::Rejected);
            return Err(reason.into());
        }

        let pages: Vec<QuizImage> = images.iter().cloned().collect();
        log_run_start(pages.len(), self.max_concurrent_pages);

        // ========== 解析评分标准 ==========
        self.transition(PipelineStage::ResolvingRubric);
        info!("📝 正在解析评分标准 ({}模式)...", rubric.active_mode());

        let extraction = self.extraction.clone();
        let ocr_key = credentials.ocr_api_key.clone();
        let rubric_text = match rubric
            .resolve_text(move |image| async move { extraction.extract(&image, &ocr_key).await })
            .await
        {
            Ok(text) => text,
            Err(e) => {
                error!("❌ 评分标准解析失败，终止批改: {}", e);
                self.transition(PipelineStage::Halted);
                return Err(RejectReason::RubricResolutionFailed(e).into());
            }
        };
        debug!("评分标准长度: {} 字符", rubric_text.chars().count());

        // ========== 识别所有页面 ==========
        self.transition(PipelineStage::ExtractingPages);
        let results = self
            .batch
            .extract_all(&pages, &credentials.ocr_api_key, progress)
            .await;

        let failed_pages: Vec<usize> = results
            .iter()
            .enumerate()
            .filter(|(_, result)| result.is_failed())
            .map(|(index, _)| index + 1)
            .collect();
        log_extraction_complete(results.len() - failed_pages.len(), results.len());

        let extracted_text = join_pages(&results);

        // ========== 批改 ==========
        self.transition(PipelineStage::Grading);
        info!("🤖 正在批改...");
        let report = self
            .grading
            .grade(&extracted_text, &rubric_text, &credentials.grading_api_key)
            .await;
        if report.is_error() {
            warn!("⚠️ 批改失败，报告内容为错误信息");
        }

        self.transition(PipelineStage::Complete);

        let output = PipelineOutput {
            extracted_text,
            report,
            failed_pages,
        };
        print_final_stats(&output, pages.len());

        Ok(output)
    }

    /// 按顺序检查：图片 → 密钥 → 评分标准 → 上限
    fn validate(
        &self,
        images: &ImageCollection,
        rubric: &RubricSource,
        credentials: &Credentials,
    ) -> Result<(), RejectReason> {
        if images.is_empty() {
            return Err(RejectReason::NoImages);
        }
        if !credentials.is_complete() {
            return Err(RejectReason::MissingCredentials);
        }
        rubric.check().map_err(RejectReason::InvalidRubric)?;

        if images.len() > self.max_pages {
            return Err(RejectReason::TooManyPages {
                count: images.len(),
                max: self.max_pages,
            });
        }
        if let Some((index, image)) = images
            .iter()
            .enumerate()
            .find(|(_, image)| image.len() > self.max_image_bytes)
        {
            return Err(RejectReason::ImageTooLarge {
                page: index + 1,
                size: image.len(),
                max: self.max_image_bytes,
            });
        }
        if let Some(image) = rubric.image().filter(|i| i.len() > self.max_image_bytes) {
            return Err(RejectReason::RubricImageTooLarge {
                size: image.len(),
                max: self.max_image_bytes,
            });
        }

        Ok(())
    }

    fn transition(&mut self, next: PipelineStage) {
        debug!("流程状态: {:?} → {:?}", self.stage, next);
        self.stage = next;
    }
}
