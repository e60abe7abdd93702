//! 单页处理流程 - 流程层
//!
//! 一页的完整处理：识别 → 记录结果。失败页不会中断批次。

use std::sync::Arc;
use tracing::{info, warn};

use crate::models::{ExtractionResult, QuizImage};
use crate::services::ExtractionService;
use crate::utils::logging::truncate_text;
use crate::workflow::page_ctx::PageCtx;

/// 单页处理流程
///
/// - 不持有页序，不做拼接
/// - 只依赖识别能力（services）
#[derive(Clone)]
pub struct PageFlow {
    extraction: Arc<ExtractionService>,
    verbose_logging: bool,
}

impl PageFlow {
    pub fn new(extraction: Arc<ExtractionService>, verbose_logging: bool) -> Self {
        Self {
            extraction,
            verbose_logging,
        }
    }

    pub async fn run(&self, ctx: &PageCtx, image: &QuizImage, credential: &str) -> ExtractionResult {
        info!("{} 🔍 正在识别...", ctx);

        let result = self.extraction.extract(image, credential).await;

        match &result {
            ExtractionResult::Text(text) => {
                info!("{} ✓ 识别完成 ({} 字符)", ctx, text.chars().count());
                if self.verbose_logging {
                    info!("{} 内容: {}", ctx, truncate_text(text, 80));
                }
            }
            ExtractionResult::Failed { cause } => {
                warn!("{} ⚠️ 识别失败，保留错误标记继续处理: {}", ctx, cause);
            }
        }

        result
    }
}
