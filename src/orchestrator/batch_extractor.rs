//! 批量识别器 - 编排层
//!
//! ## 职责
//!
//! 对一批页面并发执行 `PageFlow`，并发数由 Semaphore 限制。
//!
//! ## 保证
//!
//! - 返回结果与输入顺序一致，与完成先后无关
//! - 进度回调只在当前任务中调用，完成数严格递增
//! - 单页失败（包括任务 panic）只会变成该页的错误标记，不会中断批次

use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::error;

use crate::models::{ExtractionResult, QuizImage};
use crate::orchestrator::ProgressFn;
use crate::workflow::{PageCtx, PageFlow};

pub struct BatchExtractor {
    flow: PageFlow,
    max_concurrent_pages: usize,
}

impl BatchExtractor {
    pub fn new(flow: PageFlow, max_concurrent_pages: usize) -> Self {
        Self {
            flow,
            max_concurrent_pages: max_concurrent_pages.max(1),
        }
    }

    /// 识别所有页面，按输入顺序返回结果
    pub async fn extract_all(
        &self,
        images: &[QuizImage],
        credential: &str,
        progress: &mut ProgressFn<'_>,
    ) -> Vec<ExtractionResult> {
        let total = images.len();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_pages));
        let mut pending = FuturesUnordered::new();

        // 为每一页创建任务，任务内部再等待许可
        for (index, image) in images.iter().enumerate() {
            let ctx = PageCtx::new(index + 1, total, image.fingerprint());
            let flow = self.flow.clone();
            let image = image.clone();
            let credential = credential.to_string();
            let semaphore = semaphore.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                flow.run(&ctx, &image, &credential).await
            });
            pending.push(async move { (index, handle.await) });
        }

        // 按完成顺序收集，按原始位置落位
        let mut slots: Vec<Option<ExtractionResult>> = vec![None; total];
        let mut completed = 0;

        while let Some((index, joined)) = pending.next().await {
            let result = match joined {
                Ok(result) => result,
                Err(e) => {
                    error!("[页 {}/{}] 识别任务执行失败: {}", index + 1, total, e);
                    ExtractionResult::failed(format!("extraction task failed: {}", e))
                }
            };
            slots[index] = Some(result);
            completed += 1;
            progress(completed, total);
        }

        slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| ExtractionResult::failed("page was not processed")))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::OcrCapability;
    use crate::models::ImageSource;
    use crate::services::ExtractionService;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// 图片内容即识别结果，内容越靠前延迟越长，使完成顺序与输入顺序相反
    struct ReversedDelayOcr {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl OcrCapability for ReversedDelayOcr {
        async fn transcribe(&self, image: &QuizImage, _credential: &str) -> anyhow::Result<String> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let text = String::from_utf8_lossy(image.bytes()).to_string();
            let delay = match text.as_str() {
                "A" => 60,
                "B" => 30,
                _ => 5,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(text)
        }
    }

    fn extractor(ocr: Arc<ReversedDelayOcr>, max_concurrent: usize) -> BatchExtractor {
        let service = Arc::new(ExtractionService::new(ocr, Duration::from_secs(5)));
        BatchExtractor::new(PageFlow::new(service, false), max_concurrent)
    }

    fn pages() -> Vec<QuizImage> {
        ["A", "B", "C"]
            .iter()
            .map(|s| QuizImage::new(s.as_bytes().to_vec(), ImageSource::Upload))
            .collect()
    }

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let ocr = Arc::new(ReversedDelayOcr {
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        });
        let batch = extractor(ocr.clone(), 3);

        let mut updates = Vec::new();
        let results = batch
            .extract_all(&pages(), "key", &mut |done, total| updates.push((done, total)))
            .await;

        let texts: Vec<_> = results.iter().map(ExtractionResult::page_text).collect();
        assert_eq!(texts, vec!["A", "B", "C"]);
        assert_eq!(updates, vec![(1, 3), (2, 3), (3, 3)]);
        assert!(ocr.max_in_flight.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let ocr = Arc::new(ReversedDelayOcr {
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        });
        let batch = extractor(ocr.clone(), 1);

        let results = batch.extract_all(&pages(), "key", &mut |_, _| {}).await;

        assert_eq!(results.len(), 3);
        assert_eq!(ocr.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let ocr = Arc::new(ReversedDelayOcr {
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        });
        let batch = extractor(ocr, 2);

        let mut calls = 0;
        let results = batch.extract_all(&[], "key", &mut |_, _| calls += 1).await;

        assert!(results.is_empty());
        assert_eq!(calls, 0);
    }
}
