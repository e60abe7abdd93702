//! 识别服务 - 业务能力层
//!
//! 只负责"单张图片 → 文本"能力，不关心页序与流程。
//! 外部调用的任何失败（鉴权、配额、响应异常、网络、超时）都转换为
//! `ExtractionResult::Failed`，不会向上抛出。

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::clients::OcrCapability;
use crate::models::{ExtractionResult, QuizImage};

/// 识别服务
pub struct ExtractionService {
    ocr: Arc<dyn OcrCapability>,
    timeout: Duration,
}

impl ExtractionService {
    pub fn new(ocr: Arc<dyn OcrCapability>, timeout: Duration) -> Self {
        Self { ocr, timeout }
    }

    /// 识别单张图片，每次只尝试一次
    pub async fn extract(&self, image: &QuizImage, credential: &str) -> ExtractionResult {
        let call = self.ocr.transcribe(image, credential);

        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(text)) => {
                debug!(
                    "图片 {} 识别完成: {} 字符",
                    image.fingerprint().short(),
                    text.chars().count()
                );
                ExtractionResult::Text(text)
            }
            Ok(Err(e)) => {
                warn!("图片 {} 识别失败: {:#}", image.fingerprint().short(), e);
                ExtractionResult::failed(format!("{:#}", e))
            }
            Err(_) => {
                warn!(
                    "图片 {} 识别超时 ({} 秒)",
                    image.fingerprint().short(),
                    self.timeout.as_secs()
                );
                ExtractionResult::failed(format!(
                    "request timed out after {} seconds",
                    self.timeout.as_secs()
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageSource;
    use async_trait::async_trait;

    struct FixedOcr(Result<&'static str, &'static str>);

    #[async_trait]
    impl OcrCapability for FixedOcr {
        async fn transcribe(&self, _image: &QuizImage, _credential: &str) -> anyhow::Result<String> {
            self.0.map(str::to_string).map_err(|e| anyhow::anyhow!(e))
        }
    }

    struct SlowOcr;

    #[async_trait]
    impl OcrCapability for SlowOcr {
        async fn transcribe(&self, _image: &QuizImage, _credential: &str) -> anyhow::Result<String> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }
    }

    fn image() -> QuizImage {
        QuizImage::new(b"page".to_vec(), ImageSource::Upload)
    }

    #[tokio::test]
    async fn test_extract_success() {
        let service = ExtractionService::new(Arc::new(FixedOcr(Ok("Q1: B"))), Duration::from_secs(1));
        assert_eq!(
            service.extract(&image(), "key").await,
            ExtractionResult::Text("Q1: B".to_string())
        );
    }

    #[tokio::test]
    async fn test_extract_failure_becomes_marker() {
        let service = ExtractionService::new(
            Arc::new(FixedOcr(Err("429 quota exceeded"))),
            Duration::from_secs(1),
        );
        let result = service.extract(&image(), "key").await;

        assert_eq!(result, ExtractionResult::failed("429 quota exceeded"));
        assert_eq!(result.page_text(), "Error: 429 quota exceeded");
    }

    #[tokio::test]
    async fn test_extract_timeout_becomes_marker() {
        let service = ExtractionService::new(Arc::new(SlowOcr), Duration::from_millis(20));
        let result = service.extract(&image(), "key").await;

        assert!(result.is_failed());
        assert!(result.page_text().contains("timed out"));
    }
}
