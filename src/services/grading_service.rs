//! 批改服务 - 业务能力层
//!
//! 只负责"答案 + 评分标准 → 报告"能力。失败时返回以 `Error:` 开头的报告，不抛出错误。

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::clients::GradingCapability;
use crate::models::GradingReport;

/// 批改服务
pub struct GradingService {
    grader: Arc<dyn GradingCapability>,
    timeout: Duration,
}

impl GradingService {
    pub fn new(grader: Arc<dyn GradingCapability>, timeout: Duration) -> Self {
        Self { grader, timeout }
    }

    pub async fn grade(
        &self,
        extracted_text: &str,
        rubric_text: &str,
        credential: &str,
    ) -> GradingReport {
        let call = self.grader.grade_text(extracted_text, rubric_text, credential);

        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(content)) => {
                debug!("批改完成，报告长度: {} 字符", content.chars().count());
                GradingReport::new(content)
            }
            Ok(Err(e)) => {
                warn!("批改失败: {:#}", e);
                GradingReport::failed(format!("{:#}", e))
            }
            Err(_) => {
                warn!("批改超时 ({} 秒)", self.timeout.as_secs());
                GradingReport::failed(format!(
                    "request timed out after {} seconds",
                    self.timeout.as_secs()
                ))
            }
        }
    }
}
