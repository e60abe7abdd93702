//! 识别结果与批改报告

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// 页与页之间的分隔标记
pub const PAGE_BREAK: &str = "\n\n--- PAGE BREAK ---\n\n";

/// 失败内容的前缀约定
pub const ERROR_PREFIX: &str = "Error: ";

/// 总分行的标记
const TOTAL_SCORE_MARKER: &str = "TOTAL SCORE:";

/// 单页识别结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    /// 识别出的文本
    Text(String),
    /// 识别失败，附带原因
    Failed { cause: String },
}

impl ExtractionResult {
    pub fn failed(cause: impl Into<String>) -> Self {
        ExtractionResult::Failed {
            cause: cause.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ExtractionResult::Failed { .. })
    }

    /// 写入汇总文本时该页的内容；失败页写入 `Error: <原因>`
    pub fn page_text(&self) -> String {
        match self {
            ExtractionResult::Text(text) => text.clone(),
            ExtractionResult::Failed { cause } => format!("{}{}", ERROR_PREFIX, cause),
        }
    }
}

/// 按集合顺序拼接各页结果
pub fn join_pages(results: &[ExtractionResult]) -> String {
    results
        .iter()
        .map(ExtractionResult::page_text)
        .collect::<Vec<_>>()
        .join(PAGE_BREAK)
}

/// 批改报告
///
/// 成功与失败共用同一类型；失败报告的内容以 `Error:` 开头。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GradingReport {
    content: String,
}

/// 解析出的总分
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub awarded: f64,
    pub possible: f64,
}

impl GradingReport {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// 创建失败报告
    pub fn failed(cause: impl std::fmt::Display) -> Self {
        Self::new(format!("{}{}", ERROR_PREFIX, cause))
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// 是否为失败报告
    pub fn is_error(&self) -> bool {
        self.content.starts_with(ERROR_PREFIX.trim_end())
    }

    /// 最后一个 `TOTAL SCORE:` 之后到行尾的文字，用于显示
    ///
    /// 找不到标记时返回 `None`，这不是错误。
    pub fn total_score(&self) -> Option<&str> {
        let (_, tail) = self.content.rsplit_once(TOTAL_SCORE_MARKER)?;
        let score = tail.lines().next().unwrap_or_default().trim();
        if score.is_empty() {
            None
        } else {
            Some(score)
        }
    }

    /// 将总分解析为数字（`27/30`、`8.5 / 10` 等）
    pub fn score_summary(&self) -> Option<ScoreSummary> {
        static SCORE_RE: OnceLock<Option<Regex>> = OnceLock::new();
        let re = SCORE_RE
            .get_or_init(|| Regex::new(r"^\**\s*(\d+(?:\.\d+)?)\s*/\s*(\d+(?:\.\d+)?)").ok())
            .as_ref()?;

        let caps = re.captures(self.total_score()?)?;
        let awarded = caps.get(1)?.as_str().parse().ok()?;
        let possible = caps.get(2)?.as_str().parse().ok()?;

        Some(ScoreSummary { awarded, possible })
    }
}

/// 一次完整批改的产出
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    /// 各页识别文本的汇总
    pub extracted_text: String,
    /// 批改报告
    pub report: GradingReport,
    /// 识别失败的页号（从 1 开始）
    pub failed_pages: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_pages_uses_page_break() {
        let results = vec![
            ExtractionResult::Text("A".to_string()),
            ExtractionResult::failed("quota exceeded"),
            ExtractionResult::Text("C".to_string()),
        ];

        assert_eq!(
            join_pages(&results),
            "A\n\n--- PAGE BREAK ---\n\nError: quota exceeded\n\n--- PAGE BREAK ---\n\nC"
        );
    }

    #[test]
    fn test_total_score_extracted() {
        let report = GradingReport::new("Q1: correct\nQ2: partial\n\nTOTAL SCORE: 27/30\n");
        assert_eq!(report.total_score(), Some("27/30"));
        assert!(!report.is_error());
    }

    #[test]
    fn test_total_score_uses_last_marker() {
        let report = GradingReport::new("TOTAL SCORE: x/y format\n...\nTOTAL SCORE: 8.5 / 10 points");
        assert_eq!(report.total_score(), Some("8.5 / 10 points"));
        assert_eq!(
            report.score_summary(),
            Some(ScoreSummary {
                awarded: 8.5,
                possible: 10.0
            })
        );
    }

    #[test]
    fn test_missing_score_is_tolerated() {
        let report = GradingReport::new("The student answered everything.");
        assert_eq!(report.total_score(), None);
        assert_eq!(report.score_summary(), None);
    }

    #[test]
    fn test_markdown_bold_score() {
        let report = GradingReport::new("**TOTAL SCORE:** 27/30");
        assert_eq!(report.total_score(), Some("** 27/30"));
        assert_eq!(report.score_summary().map(|s| s.awarded), Some(27.0));
    }

    #[test]
    fn test_failed_report_is_error() {
        let report = GradingReport::failed("401 Unauthorized");
        assert!(report.is_error());
        assert_eq!(report.content(), "Error: 401 Unauthorized");
    }
}
