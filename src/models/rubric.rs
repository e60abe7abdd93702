//! 评分标准来源
//!
//! 文本与图片两种模式互斥，由调用方显式选择，解析时穷尽匹配，不做隐式回退。

use std::fmt;
use std::future::Future;

use crate::error::RubricError;
use crate::models::image::QuizImage;
use crate::models::report::ExtractionResult;

/// 评分标准输入模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RubricMode {
    Text,
    Image,
}

impl fmt::Display for RubricMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RubricMode::Text => write!(f, "文本"),
            RubricMode::Image => write!(f, "图片"),
        }
    }
}

/// 评分标准
#[derive(Debug, Clone)]
pub enum RubricSource {
    /// 直接输入的文本
    Text(String),
    /// 待识别的图片；`None` 表示已切换到图片模式但尚未上传
    Image(Option<QuizImage>),
}

impl Default for RubricSource {
    fn default() -> Self {
        RubricSource::Text(String::new())
    }
}

impl RubricSource {
    pub fn set_text(&mut self, content: impl Into<String>) {
        *self = RubricSource::Text(content.into());
    }

    pub fn set_image(&mut self, image: QuizImage) {
        *self = RubricSource::Image(Some(image));
    }

    /// 切换模式；已处于该模式时保留现有内容
    pub fn select_mode(&mut self, mode: RubricMode) {
        if self.active_mode() == mode {
            return;
        }
        *self = match mode {
            RubricMode::Text => RubricSource::Text(String::new()),
            RubricMode::Image => RubricSource::Image(None),
        };
    }

    pub fn active_mode(&self) -> RubricMode {
        match self {
            RubricSource::Text(_) => RubricMode::Text,
            RubricSource::Image(_) => RubricMode::Image,
        }
    }

    /// 图片模式下已上传的评分标准图片
    pub fn image(&self) -> Option<&QuizImage> {
        match self {
            RubricSource::Image(image) => image.as_ref(),
            RubricSource::Text(_) => None,
        }
    }

    /// 不调用外部能力的预检查
    pub fn check(&self) -> Result<(), RubricError> {
        match self {
            RubricSource::Text(content) if content.trim().is_empty() => Err(RubricError::EmptyRubric),
            RubricSource::Text(_) => Ok(()),
            RubricSource::Image(None) => Err(RubricError::MissingRubricImage),
            RubricSource::Image(Some(_)) => Ok(()),
        }
    }

    /// 解析为评分标准文本
    ///
    /// 图片模式下调用 `extract` 识别图片；识别失败返回 `RubricExtractionFailed`。
    pub async fn resolve_text<F, Fut>(&self, extract: F) -> Result<String, RubricError>
    where
        F: FnOnce(QuizImage) -> Fut,
        Fut: Future<Output = ExtractionResult>,
    {
        self.check()?;
        match self {
            RubricSource::Text(content) => Ok(content.clone()),
            RubricSource::Image(None) => Err(RubricError::MissingRubricImage),
            RubricSource::Image(Some(image)) => match extract(image.clone()).await {
                ExtractionResult::Text(text) => Ok(text),
                ExtractionResult::Failed { cause } => {
                    Err(RubricError::RubricExtractionFailed { cause })
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::image::ImageSource;

    fn rubric_image() -> QuizImage {
        QuizImage::new(b"rubric".to_vec(), ImageSource::Upload)
    }

    #[test]
    fn test_image_only_in_image_mode() {
        let mut rubric = RubricSource::default();
        assert!(rubric.image().is_none());

        rubric.set_image(rubric_image());
        assert_eq!(rubric.image().map(|i| i.bytes()), Some(&b"rubric"[..]));

        rubric.select_mode(RubricMode::Text);
        assert!(rubric.image().is_none());
    }

    #[test]
    fn test_text_resolves_verbatim() {
        let mut rubric = RubricSource::default();
        rubric.set_text("  Q1. 42 (3 points)\n");

        let mut called = false;
        let text = tokio_test::block_on(rubric.resolve_text(|_| {
            called = true;
            async { ExtractionResult::Text("unused".to_string()) }
        }));
        assert_eq!(text, Ok("  Q1. 42 (3 points)\n".to_string()));
        assert!(!called, "文本模式不应调用识别");
    }

    #[test]
    fn test_blank_text_is_empty_rubric() {
        let mut rubric = RubricSource::default();
        rubric.set_text(" \n\t ");

        let result = tokio_test::block_on(
            rubric.resolve_text(|_| async { ExtractionResult::Text("unused".to_string()) }),
        );
        assert_eq!(result, Err(RubricError::EmptyRubric));
    }

    #[test]
    fn test_image_mode_without_image() {
        let mut rubric = RubricSource::default();
        rubric.select_mode(RubricMode::Image);

        assert_eq!(rubric.active_mode(), RubricMode::Image);
        assert_eq!(rubric.check(), Err(RubricError::MissingRubricImage));
    }

    #[test]
    fn test_image_mode_uses_extractor() {
        let mut rubric = RubricSource::default();
        rubric.set_image(rubric_image());

        let text = tokio_test::block_on(
            rubric.resolve_text(|_| async { ExtractionResult::Text("Q1. B".to_string()) }),
        );
        assert_eq!(text, Ok("Q1. B".to_string()));
    }

    #[test]
    fn test_image_extraction_failure_propagates() {
        let mut rubric = RubricSource::default();
        rubric.set_image(rubric_image());

        let result = tokio_test::block_on(
            rubric.resolve_text(|_| async { ExtractionResult::failed("invalid api key") }),
        );
        assert_eq!(
            result,
            Err(RubricError::RubricExtractionFailed {
                cause: "invalid api key".to_string()
            })
        );
    }

    #[test]
    fn test_select_same_mode_keeps_content() {
        let mut rubric = RubricSource::default();
        rubric.set_text("Q1. 42");
        rubric.select_mode(RubricMode::Text);
        assert!(rubric.check().is_ok());

        rubric.select_mode(RubricMode::Image);
        rubric.select_mode(RubricMode::Text);
        assert_eq!(rubric.check(), Err(RubricError::EmptyRubric));
    }
}
