use std::fmt;

/// 两个外部能力的 API 密钥
///
/// 由调用方（界面或命令行）提供，核心流程从不内置密钥。
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// OCR（视觉模型）密钥
    pub ocr_api_key: String,
    /// 批改模型密钥
    pub grading_api_key: String,
}

impl Credentials {
    pub fn new(ocr_api_key: impl Into<String>, grading_api_key: impl Into<String>) -> Self {
        Self {
            ocr_api_key: ocr_api_key.into(),
            grading_api_key: grading_api_key.into(),
        }
    }

    /// 从 `GEMINI_API_KEY` / `OPENAI_API_KEY` 读取
    pub fn from_env() -> Self {
        Self {
            ocr_api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            grading_api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
        }
    }

    /// 两个密钥是否都已提供
    pub fn is_complete(&self) -> bool {
        !self.ocr_api_key.trim().is_empty() && !self.grading_api_key.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &str| if key.is_empty() { "<未设置>" } else { "<已隐藏>" };
        f.debug_struct("Credentials")
            .field("ocr_api_key", &redact(self.ocr_api_key.as_str()))
            .field("grading_api_key", &redact(self.grading_api_key.as_str()))
            .finish()
    }
}
