use crate::error::{AppError, AppResult};
use std::time::Duration;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- OCR（视觉模型）配置 ---
    pub ocr_api_base_url: String,
    pub ocr_model_name: String,
    // --- 批改模型配置 ---
    pub grading_api_base_url: String,
    pub grading_model_name: String,
    pub grading_temperature: f32,
    /// 同时识别的页数
    pub max_concurrent_pages: usize,
    /// 单次外部调用超时（秒）
    pub request_timeout_secs: u64,
    /// 单次批改允许的最大页数
    pub max_pages: usize,
    /// 单张图片允许的最大字节数
    pub max_image_bytes: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ocr_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            ocr_model_name: "gemini-2.5-flash".to_string(),
            grading_api_base_url: "https://api.openai.com/v1".to_string(),
            grading_model_name: "gpt-4o".to_string(),
            grading_temperature: 0.1,
            max_concurrent_pages: 4,
            request_timeout_secs: 120,
            max_pages: 50,
            max_image_bytes: 20 * 1024 * 1024,
            verbose_logging: false,
            output_log_file: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            ocr_api_base_url: std::env::var("OCR_API_BASE_URL").unwrap_or(default.ocr_api_base_url),
            ocr_model_name: std::env::var("OCR_MODEL_NAME").unwrap_or(default.ocr_model_name),
            grading_api_base_url: std::env::var("GRADING_API_BASE_URL").unwrap_or(default.grading_api_base_url),
            grading_model_name: std::env::var("GRADING_MODEL_NAME").unwrap_or(default.grading_model_name),
            grading_temperature: std::env::var("GRADING_TEMPERATURE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.grading_temperature),
            max_concurrent_pages: std::env::var("MAX_CONCURRENT_PAGES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_pages),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            max_pages: std::env::var("MAX_PAGES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_pages),
            max_image_bytes: std::env::var("MAX_IMAGE_BYTES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_image_bytes),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").ok().or(default.output_log_file),
        }
    }

    /// 检查配置取值
    pub fn validate(&self) -> AppResult<()> {
        if self.max_concurrent_pages == 0 {
            return Err(AppError::invalid_config("max_concurrent_pages", self.max_concurrent_pages));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::invalid_config("request_timeout_secs", self.request_timeout_secs));
        }
        if self.max_pages == 0 {
            return Err(AppError::invalid_config("max_pages", self.max_pages));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
