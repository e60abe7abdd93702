//! 试卷图片
//!
//! 图片一经导入即不可变；身份由原始字节的指纹决定，与来源无关。

use base64::{engine::general_purpose, Engine as _};
use std::fmt;
use std::sync::Arc;

use crate::models::fingerprint::Fingerprint;

/// 无法识别图片格式时使用的 MIME 类型
pub const DEFAULT_MEDIA_TYPE: &str = "image/jpeg";

/// 图片来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// 批量上传
    Upload,
    /// 现场拍摄
    Capture,
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Upload => write!(f, "上传"),
            ImageSource::Capture => write!(f, "拍摄"),
        }
    }
}

/// 一张试卷（或评分标准）图片
#[derive(Clone)]
pub struct QuizImage {
    bytes: Arc<[u8]>,
    media_type: String,
    fingerprint: Fingerprint,
    source: ImageSource,
    name: Option<String>,
}

impl QuizImage {
    /// 从原始字节创建图片，MIME 类型由文件头推断
    pub fn new(bytes: impl Into<Vec<u8>>, source: ImageSource) -> Self {
        let bytes: Vec<u8> = bytes.into();
        let fingerprint = Fingerprint::of(&bytes);
        let media_type = sniff_media_type(&bytes);

        Self {
            bytes: Arc::from(bytes),
            media_type,
            fingerprint,
            source,
            name: None,
        }
    }

    /// 附加文件名（仅用于显示）
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub fn source(&self) -> ImageSource {
        self.source
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// 编码为 `data:<mime>;base64,<data>` 形式，供视觉模型使用
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

impl fmt::Debug for QuizImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizImage")
            .field("fingerprint", &self.fingerprint.short())
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .field("source", &self.source)
            .field("name", &self.name)
            .finish()
    }
}

/// 根据文件头推断图片 MIME 类型，非图片或无法识别时返回 `image/jpeg`
fn sniff_media_type(bytes: &[u8]) -> String {
    match infer::get(bytes) {
        Some(kind) if matches!(kind.matcher_type(), infer::MatcherType::Image) => {
            kind.mime_type().to_string()
        }
        _ => DEFAULT_MEDIA_TYPE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn test_png_media_type_detected() {
        let image = QuizImage::new(PNG_HEADER.to_vec(), ImageSource::Upload);
        assert_eq!(image.media_type(), "image/png");
    }

    #[test]
    fn test_unknown_bytes_default_to_jpeg() {
        let image = QuizImage::new(b"not really an image".to_vec(), ImageSource::Capture);
        assert_eq!(image.media_type(), DEFAULT_MEDIA_TYPE);
    }

    #[test]
    fn test_identity_ignores_source_and_name() {
        let uploaded = QuizImage::new(b"same bytes".to_vec(), ImageSource::Upload).with_name("a.jpg");
        let captured = QuizImage::new(b"same bytes".to_vec(), ImageSource::Capture);

        assert_eq!(uploaded.fingerprint(), captured.fingerprint());
    }

    #[test]
    fn test_data_url() {
        let image = QuizImage::new(b"abc".to_vec(), ImageSource::Upload);
        assert_eq!(image.to_data_url(), "data:image/jpeg;base64,YWJj");
    }
}
