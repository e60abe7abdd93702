//! 视觉模型 OCR 客户端
//!
//! 通过 Vision API 把图片以 base64 data URL 的形式发送给模型，
//! 默认对接 Gemini 的 OpenAI 兼容端点。

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestUserMessageArgs,
        ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequestArgs, ImageDetail, ImageUrl,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::clients::prompts::TRANSCRIBE_INSTRUCTION;
use crate::clients::OcrCapability;
use crate::config::Config;
use crate::models::QuizImage;

/// 视觉模型 OCR 客户端
///
/// 密钥随每次调用传入，客户端本身只保存端点和模型。
pub struct VisionOcrClient {
    api_base_url: String,
    model_name: String,
}

impl VisionOcrClient {
    pub fn new(config: &Config) -> Self {
        Self {
            api_base_url: config.ocr_api_base_url.clone(),
            model_name: config.ocr_model_name.clone(),
        }
    }

    fn client(&self, credential: &str) -> Client<OpenAIConfig> {
        let openai_config = OpenAIConfig::new()
            .with_api_key(credential)
            .with_api_base(&self.api_base_url);
        Client::with_config(openai_config)
    }
}

#[async_trait]
impl OcrCapability for VisionOcrClient {
    async fn transcribe(&self, image: &QuizImage, credential: &str) -> Result<String> {
        debug!(
            "调用 OCR 模型: {}, 图片 {} ({} 字节, {})",
            self.model_name,
            image.fingerprint().short(),
            image.len(),
            image.media_type()
        );

        let content_parts = vec![
            ChatCompletionRequestUserMessageContentPart::Text(
                ChatCompletionRequestMessageContentPartText {
                    text: TRANSCRIBE_INSTRUCTION.to_string(),
                },
            ),
            ChatCompletionRequestUserMessageContentPart::ImageUrl(
                ChatCompletionRequestMessageContentPartImage {
                    image_url: ImageUrl {
                        url: image.to_data_url(),
                        detail: Some(ImageDetail::High),
                    },
                },
            ),
        ];

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(ChatCompletionRequestUserMessageContent::Array(content_parts))
            .build()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .build()?;

        let response = self
            .client(credential)
            .chat()
            .create(request)
            .await
            .map_err(|e| {
                warn!("OCR API 调用失败: {}", e);
                anyhow::anyhow!("OCR API 调用失败: {}", e)
            })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("OCR 返回内容为空"))?;

        debug!("OCR 调用成功，返回 {} 字符", content.chars().count());

        Ok(content)
    }
}
