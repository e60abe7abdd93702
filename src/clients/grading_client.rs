use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::clients::prompts::{build_grading_message, GRADING_SYSTEM_MESSAGE};
use crate::clients::GradingCapability;
use crate::config::Config;

/// 批改模型客户端
pub struct ChatGradingClient {
    api_base_url: String,
    model_name: String,
    temperature: f32,
}

impl ChatGradingClient {
    pub fn new(config: &Config) -> Self {
        Self {
            api_base_url: config.grading_api_base_url.clone(),
            model_name: config.grading_model_name.clone(),
            temperature: config.grading_temperature,
        }
    }
}

#[async_trait]
impl GradingCapability for ChatGradingClient {
    async fn grade_text(
        &self,
        student_text: &str,
        rubric_text: &str,
        credential: &str,
    ) -> Result<String> {
        debug!("调用批改模型: {}", self.model_name);
        debug!(
            "答案长度: {} 字符, 评分标准长度: {} 字符",
            student_text.len(),
            rubric_text.len()
        );

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(GRADING_SYSTEM_MESSAGE)
            .build()?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(build_grading_message(student_text, rubric_text))
            .build()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![
                ChatCompletionRequestMessage::System(system_msg),
                ChatCompletionRequestMessage::User(user_msg),
            ])
            .temperature(self.temperature)
            .build()?;

        let openai_config = OpenAIConfig::new()
            .with_api_key(credential)
            .with_api_base(&self.api_base_url);

        let response = Client::with_config(openai_config)
            .chat()
            .create(request)
            .await
            .map_err(|e| {
                warn!("批改 API 调用失败: {}", e);
                anyhow::anyhow!("批改 API 调用失败: {}", e)
            })?;

        debug!("批改 API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("批改模型返回内容为空"))?;

        Ok(content.trim().to_string())
    }
}
