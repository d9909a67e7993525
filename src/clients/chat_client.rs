//! Chat-completions 客户端
//!
//! 使用 `async-openai` crate 调用兼容 OpenAI API 的服务
//! （OpenRouter、Azure 等），本系统用它承载子主题多样化这类
//! 轻量的一次性调用。

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

use crate::clients::TextModel;
use crate::config::Config;

/// 子主题生成用的采样参数，低温度保证输出格式稳定
const TEMPERATURE: f32 = 0.2;
const TOP_P: f32 = 0.9;
const MAX_TOKENS: u32 = 400;

/// Chat-completions 客户端
pub struct ChatClient {
    client: Client<OpenAIConfig>,
    model_name: String,
    label: String,
}

impl ChatClient {
    /// 按多样化后端配置创建客户端
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.diversifier_api_key)
            .with_api_base(&config.diversifier_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.diversifier_model_name.clone(),
            label: "TOPIC-GEN".to_string(),
        }
    }
}

#[async_trait]
impl TextModel for ChatClient {
    fn label(&self) -> &str {
        &self.label
    }

    async fn generate(&self, system_message: Option<&str>, user_message: &str) -> Result<String> {
        debug!("[{}] 调用 LLM API，模型: {}", self.label, self.model_name);
        debug!("[{}] 用户消息长度: {} 字符", self.label, user_message.len());

        // 构建消息列表
        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        // 构建请求
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(TEMPERATURE)
            .top_p(TOP_P)
            .max_tokens(MAX_TOKENS)
            .build()?;

        // 调用 API
        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("[{}] LLM API 调用失败: {}", self.label, e);
            anyhow::anyhow!("LLM API 调用失败: {}", e)
        })?;

        debug!("[{}] LLM API 调用成功", self.label);

        // 提取响应内容
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("LLM 返回内容为空"))?;

        Ok(content.trim().to_string())
    }
}
