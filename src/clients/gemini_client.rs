//! Gemini API 客户端
//!
//! 通过 generateContent 接口调用 Gemini 系列模型，一个实例绑定一个
//! API Key。只实现本系统用到的最小请求/响应面。

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clients::TextModel;
use crate::config::Config;
use crate::utils::logging::truncate_text;

/// Gemini 客户端
///
/// 池中每个实例持有自己的 Key 和编号，编号只用于日志标签
/// （GEMINI-1、GEMINI-2 …）。
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    api_base_url: String,
    model_name: String,
    temperature: f32,
    max_output_tokens: u32,
    request_timeout: Duration,
    label: String,
}

impl GeminiClient {
    /// 创建新的 Gemini 客户端
    pub fn new(config: &Config, api_key: String, instance_number: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            api_base_url: config.gemini_api_base_url.clone(),
            model_name: config.gemini_model_name.clone(),
            temperature: config.gemini_temperature,
            max_output_tokens: config.gemini_max_output_tokens,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            label: format!("GEMINI-{}", instance_number),
        }
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    fn label(&self) -> &str {
        &self.label
    }

    async fn generate(&self, system_message: Option<&str>, user_message: &str) -> Result<String> {
        // generateContent 没有独立的 system 角色，拼到正文前面
        let full_prompt = match system_message {
            Some(system) => format!("{}\n\n{}", system, user_message),
            None => user_message.to_string(),
        };

        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: full_prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base_url, self.model_name, self.api_key
        );

        debug!("[{}] 调用 Gemini API，模型: {}", self.label, self.model_name);

        let response = self
            .client
            .post(&url)
            .timeout(self.request_timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("[{}] Gemini API 请求失败: {}", self.label, e);
                anyhow::anyhow!("Gemini API 请求失败: {}", e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(
                "[{}] Gemini API 返回错误状态 {}: {}",
                self.label,
                status,
                truncate_text(&body, 200)
            );
            anyhow::bail!("Gemini API 返回错误状态 {}", status);
        }

        let body: GenerateContentResponse = response.json().await?;

        let text = body
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.clone())
            .ok_or_else(|| anyhow::anyhow!("Gemini 返回内容为空"))?;

        debug!("[{}] Gemini API 调用成功", self.label);

        Ok(text.trim().to_string())
    }
}

// ========== 请求/响应数据结构 ==========

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: String,
}
