//! 客户端层
//!
//! 封装所有与外部 LLM 后端的交互。
//!
//! 两类后端：
//! - `GeminiClient` - 题目生成后端（generateContent 风格），按 API Key
//!   构成固定实例池，用于并行生成和分摊限流
//! - `ChatClient` - 子主题多样化后端（chat-completions 风格），
//!   每次顶层请求只调用一次
//!
//! 所有后端统一实现 `TextModel`：发送提示词，返回原始文本，或失败。
//! 测试可用脚本化实现替换真实后端。

pub mod chat_client;
pub mod gemini_client;

pub use chat_client::ChatClient;
pub use gemini_client::GeminiClient;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::Config;
use crate::error::{GenError, GenResult};

/// 文本生成模型的统一接口
///
/// 对 (提示词, 凭证) 的纯函数：不在调用间保留任何会话状态。
#[async_trait]
pub trait TextModel: Send + Sync {
    /// 模型实例标签（用于日志定位具体实例）
    fn label(&self) -> &str;

    /// 发送提示词，返回模型输出的原始文本
    async fn generate(&self, system_message: Option<&str>, user_message: &str) -> Result<String>;
}

/// 固定的模型实例池
///
/// 启动时构建一次，之后只读共享：任务只会读取句柄，不会修改池，
/// 因此无需加锁即可安全并发使用。
pub struct ModelPool {
    models: Vec<Arc<dyn TextModel>>,
}

impl ModelPool {
    /// 按配置中的 API Key 列表构建实例池，每个 Key 一个实例
    pub fn from_config(config: &Config) -> GenResult<Self> {
        let models = config
            .gemini_api_keys
            .iter()
            .enumerate()
            .map(|(i, key)| {
                Arc::new(GeminiClient::new(config, key.clone(), i + 1)) as Arc<dyn TextModel>
            })
            .collect();
        Self::from_models(models)
    }

    /// 从现成的模型实例构建池（测试和自定义后端入口）
    pub fn from_models(models: Vec<Arc<dyn TextModel>>) -> GenResult<Self> {
        if models.is_empty() {
            return Err(GenError::Config(
                "未配置任何 Gemini API Key（GEMINI_API_KEY_1 ~ GEMINI_API_KEY_4）".to_string(),
            ));
        }
        Ok(Self { models })
    }

    /// 按下标轮询取一个实例句柄
    pub fn get(&self, index: usize) -> Arc<dyn TextModel> {
        self.models[index % self.models.len()].clone()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
