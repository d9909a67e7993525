//! # Quiz Generator
//!
//! 教育平台的 AI 出题管线：给定主题和题型配比，编排多个并发的
//! LLM 调用，产出一批结构化、已规范化的测验题目。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 持有外部后端句柄，只暴露"发提示词、收文本"能力
//! - `GeminiClient` - 题目生成后端，按 API Key 构成固定实例池
//! - `ChatClient` - 子主题多样化后端（chat-completions 风格）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个输入
//! - `TopicDiversifier` - 子主题多样化能力（带确定性兜底）
//! - `response_extractor` - 从不可靠文本中恢复 JSON 的能力
//! - `question_sanitizer` - 把脏对象修复成完整题目的能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一道题"的完整生成流程
//! - `PerQuestionRequest` - 上下文封装（请求拷贝 + 下标 + 子主题）
//! - `QuestionFlow` - 流程编排（prompt → 模型 → extract → sanitize）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 校验请求、扇出并发任务、按位收集结果
//!
//! 数据严格向下流动：编排层之外的任何模块都接触不到模型原始文本。

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{ChatClient, GeminiClient, ModelPool, TextModel};
pub use config::Config;
pub use error::{GenError, GenResult};
pub use models::{
    DifficultyLevel, GeneratedQuestion, GenerationRequest, HintLevel, QuestionExplanation,
    QuestionHint, QuestionOption, QuestionType, QuestionTypeConfig, Quiz, QuizMetadata,
};
pub use orchestrator::QuizOrchestrator;
pub use services::TopicDiversifier;
pub use workflow::{PerQuestionRequest, QuestionFlow};
