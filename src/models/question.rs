use serde::{Deserialize, Serialize};

use crate::models::question_type::{DifficultyLevel, QuestionType};

/// 题目选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
    /// 展示顺序，1 起
    pub order: i64,
    /// 该选项为何正确/错误的说明
    #[serde(default)]
    pub explanation: String,
}

/// 提示等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintLevel {
    Subtle,
    Moderate,
    Obvious,
}

impl HintLevel {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "subtle" => Some(HintLevel::Subtle),
            "moderate" => Some(HintLevel::Moderate),
            "obvious" => Some(HintLevel::Obvious),
            _ => None,
        }
    }
}

/// 答题提示
///
/// 每道题带三级提示，使用提示会按 `points_deduction` 扣分。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionHint {
    pub level: HintLevel,
    pub text: String,
    pub points_deduction: i64,
}

/// 题目解析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionExplanation {
    /// 简短解析（一两行）
    pub brief: String,
    /// 带上下文的完整解析
    pub detailed: String,
    /// 可供深入的相关概念
    #[serde(default)]
    pub related_concepts: Vec<String>,
}

/// 规范化后的生成题目
///
/// 经过 `question_sanitizer` 处理后的题目保证结构完整：
/// `hints` 非空、`explanation` 非缺省对象、所有字段已填充。
/// 字段名按平台 JSON 契约使用 camelCase。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub id: String,
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub difficulty: DifficultyLevel,
    pub topic: String,
    pub language: String,
    pub options: Vec<QuestionOption>,
    pub correct_answers: Vec<String>,
    pub hints: Vec<QuestionHint>,
    pub explanation: QuestionExplanation,
    pub tags: Vec<String>,
}
