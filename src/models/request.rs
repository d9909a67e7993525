use serde::{Deserialize, Serialize};

use crate::error::{GenError, GenResult};
use crate::models::question::GeneratedQuestion;
use crate::models::question_type::{DifficultyLevel, QuestionType};

/// 单个题型的占比配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionTypeConfig {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// 该题型在整卷中的占比（0-100）
    pub percentage: f64,
    /// 优先级 1-10
    pub priority: u8,
}

/// 一次生成调用的完整请求
///
/// 各题型 `percentage` 之和必须为 100 ± 0.1，由 `validate` 在任何生成
/// 工作开始前检查。核心不会按题目重新分配题型占比，只把声明的分布
/// 作为上下文转发进提示词。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub difficulty: DifficultyLevel,
    pub question_count: usize,
    pub question_types: Vec<QuestionTypeConfig>,
    #[serde(default = "default_language")]
    pub language: String,
    /// 需要重点覆盖的领域
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_areas: Option<Vec<String>>,
}

fn default_language() -> String {
    "español".to_string()
}

/// 单次请求最多允许的题目数
const MAX_QUESTION_COUNT: usize = 50;

impl GenerationRequest {
    /// 校验请求参数
    ///
    /// 这是唯一以硬错误形式返回给调用方的错误类别，错误文案沿用平台
    /// 对外的西语提示。
    pub fn validate(&self) -> GenResult<()> {
        if self.topic.trim().is_empty() {
            return Err(GenError::Validation("El tema es obligatorio".to_string()));
        }
        if self.question_count < 1 {
            return Err(GenError::Validation(
                "Debe haber al menos 1 pregunta".to_string(),
            ));
        }
        if self.question_count > MAX_QUESTION_COUNT {
            return Err(GenError::Validation(
                "Máximo 50 preguntas por vez".to_string(),
            ));
        }
        if self.question_types.is_empty() {
            return Err(GenError::Validation(
                "Debe especificar al menos un tipo de pregunta".to_string(),
            ));
        }
        for qt in &self.question_types {
            if qt.percentage < 0.0 || qt.percentage > 100.0 {
                return Err(GenError::Validation(
                    "El porcentaje debe estar entre 0 y 100".to_string(),
                ));
            }
            if qt.priority < 1 || qt.priority > 10 {
                return Err(GenError::Validation(
                    "La prioridad debe estar entre 1 y 10".to_string(),
                ));
            }
        }
        let total: f64 = self.question_types.iter().map(|qt| qt.percentage).sum();
        if (total - 100.0).abs() > 0.1 {
            return Err(GenError::Validation(
                "Los porcentajes de tipos de pregunta deben sumar 100%".to_string(),
            ));
        }
        Ok(())
    }

    /// 请求中声明的首个题型，作为脏数据修复时的题型兜底
    pub fn primary_type(&self) -> QuestionType {
        self.question_types
            .first()
            .map(|qt| qt.question_type)
            .unwrap_or(QuestionType::MultipleChoice)
    }

    /// 快速测验预设：60% 单选 + 40% 判断，中等难度，默认 5 题
    pub fn quick_exam(
        topic: impl Into<String>,
        count: Option<usize>,
        difficulty: Option<DifficultyLevel>,
    ) -> Self {
        let topic = topic.into();
        Self {
            description: Some(format!("Examen rápido sobre {}", topic)),
            topic,
            difficulty: difficulty.unwrap_or(DifficultyLevel::Intermediate),
            question_count: count.unwrap_or(5),
            question_types: vec![
                QuestionTypeConfig {
                    question_type: QuestionType::MultipleChoice,
                    percentage: 60.0,
                    priority: 8,
                },
                QuestionTypeConfig {
                    question_type: QuestionType::TrueFalse,
                    percentage: 40.0,
                    priority: 7,
                },
            ],
            language: default_language(),
            focus_areas: None,
        }
    }
}

/// 完整的测验响应
///
/// `total_questions` 是实际产出数，`requested_questions` 是请求数，
/// 两者都显式给出：部分失败时产出可能少于请求，调用方据此感知缺口。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub topic: String,
    pub difficulty: DifficultyLevel,
    pub total_questions: usize,
    pub requested_questions: usize,
    pub questions: Vec<GeneratedQuestion>,
    /// 答题时限（秒），按每题 45 秒计
    pub time_limit: u64,
    pub metadata: QuizMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizMetadata {
    pub created_at: String,
    pub language: String,
}
