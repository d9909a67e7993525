//! 题目规范化 - 业务能力层
//!
//! 把提取出来的松散 JSON 修复成结构完整的 `GeneratedQuestion`。
//! 这是脏数据到达消费方之前的最后一道防线：无论输入多畸形
//! （字段缺失、类型错误、null、嵌套结构不是对象），本模块都不会
//! 失败，总是返回一个字段齐全的题目。
//!
//! 缺省文案沿用平台对学生的西语提示（"Pregunta N"、"Opción N" 等）。

use serde_json::Value;

use crate::models::question::{
    GeneratedQuestion, HintLevel, QuestionExplanation, QuestionHint, QuestionOption,
};
use crate::models::question_type::{DifficultyLevel, QuestionType};
use crate::models::request::GenerationRequest;
use crate::utils::ids;

/// 规范化一个原始题目对象
///
/// # 参数
/// - `raw`: 提取出来的题目 JSON 值，可以是任意形状
/// - `request`: 原始请求，缺失字段的兜底来源
/// - `index`: 题目在整卷中的下标（0 起），用于缺省文案和选项 id
pub fn sanitize_question(
    raw: &Value,
    request: &GenerationRequest,
    index: usize,
) -> GeneratedQuestion {
    let options = sanitize_options(raw.get("options"), index);

    GeneratedQuestion {
        id: non_empty_string(raw.get("id")).unwrap_or_else(ids::question_id),
        question: non_empty_string(raw.get("question"))
            .unwrap_or_else(|| format!("Pregunta {}", index + 1)),
        question_type: raw
            .get("type")
            .and_then(Value::as_str)
            .and_then(QuestionType::from_str)
            .unwrap_or_else(|| request.primary_type()),
        difficulty: raw
            .get("difficulty")
            .and_then(Value::as_str)
            .and_then(DifficultyLevel::from_str)
            .unwrap_or(request.difficulty),
        topic: non_empty_string(raw.get("topic")).unwrap_or_else(|| request.topic.clone()),
        language: non_empty_string(raw.get("language")).unwrap_or_else(|| request.language.clone()),
        correct_answers: sanitize_correct_answers(raw.get("correctAnswers"), &options),
        options,
        hints: sanitize_hints(raw.get("hints")),
        explanation: sanitize_explanation(raw.get("explanation")),
        tags: string_list(raw.get("tags")),
    }
}

/// 规范化选项列表：不是数组就给空表，数组内逐项补全
fn sanitize_options(value: Option<&Value>, question_index: usize) -> Vec<QuestionOption> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .map(|(i, opt)| QuestionOption {
            id: non_empty_string(opt.get("id"))
                .unwrap_or_else(|| format!("opt_{}_{}", question_index, i + 1)),
            text: non_empty_string(opt.get("text")).unwrap_or_else(|| format!("Opción {}", i + 1)),
            is_correct: coerce_bool(opt.get("isCorrect")),
            order: opt.get("order").and_then(Value::as_i64).unwrap_or((i + 1) as i64),
            explanation: opt
                .get("explanation")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
        })
        .collect()
}

/// 正确答案：有数组就用数组，否则从已规范化的选项里取标了
/// `is_correct` 的选项 id（用规范化后的 id，保证答案一定指向存在的选项）
fn sanitize_correct_answers(value: Option<&Value>, options: &[QuestionOption]) -> Vec<String> {
    if let Some(items) = value.and_then(Value::as_array) {
        return items.iter().filter_map(scalar_to_string).collect();
    }

    options
        .iter()
        .filter(|opt| opt.is_correct)
        .map(|opt| opt.id.clone())
        .collect()
}

/// 提示列表：有非空数组就逐项补全，否则换上固定的三级缺省提示
fn sanitize_hints(value: Option<&Value>) -> Vec<QuestionHint> {
    if let Some(items) = value.and_then(Value::as_array) {
        if !items.is_empty() {
            return items
                .iter()
                .map(|hint| QuestionHint {
                    level: hint
                        .get("level")
                        .and_then(Value::as_str)
                        .and_then(HintLevel::from_str)
                        .unwrap_or(HintLevel::Moderate),
                    text: non_empty_string(hint.get("text"))
                        .unwrap_or_else(|| "Pista no disponible".to_string()),
                    points_deduction: hint
                        .get("pointsDeduction")
                        .and_then(Value::as_i64)
                        .unwrap_or(10),
                })
                .collect();
        }
    }

    default_hints()
}

/// 固定的三级缺省提示（subtle/5、moderate/15、obvious/25）
fn default_hints() -> Vec<QuestionHint> {
    vec![
        QuestionHint {
            level: HintLevel::Subtle,
            text: "Considera los conceptos clave del tema".to_string(),
            points_deduction: 5,
        },
        QuestionHint {
            level: HintLevel::Moderate,
            text: "Elimina las opciones menos probables".to_string(),
            points_deduction: 15,
        },
        QuestionHint {
            level: HintLevel::Obvious,
            text: "Revisa las definiciones básicas".to_string(),
            points_deduction: 25,
        },
    ]
}

/// 解析对象：是对象就逐字段补缺（detailed 缺失时退回 brief），
/// 否则整体换成缺省解析
fn sanitize_explanation(value: Option<&Value>) -> QuestionExplanation {
    if let Some(explanation) = value.filter(|v| v.is_object()) {
        let brief = non_empty_string(explanation.get("brief"));
        return QuestionExplanation {
            detailed: non_empty_string(explanation.get("detailed"))
                .or_else(|| brief.clone())
                .unwrap_or_else(|| "Sin explicación detallada".to_string()),
            brief: brief.unwrap_or_else(|| "Sin explicación".to_string()),
            related_concepts: string_list(explanation.get("relatedConcepts")),
        };
    }

    QuestionExplanation {
        brief: "Sin explicación".to_string(),
        detailed: "Sin explicación detallada".to_string(),
        related_concepts: Vec::new(),
    }
}

/// 取出非空字符串字段
fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// 标量转字符串，数组/对象丢弃
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// 字符串列表：不是数组给空表，数组内只保留标量项
fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(scalar_to_string).collect())
        .unwrap_or_default()
}

/// 宽松的布尔强转：缺失/null 为 false，数字按非零、字符串按非空判定
fn coerce_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        _ => false,
    }
}
