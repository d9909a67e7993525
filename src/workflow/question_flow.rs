//! 单题生成流程 - 流程层
//!
//! 核心职责：定义"一道题"的完整生成流程
//!
//! 流程顺序：
//! 1. 构建紧凑提示词（题型目录 + 认知层次 + 期望 JSON 模板）
//! 2. 调用分配到的模型实例
//! 3. 提取 JSON → 规范化成 GeneratedQuestion
//!
//! 任何一步失败都只让本题降级为"未产出"（None），绝不向上抛异常：
//! 单题失败不能拖垮整批。

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::clients::TextModel;
use crate::config::Config;
use crate::models::question::GeneratedQuestion;
use crate::models::question_type::QuestionType;
use crate::services::question_sanitizer::sanitize_question;
use crate::services::response_extractor::extract_question_json;
use crate::utils::logging::truncate_text;
use crate::workflow::question_ctx::PerQuestionRequest;

/// 单题生成流程
///
/// - 只处理单个题目
/// - 不持有模型句柄（由编排层按轮询分配后传入）
/// - 不关心其他题目的成败
#[derive(Debug, Default)]
pub struct QuestionFlow {
    verbose_logging: bool,
}

impl QuestionFlow {
    /// 创建新的单题生成流程
    pub fn new(config: &Config) -> Self {
        Self {
            verbose_logging: config.verbose_logging,
        }
    }

    /// 生成一道题
    ///
    /// # 返回
    /// 成功返回规范化后的题目；模型调用失败、响应中找不到有效 JSON
    /// 等任何情况都返回 `None`。
    pub async fn generate_one(
        &self,
        model: &Arc<dyn TextModel>,
        ctx: &PerQuestionRequest,
    ) -> Option<GeneratedQuestion> {
        let number = ctx.question_number();
        let prompt = build_compact_prompt(ctx);

        let text = match model.generate(None, &prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("[题目 {}] ⚠️ 模型 {} 调用失败: {}", number, model.label(), e);
                return None;
            }
        };

        if self.verbose_logging {
            debug!("[题目 {}] 原始响应: {}", number, truncate_text(&text, 300));
        }

        let json = match extract_question_json(&text) {
            Some(json) => json,
            None => {
                warn!(
                    "[题目 {}] ⚠️ 响应中没有有效 JSON（模型 {}）",
                    number,
                    model.label()
                );
                return None;
            }
        };

        // 提取器已保证 questions 是非空数组，这里保持全防御写法
        let parsed: serde_json::Value = serde_json::from_str(&json).ok()?;
        let first = parsed.get("questions")?.as_array()?.first()?.clone();

        let question = sanitize_question(&first, &ctx.request, ctx.question_index);
        info!(
            "[题目 {}] ✓ 生成成功（模型 {}，子主题: {}）",
            number,
            model.label(),
            truncate_text(&ctx.specific_topic, 40)
        );

        Some(question)
    }
}

/// 构建单题生成的紧凑提示词
///
/// 内容：主题/难度/语言、声明的题型占比、双重聚焦段（描述 + 重点
/// 领域 + 分配到的子主题）、全题型目录及结构约束、认知层次分布、
/// 期望返回的单题 JSON 模板。
fn build_compact_prompt(ctx: &PerQuestionRequest) -> String {
    let request = &ctx.request;
    let question_types_text = format_question_types(request);
    let focus_section = build_dual_focus_section(ctx);
    let suggested_id = format!("{}_{}", ctx.question_number(), Utc::now().timestamp_millis());

    format!(
        r#"🎓 YACHAY - Genera 1 pregunta de quiz en JSON.

📋 SPECS: "{topic}" | {difficulty} | {language}
Tipos: {types}

{focus}

🎯 TIPOS:
{catalog}

🧠 NIVELES: Recordar(20%)→Comprender(25%)→Aplicar(25%)→Analizar(20%)→Evaluar(10%)

📊 JSON REQUERIDO:
{{
  "questions": [{{
    "id": "{id}",
    "question": "Texto pregunta",
    "type": "tipo_pregunta",
    "difficulty": "{difficulty}",
    "topic": "{topic}",
    "language": "{language}",
    "options": [{{"id":"opt_1","text":"Texto","isCorrect":boolean,"order":1,"explanation":"Por qué"}}],
    "correctAnswers": ["opt_1"],
    "hints": [
      {{"level":"subtle","text":"Pista sutil","pointsDeduction":5}},
      {{"level":"moderate","text":"Pista moderada","pointsDeduction":15}},
      {{"level":"obvious","text":"Pista obvia","pointsDeduction":25}}
    ],
    "explanation": {{"brief":"Breve","detailed":"Detallada","relatedConcepts":["concepto1"]}},
    "tags": ["tag1","tag2"]
  }}]
}}

🚨 SOLO JSON válido. Exactamente 1 pregunta."#,
        topic = request.topic,
        difficulty = request.difficulty,
        language = request.language,
        types = question_types_text,
        focus = focus_section,
        catalog = QuestionType::catalog_line(),
        id = suggested_id,
    )
}

/// 题型占比文本，形如 `multiple_choice(60%), true_false(40%)`
fn format_question_types(request: &crate::models::request::GenerationRequest) -> String {
    request
        .question_types
        .iter()
        .map(|qt| format!("{}({}%)", qt.question_type, qt.percentage))
        .collect::<Vec<_>>()
        .join(", ")
}

/// 双重聚焦段：请求级的描述/重点领域 + 本题分配到的子主题
fn build_dual_focus_section(ctx: &PerQuestionRequest) -> String {
    let request = &ctx.request;
    let mut section = String::from("📍 ENFOQUE ESPECÍFICO:\n");

    if let Some(description) = request.description.as_deref().filter(|d| !d.is_empty()) {
        section.push_str(&format!("Descripción: \"{}\"\n", description));
    }

    let focus_areas = request
        .focus_areas
        .as_deref()
        .filter(|areas| !areas.is_empty());
    let has_focus_areas = focus_areas.is_some();

    if let Some(areas) = focus_areas {
        section.push_str(&format!("🎯 Áreas prioritarias: {}\n", areas.join(", ")));
    }

    let has_specific_topic = !ctx.specific_topic.is_empty();
    if has_specific_topic {
        section.push_str(&format!("🤖 Enfoque específico: \"{}\"\n", ctx.specific_topic));
    }

    if has_focus_areas && has_specific_topic {
        section.push_str(
            "⚠️ PRIORIDAD: Crear pregunta sobre el enfoque específico dentro del contexto de las áreas prioritarias\n",
        );
    } else if has_focus_areas {
        section.push_str("⚠️ 70% de preguntas deben abordar las áreas prioritarias\n");
    } else if has_specific_topic {
        section.push_str("⚠️ Crear pregunta específicamente sobre el enfoque proporcionado\n");
    }

    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question_type::DifficultyLevel;
    use crate::models::request::{GenerationRequest, QuestionTypeConfig};
    use anyhow::Result;
    use async_trait::async_trait;

    struct ScriptedModel {
        payload: String,
    }

    #[async_trait]
    impl TextModel for ScriptedModel {
        fn label(&self) -> &str {
            "SCRIPTED"
        }

        async fn generate(&self, _system: Option<&str>, _user: &str) -> Result<String> {
            Ok(self.payload.clone())
        }
    }

    fn test_ctx() -> PerQuestionRequest {
        let request = GenerationRequest {
            topic: "Fotosíntesis".to_string(),
            description: Some("Repaso para el examen".to_string()),
            difficulty: DifficultyLevel::Intermediate,
            question_count: 3,
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
            language: "es".to_string(),
            focus_areas: Some(vec!["Ciclo de Calvin".to_string()]),
        };
        PerQuestionRequest::new(request, 2, "Fase luminosa".to_string())
    }

    #[test]
    fn test_compact_prompt_embeds_request_context() {
        let prompt = build_compact_prompt(&test_ctx());

        assert!(prompt.contains("\"Fotosíntesis\""));
        assert!(prompt.contains("intermediate"));
        assert!(prompt.contains("multiple_choice(60%), true_false(40%)"));
        assert!(prompt.contains("multiple_choice(4 opts,1 correcta)"));
        assert!(prompt.contains("Recordar(20%)"));
        assert!(prompt.contains("🤖 Enfoque específico: \"Fase luminosa\""));
        assert!(prompt.contains("🎯 Áreas prioritarias: Ciclo de Calvin"));
        assert!(prompt.contains("PRIORIDAD"));
        assert!(prompt.contains("\"questions\""));
        assert!(prompt.contains("Exactamente 1 pregunta"));
    }

    #[test]
    fn test_focus_section_without_areas() {
        let mut ctx = test_ctx();
        ctx.request.focus_areas = None;
        let section = build_dual_focus_section(&ctx);

        assert!(section.contains("Enfoque específico: \"Fase luminosa\""));
        assert!(section.contains("específicamente sobre el enfoque proporcionado"));
        assert!(!section.contains("Áreas prioritarias"));
    }

    #[tokio::test]
    async fn test_generate_one_success() {
        let flow = QuestionFlow::default();
        let model: Arc<dyn TextModel> = Arc::new(ScriptedModel {
            payload: r#"```json
{"questions":[{"question":"¿Qué gas libera la fotosíntesis?","type":"multiple_choice","options":[{"id":"opt_1","text":"Oxígeno","isCorrect":true},{"id":"opt_2","text":"Metano","isCorrect":false}]}]}
```"#
                .to_string(),
        });

        let question = flow.generate_one(&model, &test_ctx()).await.unwrap();
        assert_eq!(question.question, "¿Qué gas libera la fotosíntesis?");
        assert_eq!(question.question_type, QuestionType::MultipleChoice);
        assert_eq!(question.correct_answers, vec!["opt_1"]);
        assert_eq!(question.hints.len(), 3);
    }

    #[tokio::test]
    async fn test_generate_one_degrades_on_garbage() {
        let flow = QuestionFlow::default();
        let model: Arc<dyn TextModel> = Arc::new(ScriptedModel {
            payload: "Lo siento, hoy no puedo generar preguntas.".to_string(),
        });

        assert!(flow.generate_one(&model, &test_ctx()).await.is_none());
    }
}
