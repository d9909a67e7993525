//! 子主题多样化 - 业务能力层
//!
//! 同一个主题直接生成 N 道题，模型很容易产出近似重复的题目。
//! 本模块在生成前先向一个轻量模型要 N 个互不相同的子主题，每道题
//! 绑定一个，从源头保证覆盖面。
//!
//! 外部调用失败或响应完全不可解析时，用确定性的模板子主题兜底：
//! 兜底路径不做任何 I/O、永不失败，且总是恰好给出 N 个条目。

use std::sync::Arc;

use anyhow::Result;
use rand::seq::SliceRandom;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::clients::{ChatClient, TextModel};
use crate::config::Config;
use crate::models::request::GenerationRequest;
use crate::utils::logging::truncate_text;

/// 子主题生成的系统提示，强约束输出为裸 JSON 数组
const TOPIC_SYSTEM_PROMPT: &str = "You are a quiz topic generator. Always respond with a JSON \
array of strings only, never an object. Format: [\"topic1\", \"topic2\", \"topic3\"]";

/// 子主题条目的最小有效长度（按字符数），太短的一律丢弃
const MIN_TOPIC_LEN: usize = 3;

/// 子主题多样化服务
pub struct TopicDiversifier {
    model: Arc<dyn TextModel>,
}

impl TopicDiversifier {
    /// 创建新的多样化服务（使用配置中的 chat 后端）
    pub fn new(config: &Config) -> Self {
        Self {
            model: Arc::new(ChatClient::new(config)),
        }
    }

    /// 用指定的模型实例创建（测试和自定义后端入口）
    pub fn with_model(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    /// 为一次请求生成子主题列表
    ///
    /// 永不失败：外部调用出错或解析不出有效列表时落到模板兜底。
    /// 兜底恰好返回 `question_count` 条；成功路径可能少于
    /// `question_count`（编排层会循环复用）。
    pub async fn diversify(&self, request: &GenerationRequest) -> Vec<String> {
        match self.try_diversify(request).await {
            Ok(topics) => {
                info!("✓ 生成了 {} 个子主题", topics.len());
                topics
            }
            Err(e) => {
                warn!("⚠️ 子主题生成失败，使用模板兜底: {}", e);
                fallback_topics(request)
            }
        }
    }

    async fn try_diversify(&self, request: &GenerationRequest) -> Result<Vec<String>> {
        let prompt = build_topic_prompt(request);
        let response = self
            .model
            .generate(Some(TOPIC_SYSTEM_PROMPT), &prompt)
            .await?;

        debug!("子主题原始响应: {}", truncate_text(&response, 200));

        let topics = parse_topics(&response, request.question_count);
        if topics.is_empty() {
            anyhow::bail!("响应中解析不出有效的子主题列表");
        }
        Ok(topics)
    }

    /// 为一个主题生成循序渐进的学习路径（5-8 个子主题）
    ///
    /// 与 `diversify` 不同，这里没有兜底：调用失败原样上抛，
    /// 解析不出编号行时返回空列表。
    pub async fn learning_path(&self, topic: &str, user_level: &str) -> Result<Vec<String>> {
        let prompt = format!(
            "Como experto en educación y diseño curricular, crea una ruta de aprendizaje \
progresiva para el tema: \"{}\".\n\n\
Nivel del usuario: {}\n\n\
Proporciona una lista de 5-8 subtemas ordenados desde lo más básico hasta lo más avanzado.\n\
Cada subtema debe ser específico y alcanzable.\n\n\
Formato de respuesta:\n1. [Subtema básico]\n2. [Siguiente nivel]\n...\n\n\
Responde únicamente con la lista numerada, sin explicaciones adicionales.",
            topic, user_level
        );

        let response = self.model.generate(None, &prompt).await?;
        Ok(parse_numbered_lines(&response))
    }
}

/// 构建子主题生成的用户提示词
fn build_topic_prompt(request: &GenerationRequest) -> String {
    let focus_areas_context = match &request.focus_areas {
        Some(areas) if !areas.is_empty() => format!("\nFocus on: {}", areas.join(", ")),
        _ => String::new(),
    };
    let description = request.description.as_deref().unwrap_or("");

    format!(
        "Create {count} specific subtopics for quiz questions about: {topic}\n\n\
{description}{focus}\n\
Difficulty: {difficulty} | Language: {language}\n\n\
IMPORTANT: Return ONLY a JSON array of strings (not an object). Example format:\n\
[\"Subtopic 1\", \"Subtopic 2\", \"Subtopic 3\"]\n\n\
Generate exactly {count} subtopics as a JSON array:",
        count = request.question_count,
        topic = request.topic,
        description = description,
        focus = focus_areas_context,
        difficulty = request.difficulty,
        language = request.language,
    )
}

/// 宽松解析子主题列表
///
/// 依次尝试：整体是 JSON 数组或对象 → 截取 `[...]` 片段 →
/// 截取 `{...}` 片段 → 编号/项目符号的纯文本行。
/// 解析出的候选统一清洗：去空白、强转字符串、丢弃过短条目、
/// 截断到 `question_count`。
fn parse_topics(content: &str, question_count: usize) -> Vec<String> {
    let raw = extract_topic_candidates(content, question_count);
    clean_topics(raw, question_count)
}

fn extract_topic_candidates(content: &str, question_count: usize) -> Vec<String> {
    let trimmed = content.trim();

    // 整体就是合法 JSON：数组直接用，对象按枚举顺序取值
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        match value {
            Value::Array(items) => return items.iter().map(value_to_topic).collect(),
            Value::Object(map) => return map.values().map(value_to_topic).collect(),
            _ => {}
        }
    }

    // 截取第一个 [...] 片段
    if let Ok(re) = Regex::new(r"(?s)\[.*?\]") {
        if let Some(m) = re.find(content) {
            if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(m.as_str()) {
                return items.iter().map(value_to_topic).collect();
            }
        }
    }

    // 截取第一个 {...} 片段，按对象取值
    if let Ok(re) = Regex::new(r"(?s)\{.*?\}") {
        if let Some(m) = re.find(content) {
            if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(m.as_str()) {
                return map.values().map(value_to_topic).collect();
            }
        }
    }

    // 最后的手段：逐行收集，剥掉编号/项目符号前缀和引号
    let prefix_re = Regex::new(r"^[\d.\-*\s]+").ok();
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('-') && !line.starts_with('*'))
        .map(|line| {
            let stripped = match &prefix_re {
                Some(re) => re.replace(line, "").to_string(),
                None => line.to_string(),
            };
            stripped.replace(['\'', '"'], "")
        })
        .take(question_count)
        .collect()
}

/// JSON 值转子主题文本：字符串取原文，其余取 JSON 字面形式
fn value_to_topic(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn clean_topics(raw: Vec<String>, question_count: usize) -> Vec<String> {
    raw.into_iter()
        .map(|topic| topic.trim().to_string())
        .filter(|topic| topic.chars().count() > MIN_TOPIC_LEN)
        .take(question_count)
        .collect()
}

/// 确定性的模板兜底
///
/// 有 `focus_areas` 时按每个领域展开 4 个模板变体后打乱；否则用
/// 固定的 10 条主题模板。两条路径都循环取满 `question_count` 条。
fn fallback_topics(request: &GenerationRequest) -> Vec<String> {
    if let Some(areas) = &request.focus_areas {
        if !areas.is_empty() {
            let mut expanded: Vec<String> = Vec::with_capacity(areas.len() * 4);
            for area in areas {
                expanded.push(format!("Basic concepts in {}", area));
                expanded.push(format!("Advanced applications of {}", area));
                expanded.push(format!("Practical examples of {}", area));
                expanded.push(format!("Common challenges in {}", area));
            }
            expanded.shuffle(&mut rand::thread_rng());
            return cycle_to_count(expanded, request.question_count);
        }
    }

    let base_topics = vec![
        format!("Basic concepts of {}", request.topic),
        format!("Advanced applications in {}", request.topic),
        format!("Historical development of {}", request.topic),
        format!("Current trends in {}", request.topic),
        format!("Practical examples of {}", request.topic),
        format!("Key principles of {}", request.topic),
        format!("Common challenges in {}", request.topic),
        format!("Best practices for {}", request.topic),
        format!("Future perspectives on {}", request.topic),
        format!("Case studies in {}", request.topic),
    ];
    cycle_to_count(base_topics, request.question_count)
}

/// 循环复用模板直到凑满 `count` 条
fn cycle_to_count(topics: Vec<String>, count: usize) -> Vec<String> {
    (0..count).map(|i| topics[i % topics.len()].clone()).collect()
}

/// 解析 "1. xxx" 形式的编号行
fn parse_numbered_lines(text: &str) -> Vec<String> {
    let line_re = match Regex::new(r"^\d+\.\s*(.+)$") {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };

    text.lines()
        .filter_map(|line| {
            line_re
                .captures(line.trim())
                .map(|caps| caps[1].trim().to_string())
        })
        .filter(|entry| !entry.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question_type::{DifficultyLevel, QuestionType};
    use crate::models::request::QuestionTypeConfig;
    use async_trait::async_trait;

    struct FailingModel;

    #[async_trait]
    impl TextModel for FailingModel {
        fn label(&self) -> &str {
            "FAILING"
        }

        async fn generate(&self, _system: Option<&str>, _user: &str) -> Result<String> {
            anyhow::bail!("error de red simulado")
        }
    }

    fn test_request(count: usize, focus_areas: Option<Vec<String>>) -> GenerationRequest {
        GenerationRequest {
            topic: "Fotosíntesis".to_string(),
            description: Some("Ciclo de Calvin".to_string()),
            difficulty: DifficultyLevel::Intermediate,
            question_count: count,
            question_types: vec![QuestionTypeConfig {
                question_type: QuestionType::MultipleChoice,
                percentage: 100.0,
                priority: 5,
            }],
            language: "es".to_string(),
            focus_areas,
        }
    }

    #[test]
    fn test_parse_topics_json_array() {
        let content = r#"["Fase luminosa", "Ciclo de Calvin", "Clorofila y pigmentos"]"#;
        let topics = parse_topics(content, 3);
        assert_eq!(
            topics,
            vec!["Fase luminosa", "Ciclo de Calvin", "Clorofila y pigmentos"]
        );
    }

    #[test]
    fn test_parse_topics_json_object_values() {
        let content = r#"{"1": "Fase luminosa", "2": "Ciclo de Calvin"}"#;
        let topics = parse_topics(content, 5);
        assert_eq!(topics, vec!["Fase luminosa", "Ciclo de Calvin"]);
    }

    #[test]
    fn test_parse_topics_bracketed_in_prose() {
        let content = "Claro, aquí están:\n[\"Fase luminosa\", \"Ciclo de Calvin\"]\n¡Éxito!";
        let topics = parse_topics(content, 2);
        assert_eq!(topics, vec!["Fase luminosa", "Ciclo de Calvin"]);
    }

    #[test]
    fn test_parse_topics_numbered_lines() {
        let content = "1. Fase luminosa de la fotosíntesis\n2. Ciclo de Calvin\n3. Pigmentos fotosintéticos";
        let topics = parse_topics(content, 3);
        assert_eq!(topics.len(), 3);
        assert_eq!(topics[0], "Fase luminosa de la fotosíntesis");
        assert_eq!(topics[1], "Ciclo de Calvin");
    }

    #[test]
    fn test_parse_topics_cleaning() {
        // 过短的条目被丢弃，超出数量的被截断
        let content = r#"["ok?", "Fase luminosa", "Ciclo de Calvin", "Fotorrespiración"]"#;
        let topics = parse_topics(content, 2);
        assert_eq!(topics, vec!["Fase luminosa", "Ciclo de Calvin"]);
    }

    #[test]
    fn test_parse_topics_garbage_gives_empty() {
        assert!(parse_topics("", 3).is_empty());
        assert!(parse_topics("- \n* \n", 3).is_empty());
    }

    #[test]
    fn test_fallback_generic_exact_count() {
        let request = test_request(3, None);
        let topics = fallback_topics(&request);
        assert_eq!(topics.len(), 3);
        assert!(topics.iter().all(|t| t.contains("Fotosíntesis")));
    }

    #[test]
    fn test_fallback_cycles_beyond_template_count() {
        // 模板只有 10 条，请求 15 条也必须凑满
        let request = test_request(15, None);
        let topics = fallback_topics(&request);
        assert_eq!(topics.len(), 15);
        assert!(topics.iter().all(|t| !t.is_empty()));
    }

    #[test]
    fn test_fallback_with_focus_areas() {
        let request = test_request(
            6,
            Some(vec!["Ciclo de Calvin".to_string(), "Clorofila".to_string()]),
        );
        let topics = fallback_topics(&request);
        assert_eq!(topics.len(), 6);
        assert!(topics
            .iter()
            .all(|t| t.contains("Ciclo de Calvin") || t.contains("Clorofila")));
    }

    #[test]
    fn test_diversify_falls_back_on_model_failure() {
        let diversifier = TopicDiversifier::with_model(Arc::new(FailingModel));
        let request = test_request(4, None);

        let topics = tokio_test::block_on(diversifier.diversify(&request));
        assert_eq!(topics.len(), 4);
        assert!(topics.iter().all(|t| !t.is_empty()));
    }

    struct ScriptedModel(&'static str);

    #[async_trait]
    impl TextModel for ScriptedModel {
        fn label(&self) -> &str {
            "SCRIPTED"
        }

        async fn generate(&self, _system: Option<&str>, _user: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_learning_path_parses_numbered_response() {
        let diversifier = TopicDiversifier::with_model(Arc::new(ScriptedModel(
            "1. Qué es la fotosíntesis\n2. Estructura del cloroplasto\n3. Fase luminosa",
        )));

        let path =
            tokio_test::block_on(diversifier.learning_path("Fotosíntesis", "beginner")).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], "Qué es la fotosíntesis");
    }

    #[test]
    fn test_learning_path_propagates_model_failure() {
        let diversifier = TopicDiversifier::with_model(Arc::new(FailingModel));
        let result = tokio_test::block_on(diversifier.learning_path("Fotosíntesis", "beginner"));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_numbered_lines() {
        let text = "1. Tonos básicos\n2. Saludos comunes\nnota suelta\n3. Números del 1 al 10";
        let lines = parse_numbered_lines(text);
        assert_eq!(
            lines,
            vec!["Tonos básicos", "Saludos comunes", "Números del 1 al 10"]
        );
    }
}
