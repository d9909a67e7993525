//! 生成管线端到端测试
//!
//! 用脚本化的假模型驱动完整管线（多样化 → 并发扇出 → 提取 →
//! 规范化），不依赖任何真实后端。需要真实凭证的连通性测试标记
//! 为 #[ignore]，手动运行：cargo test -- --ignored

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use quiz_generator::utils::logging;
use quiz_generator::{
    Config, DifficultyLevel, GenError, GenerationRequest, ModelPool, QuestionType,
    QuestionTypeConfig, QuizOrchestrator, TextModel,
};

/// 总是返回同一段文本的假模型
struct ScriptedModel {
    label: String,
    payload: String,
}

#[async_trait]
impl TextModel for ScriptedModel {
    fn label(&self) -> &str {
        &self.label
    }

    async fn generate(&self, _system: Option<&str>, _user: &str) -> Result<String> {
        Ok(self.payload.clone())
    }
}

/// 总是失败的假模型（模拟网络错误）
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

/// 裹在 markdown 代码块里的良构单题响应
fn well_formed_payload() -> String {
    r#"Claro, aquí está la pregunta:
```json
{
  "questions": [{
    "question": "¿Cuál es el pigmento principal de la fotosíntesis?",
    "type": "multiple_choice",
    "difficulty": "intermediate",
    "topic": "Photosynthesis",
    "language": "en",
    "options": [
      {"id": "opt_1", "text": "Clorofila", "isCorrect": true, "order": 1},
      {"id": "opt_2", "text": "Hemoglobina", "isCorrect": false, "order": 2},
      {"id": "opt_3", "text": "Queratina", "isCorrect": false, "order": 3},
      {"id": "opt_4", "text": "Melanina", "isCorrect": false, "order": 4}
    ],
    "hints": [
      {"level": "subtle", "text": "Es de color verde", "pointsDeduction": 5}
    ],
    "explanation": {"brief": "La clorofila capta la luz", "detailed": "La clorofila absorbe luz roja y azul", "relatedConcepts": ["cloroplasto"]},
    "tags": ["biología"]
  }]
}
```"#
        .to_string()
}

fn scripted(label: &str, payload: String) -> Arc<dyn TextModel> {
    Arc::new(ScriptedModel {
        label: label.to_string(),
        payload,
    })
}

fn topics_model() -> Arc<dyn TextModel> {
    scripted(
        "TOPIC-GEN",
        r#"["Light-dependent reactions", "Calvin cycle", "Chlorophyll and pigments"]"#.to_string(),
    )
}

fn photosynthesis_request(count: usize) -> GenerationRequest {
    GenerationRequest {
        topic: "Photosynthesis".to_string(),
        description: None,
        difficulty: DifficultyLevel::Intermediate,
        question_count: count,
        question_types: vec![QuestionTypeConfig {
            question_type: QuestionType::MultipleChoice,
            percentage: 100.0,
            priority: 5,
        }],
        language: "en".to_string(),
        focus_areas: None,
    }
}

#[tokio::test]
async fn test_generate_full_success() {
    logging::init();

    let pool = ModelPool::from_models(vec![scripted("GEMINI-1", well_formed_payload())]).unwrap();
    let orchestrator = QuizOrchestrator::with_models(pool, topics_model());

    let questions = orchestrator
        .generate(&photosynthesis_request(3))
        .await
        .unwrap();

    assert_eq!(questions.len(), 3);
    for question in &questions {
        assert_eq!(question.question_type, QuestionType::MultipleChoice);
        assert_eq!(question.options.len(), 4);
        let correct: Vec<&str> = question
            .options
            .iter()
            .filter(|o| o.is_correct)
            .map(|o| o.id.as_str())
            .collect();
        assert_eq!(correct, vec!["opt_1"]);
        assert_eq!(question.correct_answers, vec!["opt_1"]);
        // 规范化不变量：提示非空、解析非缺省对象、答案指向存在的选项
        assert!(!question.hints.is_empty());
        assert!(!question.explanation.brief.is_empty());
        let option_ids: Vec<&str> = question.options.iter().map(|o| o.id.as_str()).collect();
        for answer in &question.correct_answers {
            assert!(option_ids.contains(&answer.as_str()));
        }
    }
}

#[tokio::test]
async fn test_single_failure_does_not_block_the_rest() {
    logging::init();

    // 4 道题、4 个实例：轮询下任务 i 用实例 i，让第 3 个实例失败
    let pool = ModelPool::from_models(vec![
        scripted("GEMINI-1", well_formed_payload()),
        scripted("GEMINI-2", well_formed_payload()),
        Arc::new(FailingModel),
        scripted("GEMINI-4", well_formed_payload()),
    ])
    .unwrap();
    let orchestrator = QuizOrchestrator::with_models(pool, topics_model());

    let questions = orchestrator
        .generate(&photosynthesis_request(4))
        .await
        .unwrap();

    // 失败的那道题被丢弃，其余 3 道正常产出
    assert_eq!(questions.len(), 3);
    for question in &questions {
        assert_eq!(question.options.len(), 4);
    }
}

#[tokio::test]
async fn test_unparseable_responses_degrade_to_empty() {
    let pool = ModelPool::from_models(vec![scripted(
        "GEMINI-1",
        "No hay JSON por aquí.".to_string(),
    )])
    .unwrap();
    let orchestrator = QuizOrchestrator::with_models(pool, topics_model());

    let questions = orchestrator
        .generate(&photosynthesis_request(2))
        .await
        .unwrap();

    assert!(questions.is_empty());
}

#[tokio::test]
async fn test_diversifier_failure_falls_back_and_generation_continues() {
    let pool = ModelPool::from_models(vec![scripted("GEMINI-1", well_formed_payload())]).unwrap();
    let orchestrator = QuizOrchestrator::with_models(pool, Arc::new(FailingModel));

    let questions = orchestrator
        .generate(&photosynthesis_request(3))
        .await
        .unwrap();

    assert_eq!(questions.len(), 3);
}

#[tokio::test]
async fn test_quiz_envelope_reports_requested_and_delivered() {
    let pool = ModelPool::from_models(vec![
        scripted("GEMINI-1", well_formed_payload()),
        Arc::new(FailingModel),
    ])
    .unwrap();
    let orchestrator = QuizOrchestrator::with_models(pool, topics_model());

    let quiz = orchestrator
        .generate_quiz(&photosynthesis_request(4))
        .await
        .unwrap();

    // 4 道题轮询 2 个实例，失败实例承担 2 道
    assert_eq!(quiz.requested_questions, 4);
    assert_eq!(quiz.total_questions, 2);
    assert_eq!(quiz.questions.len(), 2);
    assert_eq!(quiz.time_limit, 2 * 45);
    assert!(quiz.id.starts_with("quiz_"));
    assert_eq!(quiz.topic, "Photosynthesis");
}

#[tokio::test]
async fn test_validation_rejected_before_any_generation() {
    let pool = ModelPool::from_models(vec![Arc::new(FailingModel) as Arc<dyn TextModel>]).unwrap();
    let orchestrator = QuizOrchestrator::with_models(pool, Arc::new(FailingModel));

    let mut request = photosynthesis_request(3);
    request.question_types[0].percentage = 60.0;

    match orchestrator.generate(&request).await {
        Err(GenError::Validation(message)) => {
            assert!(message.contains("sumar 100%"));
        }
        other => panic!("se esperaba un error de validación, se obtuvo: {:?}", other.map(|q| q.len())),
    }
}

#[test]
fn test_empty_pool_is_a_config_error() {
    let result = ModelPool::from_models(Vec::new());
    assert!(matches!(result, Err(GenError::Config(_))));
}

// ========== 需要真实凭证的连通性测试 ==========

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_live_generation_small_batch() {
    logging::init();

    let config = Config::from_env();
    let orchestrator = QuizOrchestrator::new(&config).expect("需要配置 GEMINI_API_KEY_1");

    let quiz = orchestrator
        .generate_quiz(&GenerationRequest::quick_exam("Fotosíntesis", Some(2), None))
        .await
        .expect("生成测验失败");

    println!("生成了 {}/{} 道题目", quiz.total_questions, quiz.requested_questions);
    assert!(quiz.total_questions <= quiz.requested_questions);
}
