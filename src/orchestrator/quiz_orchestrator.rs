//! 测验生成编排器 - 编排层
//!
//! ## 核心功能
//!
//! 1. **请求校验**：非法参数在任何生成工作开始前拒绝
//! 2. **子主题多样化**：每次请求只调用一次 TopicDiversifier
//! 3. **并发扇出**：每道题一个任务，同时发出、跑到各自完成
//! 4. **轮询分配**：子主题按 `i % topics`、模型按 `i % pool` 独立轮询
//! 5. **按位收集**：输出顺序跟随题目下标，与完成顺序无关
//!
//! 产出是"尽力而为"的：请求 10 道可能只回 9 道，部分失败表现为
//! 更短的合法结果而不是错误。只有请求校验失败会以硬错误返回。

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, error, info};

use crate::clients::{ModelPool, TextModel};
use crate::config::Config;
use crate::error::GenResult;
use crate::models::question::GeneratedQuestion;
use crate::models::request::{GenerationRequest, Quiz, QuizMetadata};
use crate::services::topic_diversifier::TopicDiversifier;
use crate::utils::ids;
use crate::workflow::{PerQuestionRequest, QuestionFlow};

/// 测验生成编排器
///
/// 模型池在构建时建立一次，之后只读共享；编排器自身无任何
/// 跨请求的可变状态，可以被并发使用。
pub struct QuizOrchestrator {
    pool: Arc<ModelPool>,
    diversifier: TopicDiversifier,
    flow: Arc<QuestionFlow>,
}

impl QuizOrchestrator {
    /// 按配置构建编排器
    ///
    /// 模型池为空（一个 API Key 都没配）属于配置错误，在这里
    /// 就地失败，而不是等到分配任务时才暴露。
    pub fn new(config: &Config) -> GenResult<Self> {
        Ok(Self {
            pool: Arc::new(ModelPool::from_config(config)?),
            diversifier: TopicDiversifier::new(config),
            flow: Arc::new(QuestionFlow::new(config)),
        })
    }

    /// 用现成的模型实例构建（测试和自定义后端入口）
    pub fn with_models(pool: ModelPool, diversifier_model: Arc<dyn TextModel>) -> Self {
        Self {
            pool: Arc::new(pool),
            diversifier: TopicDiversifier::with_model(diversifier_model),
            flow: Arc::new(QuestionFlow::default()),
        }
    }

    /// 生成一批题目
    ///
    /// # 返回
    /// 长度在 0..=question_count 之间的题目列表，每道题都已规范化；
    /// 顺序与题目下标一致。唯一的错误路径是请求校验失败。
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> GenResult<Vec<GeneratedQuestion>> {
        request.validate()?;

        let started = Instant::now();
        debug!(
            "模型池大小: {}，计划并发任务数: {}",
            self.pool.len(),
            request.question_count
        );

        // 每次请求只做一次子主题多样化（失败会落到模板兜底，不会报错）
        let topics = self.diversifier.diversify(request).await;

        // 为每道题建任务：子主题和模型实例各自独立轮询
        let mut handles = Vec::with_capacity(request.question_count);
        for i in 0..request.question_count {
            let model = self.pool.get(i);
            let specific_topic = topics[i % topics.len()].clone();
            let ctx = PerQuestionRequest::new(request.clone(), i, specific_topic);
            let flow = Arc::clone(&self.flow);

            handles.push(tokio::spawn(async move {
                flow.generate_one(&model, &ctx).await
            }));
        }

        // 等全部任务结束（成功或失败），按任务下标顺序收集，
        // 完成顺序不影响输出顺序
        let results = join_all(handles).await;
        let questions: Vec<GeneratedQuestion> = results
            .into_iter()
            .enumerate()
            .filter_map(|(i, joined)| match joined {
                Ok(question) => question,
                Err(e) => {
                    error!("[题目 {}] 任务执行失败: {}", i + 1, e);
                    None
                }
            })
            .collect();

        info!(
            "✓ 共生成 {}/{} 道题目，耗时 {} ms",
            questions.len(),
            request.question_count,
            started.elapsed().as_millis()
        );

        Ok(questions)
    }

    /// 生成完整的测验响应
    ///
    /// 在 `generate` 之上套平台的测验信封：请求数和实际产出数
    /// 都写进响应，部分失败对调用方是可见的。
    pub async fn generate_quiz(&self, request: &GenerationRequest) -> GenResult<Quiz> {
        let questions = self.generate(request).await?;

        Ok(Quiz {
            id: ids::quiz_id(),
            topic: request.topic.clone(),
            difficulty: request.difficulty,
            total_questions: questions.len(),
            requested_questions: request.question_count,
            time_limit: (questions.len() * 45) as u64,
            metadata: QuizMetadata {
                created_at: Utc::now().to_rfc3339(),
                language: request.language.clone(),
            },
            questions,
        })
    }
}
