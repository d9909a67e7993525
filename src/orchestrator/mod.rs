//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层是整个生成管线的"指挥中心"：接收一次完整的测验请求，
//! 调度下层能力把它变成一批题目。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::QuizOrchestrator (处理一次 GenerationRequest)
//!     ↓ 先调用一次
//! services::TopicDiversifier (N 个互不相同的子主题)
//!     ↓ 再并发 N 个
//! workflow::QuestionFlow (处理单个题目)
//!     ↓
//! services (能力层：extract / sanitize)
//!     ↓
//! clients (模型实例池：GEMINI-1 ~ GEMINI-n)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：编排层只做调度和统计，不碰模型原始文本
//! 2. **资源隔离**：模型池只在这里按轮询分配给任务
//! 3. **故障隔离**：任务全部跑到完成（成功或失败），互不影响
//! 4. **顺序稳定**：输出按题目下标聚合，与任务完成顺序无关

pub mod quiz_orchestrator;

pub use quiz_orchestrator::QuizOrchestrator;
