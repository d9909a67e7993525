use thiserror::Error;

/// 应用程序错误类型
///
/// 错误分类原则：
/// - `Validation`：调用方请求参数非法，是唯一会穿透编排层的硬错误，
///   错误信息直接面向调用方（西语平台文案）
/// - `Config`：启动期配置错误（如模型池为空），在构建阶段暴露
///
/// 上游 LLM 调用失败、响应无法解析等情况不在此列，它们在最小作用域内
/// 被吸收：单题任务降级为"未产出"，子主题生成降级为兜底方案。
#[derive(Debug, Error)]
pub enum GenError {
    /// 请求参数校验失败
    #[error("{0}")]
    Validation(String),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),
}

/// 应用程序结果类型
pub type GenResult<T> = Result<T, GenError>;
