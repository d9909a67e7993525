use std::path::Path;

use anyhow::{Context, Result};

use quiz_generator::models::load_request_from_toml;
use quiz_generator::utils::logging;
use quiz_generator::{Config, QuizOrchestrator};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 从命令行给定的 TOML 文件加载请求
    let path = std::env::args()
        .nth(1)
        .context("用法: quiz_generator <request.toml>")?;
    let request = load_request_from_toml(Path::new(&path)).await?;

    // 构建编排器并生成测验
    let orchestrator = QuizOrchestrator::new(&config)?;
    let quiz = orchestrator.generate_quiz(&request).await?;

    println!("{}", serde_json::to_string_pretty(&quiz)?);

    Ok(())
}
