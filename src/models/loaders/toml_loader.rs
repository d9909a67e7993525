use crate::models::request::GenerationRequest;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载生成请求
///
/// 字段名与 JSON 契约一致（camelCase），例如：
///
/// ```toml
/// topic = "Fotosíntesis"
/// difficulty = "intermediate"
/// questionCount = 3
/// language = "es"
///
/// [[questionTypes]]
/// type = "multiple_choice"
/// percentage = 100
/// priority = 5
/// ```
pub async fn load_request_from_toml(path: &Path) -> Result<GenerationRequest> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", path.display()))?;

    let request: GenerationRequest = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", path.display()))?;

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_request_from_toml() {
        let dir = std::env::temp_dir();
        let path = dir.join("quiz_request_test.toml");
        tokio::fs::write(
            &path,
            r#"
topic = "Fotosíntesis"
difficulty = "intermediate"
questionCount = 3
language = "es"

[[questionTypes]]
type = "multiple_choice"
percentage = 100.0
priority = 5
"#,
        )
        .await
        .unwrap();

        let request = load_request_from_toml(&path).await.unwrap();
        assert_eq!(request.topic, "Fotosíntesis");
        assert_eq!(request.question_count, 3);
        assert!(request.validate().is_ok());

        let _ = tokio::fs::remove_file(&path).await;
    }
}
