//! 响应提取 - 业务能力层
//!
//! 模型不保证返回良构 JSON：可能裹在 markdown 代码块里，可能混在
//! 自然语言说明中，可能带着多余的收尾字符。本模块按可靠性从高到低
//! 依次尝试四种提取策略，恢复出形如 `{"questions":[...]}` 的 JSON 文本。
//!
//! 策略顺序反映了实际观测到的模型输出习惯（代码块最常见 → 游离
//! JSON → 原文即 JSON → 按关键字抢救），不可调换：换序会改变哪些
//! 畸形响应可以被恢复。

use regex::Regex;
use serde_json::Value;

/// 从模型原始输出中提取题目 JSON
///
/// 候选片段必须能解析为对象、且 `questions` 字段是非空数组才算命中；
/// 四种策略都失败时返回 `None`。
pub fn extract_question_json(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // 策略 1: 剥掉 markdown 代码块（``` 或 ```json）
    if let Ok(re) = Regex::new(r"(?is)```(?:json)?\s*(.*?)\s*```") {
        if let Some(caps) = re.captures(raw) {
            let candidate = caps[1].trim();
            if is_valid_question_json(candidate) {
                return Some(candidate.to_string());
            }
        }
    }

    // 策略 2: 找到从首个 { 开始、包含 "questions" 的最大片段，
    // 再做括号配平剔除首尾杂质
    if let Ok(re) = Regex::new(r#"(?s)\{.*"questions".*\}"#) {
        if let Some(m) = re.find(raw) {
            if let Some(candidate) = extract_balanced_braces(m.as_str()) {
                if is_valid_question_json(&candidate) {
                    return Some(candidate);
                }
            }
        }
    }

    // 策略 3: 原文本身就是合法 JSON
    if is_valid_question_json(trimmed) {
        return Some(trimmed.to_string());
    }

    // 策略 4: 从 "questions" 关键字向前回溯到最近的 {，再向后配平
    if let Some(pos) = raw.find("\"questions\"") {
        if let Some(candidate) = extract_from_questions_keyword(raw, pos) {
            if is_valid_question_json(&candidate) {
                return Some(candidate);
            }
        }
    }

    None
}

/// 候选片段是否是合法的题目容器 JSON
fn is_valid_question_json(candidate: &str) -> bool {
    match serde_json::from_str::<Value>(candidate) {
        Ok(value) => value
            .get("questions")
            .and_then(Value::as_array)
            .map(|questions| !questions.is_empty())
            .unwrap_or(false),
        Err(_) => false,
    }
}

/// 括号配平扫描
///
/// 从首个 `{` 开始计数，`{` 加一、`}` 减一，计数归零处截断，
/// 得到一个完整的对象片段。`{`/`}` 都是 ASCII，按字节扫描对
/// UTF-8 文本是安全的。
fn extract_balanced_braces(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut depth: i64 = 0;
    let mut start: Option<usize> = None;

    for (i, &b) in bytes.iter().enumerate() {
        if b == b'{' {
            if start.is_none() {
                start = Some(i);
            }
            depth += 1;
        } else if b == b'}' {
            depth -= 1;
            if depth == 0 {
                if let Some(s) = start {
                    return Some(text[s..=i].to_string());
                }
            }
        }
    }

    None
}

/// 定位 `"questions"`，向前回溯到最近的 `{`，从那里开始配平
fn extract_from_questions_keyword(text: &str, questions_index: usize) -> Option<String> {
    let bytes = text.as_bytes();
    let mut start = questions_index;

    while start > 0 && bytes[start] != b'{' {
        start -= 1;
    }

    if bytes[start] != b'{' {
        return None;
    }

    extract_balanced_braces(&text[start..])
}
