//! 标识符生成
//!
//! 题目和测验的 id 都由毫秒时间戳加短随机后缀构成，仅要求在单次
//! 批量生成内不冲突，不要求全局唯一。

use chrono::Utc;
use rand::Rng;

const SUFFIX_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 生成指定长度的 [0-9a-z] 随机后缀
pub fn random_suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| SUFFIX_CHARS[rng.gen_range(0..SUFFIX_CHARS.len())] as char)
        .collect()
}

/// 生成题目 id，形如 `q_1733312000123_a5x9k`
pub fn question_id() -> String {
    format!("q_{}_{}", Utc::now().timestamp_millis(), random_suffix(5))
}

/// 生成测验 id，形如 `quiz_1733312000123_a5x9k2m1`
pub fn quiz_id() -> String {
    format!("quiz_{}_{}", Utc::now().timestamp_millis(), random_suffix(8))
}
