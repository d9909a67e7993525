/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    // --- 题目生成模型池配置 ---
    /// Gemini API Key 列表，每个 Key 对应池中一个模型实例
    pub gemini_api_keys: Vec<String>,
    /// Gemini API 基础 URL
    pub gemini_api_base_url: String,
    /// Gemini 模型名称
    pub gemini_model_name: String,
    /// 生成温度
    pub gemini_temperature: f32,
    /// 单次生成的最大 token 数
    pub gemini_max_output_tokens: u32,
    // --- 子主题多样化模型配置 ---
    pub diversifier_api_key: String,
    pub diversifier_api_base_url: String,
    pub diversifier_model_name: String,
    /// 单次外部调用超时（秒）
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_keys: Vec::new(),
            gemini_api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            gemini_model_name: "gemini-2.5-flash".to_string(),
            gemini_temperature: 0.7,
            gemini_max_output_tokens: 4000,
            diversifier_api_key: String::new(),
            diversifier_api_base_url: "https://openrouter.ai/api/v1".to_string(),
            diversifier_model_name: "mistralai/mistral-7b-instruct:free".to_string(),
            request_timeout_secs: 30,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            gemini_api_keys: read_gemini_api_keys(),
            gemini_api_base_url: std::env::var("GEMINI_API_BASE_URL").unwrap_or(default.gemini_api_base_url),
            gemini_model_name: std::env::var("GEMINI_MODEL_NAME").unwrap_or(default.gemini_model_name),
            gemini_temperature: std::env::var("GEMINI_TEMPERATURE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.gemini_temperature),
            gemini_max_output_tokens: std::env::var("GEMINI_MAX_OUTPUT_TOKENS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.gemini_max_output_tokens),
            diversifier_api_key: std::env::var("OPENROUTER_API_KEY").unwrap_or(default.diversifier_api_key),
            diversifier_api_base_url: std::env::var("OPENROUTER_API_BASE_URL").unwrap_or(default.diversifier_api_base_url),
            diversifier_model_name: std::env::var("OPENROUTER_MODEL_NAME").unwrap_or(default.diversifier_model_name),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }
}

/// 读取 GEMINI_API_KEY_1 ~ GEMINI_API_KEY_4，过滤掉未设置或为空的项
fn read_gemini_api_keys() -> Vec<String> {
    (1..=4)
        .filter_map(|i| std::env::var(format!("GEMINI_API_KEY_{}", i)).ok())
        .filter(|key| !key.trim().is_empty())
        .collect()
}
