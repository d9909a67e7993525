use serde::{Deserialize, Serialize};

/// 题型枚举
///
/// 与平台前端约定的 10 种题型。字符串形式（snake_case）是对外 JSON
/// 契约的一部分，也会原样出现在发给模型的提示词中。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// 传统单选题
    MultipleChoice,
    /// 多选题
    MultipleSelect,
    /// 判断题
    TrueFalse,
    /// 填空题
    FillBlank,
    /// 拖拽题
    DragDrop,
    /// 排序题
    SequenceOrder,
    /// 连线配对题
    MatchPairs,
    /// 选取文本题
    SelectText,
    /// 分类题
    Categorize,
    /// 简答题
    ShortAnswer,
}

impl QuestionType {
    /// 全部题型，按展示顺序排列
    pub const ALL: [QuestionType; 10] = [
        QuestionType::MultipleChoice,
        QuestionType::MultipleSelect,
        QuestionType::TrueFalse,
        QuestionType::FillBlank,
        QuestionType::DragDrop,
        QuestionType::SequenceOrder,
        QuestionType::MatchPairs,
        QuestionType::SelectText,
        QuestionType::Categorize,
        QuestionType::ShortAnswer,
    ];

    /// 获取 snake_case 标识符
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::MultipleSelect => "multiple_select",
            QuestionType::TrueFalse => "true_false",
            QuestionType::FillBlank => "fill_blank",
            QuestionType::DragDrop => "drag_drop",
            QuestionType::SequenceOrder => "sequence_order",
            QuestionType::MatchPairs => "match_pairs",
            QuestionType::SelectText => "select_text",
            QuestionType::Categorize => "categorize",
            QuestionType::ShortAnswer => "short_answer",
        }
    }

    /// 从字符串解析题型（精确匹配）
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "multiple_choice" => Some(QuestionType::MultipleChoice),
            "multiple_select" => Some(QuestionType::MultipleSelect),
            "true_false" => Some(QuestionType::TrueFalse),
            "fill_blank" => Some(QuestionType::FillBlank),
            "drag_drop" => Some(QuestionType::DragDrop),
            "sequence_order" => Some(QuestionType::SequenceOrder),
            "match_pairs" => Some(QuestionType::MatchPairs),
            "select_text" => Some(QuestionType::SelectText),
            "categorize" => Some(QuestionType::Categorize),
            "short_answer" => Some(QuestionType::ShortAnswer),
            _ => None,
        }
    }

    /// 题型的结构约束说明（选项数、正确答案数等），用于提示词
    pub fn structural_note(self) -> Option<&'static str> {
        match self {
            QuestionType::MultipleChoice => Some("4 opts,1 correcta"),
            QuestionType::MultipleSelect => Some("4-6 opts,2-3 correctas"),
            QuestionType::TrueFalse => None,
            QuestionType::FillBlank => Some("1-3 espacios"),
            QuestionType::DragDrop => None,
            QuestionType::SequenceOrder => Some("4-6 elementos"),
            QuestionType::MatchPairs => Some("4-6 pares"),
            QuestionType::SelectText => None,
            QuestionType::Categorize => Some("6-8 elementos,2-3 categorías"),
            QuestionType::ShortAnswer => Some("1-3 palabras"),
        }
    }

    /// 拼出提示词中的题型目录行，形如
    /// `multiple_choice(4 opts,1 correcta)|multiple_select(...)|true_false|...`
    pub fn catalog_line() -> String {
        Self::ALL
            .iter()
            .map(|t| match t.structural_note() {
                Some(note) => format!("{}({})", t.as_str(), note),
                None => t.as_str().to_string(),
            })
            .collect::<Vec<_>>()
            .join("|")
    }

    /// 面向学生展示的题型名称
    pub fn name(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "Opción Múltiple",
            QuestionType::MultipleSelect => "Selección Múltiple",
            QuestionType::TrueFalse => "Verdadero/Falso",
            QuestionType::FillBlank => "Completar Espacios",
            QuestionType::DragDrop => "Arrastrar y Soltar",
            QuestionType::SequenceOrder => "Ordenar Secuencia",
            QuestionType::MatchPairs => "Emparejar Conceptos",
            QuestionType::SelectText => "Seleccionar Texto",
            QuestionType::Categorize => "Categorizar",
            QuestionType::ShortAnswer => "Respuesta Corta",
        }
    }

    /// 面向学生展示的题型说明
    pub fn description(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "Pregunta con 4 opciones, una correcta",
            QuestionType::MultipleSelect => "Pregunta con múltiples respuestas correctas",
            QuestionType::TrueFalse => "Afirmación para evaluar como verdadera o falsa",
            QuestionType::FillBlank => "Completar espacios en blanco en el texto",
            QuestionType::DragDrop => "Arrastrar opciones a los espacios correctos",
            QuestionType::SequenceOrder => "Ordenar elementos en secuencia lógica",
            QuestionType::MatchPairs => "Conectar conceptos relacionados",
            QuestionType::SelectText => "Seleccionar parte correcta de un texto",
            QuestionType::Categorize => "Clasificar elementos en categorías",
            QuestionType::ShortAnswer => "Respuesta breve de 1-3 palabras",
        }
    }

    /// 题型的体感难度标签
    pub fn difficulty_label(self) -> &'static str {
        match self {
            QuestionType::TrueFalse => "Fácil",
            QuestionType::MultipleChoice | QuestionType::FillBlank | QuestionType::SelectText => {
                "Medio"
            }
            QuestionType::MultipleSelect | QuestionType::DragDrop => "Medio-Alto",
            QuestionType::SequenceOrder | QuestionType::MatchPairs | QuestionType::Categorize
            | QuestionType::ShortAnswer => "Alto",
        }
    }

    /// 是否为推荐题型
    pub fn is_recommended(self) -> bool {
        matches!(
            self,
            QuestionType::MultipleChoice
                | QuestionType::TrueFalse
                | QuestionType::FillBlank
                | QuestionType::DragDrop
        )
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 难度等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl DifficultyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "beginner",
            DifficultyLevel::Intermediate => "intermediate",
            DifficultyLevel::Advanced => "advanced",
            DifficultyLevel::Expert => "expert",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(DifficultyLevel::Beginner),
            "intermediate" => Some(DifficultyLevel::Intermediate),
            "advanced" => Some(DifficultyLevel::Advanced),
            "expert" => Some(DifficultyLevel::Expert),
            _ => None,
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
