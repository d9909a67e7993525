pub mod loaders;
pub mod question;
pub mod question_type;
pub mod request;

pub use loaders::load_request_from_toml;
pub use question::{GeneratedQuestion, HintLevel, QuestionExplanation, QuestionHint, QuestionOption};
pub use question_type::{DifficultyLevel, QuestionType};
pub use request::{GenerationRequest, QuestionTypeConfig, Quiz, QuizMetadata};
