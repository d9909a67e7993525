pub mod question_sanitizer;
pub mod response_extractor;
pub mod topic_diversifier;

pub use question_sanitizer::sanitize_question;
pub use response_extractor::extract_question_json;
pub use topic_diversifier::TopicDiversifier;
