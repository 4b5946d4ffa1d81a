use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct QuizResultRequest {
    #[serde(rename = "quizId")]
    pub quiz_id: i64,
    pub score: i32,
    #[serde(rename = "totalQuestions")]
    pub total_questions: i32,
}
