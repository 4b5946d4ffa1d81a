use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo::QuizQuestion;

#[derive(Debug, Deserialize)]
pub struct QuestionInput {
    pub question: String,
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuizRequest {
    pub title: String,
    pub description: String,
    #[serde(rename = "languageId")]
    pub language_id: Option<i64>,
    pub questions: Vec<QuestionInput>,
}

#[derive(Debug, Serialize)]
pub struct CreatedQuizResponse {
    pub message: String,
    #[serde(rename = "quizId")]
    pub quiz_id: i64,
}

/// Quiz with its questions, as returned by GET /quiz/:id.
#[derive(Debug, Serialize)]
pub struct QuizDetails {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "languageId")]
    pub language_id: Option<i64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub questions: Vec<QuizQuestion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_parses_camel_case_fields() {
        let req: CreateQuizRequest = serde_json::from_str(
            r#"{
                "title": "Basics",
                "description": "Intro quiz",
                "languageId": 3,
                "questions": [
                    {"question": "2+2?", "options": ["3", "4"], "correctAnswer": 1}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(req.language_id, Some(3));
        assert_eq!(req.questions.len(), 1);
        assert_eq!(req.questions[0].correct_answer, 1);
    }
}
