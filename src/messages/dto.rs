use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(rename = "receiverId")]
    pub receiver_id: i64,
    pub content: String,
}
