use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LanguageRequest {
    pub name: String,
    pub code: String,
}
