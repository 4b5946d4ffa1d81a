use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct HobbyRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}
