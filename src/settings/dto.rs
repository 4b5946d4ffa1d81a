use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub theme: String,
    pub language: String,
    #[serde(rename = "notificationsEnabled")]
    pub notifications_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_accepts_camel_case_flag() {
        let req: UpdateSettingsRequest = serde_json::from_str(
            r#"{"theme":"dark","language":"en","notificationsEnabled":false}"#,
        )
        .unwrap();
        assert_eq!(req.theme, "dark");
        assert!(!req.notifications_enabled);
    }
}
