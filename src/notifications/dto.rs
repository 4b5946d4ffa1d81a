use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateNotificationRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_maps_type_field_to_kind() {
        let req: CreateNotificationRequest =
            serde_json::from_str(r#"{"type":"reminder","message":"Study!"}"#).unwrap();
        assert_eq!(req.kind, "reminder");
        assert_eq!(req.message, "Study!");
    }
}
