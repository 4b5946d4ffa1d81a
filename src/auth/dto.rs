use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: String,
    pub email: String,
}

/// Returned from register (201) and login (200).
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_response_uses_camel_case_user_id() {
        let resp = AuthResponse {
            message: "Login successful".into(),
            user_id: 1,
            token: "abc".into(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["userId"], 1);
        assert_eq!(json["token"], "abc");
    }
}
