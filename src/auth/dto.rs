use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Authenticated identity attached to protected requests. Never carries the
/// password hash.
#[derive(Debug, Clone, Serialize)]
pub struct AuthedUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_shape() {
        let json = serde_json::to_value(TokenResponse {
            token: "abc".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "token": "abc" }));
    }

    #[test]
    fn authed_user_has_no_password_field() {
        let json = serde_json::to_string(&AuthedUser {
            id: Uuid::new_v4(),
            username: "sam".into(),
            email: "sam@example.com".into(),
        })
        .unwrap();
        assert!(!json.contains("password"));
    }
}
