//! 사용자 응답 DTO

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::domain::entities::users::user::{Role, User};

/// 사용자 응답 DTO
///
/// 비밀번호 해시와 재설정 토큰 등 민감 정보를 제거한 공개 프로필입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub photo: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let User {
            id,
            name,
            email,
            photo,
            role,
            active,
            created_at,
            updated_at,
            ..
        } = user;

        Self {
            id: id.map(|id| id.to_hex()).unwrap_or_default(),
            name,
            email,
            photo,
            role,
            active,
            created_at,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_fields_are_not_exposed() {
        let user = User::new(
            "Jonas".to_string(),
            "jonas@example.com".to_string(),
            "$2b$04$secret-hash".to_string(),
        );

        let response = UserResponse::from(user);
        let json = serde_json::to_value(&response).unwrap();

        assert!(json.get("password_hash").is_none());
        assert!(json.get("password_reset_token").is_none());
        assert_eq!(json.get("email").unwrap(), "jonas@example.com");
    }
}
