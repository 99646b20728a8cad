//! User Entity Implementation
//!
//! 사용자 엔티티의 핵심 구현체입니다. 비밀번호 해시와 비밀번호 재설정
//! 토큰 상태를 함께 관리하며, 소프트 삭제(`active`)를 지원합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// 사용자 역할
///
/// 역할 기반 접근 제어(RBAC)에 사용됩니다. 투어 생성/수정은
/// `admin`/`lead-guide`, 월별 일정 조회는 가이드 역할 이상에게 허용됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "guide")]
    Guide,
    #[serde(rename = "lead-guide")]
    LeadGuide,
    #[serde(rename = "admin")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Guide => "guide",
            Role::LeadGuide => "lead-guide",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// 사용자 엔티티
///
/// `password_hash`는 엔티티 직렬화에 포함됩니다(저장/캐시에 필요).
/// 클라이언트 응답에는 절대 엔티티를 직접 내보내지 않고
/// `UserResponse` DTO로 변환해서 내보냅니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    /// 사용자 이메일 (unique, 소문자 정규화)
    pub email: String,
    /// 프로필 사진 파일명
    pub photo: String,
    pub role: Role,
    /// bcrypt 해시된 비밀번호
    pub password_hash: String,
    /// 마지막 비밀번호 변경 시각 (토큰 무효화 판단에 사용)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_changed_at: Option<DateTime>,
    /// 비밀번호 재설정 토큰의 SHA-256 다이제스트
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_reset_token: Option<String>,
    /// 재설정 토큰 만료 시각
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_reset_expires: Option<DateTime>,
    /// 계정 활성화 여부 (소프트 삭제 시 false)
    pub active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    /// 새 사용자 생성
    ///
    /// 기본 역할 `user`, 기본 프로필 사진, 활성 상태로 시작합니다.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            name,
            email: email.to_lowercase(),
            photo: "default.jpg".to_string(),
            role: Role::User,
            password_hash,
            password_changed_at: None,
            password_reset_token: None,
            password_reset_expires: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    /// 토큰 발급 이후에 비밀번호가 변경되었는지 확인합니다.
    ///
    /// * `token_iat` - JWT 발급 시각 (Unix timestamp, 초)
    ///
    /// 변경 시각이 발급 시각보다 나중이면 해당 토큰은 무효로 취급됩니다.
    pub fn changed_password_after(&self, token_iat: i64) -> bool {
        match self.password_changed_at {
            Some(changed_at) => changed_at.timestamp_millis() / 1000 > token_iat,
            None => false,
        }
    }

    /// 저장된 재설정 토큰이 아직 유효한지 확인합니다.
    pub fn reset_token_valid(&self) -> bool {
        match self.password_reset_expires {
            Some(expires) => expires.timestamp_millis() > DateTime::now().timestamp_millis(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new(
            "Jonas".to_string(),
            "Jonas@Example.Com".to_string(),
            "$2b$04$hash".to_string(),
        );

        assert_eq!(user.email, "jonas@example.com");
        assert_eq!(user.photo, "default.jpg");
        assert_eq!(user.role, Role::User);
        assert!(user.active);
        assert!(user.password_changed_at.is_none());
    }

    #[test]
    fn test_changed_password_after() {
        let mut user = User::new(
            "Jonas".to_string(),
            "jonas@example.com".to_string(),
            "hash".to_string(),
        );

        // 변경 이력이 없으면 항상 false
        assert!(!user.changed_password_after(0));

        let now_secs = DateTime::now().timestamp_millis() / 1000;
        user.password_changed_at = Some(DateTime::now());

        // 과거에 발급된 토큰은 무효
        assert!(user.changed_password_after(now_secs - 3600));
        // 변경 이후 발급된 토큰은 유효
        assert!(!user.changed_password_after(now_secs + 3600));
    }

    #[test]
    fn test_reset_token_validity_window() {
        let mut user = User::new(
            "Jonas".to_string(),
            "jonas@example.com".to_string(),
            "hash".to_string(),
        );

        assert!(!user.reset_token_valid());

        let future = DateTime::from_millis(DateTime::now().timestamp_millis() + 10 * 60 * 1000);
        user.password_reset_expires = Some(future);
        assert!(user.reset_token_valid());

        let past = DateTime::from_millis(DateTime::now().timestamp_millis() - 1000);
        user.password_reset_expires = Some(past);
        assert!(!user.reset_token_valid());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(
            serde_json::to_string(&Role::LeadGuide).unwrap(),
            "\"lead-guide\""
        );
        let parsed: Role = serde_json::from_str("\"admin\"").unwrap();
        assert!(parsed.is_admin());
    }
}
