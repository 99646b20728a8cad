//! 사용자 프로필/관리 요청 DTO

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::users::user::Role;

/// 내 프로필 수정 요청 DTO
///
/// 이름/이메일/프로필 사진만 수정할 수 있습니다. 비밀번호 필드가 함께
/// 전달되면 서비스 계층에서 `/update-my-password` 사용을 안내하는
/// 400 에러를 반환합니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateMeRequest {
    #[validate(length(min = 1, max = 50, message = "Please tell us your name"))]
    pub name: Option<String>,

    #[validate(email(message = "Please provide a valid email"))]
    pub email: Option<String>,

    /// 프로필 사진 파일명
    pub photo: Option<String>,

    // 비밀번호 변경 시도 감지용. 값이 있으면 요청 전체가 거부됩니다.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_confirm: Option<String>,
}

impl UpdateMeRequest {
    /// 비밀번호 변경을 시도한 요청인지 확인합니다.
    pub fn attempts_password_change(&self) -> bool {
        self.password.is_some() || self.password_confirm.is_some()
    }
}

/// 관리자용 사용자 수정 요청 DTO
///
/// 비밀번호는 이 경로로 수정할 수 없습니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 50, message = "Please tell us your name"))]
    pub name: Option<String>,

    #[validate(email(message = "Please provide a valid email"))]
    pub email: Option<String>,

    pub photo: Option<String>,

    pub role: Option<Role>,

    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_change_attempt_detection() {
        let plain = UpdateMeRequest {
            name: Some("Jonas".to_string()),
            email: None,
            photo: None,
            password: None,
            password_confirm: None,
        };
        assert!(!plain.attempts_password_change());

        let sneaky = UpdateMeRequest {
            name: None,
            email: None,
            photo: None,
            password: Some("NewPass1234".to_string()),
            password_confirm: None,
        };
        assert!(sneaky.attempts_password_change());
    }
}
