//! 인증 플로우 요청 DTO
//!
//! 회원가입, 로그인, 비밀번호 재설정/변경 요청 데이터 구조를 정의합니다.
//! 클라이언트 입력 데이터의 검증과 타입 안전성을 보장합니다.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// 회원가입 요청 DTO
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_signup_passwords_match"))]
pub struct SignupRequest {
    /// 사용자 이름 (1-50자)
    #[validate(length(min = 1, max = 50, message = "Please tell us your name"))]
    pub name: String,

    /// 사용자 이메일 주소 (RFC 5322 표준)
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    /// 계정 비밀번호 (최소 8자, 대소문자+숫자 포함)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    /// 비밀번호 확인 (password와 일치해야 함)
    pub password_confirm: String,
}

/// 로그인 요청 DTO
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Please provide a password"))]
    pub password: String,
}

/// 비밀번호 재설정 메일 요청 DTO
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
}

/// 재설정 토큰으로 새 비밀번호 설정 요청 DTO
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_reset_passwords_match"))]
pub struct ResetPasswordRequest {
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    pub password_confirm: String,
}

/// 로그인 상태에서의 비밀번호 변경 요청 DTO
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_update_passwords_match"))]
pub struct UpdatePasswordRequest {
    /// 현재 비밀번호 (재인증용)
    #[validate(length(min = 1, message = "Please provide your current password"))]
    pub password_current: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    pub password_confirm: String,
}

fn validate_signup_passwords_match(req: &SignupRequest) -> Result<(), ValidationError> {
    passwords_match(&req.password, &req.password_confirm)
}

fn validate_reset_passwords_match(req: &ResetPasswordRequest) -> Result<(), ValidationError> {
    passwords_match(&req.password, &req.password_confirm)
}

fn validate_update_passwords_match(req: &UpdatePasswordRequest) -> Result<(), ValidationError> {
    passwords_match(&req.password, &req.password_confirm)
}

/// 비밀번호 일치 여부를 검증
fn passwords_match(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password != confirm {
        return Err(ValidationError::new("passwords_mismatch")
            .with_message("Passwords are not the same".into()));
    }
    Ok(())
}

/// 비밀번호 보안 강도 검증 (대문자, 소문자, 숫자 필수 포함)
fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(has_uppercase && has_lowercase && has_digit) {
        return Err(ValidationError::new("weak_password")
            .with_message("Password must contain uppercase, lowercase and digit".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> SignupRequest {
        SignupRequest {
            name: "Jonas Schmedtmann".to_string(),
            email: "jonas@example.com".to_string(),
            password: "Test1234pass".to_string(),
            password_confirm: "Test1234pass".to_string(),
        }
    }

    #[test]
    fn test_valid_signup_passes() {
        assert!(signup().validate().is_ok());
    }

    #[test]
    fn test_password_mismatch_rejected() {
        let mut req = signup();
        req.password_confirm = "Different1pass".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_weak_password_rejected() {
        let mut req = signup();
        req.password = "alllowercase1".to_string();
        req.password_confirm = req.password.clone();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_short_password_rejected() {
        let mut req = signup();
        req.password = "Ab1".to_string();
        req.password_confirm = req.password.clone();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut req = signup();
        req.email = "not-an-email".to_string();
        assert!(req.validate().is_err());
    }
}
