//! # 인증 서비스 구현
//!
//! 회원가입, 로그인, 비밀번호 재설정/변경의 비즈니스 로직을 담당합니다.
//!
//! ## 보안 설계
//!
//! - **bcrypt 해싱**: 환경별 cost 설정으로 보안 강도를 조절합니다.
//! - **계정 열거 방지**: 로그인 실패 시 이메일 존재 여부를 구분하지 않는
//!   단일 메시지(`Incorrect email or password`)를 사용합니다.
//! - **재설정 토큰**: 평문 토큰은 메일로만 전달하고 저장소에는 SHA-256
//!   다이제스트만 남깁니다. 유효 시간은 10분입니다.
//! - **토큰 무효화**: 비밀번호 변경 시 `password_changed_at`을 기록하여
//!   그 이전에 발급된 JWT를 전부 무효화합니다.

use std::sync::Arc;
use bcrypt::{hash, verify};
use mongodb::bson::DateTime;
use sha2::{Digest, Sha256};
use singleton_macro::service;
use uuid::Uuid;

use crate::{
    config::{FrontendConfig, PasswordConfig, ResetTokenConfig},
    domain::{
        dto::auth::request::{
            LoginRequest, ResetPasswordRequest, SignupRequest, UpdatePasswordRequest,
        },
        entities::users::user::User,
    },
    repositories::users::user_repo::UserRepository,
    services::email::email_service::EmailService,
};
use crate::core::errors::AppError;

/// 인증 비즈니스 로직 서비스
#[service(name = "auth")]
pub struct AuthService {
    /// 사용자 데이터 액세스 리포지토리
    user_repo: Arc<UserRepository>,
}

impl AuthService {
    /// 새 사용자 계정 생성
    ///
    /// 비밀번호를 해싱하여 계정을 만들고 환영 메일을 발송합니다.
    /// 환영 메일 실패는 가입을 막지 않고 로그만 남깁니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConflictError` - 이미 사용 중인 이메일
    /// * `AppError::InternalError` - 비밀번호 해싱 실패
    pub async fn signup(&self, request: SignupRequest) -> Result<User, AppError> {
        let start_time = std::time::Instant::now();

        let password_hash = self.hash_password(&request.password)?;

        let user = User::new(request.name, request.email, password_hash);
        let created_user = self.user_repo.create(user).await?;

        log::info!(
            "신규 가입: {} ({:?} 소요)",
            created_user.email,
            start_time.elapsed()
        );

        // 환영 메일은 실패해도 가입을 막지 않는다
        let email_service = EmailService::instance();
        if let Err(e) = email_service
            .send_welcome(&created_user.email, &created_user.name)
            .await
        {
            log::warn!("환영 메일 발송 실패 ({}): {}", created_user.email, e);
        }

        Ok(created_user)
    }

    /// 이메일/비밀번호 로그인
    ///
    /// 존재하지 않는 이메일과 잘못된 비밀번호를 구분하지 않습니다.
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - 이메일 또는 비밀번호 불일치
    pub async fn login(&self, request: LoginRequest) -> Result<User, AppError> {
        let user = self
            .user_repo
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                AppError::AuthenticationError("Incorrect email or password".to_string())
            })?;

        let matches = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

        if !matches {
            log::warn!("로그인 실패: {}", request.email);
            return Err(AppError::AuthenticationError(
                "Incorrect email or password".to_string(),
            ));
        }

        Ok(user)
    }

    /// 비밀번호 재설정 메일 발송
    ///
    /// 랜덤 토큰을 생성해 다이제스트만 저장하고, 평문 토큰이 포함된
    /// 재설정 URL을 메일로 보냅니다. 메일 발송에 실패하면 저장된 토큰을
    /// 제거하고 에러를 반환합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 해당 이메일의 사용자가 없음
    /// * `AppError::ExternalServiceError` - 메일 발송 실패
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("There is no user with that email address".to_string())
            })?;

        let user_id = user.id_string().ok_or_else(|| {
            AppError::InternalError("User has no ID".to_string())
        })?;

        let reset_token = generate_reset_token();
        let token_digest = digest_reset_token(&reset_token);
        let expires = DateTime::from_millis(
            DateTime::now().timestamp_millis() + ResetTokenConfig::expires_minutes() * 60 * 1000,
        );

        self.user_repo
            .set_reset_token(&user_id, &token_digest, expires)
            .await?;

        let reset_url = format!(
            "{}/reset-password/{}",
            FrontendConfig::base_url(),
            reset_token
        );

        let email_service = EmailService::instance();
        if let Err(e) = email_service
            .send_password_reset(&user.email, &user.name, &reset_url)
            .await
        {
            // 사용 불가능한 토큰을 남기지 않는다
            self.user_repo.clear_reset_token(&user_id).await?;
            log::error!("재설정 메일 발송 실패 ({}): {}", user.email, e);
            return Err(AppError::ExternalServiceError(
                "There was an error sending the email. Try again later!".to_string(),
            ));
        }

        log::info!("비밀번호 재설정 메일 발송: {}", user.email);
        Ok(())
    }

    /// 재설정 토큰으로 새 비밀번호 설정
    ///
    /// 평문 토큰을 다이제스트로 변환해 사용자를 찾고, 유효 시간 안에서만
    /// 비밀번호를 교체합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 토큰이 유효하지 않거나 만료됨
    pub async fn reset_password(
        &self,
        token: &str,
        request: ResetPasswordRequest,
    ) -> Result<User, AppError> {
        let token_digest = digest_reset_token(token);

        let user = self
            .user_repo
            .find_by_reset_token(&token_digest)
            .await?
            .filter(|user| user.reset_token_valid())
            .ok_or_else(|| {
                AppError::ValidationError("Token is invalid or has expired".to_string())
            })?;

        let user_id = user.id_string().ok_or_else(|| {
            AppError::InternalError("User has no ID".to_string())
        })?;

        let password_hash = self.hash_password(&request.password)?;

        let updated = self
            .user_repo
            .update_password(&user_id, &password_hash)
            .await?
            .ok_or_else(|| AppError::NotFound("No user found with that ID".to_string()))?;

        log::info!("비밀번호 재설정 완료: {}", updated.email);
        Ok(updated)
    }

    /// 로그인 상태에서의 비밀번호 변경
    ///
    /// 현재 비밀번호 재확인 후 새 비밀번호로 교체합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - 현재 비밀번호 불일치
    pub async fn update_password(
        &self,
        user_id: &str,
        request: UpdatePasswordRequest,
    ) -> Result<User, AppError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No user found with that ID".to_string()))?;

        let matches = verify(&request.password_current, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

        if !matches {
            return Err(AppError::AuthenticationError(
                "Your current password is wrong".to_string(),
            ));
        }

        let password_hash = self.hash_password(&request.password)?;

        let updated = self
            .user_repo
            .update_password(user_id, &password_hash)
            .await?
            .ok_or_else(|| AppError::NotFound("No user found with that ID".to_string()))?;

        log::info!("비밀번호 변경 완료: {}", updated.email);
        Ok(updated)
    }

    /// bcrypt 해싱 공통 경로
    fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let bcrypt_cost = PasswordConfig::bcrypt_cost();

        let hash_start = std::time::Instant::now();
        let password_hash = hash(password, bcrypt_cost)
            .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;
        log::debug!("Password hashing took: {:?}", hash_start.elapsed());

        Ok(password_hash)
    }
}

/// 비밀번호 재설정용 랜덤 토큰 생성 (64자 hex)
fn generate_reset_token() -> String {
    format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

/// 재설정 토큰의 SHA-256 다이제스트 (hex)
///
/// 저장소에는 이 다이제스트만 저장됩니다.
fn digest_reset_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_token_is_long_and_random() {
        let first = generate_reset_token();
        let second = generate_reset_token();

        assert_eq!(first.len(), 64);
        assert_ne!(first, second);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_reset_token_digest_is_deterministic() {
        let token = "abc123";
        assert_eq!(digest_reset_token(token), digest_reset_token(token));
        assert_ne!(digest_reset_token(token), digest_reset_token("abc124"));
    }

    #[test]
    fn test_digest_matches_known_sha256() {
        // SHA-256("abc")
        assert_eq!(
            digest_reset_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
