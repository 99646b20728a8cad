//! JWT 토큰 관리 서비스 구현
//!
//! JSON Web Token 기반의 인증 시스템을 제공합니다.
//! HMAC-SHA256 서명을 사용하여 토큰의 생성과 검증을 담당합니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use singleton_macro::service;

use crate::{
    config::JwtConfig,
    domain::entities::users::user::User,
};
use crate::domain::token::token::TokenClaims;
use crate::core::errors::AppError;

/// JWT 토큰 관리 서비스
///
/// 로그인/회원가입/비밀번호 변경 모두 이 서비스를 통해 토큰을 발급합니다.
/// 토큰 수명은 `JWT_EXPIRATION_DAYS` 환경 변수로 설정합니다.
#[service(name = "token")]
pub struct TokenService {
    // 외부 의존성 없음
}

impl TokenService {
    /// 사용자를 위한 JWT 토큰 생성
    ///
    /// # Arguments
    ///
    /// * `user` - 토큰을 발급받을 사용자 정보
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - 생성된 JWT 토큰
    ///
    /// # Errors
    ///
    /// * `AppError::InternalError` - 토큰 생성 실패 또는 사용자 ID 없음
    pub fn generate_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now + Duration::days(JwtConfig::expiration_days());

        let claims = TokenClaims {
            sub: user.id_string().ok_or_else(|| {
                AppError::InternalError("User has no ID".to_string())
            })?,
            role: user.role,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        let secret = JwtConfig::secret();
        let header = Header::default();
        let encoding_key = EncodingKey::from_secret(secret.as_ref());

        encode(&header, &claims, &encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to sign JWT: {}", e)))
    }

    /// JWT 토큰 검증 및 클레임 추출
    ///
    /// # Arguments
    ///
    /// * `token` - 검증할 JWT 토큰 문자열 (Bearer 접두사 제외)
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - 토큰 만료, 잘못된 형식/서명
    /// * `AppError::InternalError` - 기타 시스템 오류
    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        let secret = JwtConfig::secret();
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let validation = Validation::default();

        decode::<TokenClaims>(token, &decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::AuthenticationError(
                        "Your token has expired! Please log in again.".to_string(),
                    )
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::AuthenticationError(
                        "Invalid token. Please log in again!".to_string(),
                    )
                }
                _ => AppError::AuthenticationError(format!("Token verification failed: {}", e)),
            })
    }

    /// Bearer 토큰에서 실제 토큰 부분 추출
    ///
    /// HTTP Authorization 헤더의 "Bearer {token}" 형식에서
    /// 토큰 부분만을 추출합니다.
    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> Result<&'a str, AppError> {
        if auth_header.starts_with("Bearer ") {
            Ok(&auth_header[7..])
        } else {
            Err(AppError::AuthenticationError(
                "Invalid authorization header format".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::users::user::Role;
    use mongodb::bson::oid::ObjectId;

    /// 테스트 프로세스의 환경을 고정합니다.
    /// ENVIRONMENT 미설정 시 프로덕션으로 간주되어 secret() 호출이 패닉하므로
    /// 토큰 테스트 전에 반드시 호출해야 합니다.
    fn init_test_env() {
        unsafe {
            std::env::set_var("ENVIRONMENT", "test");
            std::env::set_var("JWT_SECRET", "test-only-secret");
        }
    }

    fn user_with_id() -> User {
        let mut user = User::new(
            "Jonas".to_string(),
            "jonas@example.com".to_string(),
            "hash".to_string(),
        );
        user.id = Some(ObjectId::new());
        user
    }

    #[test]
    fn test_sign_and_verify_round_trip() {
        init_test_env();
        let user = user_with_id();
        let svc = TokenService::instance();

        let token = svc.generate_token(&user).unwrap();
        let claims = svc.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user.id_string().unwrap());
        assert_eq!(claims.role, Role::User);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_user_without_id_cannot_get_token() {
        init_test_env();
        let user = User::new(
            "Jonas".to_string(),
            "jonas@example.com".to_string(),
            "hash".to_string(),
        );

        assert!(TokenService::instance().generate_token(&user).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        init_test_env();
        let user = user_with_id();
        let svc = TokenService::instance();

        let mut token = svc.generate_token(&user).unwrap();
        token.push('x');

        assert!(matches!(
            svc.verify_token(&token),
            Err(AppError::AuthenticationError(_))
        ));
    }

    #[test]
    fn test_bearer_extraction() {
        init_test_env();
        let svc = TokenService::instance();

        assert_eq!(
            svc.extract_bearer_token("Bearer abc.def.ghi").unwrap(),
            "abc.def.ghi"
        );
        assert!(svc.extract_bearer_token("Basic abc").is_err());
        assert!(svc.extract_bearer_token("abc").is_err());
    }
}
