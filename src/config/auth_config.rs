//! # Authentication Configuration Module
//!
//! JWT 토큰, 인증 쿠키, 비밀번호 재설정 토큰 관련 설정을 관리합니다.
//!
//! ## 필수 환경 변수 설정
//!
//! ```bash
//! export JWT_SECRET="your-super-secret-jwt-key"
//! export JWT_EXPIRATION_DAYS="90"
//! export JWT_COOKIE_EXPIRES_DAYS="90"
//! ```

use std::env;

use crate::config::Environment;

/// JWT 토큰 설정
///
/// HS256 서명에 사용할 비밀키와 토큰 수명을 관리합니다.
pub struct JwtConfig;

impl JwtConfig {
    /// JWT 서명 비밀키를 반환합니다.
    ///
    /// # Panics
    ///
    /// 프로덕션 환경에서 `JWT_SECRET`이 설정되지 않은 경우 패닉이 발생합니다.
    /// 개발 환경에서는 경고 로그와 함께 기본값을 사용합니다.
    pub fn secret() -> String {
        env::var("JWT_SECRET").unwrap_or_else(|_| {
            if Environment::current().is_production() {
                panic!("JWT_SECRET must be set in production");
            }
            log::warn!("JWT_SECRET not set, using default (not secure for production!)");
            "your-secret-key".to_string()
        })
    }

    /// 액세스 토큰 수명 (일 단위, 기본값: 90)
    pub fn expiration_days() -> i64 {
        env::var("JWT_EXPIRATION_DAYS")
            .unwrap_or_else(|_| "90".to_string())
            .parse()
            .unwrap_or(90)
    }
}

/// 인증 쿠키 설정
///
/// 토큰은 응답 본문과 함께 `jwt` 쿠키로도 전달됩니다.
/// 브라우저 클라이언트는 쿠키로, API 클라이언트는 Bearer 헤더로 인증합니다.
pub struct CookieConfig;

impl CookieConfig {
    /// 쿠키 이름
    pub const NAME: &'static str = "jwt";

    /// 로그아웃 시 기존 쿠키를 덮어쓰는 더미 값
    pub const LOGGED_OUT_VALUE: &'static str = "loggedout";

    /// 쿠키 수명 (일 단위, 기본값: 90)
    pub fn expires_days() -> i64 {
        env::var("JWT_COOKIE_EXPIRES_DAYS")
            .unwrap_or_else(|_| "90".to_string())
            .parse()
            .unwrap_or(90)
    }

    /// Secure 속성 적용 여부 (프로덕션에서만 HTTPS 강제)
    pub fn secure() -> bool {
        Environment::current().is_production()
    }
}

/// 비밀번호 재설정 토큰 설정
pub struct ResetTokenConfig;

impl ResetTokenConfig {
    /// 재설정 토큰 유효 시간 (분 단위, 기본값: 10)
    pub fn expires_minutes() -> i64 {
        env::var("RESET_TOKEN_EXPIRES_MINUTES")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_expiration_default() {
        if env::var("JWT_EXPIRATION_DAYS").is_err() {
            assert_eq!(JwtConfig::expiration_days(), 90);
        }
    }

    #[test]
    fn test_reset_token_expiry_default() {
        if env::var("RESET_TOKEN_EXPIRES_MINUTES").is_err() {
            assert_eq!(ResetTokenConfig::expires_minutes(), 10);
        }
    }

    #[test]
    fn test_cookie_constants() {
        assert_eq!(CookieConfig::NAME, "jwt");
        assert_eq!(CookieConfig::LOGGED_OUT_VALUE, "loggedout");
    }
}
