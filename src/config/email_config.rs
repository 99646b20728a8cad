//! # Email Configuration Module
//!
//! 메일 프로바이더(HTTP API 방식) 연동 설정을 관리합니다.
//! 환영 메일, 비밀번호 재설정 메일 발송에 사용됩니다.

use std::env;

use crate::config::Environment;

/// 메일 프로바이더 설정
///
/// SendGrid 호환의 HTTP JSON API를 사용합니다. 개발 환경에서는
/// Mailtrap 같은 테스트 프로바이더 URL을 지정할 수 있습니다.
pub struct EmailConfig;

impl EmailConfig {
    /// 메일 발송 API 엔드포인트
    pub fn api_url() -> String {
        env::var("EMAIL_API_URL")
            .unwrap_or_else(|_| "https://api.sendgrid.com/v3/mail/send".to_string())
    }

    /// 메일 API 키를 반환합니다.
    ///
    /// # Panics
    ///
    /// 프로덕션 환경에서 `EMAIL_API_KEY`가 설정되지 않은 경우 패닉이 발생합니다.
    pub fn api_key() -> String {
        env::var("EMAIL_API_KEY").unwrap_or_else(|_| {
            if Environment::current().is_production() {
                panic!("EMAIL_API_KEY must be set in production");
            }
            log::warn!("EMAIL_API_KEY not set, using test placeholder");
            "test-api-key".to_string()
        })
    }

    /// 발신자 주소 (기본값: hello@tours.example.com)
    pub fn from_address() -> String {
        env::var("EMAIL_FROM").unwrap_or_else(|_| "hello@tours.example.com".to_string())
    }

    /// 발신자 표시 이름
    pub fn from_name() -> String {
        env::var("EMAIL_FROM_NAME").unwrap_or_else(|_| "Tour Booking".to_string())
    }
}
