//! # 이메일 발송 서비스 구현
//!
//! 메일 프로바이더의 HTTP JSON API를 통해 트랜잭션 메일을 발송합니다.
//! 환영 메일과 비밀번호 재설정 메일 두 종류를 지원합니다.

use serde_json::json;
use singleton_macro::service;

use crate::config::EmailConfig;
use crate::core::errors::AppError;

/// 이메일 발송 서비스
///
/// 프로바이더 API 주소와 키는 환경 변수로 설정합니다. 개발 환경에서는
/// Mailtrap 같은 테스트 프로바이더를 가리키게 할 수 있습니다.
#[service(name = "email")]
pub struct EmailService {
    // 외부 의존성 없음 (HTTP 클라이언트는 호출 시점에 생성)
}

impl EmailService {
    /// 가입 환영 메일 발송
    pub async fn send_welcome(&self, to: &str, name: &str) -> Result<(), AppError> {
        let subject = "Welcome to the Tour Booking family!";
        let body = format!(
            "Hi {},\n\n\
             Welcome aboard! We are glad to have you.\n\
             Browse our tours and book your next adventure.\n\n\
             - The Tour Booking Team",
            name
        );

        self.send(to, subject, &body).await
    }

    /// 비밀번호 재설정 메일 발송
    ///
    /// * `reset_url` - 평문 재설정 토큰이 포함된 URL
    pub async fn send_password_reset(
        &self,
        to: &str,
        name: &str,
        reset_url: &str,
    ) -> Result<(), AppError> {
        let subject = "Your password reset token (valid for only 10 minutes)";
        let body = format!(
            "Hi {},\n\n\
             Forgot your password? Submit a request with your new password to:\n\
             {}\n\n\
             If you didn't forget your password, please ignore this email.",
            name, reset_url
        );

        self.send(to, subject, &body).await
    }

    /// 메일 프로바이더 API 호출 공통 경로
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AppError> {
        let payload = json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": {
                "email": EmailConfig::from_address(),
                "name": EmailConfig::from_name()
            },
            "subject": subject,
            "content": [{ "type": "text/plain", "value": body }]
        });

        let client = reqwest::Client::new();
        let response = client
            .post(EmailConfig::api_url())
            .bearer_auth(EmailConfig::api_key())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Mail provider unreachable: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "Mail provider returned {}: {}",
                status, detail
            )));
        }

        log::info!("메일 발송 완료: {} ({})", to, subject);
        Ok(())
    }
}
