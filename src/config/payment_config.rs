//! # Payment Configuration Module
//!
//! 결제 프로바이더(Stripe Checkout) 연동 설정을 관리합니다.
//! 결제 자체는 전적으로 프로바이더에 위임하며, 백엔드는 Checkout Session
//! 생성과 결제 완료 웹훅 처리만 담당합니다.

use std::env;

use crate::config::Environment;

/// Stripe Checkout 설정
pub struct StripeConfig;

impl StripeConfig {
    /// Stripe 비밀키를 반환합니다.
    ///
    /// # Panics
    ///
    /// 프로덕션 환경에서 `STRIPE_SECRET_KEY`가 설정되지 않은 경우 패닉이 발생합니다.
    pub fn secret_key() -> String {
        env::var("STRIPE_SECRET_KEY").unwrap_or_else(|_| {
            if Environment::current().is_production() {
                panic!("STRIPE_SECRET_KEY must be set in production");
            }
            log::warn!("STRIPE_SECRET_KEY not set, using test placeholder");
            "sk_test_placeholder".to_string()
        })
    }

    /// Stripe REST API 베이스 URL (기본값: https://api.stripe.com/v1)
    ///
    /// 테스트에서 목 서버를 가리키도록 오버라이드할 수 있습니다.
    pub fn api_base() -> String {
        env::var("STRIPE_API_BASE").unwrap_or_else(|_| "https://api.stripe.com/v1".to_string())
    }

    /// 결제 통화 (기본값: usd)
    pub fn currency() -> String {
        env::var("STRIPE_CURRENCY").unwrap_or_else(|_| "usd".to_string())
    }
}

/// 프론트엔드 기본 URL 설정
///
/// 결제 성공/취소 리다이렉트 URL과 메일 내 링크를 구성할 때 사용됩니다.
pub struct FrontendConfig;

impl FrontendConfig {
    /// 프론트엔드 베이스 URL (기본값: http://localhost:3000)
    pub fn base_url() -> String {
        env::var("FRONTEND_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
    }
}
