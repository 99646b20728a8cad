//! Stripe Checkout API 응답/웹훅 모델
//!
//! 결제 프로바이더 API와의 파라미터 마샬링에 사용되는 역직렬화 구조체들입니다.
//! 필요한 필드만 선언하고 나머지는 무시합니다.

use serde::{Deserialize, Serialize};

/// Checkout Session 객체
///
/// 세션 생성 응답과 웹훅의 `data.object`, 서버 측 재조회 응답에서
/// 공통으로 사용됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeCheckoutSession {
    /// 세션 ID (`cs_...`)
    pub id: String,
    /// 호스티드 결제 페이지 URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// 세션 생성 시 전달한 투어 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_reference_id: Option<String>,
    /// 결제자 이메일
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    /// 결제 상태 (`paid` / `unpaid` / `no_payment_required`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
    /// 결제 총액 (최소 화폐 단위)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_total: Option<i64>,
}

/// 웹훅 이벤트 페이로드
#[derive(Debug, Clone, Deserialize)]
pub struct StripeWebhookEvent {
    /// 이벤트 타입 (예: `checkout.session.completed`)
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

/// 웹훅 이벤트의 데이터 래퍼
#[derive(Debug, Clone, Deserialize)]
pub struct StripeEventData {
    pub object: StripeCheckoutSession,
}

/// Stripe 에러 응답
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_event_deserialization() {
        let payload = serde_json::json!({
            "id": "evt_123",
            "type": "checkout.session.completed",
            "data": {
                "object": {
                    "id": "cs_test_123",
                    "client_reference_id": "5c88fa8cf4afda39709c2955",
                    "customer_email": "jonas@example.com",
                    "payment_status": "paid",
                    "amount_total": 39700
                }
            }
        });

        let event: StripeWebhookEvent = serde_json::from_value(payload).unwrap();
        assert_eq!(event.event_type, "checkout.session.completed");
        assert_eq!(event.data.object.payment_status.as_deref(), Some("paid"));
        assert_eq!(event.data.object.amount_total, Some(39700));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let payload = serde_json::json!({
            "id": "cs_test_123",
            "object": "checkout.session",
            "livemode": false,
            "metadata": {}
        });

        let session: StripeCheckoutSession = serde_json::from_value(payload).unwrap();
        assert_eq!(session.id, "cs_test_123");
        assert!(session.payment_status.is_none());
    }
}
