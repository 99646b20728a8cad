//! Booking Entity Implementation
//!
//! 예약 엔티티입니다. 결제 완료 웹훅에서 서버 측 데이터로만 생성되며,
//! 가격은 결제 프로바이더의 정산 금액에서 가져옵니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// 예약 엔티티
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 예약된 투어 참조
    pub tour: ObjectId,
    /// 예약자 참조
    pub user: ObjectId,
    /// 결제 금액
    pub price: f64,
    /// 결제 완료 여부
    pub paid: bool,
    pub created_at: DateTime,
}

impl Booking {
    pub fn new(tour: ObjectId, user: ObjectId, price: f64) -> Self {
        Self {
            id: None,
            tour,
            user,
            price,
            paid: true,
            created_at: DateTime::now(),
        }
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }
}
