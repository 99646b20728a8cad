//! Review Entity Implementation
//!
//! 리뷰 엔티티입니다. 투어와 작성자를 ObjectId로 참조하며,
//! `(tour, user)` 복합 유니크 인덱스로 투어당 1인 1리뷰를 보장합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// 리뷰 엔티티
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 리뷰 본문
    pub review: String,
    /// 평점 (1.0 ~ 5.0)
    pub rating: f64,
    /// 대상 투어 참조
    pub tour: ObjectId,
    /// 작성자 참조
    pub user: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Review {
    pub fn new(review: String, rating: f64, tour: ObjectId, user: ObjectId) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            review,
            rating,
            tour,
            user,
            created_at: now,
            updated_at: now,
        }
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    /// 작성자 본인 여부 확인
    pub fn is_authored_by(&self, user_id: &ObjectId) -> bool {
        &self.user == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ownership_check() {
        let author = ObjectId::new();
        let other = ObjectId::new();
        let review = Review::new("Great tour!".to_string(), 5.0, ObjectId::new(), author);

        assert!(review.is_authored_by(&author));
        assert!(!review.is_authored_by(&other));
    }
}
