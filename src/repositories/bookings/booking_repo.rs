//! # 예약 리포지토리 구현
//!
//! 예약 엔티티의 데이터 액세스 계층입니다.

use std::sync::Arc;
use mongodb::{bson::{doc, oid::ObjectId, Document}, options::IndexOptions, IndexModel};
use singleton_macro::repository;

use crate::{
    caching::redis::RedisClient,
    core::registry::Repository,
    db::Database,
    domain::entities::bookings::booking::Booking,
    repositories::crud,
    utils::api_features::ApiFeatures,
};
use crate::core::errors::AppError;

/// 예약 데이터 액세스 리포지토리
#[repository(name = "booking", collection = "bookings")]
pub struct BookingRepository {
    /// MongoDB 데이터베이스 연결
    db: Arc<Database>,

    /// Redis 캐시 클라이언트
    redis: Arc<RedisClient>,
}

impl BookingRepository {
    /// 쿼리 기능이 적용된 예약 목록 조회 (관리자/리드가이드용)
    pub async fn find_all(
        &self,
        base_filter: Document,
        features: &ApiFeatures,
    ) -> Result<Vec<Document>, AppError> {
        crud::find_all(&self.collection::<Document>(), base_filter, features).await
    }

    /// ID로 예약 조회
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        crud::find_by_id(&self.collection::<Booking>(), id, Document::new()).await
    }

    /// 특정 사용자가 특정 투어를 이미 예약했는지 확인
    ///
    /// 결제 완료 웹훅이 중복 전달되어도 예약이 한 번만 생성되게 합니다.
    pub async fn exists_for(
        &self,
        tour: &ObjectId,
        user: &ObjectId,
    ) -> Result<bool, AppError> {
        let existing = self
            .collection::<Booking>()
            .find_one(doc! { "tour": *tour, "user": *user })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(existing.is_some())
    }

    /// 새 예약 생성
    pub async fn create(&self, mut booking: Booking) -> Result<Booking, AppError> {
        let inserted_id = crud::insert_one(&self.collection::<Booking>(), &booking).await?;
        booking.id = Some(inserted_id);

        let _ = self.invalidate_collection_cache(None).await;

        Ok(booking)
    }

    /// 예약 부분 업데이트
    pub async fn update(&self, id: &str, set_doc: Document) -> Result<Option<Booking>, AppError> {
        let updated = crud::update_by_id(&self.collection::<Booking>(), id, set_doc).await?;

        if updated.is_some() {
            let _ = self.invalidate_collection_cache(None).await;
        }

        Ok(updated)
    }

    /// 예약 삭제
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let deleted = crud::delete_by_id(&self.collection::<Booking>(), id).await?;

        if deleted {
            let _ = self.invalidate_collection_cache(None).await;
        }

        Ok(deleted)
    }

    /// 데이터베이스 인덱스 생성
    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let collection = self.collection::<Booking>();

        // 투어/사용자 복합 인덱스 (웹훅 중복 확인, 사용자별 예약 조회)
        let tour_user_index = IndexModel::builder()
            .keys(doc! { "tour": 1, "user": 1 })
            .options(IndexOptions::builder()
                .name("tour_user".to_string())
                .build())
            .build();

        collection
            .create_indexes([tour_user_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
