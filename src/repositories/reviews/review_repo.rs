//! # 리뷰 리포지토리 구현
//!
//! 리뷰 엔티티의 데이터 액세스 계층입니다. 조회 빈도가 낮아 개별 캐싱은
//! 하지 않고, 쓰기 시 컬렉션 캐시만 무효화합니다.

use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{bson::{doc, oid::ObjectId, Document}, options::IndexOptions, IndexModel};
use singleton_macro::repository;

use crate::{
    caching::redis::RedisClient,
    core::registry::Repository,
    db::Database,
    domain::entities::reviews::review::Review,
    repositories::crud,
    utils::api_features::ApiFeatures,
};
use crate::core::errors::AppError;

/// 리뷰 데이터 액세스 리포지토리
#[repository(name = "review", collection = "reviews")]
pub struct ReviewRepository {
    /// MongoDB 데이터베이스 연결
    db: Arc<Database>,

    /// Redis 캐시 클라이언트
    redis: Arc<RedisClient>,
}

/// 리뷰 집계 결과 (리뷰 개수, 평균 평점)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingStats {
    pub quantity: u32,
    pub average: f64,
}

impl ReviewRepository {
    /// 쿼리 기능이 적용된 리뷰 목록 조회
    ///
    /// 중첩 라우트(`/tours/{tour_id}/reviews`)에서는 `base_filter`에
    /// 투어 조건이 담겨 들어옵니다.
    pub async fn find_all(
        &self,
        base_filter: Document,
        features: &ApiFeatures,
    ) -> Result<Vec<Document>, AppError> {
        crud::find_all(&self.collection::<Document>(), base_filter, features).await
    }

    /// ID로 리뷰 조회
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Review>, AppError> {
        crud::find_by_id(&self.collection::<Review>(), id, Document::new()).await
    }

    /// 새 리뷰 생성
    ///
    /// `(tour, user)` 복합 유니크 제약으로 투어당 1인 1리뷰를 보장합니다.
    pub async fn create(&self, mut review: Review) -> Result<Review, AppError> {
        let existing = self
            .collection::<Review>()
            .find_one(doc! { "tour": review.tour, "user": review.user })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if existing.is_some() {
            return Err(AppError::ConflictError(
                "You have already reviewed this tour".to_string(),
            ));
        }

        let inserted_id = crud::insert_one(&self.collection::<Review>(), &review).await?;
        review.id = Some(inserted_id);

        let _ = self.invalidate_collection_cache(None).await;

        Ok(review)
    }

    /// 리뷰 부분 업데이트
    pub async fn update(&self, id: &str, set_doc: Document) -> Result<Option<Review>, AppError> {
        let updated = crud::update_by_id(&self.collection::<Review>(), id, set_doc).await?;

        if updated.is_some() {
            let _ = self.invalidate_collection_cache(None).await;
        }

        Ok(updated)
    }

    /// 리뷰 삭제
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let deleted = crud::delete_by_id(&self.collection::<Review>(), id).await?;

        if deleted {
            let _ = self.invalidate_collection_cache(None).await;
        }

        Ok(deleted)
    }

    /// 특정 투어의 평점 통계 집계
    ///
    /// 리뷰가 하나도 없으면 `None`을 반환하고, 호출 측에서 기본값을
    /// 복원합니다.
    pub async fn calc_rating_stats(
        &self,
        tour_id: &ObjectId,
    ) -> Result<Option<RatingStats>, AppError> {
        let pipeline = vec![
            doc! { "$match": { "tour": *tour_id } },
            doc! { "$group": {
                "_id": "$tour",
                "n_rating": { "$sum": 1 },
                "avg_rating": { "$avg": "$rating" }
            }},
        ];

        let cursor = self
            .collection::<Document>()
            .aggregate(pipeline)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let results: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        match results.first() {
            Some(doc) => {
                let quantity = doc.get_i32("n_rating").unwrap_or(0) as u32;
                let average = doc.get_f64("avg_rating").unwrap_or(0.0);
                Ok(Some(RatingStats { quantity, average }))
            }
            None => Ok(None),
        }
    }

    /// 데이터베이스 인덱스 생성
    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let collection = self.collection::<Review>();

        // 투어당 1인 1리뷰 복합 유니크 인덱스
        let tour_user_index = IndexModel::builder()
            .keys(doc! { "tour": 1, "user": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("tour_user_unique".to_string())
                .build())
            .build();

        collection
            .create_indexes([tour_user_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
