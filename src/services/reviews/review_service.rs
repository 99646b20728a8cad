//! # 리뷰 관리 서비스 구현
//!
//! 리뷰 CRUD와 투어 평점 동기화의 비즈니스 로직을 담당합니다.
//!
//! ## 평점 동기화 불변식
//!
//! 리뷰가 생성/수정/삭제될 때마다 해당 투어의 `ratings_quantity`와
//! `ratings_average`를 집계 파이프라인으로 다시 계산해서 반영합니다.
//! 리뷰가 모두 사라지면 기본값(0개, 4.5점)으로 되돌립니다.
//!
//! ## 소유권 규칙
//!
//! 리뷰 수정/삭제는 작성자 본인 또는 관리자만 가능합니다.

use std::sync::Arc;
use mongodb::bson::{doc, oid::ObjectId, Document};
use singleton_macro::service;

use crate::{
    domain::{
        dto::reviews::request::{CreateReviewRequest, UpdateReviewRequest},
        dto::reviews::response::ReviewResponse,
        entities::reviews::review::Review,
        entities::tours::tour::{Tour, DEFAULT_RATINGS_AVERAGE},
        models::auth::authenticated_user::AuthenticatedUser,
    },
    repositories::{
        crud,
        reviews::review_repo::ReviewRepository,
        tours::tour_repo::TourRepository,
    },
    utils::api_features::ApiFeatures,
};
use crate::core::errors::AppError;

/// 리뷰 비즈니스 로직 서비스
#[service(name = "review")]
pub struct ReviewService {
    /// 리뷰 데이터 액세스 리포지토리
    review_repo: Arc<ReviewRepository>,

    /// 투어 데이터 액세스 리포지토리 (평점 동기화용)
    tour_repo: Arc<TourRepository>,
}

impl ReviewService {
    /// 쿼리 기능이 적용된 리뷰 목록 조회
    ///
    /// * `tour_id` - 중첩 라우트의 투어 ID. 있으면 해당 투어의 리뷰만
    ///   조회합니다.
    pub async fn get_all(
        &self,
        tour_id: Option<&str>,
        features: &ApiFeatures,
    ) -> Result<Vec<serde_json::Value>, AppError> {
        let base_filter = match tour_id {
            Some(id) => doc! { "tour": crud::parse_object_id(id)? },
            None => Document::new(),
        };

        let docs = self.review_repo.find_all(base_filter, features).await?;
        Ok(crud::documents_to_json(docs))
    }

    /// ID로 리뷰 조회
    pub async fn get_by_id(&self, id: &str) -> Result<ReviewResponse, AppError> {
        let review = self
            .review_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("No review found with that ID".to_string()))?;

        Ok(ReviewResponse::from(review))
    }

    /// 새 리뷰 작성
    ///
    /// 작성자는 항상 인증 토큰에서, 투어는 중첩 라우트 경로가 본문보다
    /// 우선합니다. 작성 후 투어 평점을 다시 집계합니다.
    pub async fn create(
        &self,
        author: &AuthenticatedUser,
        path_tour_id: Option<&str>,
        request: CreateReviewRequest,
    ) -> Result<ReviewResponse, AppError> {
        let tour_id_str = path_tour_id
            .map(str::to_string)
            .or(request.tour.clone())
            .ok_or_else(|| {
                AppError::ValidationError("Review must belong to a tour".to_string())
            })?;

        let tour_id = crud::parse_object_id(&tour_id_str)?;
        let user_id = crud::parse_object_id(&author.user_id)?;

        // 존재하는 투어인지 확인
        self.tour_repo
            .find_by_id(&tour_id_str)
            .await?
            .ok_or_else(|| AppError::NotFound("No tour found with that ID".to_string()))?;

        let review = Review::new(request.review, request.rating, tour_id, user_id);
        let created = self.review_repo.create(review).await?;

        self.sync_tour_ratings(&tour_id).await?;

        Ok(ReviewResponse::from(created))
    }

    /// 리뷰 수정 (작성자 또는 관리자)
    pub async fn update(
        &self,
        id: &str,
        author: &AuthenticatedUser,
        request: UpdateReviewRequest,
    ) -> Result<ReviewResponse, AppError> {
        let review = self
            .review_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("No review found with that ID".to_string()))?;

        self.ensure_owner_or_admin(&review, author)?;

        let mut set_doc = Document::new();
        if let Some(text) = &request.review {
            set_doc.insert("review", text.clone());
        }
        if let Some(rating) = request.rating {
            set_doc.insert("rating", rating);
        }

        if set_doc.is_empty() {
            return Ok(ReviewResponse::from(review));
        }

        let updated = self
            .review_repo
            .update(id, set_doc)
            .await?
            .ok_or_else(|| AppError::NotFound("No review found with that ID".to_string()))?;

        self.sync_tour_ratings(&updated.tour).await?;

        Ok(ReviewResponse::from(updated))
    }

    /// 리뷰 삭제 (작성자 또는 관리자)
    pub async fn delete(&self, id: &str, author: &AuthenticatedUser) -> Result<(), AppError> {
        let review = self
            .review_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("No review found with that ID".to_string()))?;

        self.ensure_owner_or_admin(&review, author)?;

        let deleted = self.review_repo.delete(id).await?;
        if !deleted {
            return Err(AppError::NotFound("No review found with that ID".to_string()));
        }

        self.sync_tour_ratings(&review.tour).await?;

        Ok(())
    }

    /// 작성자 본인 또는 관리자만 통과시킵니다.
    fn ensure_owner_or_admin(
        &self,
        review: &Review,
        author: &AuthenticatedUser,
    ) -> Result<(), AppError> {
        if author.is_admin() {
            return Ok(());
        }

        let author_id = crud::parse_object_id(&author.user_id)?;
        if !review.is_authored_by(&author_id) {
            return Err(AppError::AuthorizationError(
                "You do not have permission to perform this action".to_string(),
            ));
        }

        Ok(())
    }

    /// 투어 평점 필드를 리뷰 집계 결과로 동기화합니다.
    async fn sync_tour_ratings(&self, tour_id: &ObjectId) -> Result<(), AppError> {
        match self.review_repo.calc_rating_stats(tour_id).await? {
            Some(stats) => {
                self.tour_repo
                    .update_ratings(
                        tour_id,
                        stats.quantity,
                        Tour::normalize_rating(stats.average),
                    )
                    .await
            }
            None => {
                // 리뷰가 모두 삭제된 경우 기본값 복원
                self.tour_repo
                    .update_ratings(tour_id, 0, DEFAULT_RATINGS_AVERAGE)
                    .await
            }
        }
    }
}
