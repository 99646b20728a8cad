//! # 투어 리포지토리 구현
//!
//! 투어 엔티티의 데이터 액세스 계층입니다. MongoDB를 주 저장소로 사용하고,
//! 단건 조회에 Redis 읽기 우선 캐싱을 적용합니다.
//!
//! ## 캐싱 전략
//!
//! - 단건 조회: `tour:{id}` 키, TTL 10분
//! - 쓰기 연산은 해당 키와 컬렉션 캐시를 무효화합니다.
//!
//! ## 기본 필터
//!
//! 비공개 투어(`secret_tour: true`)는 목록/통계/지리 질의에서 항상
//! 제외됩니다. 단건 조회는 ID를 알면 접근 가능합니다.

use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{bson::{doc, oid::ObjectId, DateTime, Document}, options::IndexOptions, IndexModel};
use singleton_macro::repository;

use crate::{
    caching::redis::RedisClient,
    core::registry::Repository,
    db::Database,
    domain::entities::tours::tour::Tour,
    repositories::crud,
    utils::api_features::ApiFeatures,
};
use crate::core::errors::AppError;

/// 투어 데이터 액세스 리포지토리
#[repository(name = "tour", collection = "tours")]
pub struct TourRepository {
    /// MongoDB 데이터베이스 연결
    db: Arc<Database>,

    /// Redis 캐시 클라이언트
    redis: Arc<RedisClient>,
}

/// 목록/통계에서 비공개 투어를 제외하는 기본 필터
fn public_filter() -> Document {
    doc! { "secret_tour": { "$ne": true } }
}

impl TourRepository {
    /// 쿼리 기능이 적용된 투어 목록 조회
    ///
    /// 프로젝션(`fields=`)이 자유롭도록 Document 목록을 반환합니다.
    pub async fn find_all(&self, features: &ApiFeatures) -> Result<Vec<Document>, AppError> {
        crud::find_all(&self.collection::<Document>(), public_filter(), features).await
    }

    /// ID로 투어 조회 (캐시 우선)
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Tour>, AppError> {
        let cache_key = self.cache_key(id);

        if let Ok(Some(cached)) = self.redis.get::<Tour>(&cache_key).await {
            return Ok(Some(cached));
        }

        let tour = crud::find_by_id(&self.collection::<Tour>(), id, Document::new()).await?;

        if let Some(ref tour) = tour {
            let _ = self.redis.set_with_expiry(&cache_key, tour, 600).await;
        }

        Ok(tour)
    }

    /// 새 투어 생성
    ///
    /// 이름 중복은 유니크 인덱스와 사전 조회로 방지합니다.
    pub async fn create(&self, mut tour: Tour) -> Result<Tour, AppError> {
        let existing = self
            .collection::<Tour>()
            .find_one(doc! { "name": tour.name.clone() })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if existing.is_some() {
            return Err(AppError::ConflictError(format!(
                "A tour named '{}' already exists",
                tour.name
            )));
        }

        let inserted_id = crud::insert_one(&self.collection::<Tour>(), &tour).await?;
        tour.id = Some(inserted_id);

        let _ = self.invalidate_collection_cache(None).await;

        Ok(tour)
    }

    /// 투어 부분 업데이트
    pub async fn update(&self, id: &str, set_doc: Document) -> Result<Option<Tour>, AppError> {
        let updated = crud::update_by_id(&self.collection::<Tour>(), id, set_doc).await?;

        if updated.is_some() {
            let _ = self.invalidate_cache(id).await;
            let _ = self.invalidate_collection_cache(None).await;
        }

        Ok(updated)
    }

    /// 투어 삭제
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let deleted = crud::delete_by_id(&self.collection::<Tour>(), id).await?;

        if deleted {
            let _ = self.invalidate_cache(id).await;
            let _ = self.invalidate_collection_cache(None).await;
        }

        Ok(deleted)
    }

    /// 난이도별 투어 통계 집계
    ///
    /// 평점 4.5 이상의 공개 투어를 난이도로 그룹화하여
    /// 개수/평점/가격 통계를 계산합니다.
    pub async fn tour_stats(&self) -> Result<Vec<Document>, AppError> {
        let pipeline = vec![
            doc! { "$match": {
                "secret_tour": { "$ne": true },
                "ratings_average": { "$gte": 4.5 }
            }},
            doc! { "$group": {
                "_id": { "$toUpper": "$difficulty" },
                "num_tours": { "$sum": 1 },
                "num_ratings": { "$sum": "$ratings_quantity" },
                "avg_rating": { "$avg": "$ratings_average" },
                "avg_price": { "$avg": "$price" },
                "min_price": { "$min": "$price" },
                "max_price": { "$max": "$price" }
            }},
            doc! { "$sort": { "avg_price": 1 } },
        ];

        self.aggregate(pipeline).await
    }

    /// 연도별 월간 출발 일정 집계
    ///
    /// 출발 일자를 풀어서(`$unwind`) 해당 연도의 월별 출발 횟수와
    /// 투어 이름 목록을 계산하고, 바쁜 달부터 정렬합니다.
    pub async fn monthly_plan(&self, year: i32) -> Result<Vec<Document>, AppError> {
        use chrono::TimeZone;

        let start = chrono::Utc
            .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| AppError::ValidationError(format!("Invalid year: {}", year)))?;
        let end = chrono::Utc
            .with_ymd_and_hms(year, 12, 31, 23, 59, 59)
            .single()
            .ok_or_else(|| AppError::ValidationError(format!("Invalid year: {}", year)))?;

        let pipeline = vec![
            doc! { "$unwind": "$start_dates" },
            doc! { "$match": {
                "secret_tour": { "$ne": true },
                "start_dates": {
                    "$gte": DateTime::from_chrono(start),
                    "$lte": DateTime::from_chrono(end)
                }
            }},
            doc! { "$group": {
                "_id": { "$month": "$start_dates" },
                "num_tour_starts": { "$sum": 1 },
                "tours": { "$push": "$name" }
            }},
            doc! { "$addFields": { "month": "$_id" } },
            doc! { "$project": { "_id": 0 } },
            doc! { "$sort": { "num_tour_starts": -1 } },
            doc! { "$limit": 12 },
        ];

        self.aggregate(pipeline).await
    }

    /// 중심 좌표 기준 반경(라디안) 내의 투어 조회
    ///
    /// `start_location`의 2dsphere 인덱스를 사용하는 `$geoWithin` 질의입니다.
    pub async fn find_within(
        &self,
        lng: f64,
        lat: f64,
        radius_radians: f64,
    ) -> Result<Vec<Tour>, AppError> {
        let mut filter = public_filter();
        filter.insert(
            "start_location",
            doc! { "$geoWithin": { "$centerSphere": [[lng, lat], radius_radians] } },
        );

        let cursor = self
            .collection::<Tour>()
            .find(filter)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 지정 좌표로부터 각 투어까지의 거리 계산
    ///
    /// `$geoNear`는 파이프라인의 첫 스테이지여야 하며, 결과 거리에
    /// 단위 변환 계수(`multiplier`)를 곱해서 반환합니다.
    pub async fn distances(
        &self,
        lng: f64,
        lat: f64,
        multiplier: f64,
    ) -> Result<Vec<Document>, AppError> {
        let pipeline = vec![
            doc! { "$geoNear": {
                "near": { "type": "Point", "coordinates": [lng, lat] },
                "distanceField": "distance",
                "distanceMultiplier": multiplier,
                "query": { "secret_tour": { "$ne": true } }
            }},
            doc! { "$project": { "distance": 1, "name": 1 } },
        ];

        self.aggregate(pipeline).await
    }

    /// 집계 파이프라인 실행 공통 경로
    async fn aggregate(&self, pipeline: Vec<Document>) -> Result<Vec<Document>, AppError> {
        let cursor = self
            .collection::<Document>()
            .aggregate(pipeline)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 데이터베이스 인덱스 생성
    ///
    /// 애플리케이션 초기화 시점에 한 번 실행됩니다.
    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let collection = self.collection::<Tour>();

        // 이름 유니크 인덱스
        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("name_unique".to_string())
                .build())
            .build();

        // 가격/평점 복합 인덱스 (자주 쓰는 필터 조합)
        let price_rating_index = IndexModel::builder()
            .keys(doc! { "price": 1, "ratings_average": -1 })
            .options(IndexOptions::builder()
                .name("price_asc_rating_desc".to_string())
                .build())
            .build();

        // 슬러그 인덱스
        let slug_index = IndexModel::builder()
            .keys(doc! { "slug": 1 })
            .options(IndexOptions::builder()
                .name("slug_asc".to_string())
                .build())
            .build();

        // 출발지 2dsphere 인덱스 (지리 질의)
        let geo_index = IndexModel::builder()
            .keys(doc! { "start_location": "2dsphere" })
            .options(IndexOptions::builder()
                .name("start_location_2dsphere".to_string())
                .build())
            .build();

        collection
            .create_indexes([name_index, price_rating_index, slug_index, geo_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    /// 리뷰 집계 결과로 평점 필드를 갱신합니다.
    pub async fn update_ratings(
        &self,
        tour_id: &ObjectId,
        quantity: u32,
        average: f64,
    ) -> Result<(), AppError> {
        self.collection::<Tour>()
            .update_one(
                doc! { "_id": *tour_id },
                doc! { "$set": {
                    "ratings_quantity": quantity,
                    "ratings_average": average,
                    "updated_at": DateTime::now()
                }},
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let _ = self.invalidate_cache(&tour_id.to_hex()).await;
        let _ = self.invalidate_collection_cache(None).await;

        Ok(())
    }
}
