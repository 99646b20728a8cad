//! # Tour HTTP Handlers
//!
//! 투어 CRUD와 통계/지리 질의 엔드포인트를 처리합니다.
//!
//! ## Endpoints
//!
//! | 메서드 | 경로 | 접근 | 설명 |
//! |--------|------|------|------|
//! | `GET` | `` | public | 목록 (filter/sort/fields/paginate) |
//! | `GET` | `/top-5-cheap` | public | 평점순 상위 5개 별칭 |
//! | `GET` | `/stats` | public | 난이도별 통계 |
//! | `GET` | `/monthly-plan/{year}` | guide+ | 월별 출발 일정 |
//! | `GET` | `/tours-within/{distance}/center/{latlng}/unit/{unit}` | public | 반경 내 투어 |
//! | `GET` | `/distances/{latlng}/unit/{unit}` | public | 좌표별 거리 |
//! | `GET` | `/{id}` | public | 단건 조회 |
//! | `POST` | `` | admin, lead-guide | 생성 (201) |
//! | `PATCH` | `/{id}` | admin, lead-guide | 부분 수정 |
//! | `DELETE` | `/{id}` | admin, lead-guide | 삭제 (204) |

use std::collections::HashMap;

use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::tours::request::{CreateTourRequest, UpdateTourRequest};
use crate::services::tours::tour_service::TourService;
use crate::utils::api_features::ApiFeatures;

/// 투어 목록 조회 핸들러
#[get("")]
pub async fn get_all_tours(
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let features = ApiFeatures::from_query(&query)?;

    let service = TourService::instance();
    let tours = service.get_all(&features).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "results": tours.len(),
        "data": { "tours": tours }
    })))
}

/// 인기 투어 상위 5개 별칭 핸들러
///
/// 쿼리 스트링을 미리 채워 둔 `GET /tours`와 동일하게 동작합니다.
#[get("/top-5-cheap")]
pub async fn top_5_cheap() -> Result<HttpResponse, AppError> {
    let preset: HashMap<String, String> = [
        ("limit", "5"),
        ("sort", "-ratings_average,price"),
        ("fields", "name,price,ratings_average,summary,difficulty"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let features = ApiFeatures::from_query(&preset)?;

    let service = TourService::instance();
    let tours = service.get_all(&features).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "results": tours.len(),
        "data": { "tours": tours }
    })))
}

/// 난이도별 투어 통계 핸들러
#[get("/stats")]
pub async fn tour_stats() -> Result<HttpResponse, AppError> {
    let service = TourService::instance();
    let stats = service.tour_stats().await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": { "stats": stats }
    })))
}

/// 연도별 월간 출발 일정 핸들러
#[get("/{year}")]
pub async fn monthly_plan(year: web::Path<i32>) -> Result<HttpResponse, AppError> {
    let service = TourService::instance();
    let plan = service.monthly_plan(*year).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": { "plan": plan }
    })))
}

/// 반경 내 투어 조회 핸들러
///
/// `/tours-within/233/center/34.111745,-118.113491/unit/mi` 형식입니다.
#[get("/tours-within/{distance}/center/{latlng}/unit/{unit}")]
pub async fn tours_within(
    path: web::Path<(f64, String, String)>,
) -> Result<HttpResponse, AppError> {
    let (distance, latlng, unit) = path.into_inner();

    let service = TourService::instance();
    let tours = service.tours_within(distance, &latlng, &unit).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "results": tours.len(),
        "data": { "tours": tours }
    })))
}

/// 좌표별 거리 계산 핸들러
#[get("/distances/{latlng}/unit/{unit}")]
pub async fn distances(path: web::Path<(String, String)>) -> Result<HttpResponse, AppError> {
    let (latlng, unit) = path.into_inner();

    let service = TourService::instance();
    let result = service.distances(&latlng, &unit).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": { "distances": result }
    })))
}

/// 투어 단건 조회 핸들러
#[get("/{tour_id}")]
pub async fn get_tour(tour_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let service = TourService::instance();
    let tour = service.get_by_id(&tour_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": { "tour": tour }
    })))
}

/// 투어 생성 핸들러 (admin, lead-guide)
#[post("")]
pub async fn create_tour(
    payload: web::Json<CreateTourRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = TourService::instance();
    let tour = service.create(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "status": "success",
        "data": { "tour": tour }
    })))
}

/// 투어 부분 수정 핸들러 (admin, lead-guide)
#[patch("/{tour_id}")]
pub async fn update_tour(
    tour_id: web::Path<String>,
    payload: web::Json<UpdateTourRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = TourService::instance();
    let tour = service.update(&tour_id, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": { "tour": tour }
    })))
}

/// 투어 삭제 핸들러 (admin, lead-guide)
#[delete("/{tour_id}")]
pub async fn delete_tour(tour_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let service = TourService::instance();
    service.delete(&tour_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
