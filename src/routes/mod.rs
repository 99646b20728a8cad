//! # API 라우트 설정 모듈
//!
//! RESTful API 엔드포인트들을 리소스별로 그룹화하여 제공합니다.
//!
//! # Auth Middleware Usage
//!
//! 같은 프리픽스 아래에서 접근 레벨이 다른 라우트는 스코프를 분리해서
//! 미들웨어를 적용합니다. 프리픽스가 같은 스코프가 여러 개 있으면
//! 등록 순서대로 매칭을 시도합니다:
//!
//! ```rust,ignore
//! cfg.service(
//!     web::scope("/api/v1/tours")
//!         .service(handlers::tours::get_all_tours)     // public
//!         .service(
//!             web::scope("")
//!                 .wrap(AuthMiddleware::restrict_to(vec!["admin", "lead-guide"]))
//!                 .service(handlers::tours::create_tour),
//!         ),
//! );
//! ```
//!
//! # Route Map
//!
//! - `/api/v1/tours` - 투어 CRUD, 통계, 지리 질의, 중첩 리뷰
//! - `/api/v1/users` - 인증 플로우, 내 프로필, 관리자 CRUD
//! - `/api/v1/reviews` - 리뷰 CRUD
//! - `/api/v1/bookings` - 결제 세션, 관리자 CRUD
//! - `/webhook-checkout` - 결제 완료 콜백 (인증 없음)
//! - `/health` - 헬스체크

use actix_web::web;
use serde_json::json;

use crate::handlers;
use crate::middlewares::AuthMiddleware;

/// 모든 라우트를 설정합니다
///
/// # Examples
///
/// ```rust,ignore
/// use actix_web::{web, App};
///
/// let app = App::new().configure(configure_all_routes);
/// ```
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    // Health check endpoint
    cfg.service(health_check);

    // 결제 완료 웹훅 (프로바이더 호출, API 프리픽스 밖)
    cfg.service(handlers::bookings::webhook_checkout);

    // Feature-specific routes
    configure_tour_routes(cfg);
    configure_user_routes(cfg);
    configure_review_routes(cfg);
    configure_booking_routes(cfg);
}

/// 투어 관련 라우트를 설정합니다
///
/// 별칭/통계/지리 라우트는 `/{tour_id}` 패턴보다 먼저 등록해야 합니다.
fn configure_tour_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/tours")
            // 별칭/통계 라우트
            .service(handlers::tours::top_5_cheap)
            .service(handlers::tours::tour_stats)
            .service(
                web::scope("/monthly-plan")
                    .wrap(AuthMiddleware::restrict_to(vec![
                        "admin",
                        "lead-guide",
                        "guide",
                    ]))
                    .service(handlers::tours::monthly_plan),
            )
            // 지리 질의 라우트
            .service(handlers::tours::tours_within)
            .service(handlers::tours::distances)
            // 중첩 리뷰 라우트: /api/v1/tours/{tour_id}/reviews
            .service(
                web::scope("/{tour_id}/reviews")
                    .service(handlers::reviews::get_tour_reviews)
                    .service(
                        web::scope("")
                            .wrap(AuthMiddleware::restrict_to(vec!["user"]))
                            .service(handlers::reviews::create_tour_review),
                    ),
            )
            // Public 조회
            .service(handlers::tours::get_all_tours)
            .service(handlers::tours::get_tour)
            // 쓰기 라우트 (admin, lead-guide)
            .service(
                web::scope("")
                    .wrap(AuthMiddleware::restrict_to(vec!["admin", "lead-guide"]))
                    .service(handlers::tours::create_tour)
                    .service(handlers::tours::update_tour)
                    .service(handlers::tours::delete_tour),
            ),
    );
}

/// 사용자 관련 라우트를 설정합니다
///
/// 인증 플로우는 public, 내 프로필은 protect, 계정 관리는 admin 전용입니다.
fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            // 인증 플로우 (public)
            .service(handlers::auth::signup)
            .service(handlers::auth::login)
            .service(handlers::auth::logout)
            .service(handlers::auth::forgot_password)
            .service(handlers::auth::reset_password)
            // 내 계정 (protect). 스코프는 prefix 매칭 후 되돌아오지 않으므로
            // 계정 관리 스코프를 이 안에 중첩한다.
            .service(
                web::scope("")
                    .wrap(AuthMiddleware::required())
                    .service(handlers::auth::update_my_password)
                    .service(handlers::users::get_me)
                    .service(handlers::users::update_me)
                    .service(handlers::users::delete_me)
                    // 계정 관리 (admin)
                    .service(
                        web::scope("")
                            .wrap(AuthMiddleware::restrict_to(vec!["admin"]))
                            .service(handlers::users::get_all_users)
                            .service(handlers::users::create_user)
                            .service(handlers::users::get_user)
                            .service(handlers::users::update_user)
                            .service(handlers::users::delete_user),
                    ),
            ),
    );
}

/// 리뷰 관련 라우트를 설정합니다
fn configure_review_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/reviews")
            // Public 조회
            .service(handlers::reviews::get_all_reviews)
            .service(handlers::reviews::get_review)
            // 쓰기 라우트. 수정/삭제의 작성자 본인 검사는 서비스 계층에서.
            .service(
                web::scope("")
                    .wrap(AuthMiddleware::restrict_to(vec!["user", "admin"]))
                    .service(handlers::reviews::update_review)
                    .service(handlers::reviews::delete_review)
                    // 작성은 user 역할만
                    .service(
                        web::scope("")
                            .wrap(AuthMiddleware::restrict_to(vec!["user"]))
                            .service(handlers::reviews::create_review),
                    ),
            ),
    );
}

/// 예약 관련 라우트를 설정합니다
fn configure_booking_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/bookings")
            // 결제 세션 발급 (로그인 사용자)
            .service(
                web::scope("/checkout-session")
                    .wrap(AuthMiddleware::required())
                    .service(handlers::bookings::get_checkout_session),
            )
            // 예약 관리 (admin, lead-guide)
            .service(
                web::scope("")
                    .wrap(AuthMiddleware::restrict_to(vec!["admin", "lead-guide"]))
                    .service(handlers::bookings::get_all_bookings)
                    .service(handlers::bookings::create_booking)
                    .service(handlers::bookings::get_booking)
                    .service(handlers::bookings::update_booking)
                    .service(handlers::bookings::delete_booking),
            ),
    );
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// 로드밸런서나 모니터링 시스템에서 서비스 상태를 확인하는 데 사용됩니다.
///
/// # Examples
///
/// ```bash
/// curl http://localhost:8080/health
/// ```
#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "tour_booking_backend",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "database": "MongoDB",
            "cache": "Redis",
            "dependency_injection": "Singleton Macro"
        }
    }))
}
