//! # Application Error Handling System
//!
//! 투어 예약 백엔드 전역에서 사용하는 통합 에러 처리 시스템입니다.
//! `thiserror`와 `actix_web::ResponseError`를 결합하여 모든 핸들러가
//! `Result<HttpResponse, AppError>`만 반환하면 되도록 만들었습니다.
//!
//! ## 운영 에러 vs 프로그래밍 에러
//!
//! - **운영 에러(operational)**: 예상 가능한 사용자 요청 문제입니다.
//!   검증 실패(400), 리소스 없음(404), 중복(409), 인증 실패(401),
//!   권한 부족(403)이 여기에 해당하며 메시지를 그대로 클라이언트에 전달합니다.
//! - **프로그래밍/인프라 에러**: 데이터베이스, 캐시, 외부 서비스, 기타
//!   내부 오류는 전부 500으로 수렴합니다. 프로덕션 환경에서는 내부 메시지를
//!   감추고 일반화된 메시지만 내려보내며, 상세 내용은 서버 로그에만 남깁니다.
//!
//! ## 응답 형식
//!
//! 모든 에러 응답은 다음 JSON 형식을 따릅니다:
//!
//! ```json
//! {
//!   "status": "fail",
//!   "message": "No tour found with that ID"
//! }
//! ```
//!
//! `status`는 4xx 운영 에러면 `"fail"`, 5xx면 `"error"`입니다.
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use crate::core::errors::AppError;
//!
//! async fn get_tour(&self, id: &str) -> Result<TourResponse, AppError> {
//!     let tour = self.tour_repo
//!         .find_by_id(id)
//!         .await?
//!         .ok_or_else(|| AppError::NotFound("No tour found with that ID".to_string()))?;
//!
//!     Ok(TourResponse::from(tour))
//! }
//! ```

use thiserror::Error;

use crate::config::Environment;

/// 애플리케이션 전역 에러 타입
///
/// 백엔드에서 발생할 수 있는 모든 종류의 에러를 포괄하는 열거형입니다.
/// `actix_web::ResponseError` 구현을 통해 HTTP 응답으로 자동 변환됩니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 데이터베이스 관련 에러 (500 Internal Server Error)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis 캐시 관련 에러 (500 Internal Server Error)
    #[error("Redis error: {0}")]
    RedisError(String),

    /// 입력값 검증 에러 (400 Bad Request)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 리소스 찾을 수 없음 에러 (404 Not Found)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 충돌/중복 에러 (409 Conflict)
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 인증 실패 에러 (401 Unauthorized)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 권한 부족 에러 (403 Forbidden)
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// 외부 서비스 에러 (500 Internal Server Error)
    ///
    /// 결제 프로바이더, 메일 프로바이더 등 외부 API 호출 실패입니다.
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 운영 에러(예상된 사용자 요청 문제) 여부
    pub fn is_operational(&self) -> bool {
        matches!(
            self,
            AppError::ValidationError(_)
                | AppError::NotFound(_)
                | AppError::ConflictError(_)
                | AppError::AuthenticationError(_)
                | AppError::AuthorizationError(_)
        )
    }

    /// 클라이언트에 내려보낼 메시지
    ///
    /// 운영 에러는 메시지를 그대로 전달하고, 그 외에는 프로덕션에서
    /// 일반화된 메시지로 대체합니다.
    fn client_message(&self) -> String {
        match self {
            AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::ConflictError(msg)
            | AppError::AuthenticationError(msg)
            | AppError::AuthorizationError(msg) => msg.clone(),
            _ if Environment::current().is_production() => {
                "Something went very wrong!".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl actix_web::ResponseError for AppError {
    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 각 에러 타입을 적절한 HTTP 상태 코드와 JSON 응답으로 변환합니다.
    /// 5xx 에러는 상세 내용을 서버 로그에 남깁니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::http::StatusCode;

        let status = match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let status_label = if status.is_client_error() { "fail" } else { "error" };

        if status.is_server_error() {
            log::error!("처리되지 않은 서버 에러: {}", self);
        }

        actix_web::HttpResponse::build(status).json(serde_json::json!({
            "status": status_label,
            "message": self.client_message()
        }))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_validation_error_response() {
        let error = AppError::ValidationError("A tour must have a name".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_response() {
        let error = AppError::NotFound("No tour found with that ID".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_authentication_error_response() {
        let error = AppError::AuthenticationError("Incorrect email or password".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_authorization_error_response() {
        let error = AppError::AuthorizationError(
            "You do not have permission to perform this action".to_string(),
        );
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_internal_error_response() {
        let error = AppError::InternalError("Something went wrong".to_string());
        let response = error.error_response();

        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_operational_classification() {
        assert!(AppError::NotFound("x".to_string()).is_operational());
        assert!(AppError::ValidationError("x".to_string()).is_operational());
        assert!(!AppError::DatabaseError("x".to_string()).is_operational());
        assert!(!AppError::ExternalServiceError("x".to_string()).is_operational());
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        assert!(app_result.is_err());
        if let Err(AppError::InternalError(msg)) = app_result {
            assert!(msg.contains("Additional context"));
            assert!(msg.contains("original error"));
        } else {
            panic!("Expected InternalError");
        }
    }
}
