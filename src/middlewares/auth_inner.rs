//! AuthMiddleware 인증 로직의 핵심적인 기능
//!
//! 토큰 추출 → 서명/만료 검증 → 사용자 존재 확인 → 비밀번호 변경 시점
//! 확인 → 역할 검증의 순서로 진행됩니다.

use std::rc::Rc;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;

use crate::config::CookieConfig;
use crate::core::AppError;
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::domain::models::auth::authentication_request::{AuthMode, RequiredRole};
use crate::services::auth::TokenService;
use crate::services::users::user_service::UserService;

/// 실제 인증 로직을 수행하는 서비스
pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub mode: AuthMode,
    pub required_role: Option<RequiredRole>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let mode = self.mode.clone();
        let required_role = self.required_role.clone();

        Box::pin(async move {
            let auth_result = authenticate_request(&req).await;

            match (&mode, auth_result) {
                // Required 모드에서 인증 실패
                (AuthMode::Required, Err(err)) => {
                    log::warn!("인증 실패: {}", err);
                    let response = HttpResponse::Unauthorized().json(serde_json::json!({
                        "status": "fail",
                        "message": "You are not logged in! Please log in to get access."
                    }));
                    let (req, _) = req.into_parts();
                    let res = ServiceResponse::new(req, response).map_into_right_body();
                    return Ok(res);
                }
                // Required 모드에서 인증 성공
                (AuthMode::Required, Ok(user)) => {
                    // 역할 검증
                    if let Some(ref required) = required_role {
                        if !required.is_satisfied(user.role.as_str()) {
                            log::warn!(
                                "권한 부족: 사용자 ID {} ({}), 필요 권한: {:?}",
                                user.user_id,
                                user.role.as_str(),
                                required
                            );
                            let response = HttpResponse::Forbidden().json(serde_json::json!({
                                "status": "fail",
                                "message": "You do not have permission to perform this action"
                            }));
                            let (req, _) = req.into_parts();
                            let res = ServiceResponse::new(req, response).map_into_right_body();
                            return Ok(res);
                        }
                    }

                    // 사용자 정보를 Request Extensions에 저장
                    req.extensions_mut().insert(user.clone());
                    log::debug!("인증 성공: 사용자 ID {}", user.user_id);
                }
                // Optional 모드에서 인증 성공
                (AuthMode::Optional, Ok(user)) => {
                    req.extensions_mut().insert(user.clone());
                    log::debug!("선택적 인증 성공: 사용자 ID {}", user.user_id);
                }
                // Optional 모드에서 인증 실패 (진행 허용)
                (AuthMode::Optional, Err(_)) => {
                    log::debug!("선택적 인증: 토큰 없음, 요청 진행");
                }
            }

            // 다음 서비스로 요청 전달
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// 요청에서 JWT 토큰을 추출하고 사용자를 검증합니다.
///
/// 1. Authorization 헤더(Bearer) 또는 `jwt` 쿠키에서 토큰 추출
/// 2. 서명/만료 검증
/// 3. 사용자가 여전히 존재하고 활성 상태인지 확인
/// 4. 토큰 발급 이후 비밀번호가 변경되지 않았는지 확인
async fn authenticate_request(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
    let token_service = TokenService::instance();

    let token = extract_token(req, &token_service)?;

    let claims = token_service.verify_token(&token)?;

    // 토큰 소유자가 여전히 존재하는지 확인 (비활성 사용자는 조회되지 않음)
    let user_service = UserService::instance();
    let user = user_service
        .find_entity(&claims.sub)
        .await
        .map_err(|_| {
            AppError::AuthenticationError("Could not verify the token owner".to_string())
        })?
        .ok_or_else(|| {
            AppError::AuthenticationError(
                "The user belonging to this token does no longer exist.".to_string(),
            )
        })?;

    // 토큰 발급 이후 비밀번호가 변경됐으면 거부
    if user.changed_password_after(claims.iat) {
        return Err(AppError::AuthenticationError(
            "User recently changed password! Please log in again.".to_string(),
        ));
    }

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        role: user.role,
    })
}

/// Authorization 헤더 우선, `jwt` 쿠키 폴백으로 토큰을 추출합니다.
fn extract_token(req: &ServiceRequest, token_service: &TokenService) -> Result<String, AppError> {
    if let Some(auth_header) = req.headers().get("Authorization").and_then(|h| h.to_str().ok()) {
        return token_service
            .extract_bearer_token(auth_header)
            .map(str::to_string);
    }

    if let Some(cookie) = req.cookie(CookieConfig::NAME) {
        let value = cookie.value().to_string();
        if !value.is_empty() && value != CookieConfig::LOGGED_OUT_VALUE {
            return Ok(value);
        }
    }

    Err(AppError::AuthenticationError(
        "You are not logged in! Please log in to get access.".to_string(),
    ))
}
