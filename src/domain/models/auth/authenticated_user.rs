//! 인증된 사용자 모델
//!
//! protect 미들웨어가 JWT 검증 후 Request Extensions에 저장하는
//! 사용자 정보입니다. 핸들러에서는 추출자로 바로 받을 수 있습니다.

use std::future::{ready, Ready};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::domain::entities::users::user::Role;

/// JWT 토큰에서 추출된 사용자 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// 사용자 고유 ID (hex ObjectId)
    pub user_id: String,

    /// 사용자 역할
    pub role: Role,
}

impl AuthenticatedUser {
    /// 특정 역할 보유 여부 확인
    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_str() == role
    }

    /// 여러 역할 중 하나라도 해당하는지 확인
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|&role| self.has_role(role))
    }

    /// 관리자 권한 보유 여부 확인
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// ActixWeb FromRequest trait 구현
///
/// protect 미들웨어를 거치지 않은 라우트에서 추출을 시도하면 401이 됩니다.
impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(actix_web::error::ErrorUnauthorized(
                "You are not logged in! Please log in to get access.",
            ))),
        }
    }
}

/// 선택적 인증 사용자 추출자
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

impl FromRequest for OptionalUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(Ok(OptionalUser(user)))
    }
}
