//! JWT 토큰 모델

use serde::{Deserialize, Serialize};

use crate::domain::entities::users::user::Role;

/// JWT 클레임
///
/// HS256으로 서명되어 Bearer 헤더와 `jwt` 쿠키로 전달됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 사용자 ID (hex ObjectId)
    pub sub: String,
    /// 사용자 역할
    pub role: Role,
    /// 발급 시각 (Unix timestamp, 초)
    pub iat: i64,
    /// 만료 시각 (Unix timestamp, 초)
    pub exp: i64,
}
