//! # 인증 서비스 모듈
//!
//! JWT 토큰 발급/검증과 회원가입/로그인/비밀번호 관리 로직을 제공합니다.

pub mod token_service;
pub mod auth_service;

pub use token_service::*;
pub use auth_service::*;
