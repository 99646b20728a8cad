//! 이메일 서비스 모듈

pub mod email_service;

pub use email_service::*;
