//! 결제 서비스 모듈

pub mod payment_service;

pub use payment_service::*;
