//! 투어 서비스 모듈

pub mod tour_service;

pub use tour_service::*;
