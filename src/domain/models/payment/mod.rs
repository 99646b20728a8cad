//! 결제 관련 도메인 모델

pub mod stripe_model;

pub use stripe_model::*;
