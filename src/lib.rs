//! # 투어 예약 서비스 백엔드
//!
//! Rust 기반의 투어 예약 REST API 백엔드입니다.
//! 투어/사용자/리뷰/예약 CRUD, JWT 토큰 기반 인증, 결제 체크아웃,
//! 트랜잭션 메일 발송을 제공하며, 싱글톤 매크로를 활용한
//! 의존성 주입으로 구성됩니다.
//!
//! # Features
//!
//! - **투어 카탈로그**: CRUD, 쿼리 기능(필터/정렬/필드 제한/페이지네이션),
//!   난이도별 통계, 월별 출발 일정, 반경/거리 지리 질의
//! - **사용자 관리**: 회원가입, 프로필 관리, 소프트 삭제, 관리자 CRUD
//! - **JWT 인증**: 쿠키 + Bearer 토큰, 역할 기반 접근 제어,
//!   비밀번호 재설정 메일 플로우
//! - **리뷰**: 투어당 1인 1리뷰, 평점 자동 집계
//! - **예약/결제**: Stripe Checkout 세션 발급, 결제 완료 웹훅 처리
//! - **MongoDB + Redis**: 영구 저장과 읽기 우선 캐싱
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트 + 인증 미들웨어
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청 검증, 응답 envelope
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 비즈니스 로직 (싱글톤)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← 데이터 액세스 + 제네릭 CRUD (싱글톤)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use tour_booking_backend::services::tours::TourService;
//! use tour_booking_backend::services::bookings::BookingService;
//!
//! // 싱글톤 서비스 인스턴스 가져오기
//! let tour_service = TourService::instance();
//! let booking_service = BookingService::instance();
//!
//! // 투어 조회 및 결제 세션 생성
//! let tour = tour_service.get_by_id(&tour_id).await?;
//! let session = booking_service.create_checkout_session(&tour_id, &user).await?;
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod middlewares;
