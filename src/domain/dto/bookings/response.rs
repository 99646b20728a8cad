//! 예약 응답 DTO

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::domain::entities::bookings::booking::Booking;

/// 예약 응답 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub id: String,
    pub tour: String,
    pub user: String,
    pub price: f64,
    pub paid: bool,
    pub created_at: DateTime,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.map(|id| id.to_hex()).unwrap_or_default(),
            tour: booking.tour.to_hex(),
            user: booking.user.to_hex(),
            price: booking.price,
            paid: booking.paid,
            created_at: booking.created_at,
        }
    }
}
