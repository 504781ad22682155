pub mod client;
pub mod service;

pub use client::{HttpTicketClient, TicketApi, TicketApiError};
pub use service::Collector;
