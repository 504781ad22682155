pub mod models;
pub mod resolve;
pub mod transform;

pub use models::{EnrichedTicket, NormalizedTicket};
pub use transform::{enrich, fill_from_detail, normalize_ticket};
