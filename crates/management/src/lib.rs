pub mod models;
pub mod store;

pub use models::{CreateOfferRequest, UpdateOfferRequest};
pub use store::OfferStore;
