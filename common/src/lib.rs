pub mod error;
pub mod model;
pub mod requests;
pub mod store;
pub mod views;

pub use error::{ErrorBody, StoreError};
