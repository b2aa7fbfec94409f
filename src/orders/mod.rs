pub mod error;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod service;

pub use error::*;
pub use handlers::*;
pub use models::{
    CheckoutResponse, NormalizedOrder, OrderDimensions, OrderField, QuoteResponse, RawOrderPayload,
    DEFAULT_UPLOAD_SOURCE,
};
pub use normalizer::{normalize, resolve_dimensions};
pub use service::*;
