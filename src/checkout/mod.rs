// Checkout gateway: hands a priced order to the payment processor and
// returns the hosted payment page URL.

pub mod error;
pub mod gateway;
pub mod stripe;

pub use error::GatewayError;
pub use gateway::{CheckoutGateway, CheckoutRequest, CheckoutSession, CheckoutUrls, CURRENCY, PRODUCT_NAME};
pub use stripe::{StripeConfig, StripeGateway};
