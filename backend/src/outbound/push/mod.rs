//! Push-messaging outbound adapters.

mod fcm_http;

pub use fcm_http::{FcmHttpGateway, DEFAULT_BROADCAST_TOPIC};
