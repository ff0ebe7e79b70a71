// Adapters layer: concrete implementations for external systems (http session, login sequence).

pub mod http;
pub mod session;

pub use http::HttpTransport;
pub use session::bootstrap_session;
