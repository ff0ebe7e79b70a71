pub mod extract;
pub mod islands;
pub mod normalize;
pub mod status;

pub use crate::domain::model::{Island, ResolvedIsland, StatusRecord};
pub use crate::domain::ports::{ConfigProvider, SessionTransport, TransportResponse};
pub use crate::utils::error::Result;
