//! HTTP plumbing shared by the feature routers.

mod error;
mod extract;
mod health;
pub mod router;
mod state;

pub use error::{ApiError, ApiResult, ErrorBody, MessageBody};
pub use extract::Payload;
pub use health::HealthResponse;
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateInner};
