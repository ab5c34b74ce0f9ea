//! API request and response types

pub mod extract;
pub mod response;

pub use extract::ValidJson;
pub use response::MessageResponse;
