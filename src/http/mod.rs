pub mod client;
pub mod method;
pub mod response;

pub use client::Session;
pub use method::HttpMethod;
pub use response::ApiResponse;
