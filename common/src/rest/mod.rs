pub mod http_client;
pub mod rest_client;
pub mod wire;

pub use http_client::HttpRestClient;
pub use rest_client::*;
pub use wire::*;
