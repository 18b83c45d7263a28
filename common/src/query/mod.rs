pub mod page_query;
pub mod page_result;
pub mod wire_params;

pub use page_query::*;
pub use page_result::*;
pub use wire_params::*;
