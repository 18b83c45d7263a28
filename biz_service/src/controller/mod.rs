pub mod paged_controller;

pub use paged_controller::{LoadOutcome, PageState, PagedResourceController};
