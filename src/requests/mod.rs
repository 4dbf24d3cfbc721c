pub mod request_set;
pub mod request_store;
mod request_tests;

pub use request_set::RequestSet;
pub use request_store::RequestStore;
