pub mod policy;

pub use policy::DispatchPolicy;
