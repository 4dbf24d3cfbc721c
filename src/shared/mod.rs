pub mod macros;
pub mod structs;

pub use structs::Behaviour;
pub use structs::CabinStatus;
pub use structs::Direction;
pub use structs::Floor;
pub use structs::InvalidDirection;
