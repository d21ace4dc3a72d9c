pub mod account_repository;
pub mod in_memory;
pub mod mission_repository;
pub mod postgres;

pub use account_repository::*;
pub use in_memory::*;
pub use mission_repository::*;
pub use postgres::*;
