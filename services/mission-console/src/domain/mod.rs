pub mod account;
pub mod moon_mission;

pub use account::*;
pub use moon_mission::*;
