//! Pure data structures shared by the tracker actor, the store, and the
//! HTTP facade.

pub mod menu;
pub mod order;
pub mod status;

pub use menu::*;
pub use order::*;
pub use status::*;
