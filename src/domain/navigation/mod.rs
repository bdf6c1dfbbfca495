// Navigation domain module
// Role-based capabilities and the sidebar menu built from them

pub mod access;
pub mod menu;

pub use access::{AccessControl, Capability};
pub use menu::{MenuGenerator, MenuItem};
