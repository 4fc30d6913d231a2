// Library crate: the sampling sandbox engine. The binary wraps it in a
// line-oriented JSON command loop; hosts embed the library directly.

pub mod command;
pub mod error;
pub mod fixtures;
pub mod geometry;
pub mod grid;
pub mod layout;
pub mod scenario;
pub mod scoring;
pub mod settings;
pub mod state;
pub mod validation;
