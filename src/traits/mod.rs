//! Trait definitions for panel operations.
//!
//! Each entity type implements the traits it supports and names the
//! credential scope that may perform them.

mod get;
mod list;
mod update;

pub use get::Get;
pub use list::List;
pub use update::Update;
