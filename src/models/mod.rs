//! Pterodactyl API model types.

mod account;
mod database;
mod location;
mod nest;
mod server;
mod user;

pub use account::*;
pub use database::*;
pub use location::*;
pub use nest::*;
pub use server::*;
pub use user::*;
