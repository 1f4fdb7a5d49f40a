pub mod aggregate;
pub mod api;
pub mod args;
pub mod budget;
pub mod calendar;
pub mod commands;
mod config;
mod error;
pub mod home;
pub mod model;
pub mod render;
pub mod state;
mod utils;


pub use api::Mode;
pub use config::Config;
pub use error::{ApiError, Error, ErrorKind, Result, SESSION_EXPIRED_MESSAGE};
