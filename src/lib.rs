pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod surface;
pub mod world;
