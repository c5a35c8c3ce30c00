pub mod compute;
pub mod config;
pub mod entities;
pub mod grid;
pub mod placement;
