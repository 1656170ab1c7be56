pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod grid;
pub mod resources;
pub mod session;

#[cfg(test)]
pub mod testing;
