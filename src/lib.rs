pub mod api;
pub mod app;
pub mod board;
pub mod cli;
pub mod config;
pub mod effects;
pub mod error;
pub mod gallery;
pub mod output;
pub mod prompt;
pub mod role;

#[cfg(test)]
mod tests;
