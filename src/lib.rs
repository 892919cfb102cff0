pub mod cli_args;
pub mod error;
mod extractor;
mod middleware;
pub mod model;
mod route;
pub mod server;
pub mod service;
pub mod state;
pub mod store;
