pub mod config;
pub mod dispatcher;
pub mod entities;
pub mod errors;
pub mod helpers;
pub mod logger;
pub mod moves;
pub mod server;
