pub mod cors;
pub mod server;
