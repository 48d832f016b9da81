pub mod connection;
pub mod filters;

pub use connection::*;
pub use filters::contains_ci;
