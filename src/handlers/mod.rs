pub mod admin;
pub mod api;
pub mod public;

pub use admin::admin_config;
pub use api::api_config;
pub use public::public_config;
