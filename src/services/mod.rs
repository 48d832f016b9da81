pub mod admin_service;
pub mod bank_detail_service;
pub mod company_bank_service;
pub mod import_service;
pub mod prize_service;
pub mod winner_service;

pub use admin_service::*;
pub use bank_detail_service::*;
pub use company_bank_service::*;
pub use import_service::*;
pub use prize_service::*;
pub use winner_service::*;
