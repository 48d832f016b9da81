pub mod admin;
pub mod bank_detail;
pub mod company_bank;
pub mod pagination;
pub mod prize;
pub mod winner;

pub use admin::*;
pub use bank_detail::*;
pub use company_bank::*;
pub use pagination::*;
pub use prize::*;
pub use winner::*;
