pub mod admins;
pub mod bank_details;
pub mod company_bank_details;
pub mod prizes;
pub mod winners;

pub use admins as admin_entity;
pub use bank_details as bank_detail_entity;
pub use bank_details::{BankDetailStatus, PaymentMethod, PrizeType, VerificationStatus};
pub use company_bank_details as company_bank_entity;
pub use company_bank_details::{AccountType, BankPurpose};
pub use prizes as prize_entity;
pub use prizes::Medal;
pub use winners as winner_entity;
