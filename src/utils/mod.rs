pub mod format;
pub mod jwt;
pub mod password;
pub mod phone;
pub mod upload;

pub use format::*;
pub use jwt::*;
pub use password::*;
pub use phone::*;
pub use upload::*;
