pub mod account_type;
pub mod disability;
pub mod email;
pub mod lockout;
pub mod password;
pub mod status;
pub mod user_account;
pub mod username;
