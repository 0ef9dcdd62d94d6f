pub mod filter;
pub mod repositories;
pub mod services;
