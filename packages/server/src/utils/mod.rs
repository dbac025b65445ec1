pub mod hash;
pub mod import;
pub mod jwt;
pub mod recipe;
pub mod session;
pub mod user;
