pub mod auth;
pub mod external;
pub mod favorite;
pub mod recipe;
pub mod review;
pub mod shared;
pub mod user;
