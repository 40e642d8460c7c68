pub mod catalog;
pub mod experience;
pub mod review;
pub mod user;
