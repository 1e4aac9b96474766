pub mod admin;
pub mod health;
pub mod library;
pub mod writing;
