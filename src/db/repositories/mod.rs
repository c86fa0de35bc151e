pub mod habit;
pub mod progress;
pub mod user;
