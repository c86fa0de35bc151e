pub mod prelude;

pub mod habits;
pub mod progress;
pub mod users;
