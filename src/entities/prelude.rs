pub use super::habits::Entity as Habits;
pub use super::progress::Entity as Progress;
pub use super::users::Entity as Users;
