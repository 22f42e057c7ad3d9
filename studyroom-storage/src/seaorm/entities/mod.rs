//! SeaORM entity definitions

pub mod sessions;
pub mod users;

pub use sessions::Entity as Sessions;
pub use users::Entity as Users;
