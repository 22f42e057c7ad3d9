//! REST API request handlers

pub mod attendance;
pub mod dashboard;
pub mod health;
pub mod leaderboard;
pub mod users;

pub use attendance::{check_in, check_out};
pub use dashboard::get_dashboard;
pub use health::{health_check, health_check_detailed};
pub use leaderboard::get_leaderboard;
pub use users::{create_user, force_checkout, list_users, reset_pin};
