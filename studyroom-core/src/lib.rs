//! # Studyroom Core
//!
//! The attendance aggregation engine: time window resolution, overlap
//! aggregation, competition ranking and daily series building, plus the
//! [`AttendanceService`] that orchestrates them over the repository traits.
//!
//! All computations are pure functions of the store's current state and a
//! single evaluation instant; nothing is cached between requests.

pub mod daily;
pub mod error;
pub mod overlap;
pub mod rank;
pub mod service;
pub mod window;

pub use daily::DailyBreakdown;
pub use error::{ServiceError, ServiceResult};
pub use overlap::{clamp_overlap_sec, totals_in_window, UserTotal};
pub use rank::rank_of_user;
pub use service::AttendanceService;
pub use window::{TimeWindow, WindowResolver};
