//! Request and response models for the REST API

pub mod attendance;
pub mod common;
