//! SeaORM-backed storage implementation

pub mod config;
pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repositories;
