pub mod api;
pub mod error;
pub mod models;
pub mod registry;
pub mod schedule;
pub mod services;
pub mod state;
