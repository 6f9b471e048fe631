pub mod client;
pub mod error;
pub mod model;

pub use client::DashboardStatsApi;
pub use error::StatsError;
pub use model::{DashboardStats, Interaction};
