pub mod aggregator;
pub mod error;
pub mod repo;
pub mod service;
