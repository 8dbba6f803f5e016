//! Client-side orchestration for multi-driver delivery tours: typed contracts
//! for the optimization and geocoding collaborators, selection filters over
//! order and driver snapshots, manual resequencing, and the assignment commit
//! workflow. The routing algorithms themselves live behind the HTTP boundary.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod geo;
pub mod models;
pub mod state;
