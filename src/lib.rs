//! Drought and water-tanker logistics backend.
//!
//! Stores village drought metrics and the tanker fleet in SQLite and serves
//! the filtered dashboard reads over HTTP. Modules follow the Explicit Module
//! Boundary Pattern (EMBP): `main.rs` talks to `config`, `db`, `schema`,
//! `seed` and `routes`; handlers reach the store and query layer through the
//! re-exports below rather than through sibling paths.

pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod models;
pub mod queries;
pub mod routes;
pub mod schema;
pub mod seed;
pub mod store;

#[cfg(test)]
mod fixtures;

pub use chat::ChatAssistant;
pub use config::Config;
pub use error::{StoreError, StoreResult};
pub use filter::RegionFilter;
pub use models::{
    AlertKind, AlertView, DashboardStats, DeploymentStatus, LocationHierarchy, NewAlert,
    NewDeployment, NewMetric, NewTanker, NewVillage, RiskLevel, Tanker, TankerStatus, UsageRow,
    VillageView,
};
