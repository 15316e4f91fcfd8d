pub mod api;
pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod mutation;
pub mod notify;
pub mod ui;
pub mod units;
pub mod upload;

pub use catalog::{Catalog, CollectionStore, SoundItem, SoundMap};
pub use config::{AppConfig, ConfigLoader, ConfigPaths};
pub use mutation::{DeleteCoordinator, DeleteOutcome, FetchBootstrap};
