//! Listing uploader: validates vacation-rental property records, exports
//! per-portal schemas, drives the portals' "add property" wizards in a
//! browser and publishes to the Immobiliare.it XML feed.

pub mod automation;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod pipeline;
pub mod portals;
pub mod uploader;

pub use config::Config;
pub use error::UploadError;
pub use models::PropertyRecord;
