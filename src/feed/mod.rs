//! XML feed publishing to Immobiliare.it

pub mod client;
pub mod xml;

pub use client::{FeedClient, PublishReceipt};
pub use xml::{build_property_xml, listing_id};
