use super::xml::{build_property_xml, listing_id};
use crate::config::FeedSettings;
use crate::error::UploadError;
use crate::models::PropertyRecord;
use anyhow::{Context, Result};
use chrono::Local;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

const SOURCE_HEADER: &str = "X-IMMO-SOURCE";
const MAX_ERROR_BODY: usize = 500;

/// Accepted upload
#[derive(Debug, Clone)]
pub struct PublishReceipt {
    pub listing_id: String,
    pub status: u16,
    pub body: String,
}

/// HTTP client for the Immobiliare.it import endpoint
pub struct FeedClient {
    client: Client,
    settings: FeedSettings,
}

impl FeedClient {
    pub fn new(settings: FeedSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, settings })
    }

    /// Resource URL of one listing
    pub fn listing_url(&self, listing_id: &str) -> String {
        format!("{}/{}", self.settings.endpoint.trim_end_matches('/'), listing_id)
    }

    /// PUTs the record's XML document; any non-2xx answer is a transmission error
    pub async fn publish(&self, record: &PropertyRecord) -> Result<PublishReceipt> {
        let id = listing_id(record);
        let payload = build_property_xml(record, &self.settings, Local::now().naive_local())?;
        let url = self.listing_url(&id);

        info!("Uploading {} to {}", record.display_name(), url);
        debug!("Payload is {} bytes", payload.len());

        let response = self
            .client
            .put(&url)
            .basic_auth(&self.settings.email, Some(&self.settings.password))
            .header(SOURCE_HEADER, &self.settings.source)
            .header(CONTENT_TYPE, "application/xml; charset=utf-8")
            .body(payload)
            .send()
            .await
            .context("Failed to reach the feed endpoint")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            warn!("Feed returned status: {}", status);
            return Err(UploadError::Transmission {
                endpoint: url,
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            }
            .into());
        }

        info!("✅ {} accepted with HTTP {}", id, status.as_u16());
        Ok(PublishReceipt {
            listing_id: id,
            status: status.as_u16(),
            body,
        })
    }
}
