use crate::error::UploadError;
use crate::portals::Portal;
use std::collections::HashMap;
use std::path::PathBuf;

pub const DEFAULT_FEED_ENDPOINT: &str = "https://feed.immobiliare.it/ws/import/immobiliare/property";
pub const DEFAULT_FEED_SOURCE: &str = "affittasardegna";
pub const DEFAULT_OFFICE_NAME: &str = "AffittaSardegna";

/// Portal account used by the browser drivers
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Settings for the XML feed endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSettings {
    pub endpoint: String,
    pub email: String,
    pub password: String,
    /// Value of the source-identifying header
    pub source: String,
    pub office_name: String,
}

impl Default for FeedSettings {
    /// Endpoint defaults with an empty account, enough to render payloads
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_FEED_ENDPOINT.to_string(),
            email: String::new(),
            password: String::new(),
            source: DEFAULT_FEED_SOURCE.to_string(),
            office_name: DEFAULT_OFFICE_NAME.to_string(),
        }
    }
}

/// Runtime configuration, read once at startup and passed down explicitly
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub credentials: HashMap<Portal, Credentials>,
    pub feed: Option<FeedSettings>,
    pub chromium_path: Option<PathBuf>,
    pub property_data: Option<PathBuf>,
    pub interactive: bool,
}

impl Config {
    /// Load from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut credentials = HashMap::new();
        for portal in Portal::ALL {
            let (email_var, password_var) = portal.credential_vars();
            if let (Some(email), Some(password)) = (get(email_var), get(password_var)) {
                credentials.insert(portal, Credentials { email, password });
            }
        }

        let feed = match (get("IMMOBILIARE_EMAIL"), get("IMMOBILIARE_PASSWORD")) {
            (Some(email), Some(password)) => Some(FeedSettings {
                endpoint: get("IMMOBILIARE_ENDPOINT")
                    .unwrap_or_else(|| DEFAULT_FEED_ENDPOINT.to_string()),
                email,
                password,
                source: get("IMMOBILIARE_SOURCE").unwrap_or_else(|| DEFAULT_FEED_SOURCE.to_string()),
                office_name: get("IMMOBILIARE_OFFICE")
                    .unwrap_or_else(|| DEFAULT_OFFICE_NAME.to_string()),
            }),
            _ => None,
        };

        Self {
            credentials,
            feed,
            chromium_path: get("CHROMIUM_PATH").map(PathBuf::from),
            property_data: get("PROPERTY_DATA").map(PathBuf::from),
            interactive: get("INTERACTIVE").as_deref() == Some("1"),
        }
    }

    pub fn credentials_for(&self, portal: Portal) -> Result<&Credentials, UploadError> {
        self.credentials.get(&portal).ok_or_else(|| {
            let (email_var, password_var) = portal.credential_vars();
            UploadError::MissingCredentials {
                email_var,
                password_var,
            }
        })
    }

    pub fn feed_settings(&self) -> Result<&FeedSettings, UploadError> {
        self.feed.as_ref().ok_or(UploadError::MissingCredentials {
            email_var: "IMMOBILIARE_EMAIL",
            password_var: "IMMOBILIARE_PASSWORD",
        })
    }
}
