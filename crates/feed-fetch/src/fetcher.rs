//! Fetch implementations.

use std::path::Path;

use feed_model::{Location, ResourceDescriptor};

use crate::config::FetchConfig;
use crate::error::{FetchError, Result};
use crate::payload::RawPayload;

/// Source of raw payloads.
///
/// The pipeline only depends on this trait, so tests and embedders can
/// substitute their own byte source.
pub trait Fetch {
    /// Reads the bytes behind `descriptor`. Performs exactly one read.
    fn fetch(&self, descriptor: &ResourceDescriptor) -> Result<RawPayload>;
}

/// Default fetcher: blocking HTTP for URLs and objects, `std::fs` for paths.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::blocking::Client,
    config: FetchConfig,
}

impl Fetcher {
    /// Creates a fetcher with its own HTTP client.
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// The configuration this fetcher was built with.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn fetch_http(&self, descriptor: &ResourceDescriptor, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .timeout(descriptor.timeout)
            .send()
            .map_err(|e| transport_error(descriptor, url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                resource: descriptor.name.clone(),
                location: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .map_err(|e| transport_error(descriptor, url, &e))?;
        Ok(bytes.to_vec())
    }
}

impl Fetch for Fetcher {
    fn fetch(&self, descriptor: &ResourceDescriptor) -> Result<RawPayload> {
        let (location, bytes) = match &descriptor.location {
            Location::Url(url) => {
                tracing::debug!(resource = %descriptor.name, url = %url, "Fetching feed over HTTP");
                (url.clone(), self.fetch_http(descriptor, url)?)
            }
            Location::Object { bucket, key } => {
                let url = self.config.object_url(bucket, key);
                tracing::debug!(
                    resource = %descriptor.name,
                    bucket = %bucket,
                    key = %key,
                    url = %url,
                    "Fetching feed object"
                );
                let bytes = self.fetch_http(descriptor, &url)?;
                (descriptor.location.to_string(), bytes)
            }
            Location::Path(path) => {
                tracing::debug!(resource = %descriptor.name, path = %path.display(), "Reading feed file");
                (path.display().to_string(), read_file(descriptor, path)?)
            }
        };

        tracing::debug!(
            resource = %descriptor.name,
            bytes = bytes.len(),
            "Fetched feed payload"
        );

        Ok(RawPayload {
            resource: descriptor.name.clone(),
            location,
            bytes,
            encoding: descriptor.encoding,
            transfer: descriptor.transfer,
        })
    }
}

fn read_file(descriptor: &ResourceDescriptor, path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| FetchError::Unreachable {
        resource: descriptor.name.clone(),
        location: path.display().to_string(),
        message: e.to_string(),
    })
}

fn transport_error(descriptor: &ResourceDescriptor, location: &str, err: &reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            resource: descriptor.name.clone(),
            location: location.to_string(),
            timeout: descriptor.timeout,
        }
    } else {
        FetchError::Unreachable {
            resource: descriptor.name.clone(),
            location: location.to_string(),
            message: err.to_string(),
        }
    }
}
