//! NASA Mars Rover Photos API client

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::application::errors::PhotoError;
use crate::domain::entities::{Camera, PhotoRecord, Rover};
use crate::domain::traits::PhotoSource;

/// Manifest endpoint response
#[derive(Debug, Deserialize)]
struct ManifestResponse {
    photo_manifest: Option<PhotoManifest>,
}

#[derive(Debug, Deserialize)]
struct PhotoManifest {
    max_sol: Option<u32>,
}

/// Photos endpoint response
#[derive(Debug, Deserialize)]
struct PhotosResponse {
    #[serde(default)]
    photos: Vec<ApiPhoto>,
}

#[derive(Debug, Deserialize)]
struct ApiPhoto {
    img_src: Option<String>,
    earth_date: Option<String>,
    camera: Option<ApiCamera>,
    rover: Option<ApiRover>,
}

#[derive(Debug, Deserialize)]
struct ApiCamera {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiRover {
    name: Option<String>,
    landing_date: Option<String>,
    launch_date: Option<String>,
    status: Option<String>,
}

impl From<ApiPhoto> for PhotoRecord {
    fn from(photo: ApiPhoto) -> Self {
        let (name, landing_date, launch_date, status) = match photo.rover {
            Some(r) => (r.name, r.landing_date, r.launch_date, r.status),
            None => (None, None, None, None),
        };

        PhotoRecord {
            img_src: photo.img_src,
            rover: name,
            landing_date,
            launch_date,
            camera: photo.camera.and_then(|c| c.name),
            photo_earth_date: photo.earth_date,
            status,
        }
    }
}

/// HTTP client for the photo API
pub struct NasaClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NasaClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Result<Self, PhotoError> {
        // No idle connections are kept between commands
        let client = Client::builder()
            .user_agent(concat!("mars-bot/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| PhotoError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn manifest_url(&self, rover: Rover) -> String {
        format!("{}/manifests/{}", self.base_url, rover.slug())
    }

    fn photos_url(&self, rover: Rover) -> String {
        format!("{}/rovers/{}/photos", self.base_url, rover.slug())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T, PhotoError> {
        let response = self.client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| PhotoError::Network(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!("GET {} returned {}", url, status);
            return Err(PhotoError::from_status(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| PhotoError::Parse(e.to_string()))
    }
}

#[async_trait]
impl PhotoSource for NasaClient {
    async fn max_sol(&self, rover: Rover) -> Result<Option<u32>, PhotoError> {
        let url = self.manifest_url(rover);
        let data: ManifestResponse = self.get_json(&url, &[("api_key", self.api_key.clone())]).await?;
        Ok(data.photo_manifest.and_then(|m| m.max_sol))
    }

    async fn photos(&self, rover: Rover, camera: Camera, sol: u32) -> Result<Vec<PhotoRecord>, PhotoError> {
        let url = self.photos_url(rover);
        let query = [
            ("api_key", self.api_key.clone()),
            ("sol", sol.to_string()),
            ("camera", camera.as_str().to_string()),
            ("rover", rover.as_str().to_string()),
        ];
        let data: PhotosResponse = self.get_json(&url, &query).await?;
        Ok(data.photos.into_iter().map(PhotoRecord::from).collect())
    }
}
