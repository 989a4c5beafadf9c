use async_trait::async_trait;
use crate::application::errors::PhotoError;
use crate::domain::entities::{Camera, PhotoRecord, Rover};

/// PhotoSource trait - abstraction over the rover photo API
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// Highest sol the manifest reports for a rover, if it reports one
    async fn max_sol(&self, rover: Rover) -> Result<Option<u32>, PhotoError>;

    /// All photos taken by `camera` on `rover` during `sol`
    async fn photos(&self, rover: Rover, camera: Camera, sol: u32) -> Result<Vec<PhotoRecord>, PhotoError>;
}
