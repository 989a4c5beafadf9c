//! Random rover photo lookup

use std::sync::Mutex;
use std::time::Duration;
use futures::future::join_all;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::application::errors::{PhotoError, ValidationError};
use crate::domain::entities::{Camera, PhotoOutcome, PhotoRecord, Rover};
use crate::domain::traits::PhotoSource;
use super::rate_limit::RateLimitGuard;
use super::sol_cache::SolCache;

/// Arguments of one photo command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoRequest {
    pub rover: Rover,
    pub camera: Camera,
    pub sol: i64,
}

/// Everything a photo command can end in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Rejected by the cooldown gate, nothing was sent upstream
    RateLimited,
    Invalid(ValidationError),
    NoResults(PhotoRequest),
    Found(PhotoRecord),
    Failed(PhotoError),
}

/// Service for fetching random rover photos
pub struct PhotoService<S: PhotoSource> {
    source: S,
    sols: SolCache,
    guard: RateLimitGuard,
    rng: Mutex<StdRng>,
}

impl<S: PhotoSource> PhotoService<S> {
    pub fn new(source: S, cooldown: Duration) -> Self {
        Self::with_rng(source, cooldown, StdRng::from_entropy())
    }

    pub fn with_rng(source: S, cooldown: Duration, rng: StdRng) -> Self {
        Self {
            source,
            sols: SolCache::new(),
            guard: RateLimitGuard::new(cooldown),
            rng: Mutex::new(rng),
        }
    }

    pub fn guard(&self) -> &RateLimitGuard {
        &self.guard
    }

    pub fn sols(&self) -> &SolCache {
        &self.sols
    }

    /// Query every rover manifest at once and keep whatever bounds come back.
    ///
    /// Returns how many rovers were updated. Failures leave the old bound.
    pub async fn refresh_sol_cache(&self) -> usize {
        let lookups = Rover::ALL.map(|rover| async move { (rover, self.source.max_sol(rover).await) });

        let mut updated = 0;
        for (rover, result) in join_all(lookups).await {
            match result {
                Ok(Some(max_sol)) if self.sols.update(rover, max_sol) => {
                    tracing::info!("Max sol for {} is {}", rover, max_sol);
                    updated += 1;
                }
                Ok(_) => {
                    tracing::debug!("Manifest for {} has no max sol, keeping {}", rover, self.sols.max_sol(rover));
                }
                Err(e) => {
                    tracing::warn!("Failed to refresh max sol for {}: {}", rover, e);
                }
            }
        }
        updated
    }

    /// Check the rover/camera pair, then the sol bound
    pub fn validate(&self, request: &PhotoRequest) -> Result<u32, ValidationError> {
        let PhotoRequest { rover, camera, sol } = *request;
        if !rover.supports(camera) {
            return Err(ValidationError::InvalidCombination { rover, camera });
        }
        let max = self.sols.max_sol(rover);
        match u32::try_from(sol) {
            Ok(sol) if sol <= max => Ok(sol),
            _ => Err(ValidationError::SolOutOfRange { rover, sol, max }),
        }
    }

    /// Fetch the photo list and pick one entry
    pub async fn fetch_random_photo(&self, rover: Rover, camera: Camera, sol: u32) -> Result<PhotoOutcome, PhotoError> {
        let photos = self.source.photos(rover, camera, sol).await?;
        tracing::debug!("{} photos for {} {} sol {}", photos.len(), rover, camera, sol);

        Ok(match self.pick(&photos) {
            Some(photo) => PhotoOutcome::Found(photo),
            None => PhotoOutcome::NoResults,
        })
    }

    fn pick(&self, photos: &[PhotoRecord]) -> Option<PhotoRecord> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        photos.choose(&mut *rng).cloned()
    }

    /// Run one photo command end to end
    pub async fn run(&self, request: PhotoRequest) -> CommandOutcome {
        if self.guard.is_limited() {
            return CommandOutcome::RateLimited;
        }

        let sol = match self.validate(&request) {
            Ok(sol) => sol,
            Err(e) => {
                tracing::debug!("Rejected photo request: {}", e);
                return CommandOutcome::Invalid(e);
            }
        };

        match self.fetch_random_photo(request.rover, request.camera, sol).await {
            Ok(PhotoOutcome::Found(photo)) => CommandOutcome::Found(photo),
            Ok(PhotoOutcome::NoResults) => CommandOutcome::NoResults(request),
            Err(e) => {
                if e == PhotoError::RateLimited {
                    // Dropping the handle detaches the reset task
                    let _reset = self.guard.trip();
                } else {
                    tracing::error!("Photo fetch failed: {}", e);
                }
                CommandOutcome::Failed(e)
            }
        }
    }
}
