//! Per-rover upper bound for the sol argument

use std::sync::atomic::{AtomicU32, Ordering};
use crate::domain::entities::Rover;

/// Highest valid sol for each rover
pub struct SolCache {
    max_sols: [AtomicU32; 3],
}

impl SolCache {
    pub fn new() -> Self {
        Self {
            max_sols: Rover::ALL.map(|r| AtomicU32::new(r.default_max_sol())),
        }
    }

    pub fn max_sol(&self, rover: Rover) -> u32 {
        self.max_sols[rover.index()].load(Ordering::Relaxed)
    }

    /// Record a manifest value; zero means the manifest had nothing useful
    pub fn update(&self, rover: Rover, max_sol: u32) -> bool {
        if max_sol == 0 {
            return false;
        }
        self.max_sols[rover.index()].store(max_sol, Ordering::Relaxed);
        true
    }
}

impl Default for SolCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cache = SolCache::new();
        assert_eq!(cache.max_sol(Rover::Curiosity), 3795);
        assert_eq!(cache.max_sol(Rover::Opportunity), 5111);
        assert_eq!(cache.max_sol(Rover::Spirit), 2208);
    }

    #[test]
    fn test_update_ignores_zero() {
        let cache = SolCache::new();
        assert!(!cache.update(Rover::Spirit, 0));
        assert_eq!(cache.max_sol(Rover::Spirit), 2208);

        assert!(cache.update(Rover::Curiosity, 4100));
        assert_eq!(cache.max_sol(Rover::Curiosity), 4100);
        assert_eq!(cache.max_sol(Rover::Opportunity), 5111);
    }
}
