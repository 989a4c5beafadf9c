use std::fmt;
use std::str::FromStr;

/// Mars rovers served by the photo API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rover {
    Curiosity,
    Opportunity,
    Spirit,
}

impl Rover {
    pub const ALL: [Rover; 3] = [Rover::Curiosity, Rover::Opportunity, Rover::Spirit];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rover::Curiosity => "Curiosity",
            Rover::Opportunity => "Opportunity",
            Rover::Spirit => "Spirit",
        }
    }

    /// Path segment used by the API endpoints
    pub fn slug(&self) -> &'static str {
        match self {
            Rover::Curiosity => "curiosity",
            Rover::Opportunity => "opportunity",
            Rover::Spirit => "spirit",
        }
    }

    /// Last known sol before the manifest refresh runs
    pub fn default_max_sol(&self) -> u32 {
        match self {
            Rover::Curiosity => 3795,
            Rover::Opportunity => 5111,
            Rover::Spirit => 2208,
        }
    }

    pub fn cameras(&self) -> &'static [Camera] {
        match self {
            Rover::Curiosity => &CURIOSITY_CAMERAS,
            Rover::Opportunity | Rover::Spirit => &MER_CAMERAS,
        }
    }

    pub fn supports(&self, camera: Camera) -> bool {
        self.cameras().contains(&camera)
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Rover::Curiosity => 0,
            Rover::Opportunity => 1,
            Rover::Spirit => 2,
        }
    }
}

impl fmt::Display for Rover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rover {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rover::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown rover: {}", s))
    }
}

/// Rover cameras, named as the API expects them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Camera {
    Fhaz,
    Rhaz,
    Mast,
    Chemcam,
    Mahli,
    Mardi,
    Navcam,
    Pancam,
    Minites,
}

const CURIOSITY_CAMERAS: [Camera; 7] = [
    Camera::Fhaz,
    Camera::Rhaz,
    Camera::Mast,
    Camera::Chemcam,
    Camera::Mahli,
    Camera::Mardi,
    Camera::Navcam,
];

// Opportunity and Spirit share the MER camera set
const MER_CAMERAS: [Camera; 5] = [
    Camera::Fhaz,
    Camera::Rhaz,
    Camera::Navcam,
    Camera::Pancam,
    Camera::Minites,
];

impl Camera {
    pub const ALL: [Camera; 9] = [
        Camera::Fhaz,
        Camera::Rhaz,
        Camera::Mast,
        Camera::Chemcam,
        Camera::Mahli,
        Camera::Mardi,
        Camera::Navcam,
        Camera::Pancam,
        Camera::Minites,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Camera::Fhaz => "FHAZ",
            Camera::Rhaz => "RHAZ",
            Camera::Mast => "MAST",
            Camera::Chemcam => "CHEMCAM",
            Camera::Mahli => "MAHLI",
            Camera::Mardi => "MARDI",
            Camera::Navcam => "NAVCAM",
            Camera::Pancam => "PANCAM",
            Camera::Minites => "MINITES",
        }
    }
}

impl fmt::Display for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Camera {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Camera::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown camera: {}", s))
    }
}
