/// Photo metadata extracted from one API result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoRecord {
    pub img_src: Option<String>,
    pub rover: Option<String>,
    pub landing_date: Option<String>,
    pub launch_date: Option<String>,
    pub camera: Option<String>,
    pub photo_earth_date: Option<String>,
    pub status: Option<String>,
}

impl PhotoRecord {
    /// Non-image attributes in display order, keyed by attribute name
    pub fn details(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("rover", self.rover.as_deref()),
            ("landing_date", self.landing_date.as_deref()),
            ("launch_date", self.launch_date.as_deref()),
            ("camera", self.camera.as_deref()),
            ("photo_earth_date", self.photo_earth_date.as_deref()),
            ("status", self.status.as_deref()),
        ]
    }
}

/// Result of a successful photo query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoOutcome {
    Found(PhotoRecord),
    NoResults,
}
