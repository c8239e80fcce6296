use thiserror::Error;

#[derive(Error, Debug)]
pub enum MessFinderError {
    #[error("Geocoding error: {0}")]
    Geocoding(#[from] messfinder_geocoding::GeocodingError),
    #[error("Listing data error: {0}")]
    ListingData(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),
    #[error("Init Logging error: {0}")]
    InstallLoggerError(#[from] tracing_subscriber::util::TryInitError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MessFinderError {
    /// True for failures talking to the geocoder, which the search box recovers from
    /// by showing no suggestions.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, Self::Geocoding(_))
    }
}

pub type Result<T> = std::result::Result<T, MessFinderError>;
