use thiserror::Error;

/// Everything that can stop a single dashboard submission.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The form input was rejected before any remote call.
    #[error("{0}")]
    InvalidInput(String),

    /// The weather service does not know the requested place.
    #[error("Location not found: {0}")]
    NotFound(String),

    /// The remote call could not complete (network, auth, status or decode failure).
    #[error("Weather service request failed: {0}")]
    Transport(String),

    /// A chart could not be drawn.
    #[error("Failed to render chart: {0}")]
    Render(String),
}

impl DashboardError {
    /// Short message shown to the user for this kind of failure.
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::InvalidInput(msg) => msg.clone(),
            DashboardError::NotFound(place) => {
                format!("City '{place}' was not found. Check the spelling and try again.")
            }
            DashboardError::Transport(detail) => {
                format!("Could not reach the weather service: {detail}")
            }
            DashboardError::Render(detail) => format!("Could not draw the charts: {detail}"),
        }
    }

    /// Input problems are reported as a warning rather than an error.
    pub fn is_warning(&self) -> bool {
        matches!(self, DashboardError::InvalidInput(_))
    }
}
