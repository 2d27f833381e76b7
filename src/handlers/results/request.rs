//! Result request DTOs

use serde::Deserialize;

/// Result listing filters
#[derive(Debug, Deserialize)]
pub struct ResultsQuery {
    pub gender: Option<String>,
    /// Bracket label such as `18-30` or `61+`
    pub age_group: Option<String>,
}
