//! Home page counters

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Dashboard {
    pub num_books: i64,
    pub num_instances: i64,
    /// Copies whose status is exactly "available"
    pub num_instances_available: i64,
    pub num_authors: i64,
    pub num_genres: i64,
    /// Visits to the home page in this session, this one included
    pub num_visits: i64,
}
