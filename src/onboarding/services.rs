//! External collaborators the onboarding flow calls out to.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

use super::model::ProfilePayload;

/// Backend identifiers an area name resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationIds {
    pub state_id: String,
    pub area_id: String,
}

/// Request to add a city that is missing from the area list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRequestPayload {
    pub city: String,
    pub state_id: String,
    pub user_id: String,
}

/// Backend response to a saved location request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedLocationRequest {
    pub message: String,
    pub city_id: String,
}

/// Backend-agnostic interface covering upload, lookup, and persistence.
#[async_trait]
pub trait OnboardingBackend: Send + Sync {
    /// Upload the photo at `local_ref`. Returns its remote URL.
    async fn upload_photo(&self, local_ref: &str) -> Result<String, ServiceError>;

    /// Look up the state and area identifiers for an area name.
    async fn resolve_location(&self, area_name: &str) -> Result<LocationIds, ServiceError>;

    /// Persist the completed profile. Returns the backend's confirmation.
    async fn complete_profile(&self, payload: &ProfilePayload) -> Result<String, ServiceError>;

    /// File a request to add a new city.
    async fn save_location_request(
        &self,
        request: &LocationRequestPayload,
    ) -> Result<SavedLocationRequest, ServiceError>;
}
