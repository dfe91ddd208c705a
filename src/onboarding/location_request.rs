//! Location request sub-flow: lets a user whose city is missing from the
//! area list request it, then finish onboarding with that city.

use serde::{Deserialize, Serialize};

use crate::error::OnboardingError;

use super::model::{ResolvedLocation, is_filled};
use super::notice::Notice;
use super::services::{LocationRequestPayload, SavedLocationRequest};
use super::state::LocationRequestState;

/// A state offered by the state picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateOption {
    pub id: String,
    pub name: String,
}

/// The city and state a saved request was filed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedLocation {
    pub city: String,
    pub state: String,
    pub state_id: String,
    pub city_id: String,
}

impl SubmittedLocation {
    pub fn is_complete(&self) -> bool {
        is_filled(Some(self.city.as_str())) && is_filled(Some(self.state.as_str()))
    }
}

impl From<SubmittedLocation> for ResolvedLocation {
    fn from(loc: SubmittedLocation) -> Self {
        Self {
            state: loc.state,
            area: loc.city,
            state_id: loc.state_id,
            area_id: loc.city_id,
        }
    }
}

/// Local state of the sub-flow. Nothing here is written to the onboarding
/// session until the controller closes the flow after success.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationRequest {
    state: LocationRequestState,
    city: String,
    selected_state: Option<StateOption>,
    submitted: Option<SubmittedLocation>,
}

impl LocationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LocationRequestState {
        self.state
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn selected_state(&self) -> Option<&StateOption> {
        self.selected_state.as_ref()
    }

    /// The location saved by the last successful request, while in `Success`.
    pub fn submitted(&self) -> Option<&SubmittedLocation> {
        self.submitted.as_ref()
    }

    /// Show the form. Entered values are kept; a previous success is not.
    pub fn open(&mut self) {
        self.state = LocationRequestState::Form;
        self.submitted = None;
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    /// "Choose state" tap on the form. Returns false if the picker cannot be
    /// shown from the current state.
    pub fn choose_state(&mut self) -> bool {
        self.transition(LocationRequestState::StatePicker)
    }

    /// Record the picked state and return to the form.
    pub fn select_state(&mut self, option: StateOption) -> bool {
        if !self.transition(LocationRequestState::Form) {
            return false;
        }
        self.selected_state = Some(option);
        true
    }

    /// Validate the form and build the request to save.
    ///
    /// Fails with a validation notice, leaving every field untouched, unless
    /// the form is showing and has a city, a state name, and a state id.
    pub fn prepare_request(&self, user_id: &str) -> Result<LocationRequestPayload, Notice> {
        if self.state != LocationRequestState::Form {
            return Err(Notice::validation("Finish choosing a state first"));
        }
        let city = self.city.trim();
        if city.is_empty() {
            return Err(Notice::validation("Enter your city"));
        }
        let Some(option) = self.selected_state.as_ref() else {
            return Err(Notice::validation("Choose your state"));
        };
        if option.name.trim().is_empty() || option.id.trim().is_empty() {
            return Err(Notice::validation("Choose your state"));
        }
        Ok(LocationRequestPayload {
            city: city.to_string(),
            state_id: option.id.clone(),
            user_id: user_id.to_string(),
        })
    }

    /// Apply a successful save: record what was submitted and show success.
    pub fn apply_saved(&mut self, request: &LocationRequestPayload, saved: SavedLocationRequest) {
        let state = self
            .selected_state
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_default();
        self.submitted = Some(SubmittedLocation {
            city: request.city.clone(),
            state,
            state_id: request.state_id.clone(),
            city_id: saved.city_id,
        });
        self.state = LocationRequestState::Success;
    }

    /// Leave `Success`, handing back the submitted location, and reset to
    /// `Form`.
    pub fn close_after_success(&mut self) -> Result<SubmittedLocation, OnboardingError> {
        if self.state != LocationRequestState::Success {
            return Err(OnboardingError::SubFlowNotReady);
        }
        let submitted = self.submitted.take().ok_or(OnboardingError::SubFlowNotReady)?;
        self.state = LocationRequestState::Form;
        Ok(submitted)
    }

    fn transition(&mut self, target: LocationRequestState) -> bool {
        if !self.state.can_transition_to(target) {
            return false;
        }
        self.state = target;
        true
    }
}
