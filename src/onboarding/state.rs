//! Onboarding step state machine.

use serde::{Deserialize, Serialize};

use crate::error::OnboardingError;

/// States of the nested location request form shown on step 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationRequestState {
    /// Entering a city and picking its state.
    #[default]
    Form,
    /// Choosing a state from the list.
    StatePicker,
    /// The request was saved.
    Success,
}

impl LocationRequestState {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: LocationRequestState) -> bool {
        use LocationRequestState::*;
        matches!(
            (self, target),
            (Form, StatePicker) | (StatePicker, Form) | (Form, Success) | (Success, Form)
        )
    }
}

impl std::fmt::Display for LocationRequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Form => "form",
            Self::StatePicker => "state_picker",
            Self::Success => "success",
        };
        write!(f, "{s}")
    }
}

/// The wizard's current screen.
///
/// Steps 4 and 5 render the same location view. Step 5 additionally carries
/// the nested location request flow, so the branch is visible in the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", content = "sub_flow", rename_all = "snake_case")]
pub enum OnboardingStep {
    Photo,
    Profile,
    Interests,
    Location,
    LocationRequest(LocationRequestState),
}

impl Default for OnboardingStep {
    fn default() -> Self {
        Self::Photo
    }
}

impl OnboardingStep {
    /// 1-based step number.
    pub fn number(&self) -> u8 {
        match self {
            Self::Photo => 1,
            Self::Profile => 2,
            Self::Interests => 3,
            Self::Location => 4,
            Self::LocationRequest(_) => 5,
        }
    }

    /// Step for a 1-based number. Step 5 starts its sub-flow at `Form`.
    pub fn from_number(n: u8) -> Result<Self, OnboardingError> {
        match n {
            1 => Ok(Self::Photo),
            2 => Ok(Self::Profile),
            3 => Ok(Self::Interests),
            4 => Ok(Self::Location),
            5 => Ok(Self::LocationRequest(LocationRequestState::Form)),
            other => Err(OnboardingError::InvalidStep(other)),
        }
    }

    /// The step reached by advancing, for non-terminal steps.
    pub fn next(&self) -> Option<OnboardingStep> {
        match self {
            Self::Photo => Some(Self::Profile),
            Self::Profile => Some(Self::Interests),
            Self::Interests => Some(Self::Location),
            Self::Location | Self::LocationRequest(_) => None,
        }
    }

    /// The step reached by going back, floored at step 1.
    pub fn previous(&self) -> OnboardingStep {
        match self {
            Self::Photo | Self::Profile => Self::Photo,
            Self::Interests => Self::Profile,
            Self::Location => Self::Interests,
            Self::LocationRequest(_) => Self::Location,
        }
    }

    /// Advancing from this step submits the profile.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Location | Self::LocationRequest(_))
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Photo => write!(f, "photo"),
            Self::Profile => write!(f, "profile"),
            Self::Interests => write!(f, "interests"),
            Self::Location => write!(f, "location"),
            Self::LocationRequest(sub) => write!(f, "location_request:{sub}"),
        }
    }
}
