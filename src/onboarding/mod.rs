//! Onboarding wizard — photo, profile, interests, and home location,
//! submitted as one profile.
//!
//! The `OnboardingController` owns the session and the current step. Step
//! validity comes from the pure checks in `validity`; the terminal step can
//! branch into the location request sub-flow before submitting.

pub mod controller;
pub mod location_request;
pub mod model;
pub mod notice;
pub mod services;
pub mod state;
pub mod validity;

pub use controller::{AdvanceOutcome, OnboardingController};
pub use location_request::{LocationRequest, StateOption, SubmittedLocation};
pub use model::{
    BirthDate, DEFAULT_INTERESTS, LocationData, OnboardingSession, PhotoData, ProfileData,
    ProfilePayload, ResolvedLocation, Role,
};
pub use notice::{Notice, NoticeKind};
pub use services::{LocationIds, LocationRequestPayload, OnboardingBackend, SavedLocationRequest};
pub use state::{LocationRequestState, OnboardingStep};
pub use validity::compute_validity;
