//! Per-step "can advance" checks, kept free of any view state.

use super::location_request::SubmittedLocation;
use super::model::{OnboardingSession, is_filled};
use super::notice::Notice;
use super::state::{LocationRequestState, OnboardingStep};

/// Whether the user may advance from `step` given the current session.
///
/// `submitted` is the location request saved by the step 5 sub-flow, if any;
/// step 5 is judged on that location instead of the session's.
pub fn compute_validity(
    step: &OnboardingStep,
    session: &OnboardingSession,
    submitted: Option<&SubmittedLocation>,
) -> bool {
    match step {
        OnboardingStep::Photo => is_filled(session.photo.local_ref.as_deref()),
        OnboardingStep::Profile => {
            let p = &session.profile;
            is_filled(Some(p.first_name.as_str()))
                && is_filled(Some(p.last_name.as_str()))
                && p.role.is_some()
                && p.birth_date.is_some_and(|d| d.to_naive_date().is_some())
        }
        OnboardingStep::Interests => !session.interests.is_empty(),
        OnboardingStep::Location => session.location.is_complete(),
        OnboardingStep::LocationRequest(sub) => {
            *sub == LocationRequestState::Success && submitted.is_some_and(|s| s.is_complete())
        }
    }
}

/// Notice shown when advancing is attempted while `step` is incomplete.
pub fn incomplete_notice(step: &OnboardingStep) -> Notice {
    let message = match step {
        OnboardingStep::Photo => "Add a profile photo to continue",
        OnboardingStep::Profile => "Fill in your name, role, and date of birth",
        OnboardingStep::Interests => "Pick at least one interest",
        OnboardingStep::Location => "Select your state and area",
        OnboardingStep::LocationRequest(_) => "Submit your location request first",
    };
    Notice::validation(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::model::{BirthDate, Role};

    #[test]
    fn photo_requires_reference() {
        let mut session = OnboardingSession::new();
        assert!(!compute_validity(&OnboardingStep::Photo, &session, None));
        session.photo.local_ref = Some("file:///tmp/me.jpg".to_string());
        assert!(compute_validity(&OnboardingStep::Photo, &session, None));
    }

    #[test]
    fn profile_requires_every_field() {
        let mut session = OnboardingSession::new();
        session.profile.first_name = "Sam".to_string();
        session.profile.last_name = "Lee".to_string();
        session.profile.role = Some(Role::Coach);
        assert!(!compute_validity(&OnboardingStep::Profile, &session, None));

        session.profile.birth_date = Some(BirthDate::new(1990, 5, 12));
        assert!(compute_validity(&OnboardingStep::Profile, &session, None));

        session.profile.last_name = " ".to_string();
        assert!(!compute_validity(&OnboardingStep::Profile, &session, None));
    }

    #[test]
    fn profile_rejects_nonexistent_birth_date() {
        let mut session = OnboardingSession::new();
        session.profile.first_name = "Sam".to_string();
        session.profile.last_name = "Lee".to_string();
        session.profile.role = Some(Role::Athlete);
        session.profile.birth_date = Some(BirthDate::new(2023, 2, 30));
        assert!(!compute_validity(&OnboardingStep::Profile, &session, None));
    }

    #[test]
    fn interests_require_one_selection() {
        let mut session = OnboardingSession::new();
        assert!(!compute_validity(&OnboardingStep::Interests, &session, None));
        session.toggle_interest("Baseball");
        assert!(compute_validity(&OnboardingStep::Interests, &session, None));
    }

    #[test]
    fn location_request_judged_on_submitted_location() {
        let mut session = OnboardingSession::new();
        session.location.state = Some("Texas".to_string());
        session.location.area = Some("Austin".to_string());

        let form = OnboardingStep::LocationRequest(LocationRequestState::Form);
        let success = OnboardingStep::LocationRequest(LocationRequestState::Success);
        assert!(compute_validity(&OnboardingStep::Location, &session, None));
        assert!(!compute_validity(&form, &session, None));
        assert!(!compute_validity(&success, &session, None));

        let submitted = SubmittedLocation {
            city: "Round Rock".to_string(),
            state: "Texas".to_string(),
            state_id: "tx".to_string(),
            city_id: "c-1".to_string(),
        };
        assert!(compute_validity(&success, &session, Some(&submitted)));
        assert!(!compute_validity(&form, &session, Some(&submitted)));
    }
}
