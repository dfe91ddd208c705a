//! OnboardingController — owns the session, drives step transitions, and
//! performs the terminal profile submission.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::OnboardingConfig;
use crate::error::OnboardingError;

use super::location_request::{LocationRequest, StateOption};
use super::model::{BirthDate, OnboardingSession, ResolvedLocation, Role};
use super::notice::Notice;
use super::services::OnboardingBackend;
use super::state::{LocationRequestState, OnboardingStep};
use super::validity::{compute_validity, incomplete_notice};

/// Result of pressing the primary action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Moved forward to this step.
    Moved(OnboardingStep),
    /// Nothing happened; the notice says why.
    Blocked(Notice),
    /// The profile was created. The caller should leave the flow.
    Completed(String),
    /// A collaborator failed. The step is unchanged so the user can retry.
    Failed(Notice),
}

struct ControllerState {
    step: OnboardingStep,
    step_valid: bool,
    session: OnboardingSession,
    location_request: LocationRequest,
    notice: Option<Notice>,
    completed_at: Option<DateTime<Utc>>,
}

impl ControllerState {
    fn recompute_validity(&mut self) {
        self.step_valid = compute_validity(
            &self.step,
            &self.session,
            self.location_request.submitted(),
        );
    }

    /// Keep the step 5 tag in sync with the sub-flow after it changes.
    fn sync_sub_flow(&mut self) {
        if let OnboardingStep::LocationRequest(_) = self.step {
            self.step = OnboardingStep::LocationRequest(self.location_request.state());
        }
        self.recompute_validity();
    }
}

/// Releases an in-flight flag when the attempt holding it ends, whatever the
/// outcome.
struct SubmitGuard<'a>(&'a AtomicBool);

impl<'a> SubmitGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Where the terminal payload's location comes from.
enum LocationSource {
    /// Step 4: the session's own state/area, resolved through the backend.
    Session { area: String, state: String },
    /// Step 5: the city saved by the location request sub-flow.
    Requested(ResolvedLocation),
}

/// Which completion paths a call may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Completion {
    /// Whatever the current terminal step submits.
    CurrentStep,
    /// Only the step 5 path, after a saved location request.
    RequestedOnly,
}

/// Coordinates the onboarding wizard: session edits, validity, transitions,
/// the location request sub-flow, and the single terminal write.
pub struct OnboardingController {
    backend: Arc<dyn OnboardingBackend>,
    user_id: String,
    state: RwLock<ControllerState>,
    submitting: AtomicBool,
    requesting: AtomicBool,
}

impl OnboardingController {
    pub fn new(backend: Arc<dyn OnboardingBackend>, config: &OnboardingConfig) -> Self {
        Self::with_session(backend, config, OnboardingSession::new())
    }

    /// Start from a pre-filled session (e.g. values restored by the host).
    pub fn with_session(
        backend: Arc<dyn OnboardingBackend>,
        config: &OnboardingConfig,
        session: OnboardingSession,
    ) -> Self {
        let mut state = ControllerState {
            step: OnboardingStep::Photo,
            step_valid: false,
            session,
            location_request: LocationRequest::new(),
            notice: None,
            completed_at: None,
        };
        state.recompute_validity();
        info!(session_id = %state.session.session_id, "Onboarding started");
        Self {
            backend,
            user_id: config.user_id.clone(),
            state: RwLock::new(state),
            submitting: AtomicBool::new(false),
            requesting: AtomicBool::new(false),
        }
    }

    // ── Reads ───────────────────────────────────────────────────────

    pub async fn current_step(&self) -> OnboardingStep {
        self.state.read().await.step
    }

    pub async fn step_valid(&self) -> bool {
        self.state.read().await.step_valid
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// A copy of the session as it stands.
    pub async fn session(&self) -> OnboardingSession {
        self.state.read().await.session.clone()
    }

    pub async fn location_request(&self) -> LocationRequest {
        self.state.read().await.location_request.clone()
    }

    /// The notice currently shown, if any.
    pub async fn notice(&self) -> Option<Notice> {
        self.state.read().await.notice.clone()
    }

    pub async fn dismiss_notice(&self) {
        self.state.write().await.notice = None;
    }

    pub async fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.completed_at
    }

    /// Label for the primary action button.
    pub async fn primary_action_label(&self) -> &'static str {
        if self.is_submitting() {
            return "Creating Profile…";
        }
        if self.state.read().await.step.is_terminal() {
            "Continue"
        } else {
            "Next"
        }
    }

    pub async fn primary_action_enabled(&self) -> bool {
        !self.is_submitting() && self.step_valid().await
    }

    // ── Session edits ───────────────────────────────────────────────

    /// Apply an edit to the session and recompute the current step's
    /// validity.
    pub async fn edit<F>(&self, f: F)
    where
        F: FnOnce(&mut OnboardingSession),
    {
        let mut state = self.state.write().await;
        f(&mut state.session);
        state.recompute_validity();
    }

    pub async fn set_photo(&self, local_ref: impl Into<String>) {
        let local_ref = local_ref.into();
        self.edit(|s| {
            s.photo.local_ref = Some(local_ref);
            s.photo.uploaded = false;
        })
        .await;
    }

    pub async fn set_first_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.edit(|s| s.profile.first_name = name).await;
    }

    pub async fn set_last_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.edit(|s| s.profile.last_name = name).await;
    }

    pub async fn set_role(&self, role: Role) {
        self.edit(|s| s.profile.role = Some(role)).await;
    }

    pub async fn set_birth_date(&self, date: BirthDate) {
        self.edit(|s| s.profile.birth_date = Some(date)).await;
    }

    /// Returns whether the interest is selected afterwards.
    pub async fn toggle_interest(&self, interest: &str) -> bool {
        let mut state = self.state.write().await;
        let selected = state.session.toggle_interest(interest);
        state.recompute_validity();
        selected
    }

    /// Picking a new state clears an area chosen under the old one.
    pub async fn set_location_state(&self, name: impl Into<String>) {
        let name = name.into();
        self.edit(|s| {
            if s.location.state.as_deref() != Some(name.as_str()) {
                s.location.area = None;
            }
            s.location.state = Some(name);
        })
        .await;
    }

    pub async fn set_location_area(&self, area: impl Into<String>) {
        let area = area.into();
        self.edit(|s| s.location.area = Some(area)).await;
    }

    /// Overwrite the current step's validity. The mounted step view is the
    /// only writer, so the last write wins.
    pub async fn set_step_validity(&self, valid: bool) {
        self.state.write().await.step_valid = valid;
    }

    // ── Transitions ─────────────────────────────────────────────────

    /// Primary action. Moves forward from steps 1-3; submits the profile
    /// from steps 4 and 5.
    pub async fn advance(&self) -> AdvanceOutcome {
        if self.is_submitting() {
            return self.block(Notice::info("Your profile is already being created")).await;
        }

        let next = {
            let mut state = self.state.write().await;
            if !state.step_valid {
                debug!(step = %state.step, "Advance blocked: step incomplete");
                let notice = incomplete_notice(&state.step);
                state.notice = Some(notice.clone());
                return AdvanceOutcome::Blocked(notice);
            }
            match state.step.next() {
                Some(next) => {
                    let from = state.step;
                    state.step = next;
                    state.notice = None;
                    state.recompute_validity();
                    info!(from = %from, to = %next, "Onboarding step advanced");
                    Some(next)
                }
                None => None,
            }
        };

        match next {
            Some(step) => AdvanceOutcome::Moved(step),
            None => self.complete_profile().await,
        }
    }

    /// Go back one step, floored at step 1. Leaving step 5 returns to 4.
    pub async fn back(&self) -> OnboardingStep {
        let mut state = self.state.write().await;
        let from = state.step;
        state.step = from.previous();
        state.notice = None;
        state.recompute_validity();
        if from != state.step {
            info!(from = %from, to = %state.step, "Onboarding step went back");
        }
        state.step
    }

    // ── Location request sub-flow ───────────────────────────────────

    /// From step 4, open the location request form (step 5).
    pub async fn request_location(&self) -> bool {
        let mut state = self.state.write().await;
        if !matches!(state.step, OnboardingStep::Location) {
            return false;
        }
        state.location_request.open();
        state.step = OnboardingStep::LocationRequest(LocationRequestState::Form);
        state.notice = None;
        state.recompute_validity();
        info!("Location request opened");
        true
    }

    pub async fn set_request_city(&self, city: impl Into<String>) {
        let city = city.into();
        let mut state = self.state.write().await;
        state.location_request.set_city(city);
    }

    pub async fn choose_state(&self) -> bool {
        let mut state = self.state.write().await;
        if !matches!(state.step, OnboardingStep::LocationRequest(_)) {
            return false;
        }
        let moved = state.location_request.choose_state();
        state.sync_sub_flow();
        moved
    }

    pub async fn select_state(&self, option: StateOption) -> bool {
        let mut state = self.state.write().await;
        if !matches!(state.step, OnboardingStep::LocationRequest(_)) {
            return false;
        }
        let moved = state.location_request.select_state(option);
        state.sync_sub_flow();
        moved
    }

    /// Validate and save the location request. Failures keep the form open
    /// and set a notice; they never end the flow. At most one save is in
    /// flight.
    pub async fn submit_location_request(&self) -> Result<String, Notice> {
        let Some(_guard) = SubmitGuard::acquire(&self.requesting) else {
            warn!("Location request already in flight; ignoring");
            return Err(Notice::info("Your location request is already being sent"));
        };

        let request = {
            let mut state = self.state.write().await;
            if !matches!(state.step, OnboardingStep::LocationRequest(_)) {
                let notice = Notice::validation("Open the location request form first");
                state.notice = Some(notice.clone());
                return Err(notice);
            }
            match state.location_request.prepare_request(&self.user_id) {
                Ok(request) => request,
                Err(notice) => {
                    state.notice = Some(notice.clone());
                    return Err(notice);
                }
            }
        };

        let result = self.backend.save_location_request(&request).await;

        let mut state = self.state.write().await;
        match result {
            Ok(saved) => {
                info!(city = %request.city, state_id = %request.state_id, "Location request saved");
                let message = saved.message.clone();
                state.location_request.apply_saved(&request, saved);
                state.notice = None;
                state.sync_sub_flow();
                Ok(message)
            }
            Err(e) => {
                warn!(city = %request.city, error = %e, "Location request failed");
                let notice = Notice::error(e.message());
                state.notice = Some(notice.clone());
                Err(notice)
            }
        }
    }

    /// Dismiss the success screen: submit the profile with the requested
    /// city. Same action as advancing from step 5, and only available from
    /// the success screen.
    pub async fn close_location_request(&self) -> AdvanceOutcome {
        self.complete(Completion::RequestedOnly).await
    }

    // ── Completion ──────────────────────────────────────────────────

    /// Build the payload and perform the terminal write. At most one call is
    /// in flight; overlapping calls are blocked without touching the
    /// backend.
    pub async fn complete_profile(&self) -> AdvanceOutcome {
        self.complete(Completion::CurrentStep).await
    }

    async fn complete(&self, mode: Completion) -> AdvanceOutcome {
        let Some(_guard) = SubmitGuard::acquire(&self.submitting) else {
            warn!("Profile submission already in flight; ignoring");
            return AdvanceOutcome::Blocked(Notice::info("Your profile is already being created"));
        };

        let snapshot = {
            let state = self.state.read().await;
            location_source(&state, mode).map(|source| (state.step, state.session.clone(), source))
        };
        let (step, session, source) = match snapshot {
            Ok(snapshot) => snapshot,
            Err(notice) => return self.block(notice).await,
        };

        info!(session_id = %session.session_id, step = %step, "Creating profile");

        let photo_url = match self.resolve_photo(&session).await {
            Ok(url) => url,
            Err(notice) => return self.fail(notice).await,
        };

        let location = match source {
            LocationSource::Requested(location) => location,
            LocationSource::Session { area, state } => {
                match self.backend.resolve_location(&area).await {
                    Ok(ids) => ResolvedLocation {
                        state,
                        area,
                        state_id: ids.state_id,
                        area_id: ids.area_id,
                    },
                    Err(e) => {
                        warn!(area = %area, error = %e, "Location lookup failed");
                        return self.fail(Notice::error(e.message())).await;
                    }
                }
            }
        };

        let payload = session.build_payload(photo_url, location);
        match self.backend.complete_profile(&payload).await {
            Ok(message) => {
                let mut state = self.state.write().await;
                state.completed_at = Some(Utc::now());
                state.notice = None;
                if let OnboardingStep::LocationRequest(_) = state.step {
                    let _ = state.location_request.close_after_success();
                    state.step = OnboardingStep::Location;
                    state.recompute_validity();
                }
                info!(session_id = %session.session_id, "Profile created");
                AdvanceOutcome::Completed(message)
            }
            Err(e) => {
                warn!(session_id = %session.session_id, error = %e, "Profile creation failed");
                self.fail(Notice::error(e.message())).await
            }
        }
    }

    /// Upload the photo unless it already is, recording the remote URL so a
    /// retry does not upload again.
    async fn resolve_photo(&self, session: &OnboardingSession) -> Result<String, Notice> {
        let Some(local_ref) = session.photo.local_ref.clone() else {
            return Err(incomplete_notice(&OnboardingStep::Photo));
        };
        if session.photo.uploaded {
            return Ok(local_ref);
        }
        match self.backend.upload_photo(&local_ref).await {
            Ok(url) => {
                debug!(url = %url, "Photo uploaded");
                let mut state = self.state.write().await;
                if state.session.photo.local_ref.as_deref() == Some(local_ref.as_str()) {
                    state.session.photo.local_ref = Some(url.clone());
                    state.session.photo.uploaded = true;
                }
                Ok(url)
            }
            Err(e) => {
                warn!(error = %e, "Photo upload failed");
                Err(Notice::error(e.message()))
            }
        }
    }

    async fn block(&self, notice: Notice) -> AdvanceOutcome {
        self.state.write().await.notice = Some(notice.clone());
        AdvanceOutcome::Blocked(notice)
    }

    async fn fail(&self, notice: Notice) -> AdvanceOutcome {
        self.state.write().await.notice = Some(notice.clone());
        AdvanceOutcome::Failed(notice)
    }
}

/// Pick the payload's location source for the current step, or the notice
/// explaining why the step cannot submit.
fn location_source(state: &ControllerState, mode: Completion) -> Result<LocationSource, Notice> {
    let requested = OnboardingStep::LocationRequest(LocationRequestState::Success);
    if mode == Completion::RequestedOnly && state.step != requested {
        debug!(step = %state.step, "Close ignored: location request not saved");
        return Err(Notice::validation(OnboardingError::SubFlowNotReady.to_string()));
    }
    match state.step {
        OnboardingStep::Location => {
            let loc = &state.session.location;
            match (&loc.state, &loc.area) {
                (Some(st), Some(area)) if loc.is_complete() => Ok(LocationSource::Session {
                    area: area.clone(),
                    state: st.clone(),
                }),
                _ => Err(incomplete_notice(&OnboardingStep::Location)),
            }
        }
        OnboardingStep::LocationRequest(LocationRequestState::Success) => state
            .location_request
            .submitted()
            .map(|submitted| LocationSource::Requested(submitted.clone().into()))
            .ok_or_else(|| Notice::validation(OnboardingError::SubFlowNotReady.to_string())),
        OnboardingStep::LocationRequest(_) => Err(Notice::validation(
            OnboardingError::SubFlowNotReady.to_string(),
        )),
        other => Err(Notice::validation(
            OnboardingError::NotAtTerminalStep(other.number()).to_string(),
        )),
    }
}
