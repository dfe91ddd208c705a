use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use rally_onboard::config::OnboardingConfig;
use rally_onboard::error::ServiceError;
use rally_onboard::onboarding::{
    AdvanceOutcome, LocationIds, LocationRequestPayload, OnboardingBackend, OnboardingController,
    ProfilePayload, Role, SavedLocationRequest, StateOption,
};
use rally_onboard::picker::{DatePicker, DateReel, offset_for_index};

/// Backend that accepts everything and logs what it was sent.
struct DemoBackend;

#[async_trait]
impl OnboardingBackend for DemoBackend {
    async fn upload_photo(&self, local_ref: &str) -> Result<String, ServiceError> {
        Ok(format!("https://cdn.example.com/avatars/{}-{local_ref}", Uuid::new_v4()))
    }

    async fn resolve_location(&self, area_name: &str) -> Result<LocationIds, ServiceError> {
        Ok(LocationIds {
            state_id: "state-demo".to_string(),
            area_id: format!("area-{}", area_name.to_lowercase().replace(' ', "-")),
        })
    }

    async fn complete_profile(&self, payload: &ProfilePayload) -> Result<String, ServiceError> {
        let json = serde_json::to_string_pretty(payload)
            .map_err(|e| ServiceError::CompleteProfile(e.to_string()))?;
        eprintln!("{json}");
        Ok(format!("Welcome, {}!", payload.first_name))
    }

    async fn save_location_request(
        &self,
        request: &LocationRequestPayload,
    ) -> Result<SavedLocationRequest, ServiceError> {
        Ok(SavedLocationRequest {
            message: format!("We'll add {} soon", request.city),
            city_id: Uuid::new_v4().to_string(),
        })
    }
}

#[tokio::main]
async fn main() -> rally_onboard::error::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = OnboardingConfig::from_env()?;
    let request_city = std::env::var("RALLY_DEMO_REQUEST_CITY").ok();

    eprintln!("Rally onboarding demo v{}", env!("CARGO_PKG_VERSION"));

    let controller = OnboardingController::new(Arc::new(DemoBackend), &config);

    // ── Step 1: photo ───────────────────────────────────────────────
    controller.set_photo("selfie.jpg").await;
    report(controller.advance().await);

    // ── Step 2: profile, birth date from the wheel picker ───────────
    controller.set_first_name("Jordan").await;
    controller.set_last_name("Avery").await;
    controller.set_role(Role::Coach).await;

    let mut picker = DatePicker::open_today(&config.picker, None);
    let year_index = picker.years().len().saturating_sub(30);
    picker.on_scroll(DateReel::Year, offset_for_index(year_index, config.picker.row_height));
    picker.tap_commit(DateReel::Year);
    picker.on_momentum_end(DateReel::Month, offset_for_index(1, config.picker.row_height));
    let birth_date = picker.save();
    eprintln!("Picked birth date {birth_date}");
    controller.set_birth_date(birth_date).await;
    report(controller.advance().await);

    // ── Step 3: interests ───────────────────────────────────────────
    controller.toggle_interest("Baseball").await;
    controller.toggle_interest("Soccer").await;
    report(controller.advance().await);

    // ── Step 4 (or 5): location ─────────────────────────────────────
    let outcome = match request_city {
        Some(city) => {
            controller.request_location().await;
            controller.set_request_city(city).await;
            controller.choose_state().await;
            controller
                .select_state(StateOption {
                    id: "state-demo".to_string(),
                    name: "Demo State".to_string(),
                })
                .await;
            if let Err(notice) = controller.submit_location_request().await {
                return Err(ServiceError::SaveLocation(notice.message).into());
            }
            controller.close_location_request().await
        }
        None => {
            controller.set_location_state("Texas").await;
            controller.set_location_area("Austin").await;
            controller.advance().await
        }
    };
    report(outcome.clone());

    match outcome {
        AdvanceOutcome::Failed(notice) => Err(ServiceError::CompleteProfile(notice.message).into()),
        _ => Ok(()),
    }
}

fn report(outcome: AdvanceOutcome) {
    match outcome {
        AdvanceOutcome::Moved(step) => eprintln!("-> step {} ({step})", step.number()),
        AdvanceOutcome::Blocked(notice) => eprintln!("blocked: {notice}"),
        AdvanceOutcome::Completed(message) => eprintln!("done: {message}"),
        AdvanceOutcome::Failed(notice) => eprintln!("failed: {notice}"),
    }
}
