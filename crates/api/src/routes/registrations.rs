//! Registration routes: signup and the admin listing.

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use chrono::Utc;
use tracing::info;
use validator::Validate;

use domain::models::registration::{
    RegisterRequest, RegisterResponse, Registration, RegistrationsResponse, REGISTRATION_SOURCE,
};
use domain::models::StatusCategory;
use store::RegistrationStore;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_registration;

/// Attempts before giving up on finding an unused referral code.
const MAX_CODE_ATTEMPTS: usize = 16;

/// Register for early bird access.
///
/// POST /register
///
/// Idempotent per email: a repeat signup returns the already-issued
/// referral code with `alreadyRegistered: true` and no side effects.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, ApiError> {
    // An unparseable body (bad JSON, non-RFC-3339 timestamp) still gets
    // the `{error}` wire shape rather than the extractor's plain text.
    let Json(request) = body.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

    // Required-field check first so the landing page gets its combined
    // message; per-field validation (email format) follows.
    if request.full_name.trim().is_empty()
        || request.email.trim().is_empty()
        || request.current_status.trim().is_empty()
    {
        return Err(ApiError::Validation(
            "Full name, email, and current status are required".to_string(),
        ));
    }
    request.validate()?;

    let status: StatusCategory = request.current_status.parse().map_err(|_| {
        ApiError::Validation(format!(
            "Unknown current status: {}",
            request.current_status
        ))
    })?;

    let email = request.email.to_lowercase();

    if let Some(existing) = state.store.find_by_email(&email).await? {
        return Ok(Json(RegisterResponse {
            success: true,
            message: "You're already registered!".to_string(),
            already_registered: Some(true),
            referral_code: existing.referral_code,
        }));
    }

    let referral_code = generate_unique_code(&state.store, &request.full_name).await?;

    // Credit the referrer, if the inbound code resolves to anyone.
    let mut referred_by = None;
    if let Some(inbound) = request
        .referral_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
    {
        if let Some(referrer) = state.store.find_by_referral_code(inbound).await? {
            state
                .store
                .increment_referral_count(&referrer.email)
                .await?;
            referred_by = Some(referrer.email);
        }
    }

    let record = Registration {
        full_name: request.full_name,
        email,
        city: request.city.unwrap_or_default(),
        current_status: status,
        timestamp: request.timestamp.unwrap_or_else(Utc::now),
        source: REGISTRATION_SOURCE.to_string(),
        referral_code: referral_code.clone(),
        referred_by,
        referral_count: 0,
    };

    state.store.insert_record(&record).await?;
    state.store.append_log_entry(&record).await?;
    let signups_today = state
        .store
        .increment_daily_counter(Utc::now().date_naive())
        .await?;

    record_registration(record.referred_by.is_some());
    info!(
        email = %record.email,
        status = %record.current_status,
        city = %record.city,
        referred_by = ?record.referred_by,
        signups_today,
        "New early bird registration"
    );

    Ok(Json(RegisterResponse {
        success: true,
        message: "Successfully registered for early bird access!".to_string(),
        already_registered: None,
        referral_code,
    }))
}

/// List all registrations (for admin).
///
/// GET /registrations
///
/// Returns the append-only log entries in store iteration order; no
/// pagination.
pub async fn list_registrations(
    State(state): State<AppState>,
) -> Result<Json<RegistrationsResponse>, ApiError> {
    let registrations = state.store.list_log_entries().await?;
    Ok(Json(RegistrationsResponse {
        success: true,
        count: registrations.len(),
        registrations,
    }))
}

/// Draws referral-code candidates until one is unused by any existing
/// record. Collisions are rare (46656 suffixes per name prefix), so the
/// bound exists only to turn a pathological store state into a 500.
async fn generate_unique_code(
    store: &RegistrationStore,
    full_name: &str,
) -> Result<String, ApiError> {
    for _ in 0..MAX_CODE_ATTEMPTS {
        let candidate = {
            let mut rng = rand::thread_rng();
            shared::referral::generate_code(full_name, &mut rng)
        };
        if !store.referral_code_in_use(&candidate).await? {
            return Ok(candidate);
        }
    }
    Err(ApiError::Internal(
        "could not allocate an unused referral code".to_string(),
    ))
}
