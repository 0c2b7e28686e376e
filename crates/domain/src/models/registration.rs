//! Registration domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Marker recorded on every registration for provenance.
pub const REGISTRATION_SOURCE: &str = "early-bird-landing";

/// Where the registrant currently is in their career.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCategory {
    Student,
    #[serde(rename = "Fresh Graduate")]
    FreshGraduate,
    #[serde(rename = "Job Seeker")]
    JobSeeker,
    #[serde(rename = "Working Professional")]
    WorkingProfessional,
    #[serde(rename = "Career Switcher")]
    CareerSwitcher,
    #[serde(rename = "HR/Recruiter")]
    HrRecruiter,
}

impl StatusCategory {
    pub const ALL: [StatusCategory; 6] = [
        StatusCategory::Student,
        StatusCategory::FreshGraduate,
        StatusCategory::JobSeeker,
        StatusCategory::WorkingProfessional,
        StatusCategory::CareerSwitcher,
        StatusCategory::HrRecruiter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCategory::Student => "Student",
            StatusCategory::FreshGraduate => "Fresh Graduate",
            StatusCategory::JobSeeker => "Job Seeker",
            StatusCategory::WorkingProfessional => "Working Professional",
            StatusCategory::CareerSwitcher => "Career Switcher",
            StatusCategory::HrRecruiter => "HR/Recruiter",
        }
    }
}

impl std::fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StatusCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusCategory::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(())
    }
}

/// A stored early-bird registration.
///
/// Keyed in the store by the lowercased email; mutated in place only to
/// bump `referral_count`, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    /// Empty string when the registrant declined to share a city.
    pub city: String,
    pub current_status: StatusCategory,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    /// Code issued to this registrant for crediting referrals.
    pub referral_code: String,
    /// Email of the registrant whose code was used at signup, if any.
    pub referred_by: Option<String>,
    pub referral_count: i64,
}

/// Incoming registration request body.
///
/// The three required fields default to empty strings so that missing JSON
/// keys reach validation instead of failing deserialization; the combined
/// error message matches what the landing page expects.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(custom(function = shared::validation::validate_required))]
    pub full_name: String,

    #[serde(default)]
    #[validate(custom(function = shared::validation::validate_email))]
    pub email: String,

    pub city: Option<String>,

    /// Validated against [`StatusCategory`] in the handler so an unknown
    /// value yields a 400 rather than a body-deserialization rejection.
    #[serde(default)]
    #[validate(custom(function = shared::validation::validate_required))]
    pub current_status: String,

    pub timestamp: Option<DateTime<Utc>>,

    /// Someone else's referral code, crediting them for this signup.
    pub referral_code: Option<String>,
}

/// Response to a registration attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_registered: Option<bool>,
    pub referral_code: String,
}

/// Response for the admin listing endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationsResponse {
    pub success: bool,
    pub count: usize,
    pub registrations: Vec<Registration>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_round_trips_through_display() {
        for status in StatusCategory::ALL {
            assert_eq!(StatusCategory::from_str(status.as_str()), Ok(status));
        }
    }

    #[test]
    fn test_status_rejects_unknown_values() {
        assert!(StatusCategory::from_str("Retired").is_err());
        assert!(StatusCategory::from_str("student").is_err());
        assert!(StatusCategory::from_str("").is_err());
    }

    #[test]
    fn test_status_serializes_to_display_strings() {
        let json = serde_json::to_string(&StatusCategory::HrRecruiter).unwrap();
        assert_eq!(json, "\"HR/Recruiter\"");
        let json = serde_json::to_string(&StatusCategory::FreshGraduate).unwrap();
        assert_eq!(json, "\"Fresh Graduate\"");
    }

    #[test]
    fn test_registration_serializes_camel_case() {
        let record = Registration {
            full_name: "Asha Rao".into(),
            email: "asha@x.com".into(),
            city: "Pune".into(),
            current_status: StatusCategory::Student,
            timestamp: Utc::now(),
            source: REGISTRATION_SOURCE.into(),
            referral_code: "ASH4K9".into(),
            referred_by: None,
            referral_count: 0,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["fullName"], "Asha Rao");
        assert_eq!(json["currentStatus"], "Student");
        assert_eq!(json["referralCode"], "ASH4K9");
        assert_eq!(json["referralCount"], 0);
        assert!(json["referredBy"].is_null());
        assert_eq!(json["source"], "early-bird-landing");
    }

    #[test]
    fn test_register_request_missing_fields_fail_validation() {
        let req: RegisterRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_valid() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "fullName": "Asha Rao",
            "email": "asha@x.com",
            "city": "Pune",
            "currentStatus": "Student"
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert!(req.referral_code.is_none());
    }

    #[test]
    fn test_register_request_bad_email_fails_validation() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "fullName": "Asha Rao",
            "email": "not-an-email",
            "currentStatus": "Student"
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_response_skips_absent_already_registered() {
        let response = RegisterResponse {
            success: true,
            message: "ok".into(),
            already_registered: None,
            referral_code: "ASH4K9".into(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("alreadyRegistered").is_none());
    }
}
