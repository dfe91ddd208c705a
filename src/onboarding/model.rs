//! Onboarding session data and the submission payload built from it.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sports offered on the interests step.
pub const DEFAULT_INTERESTS: &[&str] = &[
    "Baseball",
    "Basketball",
    "Football",
    "Soccer",
    "Softball",
    "Volleyball",
    "Lacrosse",
    "Hockey",
    "Tennis",
    "Track & Field",
    "Swimming",
    "Wrestling",
];

/// What the user does in their sports community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Athlete,
    Parent,
    Coach,
    Trainer,
    Other,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Athlete => "athlete",
            Self::Parent => "parent",
            Self::Coach => "coach",
            Self::Trainer => "trainer",
            Self::Other => "other",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "athlete" => Ok(Self::Athlete),
            "parent" => Ok(Self::Parent),
            "coach" => Ok(Self::Coach),
            "trainer" => Ok(Self::Trainer),
            "other" => Ok(Self::Other),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// A calendar date as picked on the wheel. Month and day are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl BirthDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// The date as a `NaiveDate`, or `None` if it does not exist.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl From<NaiveDate> for BirthDate {
    fn from(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self::new(date.year(), date.month(), date.day())
    }
}

impl std::fmt::Display for BirthDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Profile photo selected on step 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoData {
    /// Whether `local_ref` already points at the uploaded copy.
    pub uploaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_ref: Option<String>,
}

/// Personal facts collected on step 2.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileData {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<BirthDate>,
}

/// Home location chosen on step 4.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

impl LocationData {
    /// Both a state and an area are selected and non-blank.
    pub fn is_complete(&self) -> bool {
        is_filled(self.state.as_deref()) && is_filled(self.area.as_deref())
    }
}

pub(crate) fn is_filled(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Everything collected during one onboarding attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingSession {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub photo: PhotoData,
    pub profile: ProfileData,
    pub interests: BTreeSet<String>,
    pub location: LocationData,
}

impl Default for OnboardingSession {
    fn default() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            photo: PhotoData::default(),
            profile: ProfileData::default(),
            interests: BTreeSet::new(),
            location: LocationData::default(),
        }
    }
}

impl OnboardingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the interest if absent, remove it if present. Returns whether it
    /// is selected afterwards.
    pub fn toggle_interest(&mut self, interest: &str) -> bool {
        if self.interests.remove(interest) {
            false
        } else {
            self.interests.insert(interest.to_string());
            true
        }
    }

    /// Assemble the submission payload. `photo_url` and `location` are the
    /// resolved values the collaborators returned.
    pub fn build_payload(&self, photo_url: String, location: ResolvedLocation) -> ProfilePayload {
        ProfilePayload {
            photo_url,
            first_name: self.profile.first_name.trim().to_string(),
            last_name: self.profile.last_name.trim().to_string(),
            role: self.profile.role,
            birth_date: self.profile.birth_date,
            interests: self.interests.iter().cloned().collect(),
            location,
        }
    }
}

/// A location with the backend identifiers it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub state: String,
    pub area: String,
    pub state_id: String,
    pub area_id: String,
}

/// The single terminal write sent to the profile service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePayload {
    pub photo_url: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<Role>,
    pub birth_date: Option<BirthDate>,
    pub interests: Vec<String>,
    pub location: ResolvedLocation,
}
