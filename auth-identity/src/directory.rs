//! Public doctor directory
//!
//! Read-only catalog of bookable doctors with specialty/name search.
//! Directory reads are unauthenticated; the profiles carry the
//! consultation fee that seeds new appointments.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{IdentityError, Result};

/// Bookable time slots offered on any working day.
const DAILY_SLOTS: &[&str] = &[
    "09:00 AM", "10:00 AM", "11:00 AM", "01:00 PM", "02:00 PM", "03:00 PM", "04:00 PM",
];

/// A bookable doctor as shown to patients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub specialty: String,
    pub location: String,
    pub bio: String,
    pub experience: String,
    pub languages: Vec<String>,
    pub rating: f32,
    pub reviews: u32,
    pub consultation_fee: Decimal,
    pub available_days: Vec<String>,
    pub services: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<String>,
}

impl DoctorProfile {
    /// Whether the doctor takes appointments on the given date, and the
    /// slots offered when they do.
    pub fn availability_on(&self, date: NaiveDate) -> DoctorAvailability {
        let weekday = date.format("%A").to_string();
        if !self.available_days.iter().any(|d| d == &weekday) {
            return DoctorAvailability {
                available: false,
                message: Some(format!(
                    "Dr. {} is not available on {}s",
                    self.last_name, weekday
                )),
                slots: None,
            };
        }
        DoctorAvailability {
            available: true,
            message: None,
            slots: Some(DAILY_SLOTS.iter().map(|s| (*s).to_string()).collect()),
        }
    }
}

/// Availability verdict for one doctor on one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorAvailability {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slots: Option<Vec<String>>,
}

/// Directory search filters; all optional, combined with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorSearchFilters {
    pub specialty: Option<String>,
    pub name: Option<String>,
}

/// Partial profile update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfilePatch {
    pub specialty: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub experience: Option<String>,
    pub languages: Option<Vec<String>>,
    pub consultation_fee: Option<Decimal>,
    pub services: Option<Vec<String>>,
    pub available_days: Option<Vec<String>>,
    pub working_hours: Option<String>,
}

/// Contract for the doctor catalog. Reads are public; writes are
/// ownership-checked by the HTTP layer before they reach the directory.
#[async_trait]
pub trait DoctorDirectory: Send + Sync {
    async fn search(&self, filters: DoctorSearchFilters) -> Result<Vec<DoctorProfile>>;
    async fn find_by_id(&self, id: Uuid) -> Result<DoctorProfile>;
    async fn add(&self, profile: DoctorProfile) -> Result<DoctorProfile>;
    /// Merge the patch into the stored profile, `DoctorNotFound` if absent.
    async fn update(&self, id: Uuid, patch: DoctorProfilePatch) -> Result<DoctorProfile>;
}

/// In-memory directory, optionally pre-seeded with a demo catalog.
#[derive(Default)]
pub struct InMemoryDoctorDirectory {
    doctors: Arc<RwLock<Vec<DoctorProfile>>>,
}

impl InMemoryDoctorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory pre-populated with the demo catalog.
    pub async fn with_seed_catalog() -> Self {
        let directory = Self::new();
        {
            let mut doctors = directory.doctors.write().await;
            doctors.extend(seed_catalog());
        }
        directory
    }
}

#[async_trait]
impl DoctorDirectory for InMemoryDoctorDirectory {
    async fn search(&self, filters: DoctorSearchFilters) -> Result<Vec<DoctorProfile>> {
        let doctors = self.doctors.read().await;
        let results = doctors
            .iter()
            .filter(|d| match &filters.specialty {
                Some(specialty) => d.specialty.eq_ignore_ascii_case(specialty),
                None => true,
            })
            .filter(|d| match &filters.name {
                Some(name) => {
                    let needle = name.to_lowercase();
                    format!("{} {}", d.first_name, d.last_name)
                        .to_lowercase()
                        .contains(&needle)
                }
                None => true,
            })
            .cloned()
            .collect();
        Ok(results)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<DoctorProfile> {
        let doctors = self.doctors.read().await;
        doctors
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or(IdentityError::DoctorNotFound)
    }

    async fn add(&self, profile: DoctorProfile) -> Result<DoctorProfile> {
        let mut doctors = self.doctors.write().await;
        doctors.push(profile.clone());
        Ok(profile)
    }

    async fn update(&self, id: Uuid, patch: DoctorProfilePatch) -> Result<DoctorProfile> {
        let mut doctors = self.doctors.write().await;
        let doctor = doctors
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(IdentityError::DoctorNotFound)?;

        if let Some(specialty) = patch.specialty {
            doctor.specialty = specialty;
        }
        if let Some(location) = patch.location {
            doctor.location = location;
        }
        if let Some(bio) = patch.bio {
            doctor.bio = bio;
        }
        if let Some(experience) = patch.experience {
            doctor.experience = experience;
        }
        if let Some(languages) = patch.languages {
            doctor.languages = languages;
        }
        if let Some(fee) = patch.consultation_fee {
            doctor.consultation_fee = fee;
        }
        if let Some(services) = patch.services {
            doctor.services = services;
        }
        if let Some(days) = patch.available_days {
            doctor.available_days = days;
        }
        if let Some(hours) = patch.working_hours {
            doctor.working_hours = Some(hours);
        }
        Ok(doctor.clone())
    }
}

fn seed_catalog() -> Vec<DoctorProfile> {
    vec![
        DoctorProfile {
            id: Uuid::new_v4(),
            first_name: "Sarah".to_string(),
            last_name: "Johnson".to_string(),
            email: "sarah.johnson@example.com".to_string(),
            specialty: "Cardiology".to_string(),
            location: "New York Medical Center, NY".to_string(),
            bio: "Board-certified cardiologist with over 15 years of experience."
                .to_string(),
            experience: "15+ years".to_string(),
            languages: vec!["English".to_string(), "Spanish".to_string()],
            rating: 4.9,
            reviews: 124,
            consultation_fee: Decimal::from(150),
            available_days: ["Monday", "Tuesday", "Wednesday", "Friday"]
                .iter()
                .map(|d| (*d).to_string())
                .collect(),
            services: vec![
                "Cardiac Consultation".to_string(),
                "Echocardiography".to_string(),
                "Stress Testing".to_string(),
            ],
            working_hours: None,
        },
        DoctorProfile {
            id: Uuid::new_v4(),
            first_name: "David".to_string(),
            last_name: "Chen".to_string(),
            email: "david.chen@example.com".to_string(),
            specialty: "Dermatology".to_string(),
            location: "San Francisco Medical Group, CA".to_string(),
            bio: "Board-certified dermatologist specializing in medical and cosmetic dermatology."
                .to_string(),
            experience: "12+ years".to_string(),
            languages: vec!["English".to_string(), "Mandarin".to_string()],
            rating: 4.8,
            reviews: 98,
            consultation_fee: Decimal::from(130),
            available_days: ["Monday", "Wednesday", "Thursday", "Friday"]
                .iter()
                .map(|d| (*d).to_string())
                .collect(),
            services: vec![
                "Skin Cancer Screening".to_string(),
                "Acne Treatment".to_string(),
                "Laser Therapy".to_string(),
            ],
            working_hours: None,
        },
    ]
}
