use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_utils::ids::{generate_id, DOCTOR_ID_PREFIX};

/// A clinic department as stored, doctors embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub doctors: Vec<Doctor>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub department_id: String,
}

impl Department {
    /// Embedded doctors with ids filled in and ownership pinned to this department.
    pub fn normalized_doctors(&self) -> Vec<Doctor> {
        self.doctors
            .iter()
            .cloned()
            .map(|mut doctor| {
                if doctor.id.trim().is_empty() {
                    doctor.id = generate_id(DOCTOR_ID_PREFIX);
                }
                doctor.department_id = self.id.clone();
                doctor
            })
            .collect()
    }
}

#[derive(Error, Debug, Clone)]
pub enum DepartmentError {
    #[error("Authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("Department query failed: {0}")]
    QueryFailed(String),
}
