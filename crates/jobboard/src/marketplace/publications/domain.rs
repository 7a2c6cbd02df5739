use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for posted publications.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicationId(pub String);

/// Identifier of a candidature, unique within its parent publication.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidatureId(pub String);

/// Opaque reference into the user directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Lifecycle status of a publication. Only `Open -> InProgress` is reachable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublicationStatus {
    #[default]
    #[serde(rename = "Ouvert")]
    Open,
    #[serde(rename = "En cours")]
    InProgress,
    #[serde(rename = "Terminé")]
    Completed,
}

impl PublicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PublicationStatus::Open => "Ouvert",
            PublicationStatus::InProgress => "En cours",
            PublicationStatus::Completed => "Terminé",
        }
    }
}

/// Status carried by a candidature once it has been picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidatureStatus {
    #[serde(rename = "Acceptée")]
    Accepted,
}

/// An application embedded in exactly one publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidature {
    pub id: CandidatureId,
    #[serde(rename = "candidatId")]
    pub candidate_id: UserId,
    #[serde(rename = "dateCandidature")]
    pub submitted_at: DateTime<Utc>,
    pub message: String,
    #[serde(rename = "prixPropose", skip_serializing_if = "Option::is_none")]
    pub proposed_price: Option<f64>,
    /// Proposed turnaround in whole days.
    #[serde(rename = "delaiPropose", skip_serializing_if = "Option::is_none")]
    pub proposed_delay_days: Option<u32>,
    #[serde(rename = "statut", skip_serializing_if = "Option::is_none")]
    pub status: Option<CandidatureStatus>,
}

impl Candidature {
    pub fn is_accepted(&self) -> bool {
        matches!(self.status, Some(CandidatureStatus::Accepted))
    }
}

/// Terms frozen from the winning candidature. Written once, as a single value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedTerms {
    #[serde(rename = "candidatureAcceptee")]
    pub candidate_id: UserId,
    #[serde(rename = "prixFinal")]
    pub final_price: Option<f64>,
    #[serde(rename = "delaiFinal")]
    pub final_delay_days: Option<u32>,
}

impl AcceptedTerms {
    pub fn from_candidature(candidature: &Candidature) -> Self {
        Self {
            candidate_id: candidature.candidate_id.clone(),
            final_price: candidature.proposed_price,
            final_delay_days: candidature.proposed_delay_days,
        }
    }
}

/// A posted work offer and the candidatures it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub id: PublicationId,
    #[serde(rename = "titre")]
    pub title: String,
    pub description: String,
    #[serde(rename = "client")]
    pub client_id: UserId,
    #[serde(rename = "specialiteRequise", skip_serializing_if = "Option::is_none")]
    pub required_specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(rename = "dateCreation")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "statut")]
    pub status: PublicationStatus,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub accepted: Option<AcceptedTerms>,
    pub candidatures: Vec<Candidature>,
}

impl Publication {
    pub fn is_open(&self) -> bool {
        self.status == PublicationStatus::Open
    }

    pub fn has_candidate(&self, candidate_id: &UserId) -> bool {
        self.candidatures
            .iter()
            .any(|candidature| &candidature.candidate_id == candidate_id)
    }
}

/// Client request to post a publication. Required fields are checked by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicationDraft {
    #[serde(default, rename = "titre")]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "clientId")]
    pub client_id: Option<String>,
    #[serde(default, rename = "specialiteRequise")]
    pub required_specialty: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
}

/// Freelancer request to apply to a publication.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidatureSubmission {
    #[serde(default, rename = "candidatId")]
    pub candidate_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "prixPropose")]
    pub proposed_price: Option<f64>,
    #[serde(default, rename = "delaiPropose")]
    pub proposed_delay_days: Option<u32>,
}

/// Validated input for a new candidature.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCandidature {
    pub candidate_id: UserId,
    pub message: String,
    pub proposed_price: Option<f64>,
    pub proposed_delay_days: Option<u32>,
}

/// Allow-listed edits to an open publication. Absent fields are left untouched; an explicit
/// `null` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublicationPatch {
    #[serde(default, rename = "titre", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        rename = "specialiteRequise",
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub required_specialty: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub budget: Option<Option<f64>>,
}

impl PublicationPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.required_specialty.is_none()
            && self.budget.is_none()
    }
}

/// Present-but-null becomes `Some(None)` so it can be told apart from an absent field.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
