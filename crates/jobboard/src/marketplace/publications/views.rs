//! Read-side projections that join publication references against the user directory.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use super::domain::{
    AcceptedTerms, Candidature, CandidatureId, CandidatureStatus, Publication, PublicationId,
    PublicationStatus, UserId,
};
use super::repository::{UserDirectory, UserProfile};

/// Which references a read resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    ClientOnly,
    ClientAndCandidates,
}

/// A user reference, resolved to a profile summary when the directory can provide one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UserRef<T> {
    Resolved(T),
    Unresolved(UserId),
}

impl<T> UserRef<T> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, UserRef::Resolved(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientSummary {
    pub id: UserId,
    pub nom: String,
    pub prenom: String,
    pub email: String,
}

impl From<&UserProfile> for ClientSummary {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id.clone(),
            nom: profile.nom.clone(),
            prenom: profile.prenom.clone(),
            email: profile.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateSummary {
    pub id: UserId,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialite: Option<String>,
}

impl From<&UserProfile> for CandidateSummary {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id.clone(),
            nom: profile.nom.clone(),
            prenom: profile.prenom.clone(),
            email: profile.email.clone(),
            specialite: profile.specialite.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidatureView {
    pub id: CandidatureId,
    #[serde(rename = "candidatId")]
    pub candidate: UserRef<CandidateSummary>,
    #[serde(rename = "dateCandidature")]
    pub submitted_at: DateTime<Utc>,
    pub message: String,
    #[serde(rename = "prixPropose", skip_serializing_if = "Option::is_none")]
    pub proposed_price: Option<f64>,
    #[serde(rename = "delaiPropose", skip_serializing_if = "Option::is_none")]
    pub proposed_delay_days: Option<u32>,
    #[serde(rename = "statut", skip_serializing_if = "Option::is_none")]
    pub status: Option<CandidatureStatus>,
}

/// Publication as returned by read operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicationView {
    pub id: PublicationId,
    #[serde(rename = "titre")]
    pub title: String,
    pub description: String,
    pub client: UserRef<ClientSummary>,
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
    pub candidatures: Vec<CandidatureView>,
}

/// Per-read cache so a candidate appearing on several publications is looked up once.
pub struct ProfileResolver<'a, D: ?Sized> {
    directory: &'a D,
    cache: HashMap<UserId, Option<UserProfile>>,
}

impl<'a, D> ProfileResolver<'a, D>
where
    D: UserDirectory + ?Sized,
{
    pub fn new(directory: &'a D) -> Self {
        Self {
            directory,
            cache: HashMap::new(),
        }
    }

    fn profile(&mut self, id: &UserId) -> Option<&UserProfile> {
        if !self.cache.contains_key(id) {
            let resolved = match self.directory.resolve_profile(id) {
                Ok(profile) => profile,
                Err(error) => {
                    warn!(user_id = id.as_str(), %error, "profile resolution failed");
                    None
                }
            };
            self.cache.insert(id.clone(), resolved);
        }
        self.cache.get(id).and_then(Option::as_ref)
    }

    fn reference<T>(&mut self, id: &UserId) -> UserRef<T>
    where
        T: for<'p> From<&'p UserProfile>,
    {
        match self.profile(id) {
            Some(profile) => UserRef::Resolved(T::from(profile)),
            None => UserRef::Unresolved(id.clone()),
        }
    }

    pub fn publication(&mut self, publication: Publication, depth: Resolution) -> PublicationView {
        let client: UserRef<ClientSummary> = self.reference(&publication.client_id);
        let candidatures = publication
            .candidatures
            .into_iter()
            .map(|candidature| self.candidature(candidature, depth))
            .collect();

        PublicationView {
            id: publication.id,
            title: publication.title,
            description: publication.description,
            client,
            required_specialty: publication.required_specialty,
            budget: publication.budget,
            created_at: publication.created_at,
            status: publication.status,
            accepted: publication.accepted,
            candidatures,
        }
    }

    fn candidature(&mut self, candidature: Candidature, depth: Resolution) -> CandidatureView {
        let candidate: UserRef<CandidateSummary> = match depth {
            Resolution::ClientAndCandidates => self.reference(&candidature.candidate_id),
            Resolution::ClientOnly => UserRef::Unresolved(candidature.candidate_id),
        };

        CandidatureView {
            id: candidature.id,
            candidate,
            submitted_at: candidature.submitted_at,
            message: candidature.message,
            proposed_price: candidature.proposed_price,
            proposed_delay_days: candidature.proposed_delay_days,
            status: candidature.status,
        }
    }
}
