use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::candidatures::{self, RegistryViolation};
use super::domain::{
    Candidature, CandidatureId, CandidatureSubmission, NewCandidature, Publication,
    PublicationDraft, PublicationId, PublicationPatch, PublicationStatus, UserId,
};
use super::repository::{
    DirectoryError, PublicationFilter, PublicationRepository, RepositoryError, UserDirectory,
};
use super::views::{ProfileResolver, PublicationView, Resolution};

/// Lifecycle manager for publications and the candidatures embedded in them.
pub struct PublicationService<R, D> {
    repository: Arc<R>,
    directory: Arc<D>,
}

static PUBLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static CANDIDATURE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_publication_id() -> PublicationId {
    let id = PUBLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PublicationId(format!("pub-{id:06}"))
}

fn next_candidature_id() -> CandidatureId {
    let id = CANDIDATURE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CandidatureId(format!("cand-{id:06}"))
}

/// Trimmed, non-empty text or `None`.
fn required_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn check_amount(field: &str, value: Option<f64>) -> Result<(), PublicationServiceError> {
    match value {
        Some(amount) if !amount.is_finite() || amount < 0.0 => Err(
            PublicationServiceError::Validation(format!("{field} must be a non-negative number")),
        ),
        _ => Ok(()),
    }
}

impl<R, D> PublicationService<R, D>
where
    R: PublicationRepository + 'static,
    D: UserDirectory + 'static,
{
    pub fn new(repository: Arc<R>, directory: Arc<D>) -> Self {
        Self {
            repository,
            directory,
        }
    }

    /// Post a new publication on behalf of an existing client.
    pub fn create(&self, draft: PublicationDraft) -> Result<Publication, PublicationServiceError> {
        let (Some(title), Some(description), Some(client_id)) = (
            required_text(draft.title),
            required_text(draft.description),
            required_text(draft.client_id),
        ) else {
            return Err(PublicationServiceError::Validation(
                "Missing required fields (titre, description, clientId)".to_string(),
            ));
        };
        check_amount("budget", draft.budget)?;

        let client_id = UserId(client_id);
        if !self.directory.exists(&client_id)? {
            warn!(client_id = client_id.as_str(), "publication refused for unknown client");
            return Err(PublicationServiceError::Forbidden);
        }

        let publication = Publication {
            id: next_publication_id(),
            title,
            description,
            client_id,
            required_specialty: required_text(draft.required_specialty),
            budget: draft.budget,
            created_at: Utc::now(),
            status: PublicationStatus::Open,
            accepted: None,
            candidatures: Vec::new(),
        };

        let stored = self.repository.insert(publication)?;
        info!(publication_id = %stored.id.0, client_id = stored.client_id.as_str(), "publication created");
        Ok(stored)
    }

    /// Append a candidature, refusing a second one from the same candidate.
    pub fn apply(
        &self,
        publication_id: &PublicationId,
        submission: CandidatureSubmission,
    ) -> Result<Publication, PublicationServiceError> {
        let (Some(candidate_id), Some(message)) = (
            required_text(submission.candidate_id),
            required_text(submission.message),
        ) else {
            return Err(PublicationServiceError::Validation(
                "Missing required fields (candidatId, message)".to_string(),
            ));
        };
        check_amount("prixPropose", submission.proposed_price)?;

        let candidature = NewCandidature {
            candidate_id: UserId(candidate_id),
            message,
            proposed_price: submission.proposed_price,
            proposed_delay_days: submission.proposed_delay_days,
        };
        let candidate = candidature.candidate_id.clone();

        let updated = self
            .repository
            .modify(publication_id, |publication| {
                candidatures::register(
                    publication,
                    next_candidature_id(),
                    candidature,
                    Utc::now(),
                )
                .map_err(PublicationServiceError::from)
            })
            .inspect_err(|error| {
                if matches!(error, PublicationServiceError::DuplicateApplication) {
                    warn!(publication_id = %publication_id.0, candidate_id = candidate.as_str(), "duplicate application rejected");
                }
            })?;

        info!(
            publication_id = %updated.id.0,
            candidate_id = candidate.as_str(),
            candidatures = updated.candidatures.len(),
            "application submitted"
        );
        Ok(updated)
    }

    /// Find one candidature inside the named publication.
    pub fn candidature(
        &self,
        publication_id: &PublicationId,
        candidature_id: &CandidatureId,
    ) -> Result<Candidature, PublicationServiceError> {
        let publication = self
            .repository
            .fetch(publication_id)?
            .ok_or(PublicationServiceError::NotFound(MissingEntity::Publication))?;

        candidatures::lookup(&publication, candidature_id)
            .cloned()
            .ok_or(PublicationServiceError::NotFound(MissingEntity::Candidature))
    }

    /// Pick the winning candidature and move the publication to `En cours`.
    pub fn accept(
        &self,
        publication_id: &PublicationId,
        candidature_id: &CandidatureId,
    ) -> Result<Publication, PublicationServiceError> {
        let updated = self
            .repository
            .modify(publication_id, |publication| {
                candidatures::accept(publication, candidature_id)
                    .map(|_| ())
                    .map_err(PublicationServiceError::from)
            })
            .inspect_err(|error| {
                if matches!(error, PublicationServiceError::Conflict(_)) {
                    warn!(publication_id = %publication_id.0, candidature_id = %candidature_id.0, "repeat acceptance rejected");
                }
            })?;

        info!(
            publication_id = %updated.id.0,
            candidature_id = %candidature_id.0,
            status = updated.status.label(),
            "candidature accepted"
        );
        Ok(updated)
    }

    pub fn get(&self, id: &PublicationId) -> Result<PublicationView, PublicationServiceError> {
        let publication = self
            .repository
            .fetch(id)?
            .ok_or(PublicationServiceError::NotFound(MissingEntity::Publication))?;

        let mut resolver = ProfileResolver::new(self.directory.as_ref());
        Ok(resolver.publication(publication, Resolution::ClientAndCandidates))
    }

    pub fn list_all(&self) -> Result<Vec<PublicationView>, PublicationServiceError> {
        self.list(&PublicationFilter::All, Resolution::ClientOnly)
    }

    pub fn list_by_client(
        &self,
        client_id: &UserId,
    ) -> Result<Vec<PublicationView>, PublicationServiceError> {
        self.list(
            &PublicationFilter::Client(client_id.clone()),
            Resolution::ClientAndCandidates,
        )
    }

    pub fn list_by_candidate(
        &self,
        candidate_id: &UserId,
    ) -> Result<Vec<PublicationView>, PublicationServiceError> {
        self.list(
            &PublicationFilter::Candidate(candidate_id.clone()),
            Resolution::ClientAndCandidates,
        )
    }

    fn list(
        &self,
        filter: &PublicationFilter,
        depth: Resolution,
    ) -> Result<Vec<PublicationView>, PublicationServiceError> {
        let publications = self.repository.find(filter)?;
        let mut resolver = ProfileResolver::new(self.directory.as_ref());
        Ok(publications
            .into_iter()
            .map(|publication| resolver.publication(publication, depth))
            .collect())
    }

    /// Apply allow-listed edits. Only open publications can be edited, and `null` clears
    /// `specialiteRequise` or `budget`.
    pub fn update(
        &self,
        id: &PublicationId,
        patch: PublicationPatch,
    ) -> Result<PublicationView, PublicationServiceError> {
        if patch.is_empty() {
            return Err(PublicationServiceError::Validation(
                "No editable fields provided (titre, description, specialiteRequise, budget)"
                    .to_string(),
            ));
        }
        check_amount("budget", patch.budget.flatten())?;
        let title = match patch.title {
            Some(raw) => Some(required_text(Some(raw)).ok_or_else(|| {
                PublicationServiceError::Validation("titre must not be empty".to_string())
            })?),
            None => None,
        };
        let description = match patch.description {
            Some(raw) => Some(required_text(Some(raw)).ok_or_else(|| {
                PublicationServiceError::Validation("description must not be empty".to_string())
            })?),
            None => None,
        };

        let updated = self.repository.modify(id, |publication| {
            if !publication.is_open() {
                return Err(PublicationServiceError::Conflict(format!(
                    "publication is '{}' and can no longer be edited",
                    publication.status.label()
                )));
            }
            if let Some(title) = title {
                publication.title = title;
            }
            if let Some(description) = description {
                publication.description = description;
            }
            if let Some(specialty) = patch.required_specialty {
                publication.required_specialty = required_text(specialty);
            }
            if let Some(budget) = patch.budget {
                publication.budget = budget;
            }
            Ok(())
        })?;

        let mut resolver = ProfileResolver::new(self.directory.as_ref());
        Ok(resolver.publication(updated, Resolution::ClientAndCandidates))
    }

    /// Remove a publication together with every candidature it owns.
    pub fn delete(&self, id: &PublicationId) -> Result<(), PublicationServiceError> {
        let removed = self
            .repository
            .delete(id)?
            .ok_or(PublicationServiceError::NotFound(MissingEntity::Publication))?;

        info!(
            publication_id = %removed.id.0,
            candidatures = removed.candidatures.len(),
            "publication deleted"
        );
        Ok(())
    }
}

/// The entity a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingEntity {
    Publication,
    Candidature,
}

impl MissingEntity {
    pub const fn label(self) -> &'static str {
        match self {
            MissingEntity::Publication => "Publication",
            MissingEntity::Candidature => "Candidature",
        }
    }
}

/// Error raised by the publication service.
#[derive(Debug, thiserror::Error)]
pub enum PublicationServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{} not found", .0.label())]
    NotFound(MissingEntity),
    #[error("Invalid client ID or role")]
    Forbidden,
    #[error("You have already applied to this job.")]
    DuplicateApplication,
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Repository(RepositoryError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl From<RepositoryError> for PublicationServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => Self::NotFound(MissingEntity::Publication),
            other => Self::Repository(other),
        }
    }
}

impl From<RegistryViolation> for PublicationServiceError {
    fn from(value: RegistryViolation) -> Self {
        match value {
            RegistryViolation::DuplicateCandidate => Self::DuplicateApplication,
            RegistryViolation::UnknownCandidature => Self::NotFound(MissingEntity::Candidature),
            violation @ RegistryViolation::NotOpen(_) => Self::Conflict(violation.to_string()),
        }
    }
}
