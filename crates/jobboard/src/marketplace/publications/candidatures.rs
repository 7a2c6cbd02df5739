//! Candidature registry: the embedded application sequence of a publication and its rules.
//!
//! Every function here mutates a single [`Publication`] value in place. Callers run them
//! inside the repository's read-modify-write so a rejected change never reaches storage.

use chrono::{DateTime, Utc};

use super::domain::{
    AcceptedTerms, Candidature, CandidatureId, CandidatureStatus, NewCandidature, Publication,
    PublicationStatus,
};

/// Rule violations raised while mutating the candidature sequence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryViolation {
    #[error("candidate has already applied to this publication")]
    DuplicateCandidate,
    #[error("candidature not found")]
    UnknownCandidature,
    #[error("publication is '{}' and no longer accepts this change", .0.label())]
    NotOpen(PublicationStatus),
}

/// Append a candidature unless the same candidate already holds one.
pub fn register(
    publication: &mut Publication,
    id: CandidatureId,
    submission: NewCandidature,
    submitted_at: DateTime<Utc>,
) -> Result<(), RegistryViolation> {
    if publication.has_candidate(&submission.candidate_id) {
        return Err(RegistryViolation::DuplicateCandidate);
    }

    publication.candidatures.push(Candidature {
        id,
        candidate_id: submission.candidate_id,
        submitted_at,
        message: submission.message,
        proposed_price: submission.proposed_price,
        proposed_delay_days: submission.proposed_delay_days,
        status: None,
    });
    Ok(())
}

pub fn lookup<'a>(publication: &'a Publication, id: &CandidatureId) -> Option<&'a Candidature> {
    publication
        .candidatures
        .iter()
        .find(|candidature| &candidature.id == id)
}

/// Mark one candidature as the winner, freeze its terms, and move the publication to
/// `En cours`. Only an open publication can accept.
pub fn accept(
    publication: &mut Publication,
    id: &CandidatureId,
) -> Result<AcceptedTerms, RegistryViolation> {
    let status = publication.status;
    let candidature = publication
        .candidatures
        .iter_mut()
        .find(|candidature| &candidature.id == id)
        .ok_or(RegistryViolation::UnknownCandidature)?;

    if status != PublicationStatus::Open {
        return Err(RegistryViolation::NotOpen(status));
    }

    candidature.status = Some(CandidatureStatus::Accepted);
    let terms = AcceptedTerms::from_candidature(candidature);

    publication.accepted = Some(terms.clone());
    publication.status = PublicationStatus::InProgress;
    Ok(terms)
}
