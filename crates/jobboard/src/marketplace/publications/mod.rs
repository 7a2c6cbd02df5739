//! Publication lifecycle: posting offers, collecting candidatures, and accepting one.

pub mod candidatures;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use candidatures::RegistryViolation;
pub use domain::{
    AcceptedTerms, Candidature, CandidatureId, CandidatureStatus, CandidatureSubmission,
    NewCandidature, Publication, PublicationDraft, PublicationId, PublicationPatch,
    PublicationStatus, UserId,
};
pub use repository::{
    DirectoryError, PublicationFilter, PublicationRepository, RepositoryError, UserDirectory,
    UserProfile,
};
pub use router::publication_router;
pub use service::{MissingEntity, PublicationService, PublicationServiceError};
pub use views::{
    CandidateSummary, CandidatureView, ClientSummary, PublicationView, Resolution, UserRef,
};
