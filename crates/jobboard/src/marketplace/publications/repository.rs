use serde::{Deserialize, Serialize};

use super::domain::{Publication, PublicationId, UserId};

/// Selection applied by [`PublicationRepository::find`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicationFilter {
    All,
    Client(UserId),
    Candidate(UserId),
}

impl PublicationFilter {
    pub fn matches(&self, publication: &Publication) -> bool {
        match self {
            PublicationFilter::All => true,
            PublicationFilter::Client(client_id) => &publication.client_id == client_id,
            PublicationFilter::Candidate(candidate_id) => publication.has_candidate(candidate_id),
        }
    }
}

/// Storage abstraction for publication documents.
///
/// `modify` is the only write path for existing documents: implementations must run the
/// closure and persist its result as one atomic unit, and discard the change when the
/// closure fails.
pub trait PublicationRepository: Send + Sync {
    fn insert(&self, publication: Publication) -> Result<Publication, RepositoryError>;
    fn fetch(&self, id: &PublicationId) -> Result<Option<Publication>, RepositoryError>;
    fn find(&self, filter: &PublicationFilter) -> Result<Vec<Publication>, RepositoryError>;
    fn modify<F, E>(&self, id: &PublicationId, apply: F) -> Result<Publication, E>
    where
        F: FnOnce(&mut Publication) -> Result<(), E>,
        E: From<RepositoryError>;
    fn delete(&self, id: &PublicationId) -> Result<Option<Publication>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Minimal profile the user directory exposes to the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialite: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Read-only view of the external user directory.
pub trait UserDirectory: Send + Sync {
    fn exists(&self, id: &UserId) -> Result<bool, DirectoryError>;
    fn resolve_profile(&self, id: &UserId) -> Result<Option<UserProfile>, DirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("user directory unavailable: {0}")]
    Unavailable(String),
}
