use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::marketplace::publications::domain::{
    CandidatureSubmission, Publication, PublicationDraft, PublicationId, UserId,
};
use crate::marketplace::publications::repository::{
    DirectoryError, PublicationFilter, PublicationRepository, RepositoryError, UserDirectory,
    UserProfile,
};
use crate::marketplace::publications::{publication_router, PublicationService};

pub(super) fn profile(id: &str, nom: &str, specialite: Option<&str>) -> UserProfile {
    UserProfile {
        id: UserId(id.to_string()),
        nom: nom.to_string(),
        prenom: "Sami".to_string(),
        email: format!("{id}@example.test"),
        specialite: specialite.map(str::to_string),
        role: None,
    }
}

pub(super) fn draft(client_id: &str) -> PublicationDraft {
    PublicationDraft {
        title: Some("Build site".to_string()),
        description: Some("Marketing site with a blog".to_string()),
        client_id: Some(client_id.to_string()),
        required_specialty: Some("web".to_string()),
        budget: Some(1500.0),
    }
}

pub(super) fn submission(candidate_id: &str) -> CandidatureSubmission {
    CandidatureSubmission {
        candidate_id: Some(candidate_id.to_string()),
        message: Some("hi".to_string()),
        proposed_price: Some(1200.0),
        proposed_delay_days: Some(14),
    }
}

pub(super) type MemoryService = PublicationService<MemoryRepository, MemoryDirectory>;

pub(super) fn build_service() -> (MemoryService, Arc<MemoryRepository>, Arc<MemoryDirectory>) {
    let repository = Arc::new(MemoryRepository::default());
    let directory = Arc::new(MemoryDirectory::with_profiles(vec![
        profile("u1", "Client", None),
        profile("u2", "Freelance", Some("web")),
        profile("u3", "Designer", Some("ui")),
    ]));
    let service = PublicationService::new(repository.clone(), directory.clone());
    (service, repository, directory)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<BTreeMap<PublicationId, Publication>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl PublicationRepository for MemoryRepository {
    fn insert(&self, publication: Publication) -> Result<Publication, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&publication.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(publication.id.clone(), publication.clone());
        Ok(publication)
    }

    fn fetch(&self, id: &PublicationId) -> Result<Option<Publication>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find(&self, filter: &PublicationFilter) -> Result<Vec<Publication>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|publication| filter.matches(publication))
            .cloned()
            .collect())
    }

    fn modify<F, E>(&self, id: &PublicationId, apply: F) -> Result<Publication, E>
    where
        F: FnOnce(&mut Publication) -> Result<(), E>,
        E: From<RepositoryError>,
    {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let stored = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        let mut draft = stored.clone();
        apply(&mut draft)?;
        *stored = draft.clone();
        Ok(draft)
    }

    fn delete(&self, id: &PublicationId) -> Result<Option<Publication>, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.remove(id))
    }
}

#[derive(Default)]
pub(super) struct MemoryDirectory {
    profiles: Mutex<HashMap<UserId, UserProfile>>,
    lookups: Mutex<Vec<UserId>>,
}

impl MemoryDirectory {
    pub(super) fn with_profiles(profiles: Vec<UserProfile>) -> Self {
        let directory = Self::default();
        {
            let mut guard = directory.profiles.lock().expect("directory mutex poisoned");
            for profile in profiles {
                guard.insert(profile.id.clone(), profile);
            }
        }
        directory
    }

    pub(super) fn forget(&self, id: &str) {
        self.profiles
            .lock()
            .expect("directory mutex poisoned")
            .remove(&UserId(id.to_string()));
    }

    pub(super) fn lookups(&self) -> Vec<UserId> {
        self.lookups.lock().expect("directory mutex poisoned").clone()
    }
}

impl UserDirectory for MemoryDirectory {
    fn exists(&self, id: &UserId) -> Result<bool, DirectoryError> {
        Ok(self
            .profiles
            .lock()
            .expect("directory mutex poisoned")
            .contains_key(id))
    }

    fn resolve_profile(&self, id: &UserId) -> Result<Option<UserProfile>, DirectoryError> {
        self.lookups
            .lock()
            .expect("directory mutex poisoned")
            .push(id.clone());
        Ok(self
            .profiles
            .lock()
            .expect("directory mutex poisoned")
            .get(id)
            .cloned())
    }
}

pub(super) struct UnavailableDirectory;

impl UserDirectory for UnavailableDirectory {
    fn exists(&self, _id: &UserId) -> Result<bool, DirectoryError> {
        Err(DirectoryError::Unavailable("directory offline".to_string()))
    }

    fn resolve_profile(&self, _id: &UserId) -> Result<Option<UserProfile>, DirectoryError> {
        Err(DirectoryError::Unavailable("directory offline".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl PublicationRepository for UnavailableRepository {
    fn insert(&self, _publication: Publication) -> Result<Publication, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &PublicationId) -> Result<Option<Publication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find(&self, _filter: &PublicationFilter) -> Result<Vec<Publication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn modify<F, E>(&self, _id: &PublicationId, _apply: F) -> Result<Publication, E>
    where
        F: FnOnce(&mut Publication) -> Result<(), E>,
        E: From<RepositoryError>,
    {
        Err(RepositoryError::Unavailable("database offline".to_string()).into())
    }

    fn delete(&self, _id: &PublicationId) -> Result<Option<Publication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    publication_router(Arc::new(service))
}
