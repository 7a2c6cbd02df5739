use jobboard::config::DirectoryConfig;
use jobboard::error::AppError;
use jobboard::marketplace::publications::{
    DirectoryError, Publication, PublicationFilter, PublicationId, PublicationRepository,
    RepositoryError, UserDirectory, UserId, UserProfile,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Document store keeping each publication, candidatures included, as one value.
/// The map lock makes every read-modify-write atomic per publication.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPublicationRepository {
    documents: Arc<Mutex<BTreeMap<PublicationId, Publication>>>,
}

impl InMemoryPublicationRepository {
    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<PublicationId, Publication>>, RepositoryError> {
        self.documents
            .lock()
            .map_err(|_| RepositoryError::Unavailable("publication store poisoned".to_string()))
    }
}

impl PublicationRepository for InMemoryPublicationRepository {
    fn insert(&self, publication: Publication) -> Result<Publication, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&publication.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(publication.id.clone(), publication.clone());
        Ok(publication)
    }

    fn fetch(&self, id: &PublicationId) -> Result<Option<Publication>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.get(id).cloned())
    }

    fn find(&self, filter: &PublicationFilter) -> Result<Vec<Publication>, RepositoryError> {
        let guard = self.lock()?;
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
        let mut guard = self.lock()?;
        let stored = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        let mut working = stored.clone();
        apply(&mut working)?;
        *stored = working.clone();
        Ok(working)
    }

    fn delete(&self, id: &PublicationId) -> Result<Option<Publication>, RepositoryError> {
        let mut guard = self.lock()?;
        Ok(guard.remove(id))
    }
}

/// Read-through stand-in for the external user directory.
#[derive(Default)]
pub(crate) struct InMemoryUserDirectory {
    profiles: RwLock<HashMap<UserId, UserProfile>>,
}

impl InMemoryUserDirectory {
    pub(crate) fn with_profiles(profiles: impl IntoIterator<Item = UserProfile>) -> Self {
        let profiles: HashMap<UserId, UserProfile> = profiles
            .into_iter()
            .map(|profile| (profile.id.clone(), profile))
            .collect();
        Self {
            profiles: RwLock::new(profiles),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.profiles.read().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn exists(&self, id: &UserId) -> Result<bool, DirectoryError> {
        let guard = self
            .profiles
            .read()
            .map_err(|_| DirectoryError::Unavailable("user directory poisoned".to_string()))?;
        Ok(guard.contains_key(id))
    }

    fn resolve_profile(&self, id: &UserId) -> Result<Option<UserProfile>, DirectoryError> {
        let guard = self
            .profiles
            .read()
            .map_err(|_| DirectoryError::Unavailable("user directory poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }
}

/// Build the directory from the configured JSON seed, or an empty one when none is set.
pub(crate) fn load_user_directory(
    config: &DirectoryConfig,
) -> Result<InMemoryUserDirectory, AppError> {
    let Some(path) = config.seed_path.as_ref() else {
        return Ok(InMemoryUserDirectory::default());
    };

    let raw = fs::read_to_string(path)?;
    let profiles: Vec<UserProfile> = serde_json::from_str(&raw)?;
    let directory = InMemoryUserDirectory::with_profiles(profiles);
    info!(path = %path.display(), users = directory.len(), "user directory seeded");
    Ok(directory)
}

pub(crate) fn demo_profiles() -> Vec<UserProfile> {
    vec![
        UserProfile {
            id: UserId("u1".to_string()),
            nom: "Benali".to_string(),
            prenom: "Yasmine".to_string(),
            email: "yasmine.benali@example.test".to_string(),
            specialite: None,
            role: Some("client".to_string()),
        },
        UserProfile {
            id: UserId("u2".to_string()),
            nom: "Trabelsi".to_string(),
            prenom: "Karim".to_string(),
            email: "karim.trabelsi@example.test".to_string(),
            specialite: Some("Développement web".to_string()),
            role: Some("freelance".to_string()),
        },
    ]
}
