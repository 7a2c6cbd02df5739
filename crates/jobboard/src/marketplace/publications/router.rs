use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::{
    CandidatureId, CandidatureSubmission, PublicationDraft, PublicationId, PublicationPatch,
    UserId,
};
use super::repository::{PublicationRepository, UserDirectory};
use super::service::{PublicationService, PublicationServiceError};

type SharedService<R, D> = Arc<PublicationService<R, D>>;

/// Router builder exposing the publication lifecycle over HTTP.
pub fn publication_router<R, D>(service: SharedService<R, D>) -> Router
where
    R: PublicationRepository + 'static,
    D: UserDirectory + 'static,
{
    Router::new()
        .route(
            "/publications",
            post(create_handler::<R, D>).get(list_all_handler::<R, D>),
        )
        .route(
            "/publications/:id",
            get(get_handler::<R, D>)
                .patch(update_handler::<R, D>)
                .delete(delete_handler::<R, D>),
        )
        .route("/publications/:id/apply", post(apply_handler::<R, D>))
        .route(
            "/publications/:id/candidatures/:candidature_id",
            get(candidature_handler::<R, D>),
        )
        .route(
            "/publications/:id/candidatures/:candidature_id/accept",
            post(accept_handler::<R, D>),
        )
        .route(
            "/clients/:client_id/publications",
            get(client_publications_handler::<R, D>),
        )
        .route(
            "/freelancers/:freelance_id/candidatures",
            get(freelance_candidatures_handler::<R, D>),
        )
        .with_state(service)
}

/// Map a service failure onto the HTTP contract. Internal failures are logged and
/// replaced by a fixed message naming the operation.
fn failure(error: PublicationServiceError, operation: &str) -> Response {
    let status = match &error {
        PublicationServiceError::Validation(_) | PublicationServiceError::DuplicateApplication => {
            StatusCode::BAD_REQUEST
        }
        PublicationServiceError::Forbidden => StatusCode::FORBIDDEN,
        PublicationServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        PublicationServiceError::Conflict(_) => StatusCode::CONFLICT,
        PublicationServiceError::Repository(_) | PublicationServiceError::Directory(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(%error, operation, "publication request failed");
        format!("An error occurred while {operation}")
    } else {
        error.to_string()
    };

    (status, Json(json!({ "error": message }))).into_response()
}

fn malformed(rejection: JsonRejection) -> Response {
    let payload = json!({
        "error": format!("Malformed request body: {}", rejection.body_text()),
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

pub(crate) async fn create_handler<R, D>(
    State(service): State<SharedService<R, D>>,
    payload: Result<Json<PublicationDraft>, JsonRejection>,
) -> Response
where
    R: PublicationRepository + 'static,
    D: UserDirectory + 'static,
{
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed(rejection),
    };

    match service.create(draft) {
        Ok(publication) => {
            let payload = json!({
                "message": "Publication created successfully",
                "publication": publication,
            });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(error) => failure(error, "creating the publication"),
    }
}

pub(crate) async fn apply_handler<R, D>(
    State(service): State<SharedService<R, D>>,
    Path(publication_id): Path<String>,
    payload: Result<Json<CandidatureSubmission>, JsonRejection>,
) -> Response
where
    R: PublicationRepository + 'static,
    D: UserDirectory + 'static,
{
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed(rejection),
    };

    match service.apply(&PublicationId(publication_id), submission) {
        Ok(publication) => {
            let payload = json!({
                "message": "Application submitted successfully",
                "publication": publication,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => failure(error, "applying"),
    }
}

pub(crate) async fn accept_handler<R, D>(
    State(service): State<SharedService<R, D>>,
    Path((publication_id, candidature_id)): Path<(String, String)>,
) -> Response
where
    R: PublicationRepository + 'static,
    D: UserDirectory + 'static,
{
    let publication_id = PublicationId(publication_id);
    let candidature_id = CandidatureId(candidature_id);

    match service.accept(&publication_id, &candidature_id) {
        Ok(publication) => {
            let payload = json!({
                "message": "Candidature accepted successfully",
                "publication": publication,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => failure(error, "accepting the candidature"),
    }
}

pub(crate) async fn candidature_handler<R, D>(
    State(service): State<SharedService<R, D>>,
    Path((publication_id, candidature_id)): Path<(String, String)>,
) -> Response
where
    R: PublicationRepository + 'static,
    D: UserDirectory + 'static,
{
    let publication_id = PublicationId(publication_id);
    let candidature_id = CandidatureId(candidature_id);

    match service.candidature(&publication_id, &candidature_id) {
        Ok(candidature) => (StatusCode::OK, Json(candidature)).into_response(),
        Err(error) => failure(error, "fetching the candidature"),
    }
}

pub(crate) async fn list_all_handler<R, D>(State(service): State<SharedService<R, D>>) -> Response
where
    R: PublicationRepository + 'static,
    D: UserDirectory + 'static,
{
    match service.list_all() {
        Ok(publications) => (StatusCode::OK, Json(publications)).into_response(),
        Err(error) => failure(error, "fetching publications"),
    }
}

pub(crate) async fn get_handler<R, D>(
    State(service): State<SharedService<R, D>>,
    Path(publication_id): Path<String>,
) -> Response
where
    R: PublicationRepository + 'static,
    D: UserDirectory + 'static,
{
    match service.get(&PublicationId(publication_id)) {
        Ok(publication) => (StatusCode::OK, Json(publication)).into_response(),
        Err(error) => failure(error, "fetching the publication"),
    }
}

pub(crate) async fn client_publications_handler<R, D>(
    State(service): State<SharedService<R, D>>,
    Path(client_id): Path<String>,
) -> Response
where
    R: PublicationRepository + 'static,
    D: UserDirectory + 'static,
{
    match service.list_by_client(&UserId(client_id)) {
        Ok(publications) => (StatusCode::OK, Json(publications)).into_response(),
        Err(error) => failure(error, "fetching client publications"),
    }
}

pub(crate) async fn freelance_candidatures_handler<R, D>(
    State(service): State<SharedService<R, D>>,
    Path(freelance_id): Path<String>,
) -> Response
where
    R: PublicationRepository + 'static,
    D: UserDirectory + 'static,
{
    match service.list_by_candidate(&UserId(freelance_id)) {
        Ok(publications) => (StatusCode::OK, Json(publications)).into_response(),
        Err(error) => failure(error, "fetching candidatures"),
    }
}

pub(crate) async fn update_handler<R, D>(
    State(service): State<SharedService<R, D>>,
    Path(publication_id): Path<String>,
    payload: Result<Json<PublicationPatch>, JsonRejection>,
) -> Response
where
    R: PublicationRepository + 'static,
    D: UserDirectory + 'static,
{
    let Json(patch) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed(rejection),
    };

    match service.update(&PublicationId(publication_id), patch) {
        Ok(publication) => (StatusCode::OK, Json(publication)).into_response(),
        Err(error) => failure(error, "updating the publication"),
    }
}

pub(crate) async fn delete_handler<R, D>(
    State(service): State<SharedService<R, D>>,
    Path(publication_id): Path<String>,
) -> Response
where
    R: PublicationRepository + 'static,
    D: UserDirectory + 'static,
{
    match service.delete(&PublicationId(publication_id)) {
        Ok(()) => {
            let payload = json!({ "message": "Publication deleted successfully" });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => failure(error, "deleting the publication"),
    }
}
