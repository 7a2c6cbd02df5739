use super::common::*;
use crate::marketplace::publications::domain::UserId;
use crate::marketplace::publications::views::UserRef;
use crate::marketplace::publications::PublicationService;
use serde_json::json;
use std::sync::Arc;

#[test]
fn get_resolves_client_and_candidate_profiles() {
    let (service, _, _) = build_service();
    let publication = service.create(draft("u1")).expect("created");
    service
        .apply(&publication.id, submission("u2"))
        .expect("applied");

    let view = service.get(&publication.id).expect("view");

    match &view.client {
        UserRef::Resolved(client) => assert_eq!(client.nom, "Client"),
        other => panic!("expected resolved client, got {other:?}"),
    }
    match &view.candidatures[0].candidate {
        UserRef::Resolved(candidate) => assert_eq!(candidate.specialite.as_deref(), Some("web")),
        other => panic!("expected resolved candidate, got {other:?}"),
    }
}

#[test]
fn list_all_leaves_candidates_as_references() {
    let (service, _, _) = build_service();
    let publication = service.create(draft("u1")).expect("created");
    service
        .apply(&publication.id, submission("u2"))
        .expect("applied");

    let views = service.list_all().expect("list");

    assert!(views[0].client.is_resolved());
    assert_eq!(
        views[0].candidatures[0].candidate,
        UserRef::Unresolved(UserId("u2".to_string()))
    );
}

#[test]
fn missing_profiles_fall_back_to_bare_identifiers() {
    let (service, _, directory) = build_service();
    let publication = service.create(draft("u1")).expect("created");
    service
        .apply(&publication.id, submission("u2"))
        .expect("applied");
    directory.forget("u1");

    let view = service.get(&publication.id).expect("read still succeeds");
    let payload = serde_json::to_value(&view).expect("serializes");

    assert_eq!(payload["client"], json!("u1"));
    assert_eq!(payload["candidatures"][0]["candidatId"]["nom"], json!("Freelance"));
}

#[test]
fn directory_outage_does_not_fail_reads() {
    let (seeded, repository, _) = build_service();
    let publication = seeded.create(draft("u1")).expect("created");

    let service = PublicationService::new(repository, Arc::new(UnavailableDirectory));
    let view = service.get(&publication.id).expect("read succeeds");

    assert_eq!(view.client, UserRef::Unresolved(UserId("u1".to_string())));
}

#[test]
fn repeated_references_are_looked_up_once_per_read() {
    let (service, _, directory) = build_service();
    for _ in 0..3 {
        service.create(draft("u1")).expect("created");
    }
    let before = directory.lookups().len();

    service.list_all().expect("list");

    let lookups = directory.lookups();
    let during: Vec<_> = lookups[before..].to_vec();
    assert_eq!(during, vec![UserId("u1".to_string())]);
}

#[test]
fn accepted_terms_serialize_at_top_level() {
    let (service, _, _) = build_service();
    let publication = service.create(draft("u1")).expect("created");
    let applied = service
        .apply(&publication.id, submission("u2"))
        .expect("applied");
    service
        .accept(&publication.id, &applied.candidatures[0].id)
        .expect("accepted");

    let payload = serde_json::to_value(service.get(&publication.id).expect("view"))
        .expect("serializes");

    assert_eq!(payload["statut"], json!("En cours"));
    assert_eq!(payload["candidatureAcceptee"], json!("u2"));
    assert_eq!(payload["prixFinal"], json!(1200.0));
    assert_eq!(payload["delaiFinal"], json!(14));
    assert_eq!(payload["candidatures"][0]["statut"], json!("Acceptée"));
}
