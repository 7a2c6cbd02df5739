use crate::infra::{demo_profiles, InMemoryPublicationRepository, InMemoryUserDirectory};
use clap::Args;
use jobboard::error::AppError;
use jobboard::marketplace::publications::{
    CandidatureSubmission, MissingEntity, PublicationDraft, PublicationService,
    PublicationServiceError,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Pretty-print the JSON emitted for each step.
    #[arg(long)]
    pub(crate) pretty: bool,
    /// Stop after the applications and leave the publication open.
    #[arg(long)]
    pub(crate) skip_accept: bool,
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String, AppError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.map_err(AppError::from)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        pretty,
        skip_accept,
    } = args;

    let service = PublicationService::new(
        Arc::new(InMemoryPublicationRepository::default()),
        Arc::new(InMemoryUserDirectory::with_profiles(demo_profiles())),
    );

    println!("Publication lifecycle demo");

    let publication = service.create(PublicationDraft {
        title: Some("Build site".to_string()),
        description: Some("Vitrine site with a contact form and a blog".to_string()),
        client_id: Some("u1".to_string()),
        required_specialty: Some("Développement web".to_string()),
        budget: Some(1500.0),
    })?;
    println!(
        "\n1. Client u1 posts '{}' ({})",
        publication.title,
        publication.status.label()
    );
    println!("{}", render(&publication, pretty)?);

    let submission = CandidatureSubmission {
        candidate_id: Some("u2".to_string()),
        message: Some("hi".to_string()),
        proposed_price: Some(1350.0),
        proposed_delay_days: Some(21),
    };
    let applied = service.apply(&publication.id, submission.clone())?;
    println!(
        "\n2. Freelancer u2 applies ({} candidature(s) on file)",
        applied.candidatures.len()
    );

    match service.apply(&publication.id, submission) {
        Ok(_) => println!("\n3. Second application from u2 was unexpectedly accepted"),
        Err(err) => println!("\n3. Second application from u2 rejected: {err}"),
    }

    if skip_accept {
        println!("\nAcceptance skipped; publication stays open.");
    } else {
        let candidature_id = applied
            .candidatures
            .first()
            .map(|candidature| candidature.id.clone())
            .ok_or(PublicationServiceError::NotFound(MissingEntity::Candidature))?;
        let accepted = service.accept(&publication.id, &candidature_id)?;
        println!(
            "\n4. Client accepts candidature {} -> {}",
            candidature_id.0,
            accepted.status.label()
        );
    }

    let view = service.get(&publication.id)?;
    println!("\nResolved publication:");
    println!("{}", render(&view, pretty)?);

    Ok(())
}
