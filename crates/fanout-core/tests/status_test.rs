//! Status lifecycle tests through the service layer.

use std::sync::Arc;

use uuid::Uuid;

use fanout_core::MatrixService;
use fanout_store::models::ProductionStatus;
use fanout_store::{MemoryRepository, SpecCatalog};

use fanout_test_utils::{gamer_strategy, level_up_concept};

fn service() -> MatrixService {
    MatrixService::new(
        Arc::new(SpecCatalog::embedded()),
        Arc::new(MemoryRepository::new()),
    )
}

#[tokio::test]
async fn ticket_walks_the_full_lifecycle() {
    let svc = service();
    let (_, tickets) = svc
        .generate(&gamer_strategy(&["META_STORY"]), &level_up_concept(), None)
        .await
        .unwrap();
    let ticket_id = tickets[0].id;

    for next in [
        ProductionStatus::InProduction,
        ProductionStatus::Approved,
        ProductionStatus::Delivered,
    ] {
        let updated = svc
            .update_ticket_status(ticket_id, next)
            .await
            .unwrap()
            .expect("update applies");
        assert_eq!(updated.status, next);
    }
}

#[tokio::test]
async fn illegal_jump_is_an_error() {
    let svc = service();
    let (_, tickets) = svc
        .generate(&gamer_strategy(&["META_STORY"]), &level_up_concept(), None)
        .await
        .unwrap();

    // pending -> delivered skips two states.
    let result = svc
        .update_ticket_status(tickets[0].id, ProductionStatus::Delivered)
        .await;
    assert!(result.is_err());

    // The ticket is untouched.
    let (_, tickets) = svc.batch(tickets[0].batch_id).await.unwrap().unwrap();
    assert_eq!(tickets[0].status, ProductionStatus::Pending);
}

#[tokio::test]
async fn backward_transition_is_an_error() {
    let svc = service();
    let (_, tickets) = svc
        .generate(&gamer_strategy(&["META_STORY"]), &level_up_concept(), None)
        .await
        .unwrap();
    let ticket_id = tickets[0].id;

    svc.update_ticket_status(ticket_id, ProductionStatus::InProduction)
        .await
        .unwrap();

    let result = svc
        .update_ticket_status(ticket_id, ProductionStatus::Pending)
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn unknown_ticket_is_none() {
    let svc = service();
    let result = svc
        .update_ticket_status(Uuid::new_v4(), ProductionStatus::InProduction)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn job_status_follows_the_same_rules() {
    let svc = service();
    let (batch, _) = svc
        .generate(&gamer_strategy(&["META_STORY"]), &level_up_concept(), None)
        .await
        .unwrap();
    let job_id = batch.jobs[0].job_id.clone();

    let updated = svc
        .update_job_status(batch.id, &job_id, ProductionStatus::InProduction)
        .await
        .unwrap()
        .expect("job exists");
    assert_eq!(updated.jobs[0].status, ProductionStatus::InProduction);

    let result = svc
        .update_job_status(batch.id, &job_id, ProductionStatus::Delivered)
        .await;
    assert!(result.is_err(), "in_production -> delivered skips approved");

    assert!(
        svc.update_job_status(batch.id, "JOB-99", ProductionStatus::InProduction)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn advanced_job_does_not_regress_under_a_stale_writer() {
    let repo = Arc::new(MemoryRepository::new());
    let shared: Arc<dyn fanout_store::TicketRepository> = repo.clone();
    let svc = MatrixService::new(Arc::new(SpecCatalog::embedded()), shared.clone());

    let (batch, _) = svc
        .generate(&gamer_strategy(&["META_STORY"]), &level_up_concept(), None)
        .await
        .unwrap();
    let job_id = batch.jobs[0].job_id.clone();

    for next in [ProductionStatus::InProduction, ProductionStatus::Approved] {
        svc.update_job_status(batch.id, &job_id, next)
            .await
            .unwrap()
            .expect("update applies");
    }

    // A writer that validated its transition against a pending read loses
    // the optimistic lock and the approved status stands.
    let stale = shared
        .update_job_status(
            batch.id,
            &job_id,
            ProductionStatus::Pending,
            ProductionStatus::InProduction,
        )
        .await
        .unwrap();
    assert!(stale.is_none());

    let (batch, _) = svc.batch(batch.id).await.unwrap().unwrap();
    assert_eq!(batch.jobs[0].status, ProductionStatus::Approved);
}
