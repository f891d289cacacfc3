//! Many-to-one consolidation through the full pipeline and through the
//! bulk `group_by_creative` entry point.

use std::sync::Arc;

use fanout_core::{MatrixService, SpecSelection, group_by_creative};
use fanout_store::{MemoryRepository, SpecCatalog};

use fanout_test_utils::{gamer_strategy, level_up_concept, shared_master_catalog};

#[tokio::test]
async fn shared_master_collapses_through_generate() {
    // Two platforms, one 9:16 mp4 master.
    let svc = MatrixService::new(
        Arc::new(shared_master_catalog()),
        Arc::new(MemoryRepository::new()),
    );
    let strategy = gamer_strategy(&["TIKTOK_FEED", "IG_REELS"]);

    let (batch, tickets) = svc
        .generate(&strategy, &level_up_concept(), None)
        .await
        .unwrap();

    assert_eq!(tickets.len(), 2, "one ticket per resolved spec");
    assert_eq!(batch.jobs.len(), 1, "one physical master job");

    let job = &batch.jobs[0];
    assert_eq!(job.destinations.len(), 2);
    let platforms: Vec<&str> = job
        .destinations
        .iter()
        .map(|d| d.platform_name.as_str())
        .collect();
    assert_eq!(platforms, vec!["TikTok", "Instagram"]);
    assert_eq!(job.technical_summary, "1080x1920, 30s, MP4");
}

#[tokio::test]
async fn mixed_masters_split_through_generate() {
    let svc = MatrixService::new(
        Arc::new(SpecCatalog::embedded()),
        Arc::new(MemoryRepository::new()),
    );
    // META_STORY and META_FEED share a concept and file family but differ
    // in dimensions; DISPLAY_MPU differs in everything.
    let strategy = gamer_strategy(&["META_STORY", "META_FEED", "DISPLAY_MPU"]);

    let (batch, _) = svc
        .generate(&strategy, &level_up_concept(), None)
        .await
        .unwrap();

    assert_eq!(batch.jobs.len(), 3);
    let job_ids: Vec<&str> = batch.jobs.iter().map(|j| j.job_id.as_str()).collect();
    assert_eq!(job_ids, vec!["JOB-1", "JOB-2", "JOB-3"]);
}

#[test]
fn bulk_entry_point_matches_pipeline_semantics() {
    // The same collapse with loose selections and no store involved.
    let selections = vec![
        SpecSelection {
            spec_id: Some("TIKTOK_FEED".to_string()),
            platform: Some("TikTok".to_string()),
            dimensions: Some("1080x1920".to_string()),
            file_type: Some("mp4".to_string()),
            ..SpecSelection::default()
        },
        SpecSelection {
            spec_id: Some("IG_REELS".to_string()),
            platform: Some("Instagram".to_string()),
            dimensions: Some("1080x1920".to_string()),
            file_type: Some("mp4".to_string()),
            ..SpecSelection::default()
        },
    ];

    let jobs = group_by_creative(&selections, "Level Up");
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].destinations.len(), 2);

    // The service passthrough is the same operation.
    let svc = MatrixService::new(
        Arc::new(SpecCatalog::embedded()),
        Arc::new(MemoryRepository::new()),
    );
    let via_service = svc.group_by_creative(&selections, "Level Up");
    assert_eq!(via_service.len(), 1);
    assert_eq!(via_service[0].job_id, jobs[0].job_id);
    assert_eq!(via_service[0].destinations.len(), 2);
}

#[test]
fn catalog_selections_convert_directly() {
    let catalog = SpecCatalog::embedded();
    let selections: Vec<SpecSelection> = ["META_STORY", "META_FEED"]
        .iter()
        .map(|id| SpecSelection::from(catalog.lookup(id).unwrap()))
        .collect();

    let jobs = group_by_creative(&selections, "Level Up");
    // Different dimensions, so two jobs even on the same platform.
    assert_eq!(jobs.len(), 2);
}
