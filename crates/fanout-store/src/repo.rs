//! Keyed repository for production batches and tickets.
//!
//! The pipeline itself is pure; this is the only shared mutable resource.
//! The trait keeps the store swappable (in-memory here, a durable keyed
//! store in a production deployment) without touching the pipeline.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{ProductionBatch, ProductionStatus, ProductionTicket};

/// Repository contract for batches and tickets.
///
/// Unknown IDs surface as `Ok(None)`, never as errors, so callers can
/// render a "not found" response.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Persist a batch and its tickets as one atomic unit.
    async fn insert_batch(
        &self,
        batch: ProductionBatch,
        tickets: Vec<ProductionTicket>,
    ) -> Result<()>;

    /// Fetch a batch by ID.
    async fn batch(&self, batch_id: Uuid) -> Result<Option<ProductionBatch>>;

    /// All tickets belonging to a batch, ordered by creation time.
    async fn tickets_for_batch(&self, batch_id: Uuid) -> Result<Vec<ProductionTicket>>;

    /// Fetch a single ticket by ID.
    async fn ticket(&self, ticket_id: Uuid) -> Result<Option<ProductionTicket>>;

    /// Compare-and-set a ticket's status.
    ///
    /// Returns the updated ticket, or `None` when the ticket does not exist
    /// or its current status no longer matches `expected` (optimistic lock
    /// failure under concurrent callers).
    async fn update_ticket_status(
        &self,
        ticket_id: Uuid,
        expected: ProductionStatus,
        new: ProductionStatus,
    ) -> Result<Option<ProductionTicket>>;

    /// Compare-and-set the status of one job within a batch.
    ///
    /// Returns the updated batch, or `None` when the batch or job is
    /// unknown or the job's current status no longer matches `expected`,
    /// same optimistic-lock contract as [`update_ticket_status`].
    ///
    /// [`update_ticket_status`]: TicketRepository::update_ticket_status
    async fn update_job_status(
        &self,
        batch_id: Uuid,
        job_id: &str,
        expected: ProductionStatus,
        new: ProductionStatus,
    ) -> Result<Option<ProductionBatch>>;

    /// List all batches, oldest first.
    async fn list_batches(&self) -> Result<Vec<ProductionBatch>>;
}

/// Both maps live behind one lock so a generate persists atomically and
/// writers are serialized.
#[derive(Debug, Default)]
struct Shelf {
    batches: HashMap<Uuid, ProductionBatch>,
    tickets: HashMap<Uuid, ProductionTicket>,
}

/// In-memory [`TicketRepository`] for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    shelf: RwLock<Shelf>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TicketRepository for MemoryRepository {
    async fn insert_batch(
        &self,
        batch: ProductionBatch,
        tickets: Vec<ProductionTicket>,
    ) -> Result<()> {
        let mut shelf = self.shelf.write().await;
        tracing::debug!(batch_id = %batch.id, tickets = tickets.len(), "storing batch");
        for ticket in tickets {
            shelf.tickets.insert(ticket.id, ticket);
        }
        shelf.batches.insert(batch.id, batch);
        Ok(())
    }

    async fn batch(&self, batch_id: Uuid) -> Result<Option<ProductionBatch>> {
        let shelf = self.shelf.read().await;
        Ok(shelf.batches.get(&batch_id).cloned())
    }

    async fn tickets_for_batch(&self, batch_id: Uuid) -> Result<Vec<ProductionTicket>> {
        let shelf = self.shelf.read().await;
        let mut tickets: Vec<ProductionTicket> = shelf
            .tickets
            .values()
            .filter(|t| t.batch_id == batch_id)
            .cloned()
            .collect();
        tickets.sort_by_key(|t| t.created_at);
        Ok(tickets)
    }

    async fn ticket(&self, ticket_id: Uuid) -> Result<Option<ProductionTicket>> {
        let shelf = self.shelf.read().await;
        Ok(shelf.tickets.get(&ticket_id).cloned())
    }

    async fn update_ticket_status(
        &self,
        ticket_id: Uuid,
        expected: ProductionStatus,
        new: ProductionStatus,
    ) -> Result<Option<ProductionTicket>> {
        let mut shelf = self.shelf.write().await;
        let Some(ticket) = shelf.tickets.get_mut(&ticket_id) else {
            return Ok(None);
        };
        if ticket.status != expected {
            return Ok(None);
        }
        ticket.status = new;
        ticket.updated_at = Utc::now();
        Ok(Some(ticket.clone()))
    }

    async fn update_job_status(
        &self,
        batch_id: Uuid,
        job_id: &str,
        expected: ProductionStatus,
        new: ProductionStatus,
    ) -> Result<Option<ProductionBatch>> {
        let mut shelf = self.shelf.write().await;
        let Some(batch) = shelf.batches.get_mut(&batch_id) else {
            return Ok(None);
        };
        let Some(job) = batch.jobs.iter_mut().find(|j| j.job_id == job_id) else {
            return Ok(None);
        };
        if job.status != expected {
            return Ok(None);
        }
        job.status = new;
        Ok(Some(batch.clone()))
    }

    async fn list_batches(&self) -> Result<Vec<ProductionBatch>> {
        let shelf = self.shelf.read().await;
        let mut batches: Vec<ProductionBatch> = shelf.batches.values().cloned().collect();
        batches.sort_by_key(|b| b.created_at);
        Ok(batches)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SpecCatalog;
    use crate::models::{MediaType, TicketMeta};

    fn sample_batch() -> ProductionBatch {
        ProductionBatch {
            id: Uuid::new_v4(),
            segment_id: "SEG-1".to_string(),
            segment_name: "The Gamer".to_string(),
            concept_id: "CON-1".to_string(),
            concept_name: "Level Up".to_string(),
            name: "The Gamer – Level Up".to_string(),
            jobs: vec![],
            status: ProductionStatus::Pending,
            created_at: Utc::now(),
        }
    }

    fn sample_ticket(batch_id: Uuid) -> ProductionTicket {
        let spec = SpecCatalog::embedded().lookup("META_STORY").unwrap().clone();
        let now = Utc::now();
        ProductionTicket {
            id: Uuid::new_v4(),
            batch_id,
            asset_name: "TheGamer_Meta_Stories/Reels_LevelUp".to_string(),
            platform: spec.platform.clone(),
            placement: spec.placement.clone(),
            dimensions: spec.dimensions.clone(),
            spec,
            asset_type: MediaType::Video,
            copy_headline: "Level Up".to_string(),
            visual_directive: None,
            status: ProductionStatus::Pending,
            meta: TicketMeta::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn insert_and_fetch_batch() {
        let repo = MemoryRepository::new();
        let batch = sample_batch();
        let batch_id = batch.id;
        let tickets = vec![sample_ticket(batch_id), sample_ticket(batch_id)];
        repo.insert_batch(batch, tickets).await.unwrap();

        let fetched = repo.batch(batch_id).await.unwrap().expect("batch exists");
        assert_eq!(fetched.segment_name, "The Gamer");
        assert_eq!(repo.tickets_for_batch(batch_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unknown_ids_are_none() {
        let repo = MemoryRepository::new();
        assert!(repo.batch(Uuid::new_v4()).await.unwrap().is_none());
        assert!(repo.ticket(Uuid::new_v4()).await.unwrap().is_none());
        assert!(
            repo.tickets_for_batch(Uuid::new_v4())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn status_update_is_compare_and_set() {
        let repo = MemoryRepository::new();
        let batch = sample_batch();
        let batch_id = batch.id;
        let ticket = sample_ticket(batch_id);
        let ticket_id = ticket.id;
        repo.insert_batch(batch, vec![ticket]).await.unwrap();

        let updated = repo
            .update_ticket_status(
                ticket_id,
                ProductionStatus::Pending,
                ProductionStatus::InProduction,
            )
            .await
            .unwrap()
            .expect("update should succeed");
        assert_eq!(updated.status, ProductionStatus::InProduction);

        // Stale expectation: the ticket moved on, so the CAS fails.
        let stale = repo
            .update_ticket_status(
                ticket_id,
                ProductionStatus::Pending,
                ProductionStatus::Approved,
            )
            .await
            .unwrap();
        assert!(stale.is_none());
    }

    #[tokio::test]
    async fn job_status_update() {
        let repo = MemoryRepository::new();
        let mut batch = sample_batch();
        batch.jobs.push(crate::models::ProductionJob {
            job_id: "JOB-1".to_string(),
            asset_type: "9:16 mp4".to_string(),
            technical_summary: "1080x1920, 15s, MP4".to_string(),
            destinations: vec![],
            status: ProductionStatus::Pending,
        });
        let batch_id = batch.id;
        repo.insert_batch(batch, vec![]).await.unwrap();

        let updated = repo
            .update_job_status(
                batch_id,
                "JOB-1",
                ProductionStatus::Pending,
                ProductionStatus::Approved,
            )
            .await
            .unwrap()
            .expect("job exists");
        assert_eq!(updated.jobs[0].status, ProductionStatus::Approved);

        let missing = repo
            .update_job_status(
                batch_id,
                "JOB-9",
                ProductionStatus::Pending,
                ProductionStatus::Approved,
            )
            .await
            .unwrap();
        assert!(missing.is_none());

        // Stale expectation: the job already advanced, so the CAS fails
        // and the stored status is untouched.
        let stale = repo
            .update_job_status(
                batch_id,
                "JOB-1",
                ProductionStatus::Pending,
                ProductionStatus::InProduction,
            )
            .await
            .unwrap();
        assert!(stale.is_none());
        let batch = repo.batch(batch_id).await.unwrap().unwrap();
        assert_eq!(batch.jobs[0].status, ProductionStatus::Approved);
    }
}
