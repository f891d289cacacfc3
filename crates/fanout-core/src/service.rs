//! Matrix service: orchestrates normalize -> expand -> consolidate and
//! persists the result through the injected repository.
//!
//! The pipeline steps are pure; the repository is the only shared mutable
//! resource, and its single-lock write discipline keeps concurrent
//! generate calls from interleaving.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use uuid::Uuid;

use fanout_store::models::{
    ConceptDirective, ProductionBatch, ProductionJob, ProductionStatus, ProductionTicket,
    StrategyIntent,
};
use fanout_store::{SpecCatalog, TicketRepository};

use crate::consolidate::{self, SpecSelection};
use crate::error::ValidationError;
use crate::expand;
use crate::normalize::LabelNormalizer;
use crate::state::StatusMachine;

/// Entry point for generation, retrieval, and status updates.
pub struct MatrixService {
    catalog: Arc<SpecCatalog>,
    repo: Arc<dyn TicketRepository>,
}

impl MatrixService {
    pub fn new(catalog: Arc<SpecCatalog>, repo: Arc<dyn TicketRepository>) -> Self {
        Self { catalog, repo }
    }

    pub fn catalog(&self) -> &SpecCatalog {
        &self.catalog
    }

    /// Generate and persist a production batch from a strategy/concept
    /// pairing.
    ///
    /// Resolves the strategy's raw environment labels, expands each
    /// resolved spec into a ticket, consolidates tickets into jobs, and
    /// stores the batch/ticket set atomically. Best-effort throughout:
    /// unresolvable labels and absent specs are skipped, never fatal.
    pub async fn generate(
        &self,
        strategy: &StrategyIntent,
        concept: &ConceptDirective,
        batch_name: Option<&str>,
    ) -> Result<(ProductionBatch, Vec<ProductionTicket>)> {
        validate_inputs(strategy, concept)?;

        let resolved = LabelNormalizer::new(&self.catalog).normalize(&strategy.environments);
        let batch_id = Uuid::new_v4();
        let tickets = expand::expand(&self.catalog, &resolved, strategy, concept, batch_id);
        let jobs = consolidate::consolidate(&tickets, &concept.concept_name);

        let segment_label = if strategy.segment_name.trim().is_empty() {
            &strategy.segment_id
        } else {
            &strategy.segment_name
        };
        let batch = ProductionBatch {
            id: batch_id,
            segment_id: strategy.segment_id.clone(),
            segment_name: strategy.segment_name.clone(),
            concept_id: concept.concept_id.clone(),
            concept_name: concept.concept_name.clone(),
            name: batch_name
                .map(str::to_string)
                .unwrap_or_else(|| format!("{segment_label} – {}", concept.concept_name)),
            jobs,
            status: ProductionStatus::Pending,
            created_at: Utc::now(),
        };

        self.repo
            .insert_batch(batch.clone(), tickets.clone())
            .await
            .context("failed to persist production batch")?;

        tracing::info!(
            batch_id = %batch.id,
            segment = %segment_label,
            concept = %concept.concept_name,
            tickets = tickets.len(),
            jobs = batch.jobs.len(),
            "generated production batch"
        );

        Ok((batch, tickets))
    }

    /// Consolidate caller-supplied loose selections into jobs without
    /// touching the store. Same grouping semantics as [`generate`].
    ///
    /// [`generate`]: MatrixService::generate
    pub fn group_by_creative(
        &self,
        selections: &[SpecSelection],
        concept_name: &str,
    ) -> Vec<ProductionJob> {
        consolidate::group_by_creative(selections, concept_name)
    }

    /// Fetch a batch and its tickets. `None` when the batch is unknown.
    pub async fn batch(
        &self,
        batch_id: Uuid,
    ) -> Result<Option<(ProductionBatch, Vec<ProductionTicket>)>> {
        let Some(batch) = self.repo.batch(batch_id).await? else {
            return Ok(None);
        };
        let tickets = self.repo.tickets_for_batch(batch_id).await?;
        Ok(Some((batch, tickets)))
    }

    /// Move a ticket to a new status.
    ///
    /// The transition is validated against the state machine first; an
    /// illegal edge is an error. `Ok(None)` means the ticket is unknown or
    /// was moved by a concurrent caller between the read and the write.
    pub async fn update_ticket_status(
        &self,
        ticket_id: Uuid,
        new: ProductionStatus,
    ) -> Result<Option<ProductionTicket>> {
        let Some(ticket) = self.repo.ticket(ticket_id).await? else {
            return Ok(None);
        };

        StatusMachine::transition(ticket.status, new)?;

        let updated = self
            .repo
            .update_ticket_status(ticket_id, ticket.status, new)
            .await?;
        if updated.is_none() {
            tracing::warn!(
                ticket_id = %ticket_id,
                "ticket status changed under us, update not applied"
            );
        }
        Ok(updated)
    }

    /// Move one job within a batch to a new status, under the same
    /// transition rules and optimistic-lock contract as tickets.
    pub async fn update_job_status(
        &self,
        batch_id: Uuid,
        job_id: &str,
        new: ProductionStatus,
    ) -> Result<Option<ProductionBatch>> {
        let Some(batch) = self.repo.batch(batch_id).await? else {
            return Ok(None);
        };
        let Some(job) = batch.jobs.iter().find(|j| j.job_id == job_id) else {
            return Ok(None);
        };

        StatusMachine::transition(job.status, new)?;

        let updated = self
            .repo
            .update_job_status(batch_id, job_id, job.status, new)
            .await?;
        if updated.is_none() {
            tracing::warn!(
                batch_id = %batch_id,
                job_id = %job_id,
                "job status changed under us, update not applied"
            );
        }
        Ok(updated)
    }

    /// List all persisted batches, oldest first.
    pub async fn list_batches(&self) -> Result<Vec<ProductionBatch>> {
        self.repo.list_batches().await
    }
}

/// Reject structurally invalid input at the boundary.
fn validate_inputs(
    strategy: &StrategyIntent,
    concept: &ConceptDirective,
) -> Result<(), ValidationError> {
    if strategy.segment_id.trim().is_empty() && strategy.segment_name.trim().is_empty() {
        return Err(ValidationError::MissingSegment);
    }
    if concept.concept_id.trim().is_empty() && concept.concept_name.trim().is_empty() {
        return Err(ValidationError::MissingConcept);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
