//! Asset expansion: one production ticket per resolved spec.
//!
//! The explosion step of the pipeline. Each resolved catalog ID becomes one
//! ticket carrying a frozen snapshot of its spec, a derived taxonomy name,
//! and the creative copy from the strategy/concept pairing.

use chrono::Utc;
use uuid::Uuid;

use fanout_store::SpecCatalog;
use fanout_store::models::{
    ConceptDirective, MediaType, ProductionStatus, ProductionTicket, SpecDefinition,
    StrategyIntent, TicketMeta,
};

/// Expand resolved spec IDs into production tickets for the given batch.
///
/// IDs absent from the catalog are skipped without error: a missing spec
/// means "this environment cannot be produced", and the rest of the batch
/// still goes through. Tickets start out `pending`.
pub fn expand(
    catalog: &SpecCatalog,
    resolved_ids: &[String],
    strategy: &StrategyIntent,
    concept: &ConceptDirective,
    batch_id: Uuid,
) -> Vec<ProductionTicket> {
    let mut tickets = Vec::with_capacity(resolved_ids.len());

    for spec_id in resolved_ids {
        let Some(spec) = catalog.lookup(spec_id) else {
            tracing::debug!(spec_id, "resolved ID missing from catalog, skipping");
            continue;
        };

        let copy_headline = if concept.master_headline.trim().is_empty() {
            strategy.message_pillar.clone()
        } else {
            concept.master_headline.clone()
        };

        let now = Utc::now();
        tickets.push(ProductionTicket {
            id: Uuid::new_v4(),
            batch_id,
            asset_name: asset_name(strategy, spec, concept),
            platform: spec.platform.clone(),
            placement: spec.placement.clone(),
            dimensions: spec.dimensions.clone(),
            spec: spec.clone(),
            asset_type: primary_media_type(spec),
            copy_headline,
            visual_directive: concept.visual_reference.clone(),
            status: ProductionStatus::Pending,
            meta: TicketMeta::default(),
            created_at: now,
            updated_at: now,
        });
    }

    tickets
}

/// Derived taxonomy name: `Segment_Platform_Placement_Concept`, each
/// component stripped of whitespace. An empty segment name falls back to
/// the segment ID so the name never starts with a bare separator.
fn asset_name(strategy: &StrategyIntent, spec: &SpecDefinition, concept: &ConceptDirective) -> String {
    let segment = sanitize(&strategy.segment_name);
    let segment = if segment.is_empty() {
        sanitize(&strategy.segment_id)
    } else {
        segment
    };
    format!(
        "{}_{}_{}_{}",
        segment,
        sanitize(&spec.platform),
        sanitize(&spec.placement),
        sanitize(&concept.concept_name),
    )
}

/// Strip all whitespace from a name component.
fn sanitize(component: &str) -> String {
    component.split_whitespace().collect()
}

/// First allowed media type of the spec; `Static` when the list is empty.
fn primary_media_type(spec: &SpecDefinition) -> MediaType {
    spec.allowed_media.first().copied().unwrap_or(MediaType::Static)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
