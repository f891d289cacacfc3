//! `fanout generate` command: run the full pipeline for one
//! strategy/concept pairing and print the consolidated plan.

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use fanout_core::MatrixService;
use fanout_store::models::{ConceptDirective, StrategyIntent};
use fanout_store::{MemoryRepository, SpecCatalog};

/// Arguments collected from the CLI for one generation run.
pub struct GenerateArgs {
    pub segment: String,
    pub pillar: String,
    pub environments: Vec<String>,
    pub concept: String,
    pub headline: String,
    pub visual: Option<String>,
    pub batch_name: Option<String>,
    pub json: bool,
}

/// Run the generate command against a fresh in-memory store.
pub async fn run_generate(catalog: SpecCatalog, args: GenerateArgs) -> Result<()> {
    let strategy = StrategyIntent {
        segment_id: args.segment.clone(),
        segment_name: args.segment,
        message_pillar: args.pillar,
        environments: args.environments,
    };
    let concept = ConceptDirective {
        concept_id: args.concept.clone(),
        concept_name: args.concept,
        master_headline: args.headline,
        visual_reference: args.visual,
    };

    let service = MatrixService::new(Arc::new(catalog), Arc::new(MemoryRepository::new()));
    let (batch, tickets) = service
        .generate(&strategy, &concept, args.batch_name.as_deref())
        .await?;

    if args.json {
        let payload = json!({ "batch": batch, "tickets": tickets });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Batch: {} ({})", batch.name, batch.id);
    println!(
        "Segment: {} | Concept: {}",
        batch.segment_name, batch.concept_name
    );
    println!();

    println!(
        "Jobs: {} master asset(s) from {} ticket(s)",
        batch.jobs.len(),
        tickets.len()
    );
    for job in &batch.jobs {
        println!("  {} [{}] {}", job.job_id, job.technical_summary, job.asset_type);
        for dest in &job.destinations {
            println!(
                "    -> {} / {} ({})",
                dest.platform_name, dest.spec_id, dest.format_name
            );
        }
    }
    println!();

    println!("Tickets:");
    for ticket in &tickets {
        println!(
            "  {:<45} {:<12} {:<10} {}",
            ticket.asset_name, ticket.dimensions, ticket.asset_type, ticket.status
        );
    }

    Ok(())
}
