//! `fanout specs` commands: browse and extend the active spec catalog.

use std::path::Path;

use anyhow::{Context, Result, bail};

use fanout_store::SpecCatalog;
use fanout_store::models::{MediaType, SpecDefinition};

/// List all specs in the catalog.
pub fn run_list(catalog: &SpecCatalog, verbose: bool) -> Result<()> {
    if catalog.is_empty() {
        println!("Spec catalog is empty.");
        return Ok(());
    }

    println!(
        "{:<18} {:<16} {:<18} {:<12} {:<10} {:>8}",
        "ID", "PLATFORM", "PLACEMENT", "DIMENSIONS", "FILE", "MAX DUR"
    );
    println!("{}", "-".repeat(86));

    for spec in catalog.all() {
        let duration = if spec.max_duration_secs > 0 {
            format!("{}s", spec.max_duration_secs)
        } else {
            "-".to_string()
        };
        println!(
            "{:<18} {:<16} {:<18} {:<12} {:<10} {:>8}",
            spec.id, spec.platform, spec.placement, spec.dimensions, spec.file_type, duration
        );
        if verbose && !spec.safe_zone.is_empty() {
            println!("  safe zone: {}", spec.safe_zone);
        }
    }

    Ok(())
}

/// Show the full definition of one spec.
pub fn run_show(catalog: &SpecCatalog, spec_id: &str) -> Result<()> {
    let Some(spec) = catalog.lookup(&spec_id.to_uppercase()) else {
        bail!("spec {spec_id:?} not found in the active catalog");
    };
    print_spec(spec);
    Ok(())
}

/// Fields for a new spec, as collected from the command line.
pub struct AddSpecArgs {
    pub platform: String,
    pub placement: String,
    pub format_name: Option<String>,
    pub dimensions: String,
    pub aspect_ratio: String,
    pub max_duration_secs: u32,
    pub file_type: String,
    pub media: Vec<String>,
    pub html5: bool,
    pub safe_zone: Option<String>,
}

/// Derive a canonical ID for a new spec and append it to the file-backed
/// catalog at `path`.
pub fn run_add(catalog: &SpecCatalog, path: &Path, args: AddSpecArgs) -> Result<()> {
    let allowed_media = args
        .media
        .iter()
        .map(|m| m.parse::<MediaType>())
        .collect::<Result<Vec<_>, _>>()
        .context("invalid --media value")?;

    let id = catalog.derive_id(&args.platform, &args.placement);
    let spec = SpecDefinition {
        id: id.clone(),
        format_name: args.format_name.unwrap_or_else(|| args.placement.clone()),
        platform: args.platform,
        placement: args.placement,
        dimensions: args.dimensions,
        aspect_ratio: args.aspect_ratio,
        max_duration_secs: args.max_duration_secs,
        file_type: args.file_type,
        allowed_media,
        html5_capable: args.html5,
        safe_zone: args.safe_zone.unwrap_or_default(),
    };

    let mut specs = catalog.all().to_vec();
    specs.push(spec);
    let updated = SpecCatalog::from_specs(specs);
    updated.save_to_path(path)?;

    println!("Added spec {id} to {}", path.display());
    if let Some(saved) = updated.lookup(&id) {
        print_spec(saved);
    }
    Ok(())
}

fn print_spec(spec: &SpecDefinition) {
    println!("{} ({} / {})", spec.id, spec.platform, spec.placement);
    println!("  format:       {}", spec.format_name);
    println!("  dimensions:   {} ({})", spec.dimensions, spec.aspect_ratio);
    if spec.max_duration_secs > 0 {
        println!("  max duration: {}s", spec.max_duration_secs);
    }
    println!("  file type:    {}", spec.file_type);
    let media: Vec<String> = spec.allowed_media.iter().map(|m| m.to_string()).collect();
    println!("  media:        {}", media.join(", "));
    println!("  html5:        {}", if spec.html5_capable { "yes" } else { "no" });
    if !spec.safe_zone.is_empty() {
        println!("  safe zone:    {}", spec.safe_zone);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
