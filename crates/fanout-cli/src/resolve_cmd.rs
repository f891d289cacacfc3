//! `fanout resolve` command: show how raw environment labels map to
//! canonical spec IDs, per label and as the final deduplicated set.

use anyhow::Result;

use fanout_core::LabelNormalizer;
use fanout_store::SpecCatalog;

pub fn run_resolve(catalog: SpecCatalog, labels: &[String]) -> Result<()> {
    let normalizer = LabelNormalizer::new(&catalog);

    for label in labels {
        match normalizer.resolve_label(label.trim()) {
            Some(id) => println!("{label:<40} -> {id}"),
            None => println!("{label:<40} -> (no match)"),
        }
    }

    let resolved = normalizer.normalize(labels);
    println!();
    println!("Resolved set: {}", resolved.join(", "));

    Ok(())
}
