//! Job consolidation: many-to-one grouping of tickets into master jobs.
//!
//! Many placements consume the same physical master asset (three social
//! platforms all taking the same 9:16 video, say). Producing each placement
//! separately would be redundant work, so tickets that share a master are
//! folded into a single job carrying one delivery destination per canonical
//! spec. This collapse of N specs into M <= N jobs is the point of the
//! whole engine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use fanout_store::models::{
    DeliveryDestination, ProductionJob, ProductionStatus, ProductionTicket, SpecDefinition,
};

/// Bucket used for tickets with no usable dimensions, so they still
/// surface as a job instead of being dropped.
const GENERIC_DIMENSIONS: &str = "GENERIC";

/// Fallback file type when a selection carries none.
const FALLBACK_FILE_TYPE: &str = "asset";

/// Grouping key: two entries with equal keys belong to exactly one job.
///
/// Deterministic function of (dimensions-or-GENERIC, lowercased file type,
/// concept identity). Platform is deliberately absent -- the same master
/// file delivered to two platforms is still one job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    dimensions: String,
    file_type: String,
    concept: String,
}

/// A loose spec selection for the bulk grouping entry point.
///
/// Callers that already hold resolved spec selections (from the spec
/// library or a UI) pass these instead of raw strategy labels. Every field
/// is optional; the consolidator applies the documented fallback chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecSelection {
    #[serde(default)]
    pub spec_id: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub format_name: Option<String>,
    #[serde(default)]
    pub placement: Option<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub orientation: Option<String>,
    #[serde(default)]
    pub safe_zone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub max_duration_secs: Option<u32>,
}

impl From<&SpecDefinition> for SpecSelection {
    fn from(spec: &SpecDefinition) -> Self {
        Self {
            spec_id: Some(spec.id.clone()),
            platform: Some(spec.platform.clone()),
            format_name: Some(spec.format_name.clone()),
            placement: Some(spec.placement.clone()),
            dimensions: Some(spec.dimensions.clone()),
            file_type: Some(spec.file_type.clone()),
            aspect_ratio: Some(spec.aspect_ratio.clone()),
            safe_zone: Some(spec.safe_zone.clone()),
            max_duration_secs: (spec.max_duration_secs > 0).then_some(spec.max_duration_secs),
            ..Self::default()
        }
    }
}

/// Normalized view of one entry, after the fallback chain has been applied.
struct SpecFacts {
    dimensions: Option<String>,
    file_type: String,
    aspect_ratio: String,
    platform: String,
    spec_id: String,
    format_name: String,
    notes: String,
    max_duration_secs: Option<u32>,
}

impl SpecFacts {
    /// Apply the best-effort fallback chain to a loose selection.
    ///
    /// `position` (1-based) feeds the `SPEC-n` placeholder ID for entries
    /// that carry none.
    fn from_selection(sel: &SpecSelection, position: usize) -> Self {
        let dimensions = sel.dimensions.clone().filter(|d| !d.is_empty()).or_else(|| {
            match (sel.width, sel.height) {
                (Some(w), Some(h)) => Some(format!("{w}x{h}")),
                _ => None,
            }
        });

        let file_type = sel
            .file_type
            .clone()
            .filter(|f| !f.is_empty())
            .or_else(|| sel.media_type.clone().filter(|f| !f.is_empty()))
            .unwrap_or_else(|| FALLBACK_FILE_TYPE.to_string());

        let aspect_ratio = sel
            .aspect_ratio
            .clone()
            .filter(|a| !a.is_empty())
            .or_else(|| sel.orientation.clone())
            .unwrap_or_default();

        let spec_id = sel
            .spec_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("SPEC-{position}"));

        let format_name = sel
            .format_name
            .clone()
            .filter(|f| !f.is_empty())
            .or_else(|| sel.placement.clone().filter(|p| !p.is_empty()))
            .unwrap_or_else(|| dimensions.clone().unwrap_or_else(|| GENERIC_DIMENSIONS.to_string()));

        let notes = sel
            .safe_zone
            .clone()
            .or_else(|| sel.notes.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Standard".to_string());

        Self {
            dimensions,
            file_type,
            aspect_ratio,
            platform: sel
                .platform
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            spec_id,
            format_name,
            notes,
            max_duration_secs: sel.max_duration_secs.filter(|&d| d > 0),
        }
    }

    /// Lift facts from a ticket's embedded spec snapshot.
    fn from_ticket(ticket: &ProductionTicket) -> Self {
        let spec = &ticket.spec;
        Self {
            dimensions: Some(spec.dimensions.clone()).filter(|d| !d.is_empty()),
            file_type: spec.file_type.clone(),
            aspect_ratio: spec.aspect_ratio.clone(),
            platform: spec.platform.clone(),
            spec_id: spec.id.clone(),
            format_name: spec.format_name.clone(),
            notes: if spec.safe_zone.is_empty() {
                "Standard".to_string()
            } else {
                spec.safe_zone.clone()
            },
            max_duration_secs: (spec.max_duration_secs > 0).then_some(spec.max_duration_secs),
        }
    }

    fn group_key(&self, concept: &str) -> GroupKey {
        GroupKey {
            dimensions: self
                .dimensions
                .clone()
                .unwrap_or_else(|| GENERIC_DIMENSIONS.to_string()),
            file_type: self.file_type.to_lowercase(),
            concept: concept.to_string(),
        }
    }
}

/// Group a batch of tickets into consolidated production jobs.
///
/// All tickets in one call belong to one creative concept; tickets whose
/// keys collide end up in one job with distinct destinations.
pub fn consolidate(tickets: &[ProductionTicket], concept_name: &str) -> Vec<ProductionJob> {
    let facts: Vec<SpecFacts> = tickets.iter().map(SpecFacts::from_ticket).collect();
    fold_into_jobs(&facts, concept_name)
}

/// Bulk entry point for callers that already hold resolved spec selections.
pub fn group_by_creative(selections: &[SpecSelection], concept_name: &str) -> Vec<ProductionJob> {
    let facts: Vec<SpecFacts> = selections
        .iter()
        .enumerate()
        .map(|(idx, sel)| SpecFacts::from_selection(sel, idx + 1))
        .collect();
    fold_into_jobs(&facts, concept_name)
}

/// The shared fold: one job per distinct group key, one destination per
/// distinct spec ID within a job, output in first-seen order.
fn fold_into_jobs(entries: &[SpecFacts], concept_name: &str) -> Vec<ProductionJob> {
    let mut jobs: Vec<ProductionJob> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for facts in entries {
        let key = facts.group_key(concept_name);

        let job_idx = match index.get(&key) {
            Some(&idx) => idx,
            None => {
                let job = ProductionJob {
                    job_id: format!("JOB-{}", jobs.len() + 1),
                    asset_type: asset_type_label(facts),
                    technical_summary: technical_summary(facts),
                    destinations: Vec::new(),
                    status: ProductionStatus::Pending,
                };
                jobs.push(job);
                index.insert(key, jobs.len() - 1);
                jobs.len() - 1
            }
        };

        let job = &mut jobs[job_idx];
        if job.destinations.iter().any(|d| d.spec_id == facts.spec_id) {
            continue;
        }
        job.destinations.push(DeliveryDestination {
            platform_name: facts.platform.clone(),
            spec_id: facts.spec_id.clone(),
            format_name: facts.format_name.clone(),
            special_notes: facts.notes.clone(),
        });
    }

    jobs
}

/// e.g. "9:16 mp4", or "1080x1920 mp4" when no aspect ratio is known.
fn asset_type_label(facts: &SpecFacts) -> String {
    let shape = if facts.aspect_ratio.is_empty() {
        facts
            .dimensions
            .clone()
            .unwrap_or_else(|| GENERIC_DIMENSIONS.to_string())
    } else {
        facts.aspect_ratio.clone()
    };
    format!("{shape} {}", facts.file_type).trim().to_string()
}

/// e.g. "1080x1920, 15s, MP4".
fn technical_summary(facts: &SpecFacts) -> String {
    let mut parts = vec![
        facts
            .dimensions
            .clone()
            .unwrap_or_else(|| GENERIC_DIMENSIONS.to_string()),
    ];
    if let Some(duration) = facts.max_duration_secs {
        parts.push(format!("{duration}s"));
    }
    parts.push(facts.file_type.to_uppercase());
    parts.join(", ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use fanout_store::SpecCatalog;

    fn selection(platform: &str, id: &str, dims: &str, file: &str) -> SpecSelection {
        SpecSelection {
            spec_id: Some(id.to_string()),
            platform: Some(platform.to_string()),
            dimensions: Some(dims.to_string()),
            file_type: Some(file.to_string()),
            ..SpecSelection::default()
        }
    }

    #[test]
    fn same_master_collapses_to_one_job() {
        // TikTok + Instagram both consume the same 9:16 mp4 master.
        let selections = vec![
            selection("TikTok", "TIKTOK_FEED", "1080x1920", "mp4"),
            selection("Instagram", "IG_REELS", "1080x1920", "mp4"),
        ];
        let jobs = group_by_creative(&selections, "Summer Sale");

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].destinations.len(), 2);
        assert_eq!(jobs[0].destinations[0].platform_name, "TikTok");
        assert_eq!(jobs[0].destinations[1].platform_name, "Instagram");
    }

    #[test]
    fn any_key_field_change_splits_jobs() {
        let base = selection("TikTok", "A", "1080x1920", "mp4");

        let other_dims = selection("TikTok", "B", "1920x1080", "mp4");
        assert_eq!(group_by_creative(&[base.clone(), other_dims], "C1").len(), 2);

        let other_file = selection("TikTok", "B", "1080x1920", "mov");
        assert_eq!(group_by_creative(&[base.clone(), other_file], "C1").len(), 2);

        // Different concepts consolidate in different calls entirely, but a
        // single-call check still holds: same selection under two concepts
        // never shares a key.
        let a = group_by_creative(std::slice::from_ref(&base), "C1");
        let b = group_by_creative(std::slice::from_ref(&base), "C2");
        assert_eq!(a[0].job_id, "JOB-1");
        assert_eq!(b[0].job_id, "JOB-1");
    }

    #[test]
    fn file_type_match_is_case_insensitive() {
        let jobs = group_by_creative(
            &[
                selection("TikTok", "A", "1080x1920", "MP4"),
                selection("Instagram", "B", "1080x1920", "mp4"),
            ],
            "C1",
        );
        assert_eq!(jobs.len(), 1);
    }

    #[test]
    fn duplicate_spec_id_is_not_duplicated() {
        let sel = selection("TikTok", "TIKTOK_FEED", "1080x1920", "mp4");
        let jobs = group_by_creative(&[sel.clone(), sel], "C1");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].destinations.len(), 1);
    }

    #[test]
    fn missing_dimensions_bucket_as_generic() {
        let sel = SpecSelection {
            spec_id: Some("AUDIO_SPOT".to_string()),
            platform: Some("Spotify".to_string()),
            file_type: Some("mp3".to_string()),
            ..SpecSelection::default()
        };
        let jobs = group_by_creative(&[sel], "C1");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].technical_summary, "GENERIC, MP3");
        assert_eq!(jobs[0].destinations.len(), 1);
    }

    #[test]
    fn width_height_fallback_builds_dimensions() {
        let sel = SpecSelection {
            spec_id: Some("X".to_string()),
            width: Some(300),
            height: Some(250),
            file_type: Some("jpg".to_string()),
            ..SpecSelection::default()
        };
        let jobs = group_by_creative(&[sel], "C1");
        assert_eq!(jobs[0].technical_summary, "300x250, JPG");
    }

    #[test]
    fn empty_file_type_falls_through_to_media_type() {
        let sel = SpecSelection {
            spec_id: Some("X".to_string()),
            dimensions: Some("1080x1920".to_string()),
            file_type: Some("".to_string()),
            media_type: Some("mp4".to_string()),
            ..SpecSelection::default()
        };
        let jobs = group_by_creative(&[sel], "C1");
        assert_eq!(jobs[0].technical_summary, "1080x1920, MP4");
    }

    #[test]
    fn placeholder_ids_and_fallback_fields() {
        let jobs = group_by_creative(&[SpecSelection::default()], "C1");
        let dest = &jobs[0].destinations[0];
        assert_eq!(dest.spec_id, "SPEC-1");
        assert_eq!(dest.platform_name, "Unknown");
        assert_eq!(dest.format_name, "GENERIC");
        assert_eq!(dest.special_notes, "Standard");
    }

    #[test]
    fn job_ids_are_sequential_in_first_seen_order() {
        let jobs = group_by_creative(
            &[
                selection("Meta", "A", "1080x1920", "mp4"),
                selection("YouTube", "B", "1920x1080", "mp4"),
                selection("Instagram", "C", "1080x1920", "mp4"),
            ],
            "C1",
        );
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].job_id, "JOB-1");
        assert_eq!(jobs[1].job_id, "JOB-2");
        assert_eq!(jobs[0].destinations.len(), 2);
    }

    #[test]
    fn technical_summary_includes_duration() {
        let catalog = SpecCatalog::embedded();
        let sel = SpecSelection::from(catalog.lookup("META_STORY").unwrap());
        let jobs = group_by_creative(&[sel], "C1");
        assert_eq!(jobs[0].technical_summary, "1080x1920, 15s, MP4");
        assert_eq!(jobs[0].asset_type, "9:16 mp4");
    }

    #[test]
    fn zero_duration_is_omitted_from_summary() {
        let catalog = SpecCatalog::embedded();
        let sel = SpecSelection::from(catalog.lookup("DISPLAY_MPU").unwrap());
        let jobs = group_by_creative(&[sel], "C1");
        assert_eq!(jobs[0].technical_summary, "300x250, HTML5/JPG");
    }
}
