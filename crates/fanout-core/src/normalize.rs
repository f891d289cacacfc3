//! Label normalization: free-text environment labels to canonical spec IDs.
//!
//! Strategy cards store human-readable labels ("Meta: Stories/Reels (9:16)")
//! while the catalog is keyed by IDs like `META_STORY`. Normalization is an
//! explicit, ordered rule table evaluated top to bottom, so the mapping is
//! deterministic and each rule is independently testable.

use fanout_store::SpecCatalog;

/// One keyword-containment rule.
///
/// A rule fires when any of its clauses matches; a clause matches when all
/// of its substrings occur in the uppercased label.
#[derive(Debug, Clone, Copy)]
pub struct LabelRule {
    pub canonical_id: &'static str,
    pub clauses: &'static [&'static [&'static str]],
}

impl LabelRule {
    /// Test this rule against an uppercased label.
    pub fn matches(&self, upper_label: &str) -> bool {
        self.clauses
            .iter()
            .any(|clause| clause.iter().all(|needle| upper_label.contains(needle)))
    }
}

/// The fixed rule table, in evaluation order. First match wins.
pub const LABEL_RULES: &[LabelRule] = &[
    LabelRule {
        canonical_id: "META_STORY",
        clauses: &[&["STOR"], &["REEL"]],
    },
    LabelRule {
        canonical_id: "META_FEED",
        clauses: &[&["FEED", "META"]],
    },
    LabelRule {
        canonical_id: "YT_BUMPER",
        clauses: &[&["BUMPER"], &["6S"], &["YOUTUBE", "16:9"]],
    },
    LabelRule {
        canonical_id: "DISPLAY_MPU",
        clauses: &[&["300X250"], &["MPU"]],
    },
    LabelRule {
        canonical_id: "DISPLAY_LEADER",
        clauses: &[&["728X90"], &["LEADER"]],
    },
];

/// Fallback pack used when a non-empty label list resolves to nothing, so
/// any stated intent still yields a producible environment set.
pub const DEFAULT_ENVIRONMENTS: &[&str] = &["META_STORY", "YT_BUMPER", "DISPLAY_MPU"];

/// Resolver from raw environment labels to canonical spec IDs.
///
/// Pure over its inputs: the same label sequence against the same catalog
/// always yields the same ID sequence, independent of prior calls.
pub struct LabelNormalizer<'a> {
    catalog: &'a SpecCatalog,
}

impl<'a> LabelNormalizer<'a> {
    pub fn new(catalog: &'a SpecCatalog) -> Self {
        Self { catalog }
    }

    /// Normalize a sequence of raw labels to catalog IDs.
    ///
    /// Per label, first rule wins:
    /// 1. exact case-insensitive catalog ID pass-through;
    /// 2. the fixed keyword rule table ([`LABEL_RULES`]), filtered to IDs
    ///    present in the active catalog;
    /// 3. pixel-dimension containment against the live catalog (covers
    ///    file-sourced catalogs the static table knows nothing about);
    /// 4. no match: the label is discarded.
    ///
    /// The result is deduplicated preserving first-seen order. An input
    /// that resolves to nothing (including an empty input) yields
    /// [`DEFAULT_ENVIRONMENTS`], filtered to the active catalog and falling
    /// back to the catalog's first ID so the non-empty guarantee holds for
    /// fixture catalogs too.
    pub fn normalize(&self, raw_labels: &[String]) -> Vec<String> {
        let mut resolved: Vec<String> = Vec::new();

        for raw in raw_labels {
            let label = raw.trim();
            if label.is_empty() {
                continue;
            }
            if let Some(id) = self.resolve_label(label) {
                if !resolved.contains(&id) {
                    resolved.push(id);
                }
            } else {
                tracing::debug!(label, "environment label matched no rule, discarding");
            }
        }

        if resolved.is_empty() {
            return self.default_set();
        }

        resolved
    }

    /// Resolve one label, or `None` when nothing matches.
    pub fn resolve_label(&self, label: &str) -> Option<String> {
        let upper = label.to_uppercase();

        // 1. Direct ID pass-through.
        if self.catalog.contains(&upper) {
            return Some(upper);
        }

        // 2. Keyword rule table, in fixed order.
        for rule in LABEL_RULES {
            if rule.matches(&upper) && self.catalog.contains(rule.canonical_id) {
                return Some(rule.canonical_id.to_string());
            }
        }

        // 3. Known pixel-dimension substring (e.g. "1080x1350 portrait").
        for spec in self.catalog.all() {
            if !spec.dimensions.is_empty() && upper.contains(&spec.dimensions.to_uppercase()) {
                return Some(spec.id.clone());
            }
        }

        None
    }

    /// The documented default environment set for this catalog.
    pub fn default_set(&self) -> Vec<String> {
        let defaults: Vec<String> = DEFAULT_ENVIRONMENTS
            .iter()
            .filter(|id| self.catalog.contains(id))
            .map(|id| id.to_string())
            .collect();
        if !defaults.is_empty() {
            return defaults;
        }
        // Fixture catalogs without the stock IDs: fall back to the first
        // defined spec so the non-empty guarantee still holds.
        self.catalog
            .ids()
            .next()
            .map(|id| vec![id.to_string()])
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
