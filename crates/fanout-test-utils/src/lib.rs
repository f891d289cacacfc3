//! Shared fixtures for fanout integration tests.
//!
//! Provides canned strategy/concept inputs and fixture catalogs so tests
//! exercise the pipeline against known spec data instead of the embedded
//! library.

use fanout_store::SpecCatalog;
use fanout_store::models::{ConceptDirective, MediaType, SpecDefinition, StrategyIntent};

/// "The Gamer" strategy segment targeting the given raw labels.
pub fn gamer_strategy(environments: &[&str]) -> StrategyIntent {
    StrategyIntent {
        segment_id: "SEG-GAMER".to_string(),
        segment_name: "The Gamer".to_string(),
        message_pillar: "Play without limits".to_string(),
        environments: environments.iter().map(|s| s.to_string()).collect(),
    }
}

/// The "Level Up" creative concept.
pub fn level_up_concept() -> ConceptDirective {
    ConceptDirective {
        concept_id: "CON-LEVELUP".to_string(),
        concept_name: "Level Up".to_string(),
        master_headline: "Level up your everyday".to_string(),
        visual_reference: Some("concepts/level-up/hero.png".to_string()),
    }
}

/// A minimal vertical-video spec for fixture catalogs.
pub fn vertical_video_spec(id: &str, platform: &str) -> SpecDefinition {
    SpecDefinition {
        id: id.to_string(),
        platform: platform.to_string(),
        placement: "In-Feed".to_string(),
        format_name: "In-Feed Video".to_string(),
        dimensions: "1080x1920".to_string(),
        aspect_ratio: "9:16".to_string(),
        max_duration_secs: 30,
        file_type: "mp4".to_string(),
        allowed_media: vec![MediaType::Video],
        html5_capable: false,
        safe_zone: "Keep captions clear of platform UI.".to_string(),
    }
}

/// A two-platform fixture catalog where both specs share one 9:16 master.
pub fn shared_master_catalog() -> SpecCatalog {
    SpecCatalog::from_specs(vec![
        vertical_video_spec("TIKTOK_FEED", "TikTok"),
        vertical_video_spec("IG_REELS", "Instagram"),
    ])
}
