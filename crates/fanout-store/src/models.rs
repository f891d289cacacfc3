use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Lifecycle status shared by tickets, jobs, and batches.
///
/// The set is closed: no other value is valid anywhere in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionStatus {
    Pending,
    InProduction,
    Approved,
    Delivered,
}

impl fmt::Display for ProductionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::InProduction => "in_production",
            Self::Approved => "approved",
            Self::Delivered => "delivered",
        };
        f.write_str(s)
    }
}

impl FromStr for ProductionStatus {
    type Err = ProductionStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_production" => Ok(Self::InProduction),
            "approved" => Ok(Self::Approved),
            "delivered" => Ok(Self::Delivered),
            other => Err(ProductionStatusParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ProductionStatus`] string.
#[derive(Debug, Clone)]
pub struct ProductionStatusParseError(pub String);

impl fmt::Display for ProductionStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid production status: {:?}", self.0)
    }
}

impl std::error::Error for ProductionStatusParseError {}

// ---------------------------------------------------------------------------

/// Media type a placement accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Video,
    Static,
    Html5,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Video => "video",
            Self::Static => "static",
            Self::Html5 => "html5",
        };
        f.write_str(s)
    }
}

impl FromStr for MediaType {
    type Err = MediaTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(Self::Video),
            "static" => Ok(Self::Static),
            "html5" => Ok(Self::Html5),
            other => Err(MediaTypeParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`MediaType`] string.
#[derive(Debug, Clone)]
pub struct MediaTypeParseError(pub String);

impl fmt::Display for MediaTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid media type: {:?}", self.0)
    }
}

impl std::error::Error for MediaTypeParseError {}

// ---------------------------------------------------------------------------
// Catalog types
// ---------------------------------------------------------------------------

/// Canonical technical profile for one ad placement.
///
/// Loaded once at startup and immutable for the process lifetime. Tickets
/// embed a frozen clone of the definition they were expanded from, so a
/// catalog swap never retroactively changes existing tickets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecDefinition {
    /// Canonical environment ID (e.g. `META_STORY`).
    pub id: String,
    /// Platform name (e.g. "Meta", "YouTube").
    pub platform: String,
    /// Placement within the platform (e.g. "Stories / Reels").
    pub placement: String,
    /// Human-readable format name (e.g. "9:16 Vertical").
    pub format_name: String,
    /// Pixel dimensions as "WxH" (e.g. "1080x1920").
    pub dimensions: String,
    /// Aspect ratio label (e.g. "9:16").
    pub aspect_ratio: String,
    /// Maximum duration in seconds; 0 means no duration limit.
    #[serde(default)]
    pub max_duration_secs: u32,
    /// Delivery file type (e.g. "mp4", "html5/jpg").
    pub file_type: String,
    /// Media types this placement accepts, in preference order.
    #[serde(default)]
    pub allowed_media: Vec<MediaType>,
    /// Whether the placement can run HTML5 creative.
    #[serde(default)]
    pub html5_capable: bool,
    /// Safe-zone guidance for designers.
    #[serde(default)]
    pub safe_zone: String,
}

// ---------------------------------------------------------------------------
// Pipeline inputs
// ---------------------------------------------------------------------------

/// Audience strategy input: one segment with its message and target
/// environments, as captured by the strategy subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyIntent {
    pub segment_id: String,
    pub segment_name: String,
    pub message_pillar: String,
    /// Raw target-environment labels, possibly free text
    /// (e.g. "Meta: Stories/Reels (9:16)").
    pub environments: Vec<String>,
}

/// Creative concept input from the concept subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptDirective {
    pub concept_id: String,
    pub concept_name: String,
    pub master_headline: String,
    /// Visual description or a reference path to the master visual.
    pub visual_reference: Option<String>,
}

// ---------------------------------------------------------------------------
// Pipeline outputs
// ---------------------------------------------------------------------------

/// Optional production metadata attached to a ticket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketMeta {
    /// Producer or editor responsible.
    pub owner: Option<String>,
    /// ISO date string.
    pub due_date: Option<String>,
    /// e.g. "v1", "v1.1_localized".
    pub version_tag: Option<String>,
    /// e.g. "R1", "R2", "Final".
    pub round_label: Option<String>,
}

/// One concrete deliverable work item tied to a single resolved spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionTicket {
    pub id: Uuid,
    pub batch_id: Uuid,
    /// Derived taxonomy name: `Segment_Platform_Placement_Concept`.
    pub asset_name: String,
    pub platform: String,
    pub placement: String,
    pub dimensions: String,
    /// Frozen snapshot of the spec this ticket was expanded from.
    pub spec: SpecDefinition,
    pub asset_type: MediaType,
    pub copy_headline: String,
    pub visual_directive: Option<String>,
    pub status: ProductionStatus,
    pub meta: TicketMeta,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One downstream delivery endpoint for a master production asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryDestination {
    pub platform_name: String,
    pub spec_id: String,
    pub format_name: String,
    pub special_notes: String,
}

/// One unique master asset to produce, fanned out to every destination that
/// consumes the same physical file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionJob {
    /// Sequential within one consolidation pass (e.g. "JOB-1").
    pub job_id: String,
    /// e.g. "9:16 mp4".
    pub asset_type: String,
    /// e.g. "1080x1920, 15s, MP4".
    pub technical_summary: String,
    pub destinations: Vec<DeliveryDestination>,
    pub status: ProductionStatus,
}

/// A generation batch: the jobs consolidated from one strategy/concept
/// pairing, plus identity and naming metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionBatch {
    pub id: Uuid,
    pub segment_id: String,
    pub segment_name: String,
    pub concept_id: String,
    pub concept_name: String,
    /// Human name, defaulting to "<segment> – <concept>".
    pub name: String,
    pub jobs: Vec<ProductionJob>,
    pub status: ProductionStatus,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
