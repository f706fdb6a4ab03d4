//! Fixed catalog of alert messages.
//!
//! The texts are a downstream compatibility surface and are kept verbatim,
//! including the stress/severe pair being shared by the dumping and
//! sea-level rules.

/// Stress-level warning, emitted by the moderate dumping and sea-level
/// bands.
pub const STRESS_WARNING: &str = "Sea level rise exceeds safe threshold. Blue carbon ecosystems under stress, long-term coastal planning required.";

/// Severe warning, emitted by the severe dumping and sea-level bands.
pub const SEVERE_RISE_WARNING: &str = "Rapid sea level rise detected. Risk of mangrove drowning and soil carbon loss. Authorities must initiate coastal defense and monitoring.";

/// Low algal levels: ecosystem-balance risk.
pub const BLOOM_LOW_WARNING: &str = "Algal levels too low. Risk of reduced food availability for fish larvae. Authorities should monitor ecosystem balance.";

/// High bloom risk: fishing avoidance advised.
pub const BLOOM_HIGH_WARNING: &str = "High algal bloom risk detected. Fishermen advised to avoid fishing in affected areas due to oxygen depletion risk.";

/// Severe bloom risk: stop fishing.
pub const BLOOM_SEVERE_WARNING: &str = "Severe algal bloom risk detected. Immediate stop on fishing recommended. Authorities should monitor water quality and issue safety warnings.";

/// Category 1-2 cyclone precaution.
pub const CYCLONE_MODERATE_WARNING: &str = "Cyclone detected (Category 1–2). Coastal erosion and wave surges may weaken blue carbon ecosystems. Prepare precautionary measures.";

/// Category 3-5 cyclone evacuation.
pub const CYCLONE_SEVERE_WARNING: &str = "Severe Cyclone (Category 3–5) expected. High risk to mangroves, seagrass, and coastal wetlands. Immediate evacuation and disaster response required.";
