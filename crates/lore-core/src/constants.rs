//! Fixed constants shared across the workspace.

use crate::models::RelationshipType;

/// Lore version string.
pub const LORE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Characters of normalized text hashed into a fingerprint.
pub const FINGERPRINT_PREFIX_CHARS: usize = 200;

/// Hex characters kept from a fingerprint digest.
pub const FINGERPRINT_HEX_LEN: usize = 16;

/// Maximum relationship previews attached to a graph node row.
pub const RELATIONSHIP_PREVIEW_LIMIT: usize = 5;

/// Keywords shorter than this are dropped.
pub const MIN_KEYWORD_LEN: usize = 3;

/// Relationship types followed by `find_influencers`.
pub const INFLUENCE_TYPES: [RelationshipType; 4] = [
    RelationshipType::Influences,
    RelationshipType::Causes,
    RelationshipType::Optimizes,
    RelationshipType::Enables,
];

/// Relationship types followed by `find_practices_for_outcome`.
pub const LEADS_TO_TYPES: [RelationshipType; 4] = [
    RelationshipType::LeadsTo,
    RelationshipType::Causes,
    RelationshipType::Optimizes,
    RelationshipType::Enables,
];

/// Weight of the literal query in the expansion set.
pub const LITERAL_QUERY_WEIGHT: f64 = 1.0;
