//! Query family → substrate weights.

mod classifier;

pub use classifier::{classify, resolve};

use lore_core::config::{SubstrateWeights, WeightTable};
use lore_core::models::QueryFamily;

/// Weights for `query`, honouring a caller hint when it parses.
pub fn weights_for(
    table: &WeightTable,
    query: &str,
    hint: Option<&str>,
) -> (QueryFamily, SubstrateWeights) {
    let family = resolve(query, hint);
    (family, table.for_family(family))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_shifts_toward_graph_for_entities() {
        let (family, w) = weights_for(&WeightTable::default(), "who is Andrew Huberman", None);
        assert_eq!(family, QueryFamily::EntityCentric);
        assert!(w.graph > w.vector);
        assert!((w.vector - 0.35).abs() < 1e-9);
    }

    #[test]
    fn definitional_shifts_toward_vector() {
        let (_, w) = weights_for(&WeightTable::default(), "what is dopamine", None);
        assert!((w.vector - 0.65).abs() < 1e-9);
        assert!((w.graph - 0.35).abs() < 1e-9);
    }

    #[test]
    fn general_is_balanced() {
        let (_, w) = weights_for(&WeightTable::default(), "sunlight", None);
        assert_eq!(w, SubstrateWeights::new(0.5, 0.5));
    }

    #[test]
    fn table_override_is_used() {
        let table = WeightTable {
            general: SubstrateWeights::new(0.9, 0.1),
            ..WeightTable::default()
        };
        let (_, w) = weights_for(&table, "sunlight", None);
        assert_eq!(w, SubstrateWeights::new(0.9, 0.1));
    }
}
