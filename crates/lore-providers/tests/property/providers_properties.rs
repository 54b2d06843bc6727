use proptest::prelude::*;

use lore_core::traits::IEmbeddingProvider;
use lore_providers::HashedEmbedder;

proptest! {
    #[test]
    fn hashed_vectors_have_fixed_width_and_unit_or_zero_norm(text in "[a-zA-Z ,.']{0,80}", dims in 8usize..256) {
        let v = HashedEmbedder::new(dims).embed(&text).unwrap();
        prop_assert_eq!(v.len(), dims);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        prop_assert!(norm == 0.0 || (norm - 1.0).abs() < 1e-4);
    }

    #[test]
    fn hashed_embedding_is_case_insensitive(text in "[a-z ]{1,60}") {
        let e = HashedEmbedder::new(64);
        prop_assert_eq!(e.embed(&text).unwrap(), e.embed(&text.to_uppercase()).unwrap());
    }
}
