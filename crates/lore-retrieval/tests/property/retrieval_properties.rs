use std::collections::HashSet;

use proptest::prelude::*;

use lore_core::config::SubstrateWeights;
use lore_core::models::{ResultMetadata, RetrievalResult, RetrievalSource};
use lore_retrieval::search::{diversify, fuse};

fn result(text: String, doc: u8, source: RetrievalSource, score: f64) -> RetrievalResult {
    RetrievalResult {
        fingerprint: lore_core::text::fingerprint(&text),
        text,
        source_document: format!("ep{doc}"),
        sources: vec![source],
        score,
        vector_score: (source == RetrievalSource::Vector).then_some(score),
        graph_score: (source == RetrievalSource::Graph).then_some(score),
        metadata: ResultMetadata::default(),
    }
}

fn list(source: RetrievalSource) -> impl Strategy<Value = Vec<RetrievalResult>> {
    prop::collection::vec(("[a-e]{1,3}", 0u8..6, 0.0f64..1.0), 0..20).prop_map(move |items| {
        items
            .into_iter()
            .map(|(t, d, s)| result(t, d, source, s))
            .collect()
    })
}

proptest! {
    #[test]
    fn fusion_is_deterministic_and_sorted(
        vector in list(RetrievalSource::Vector),
        graph in list(RetrievalSource::Graph),
    ) {
        let w = SubstrateWeights::new(0.5, 0.5);
        let a = fuse(vector.clone(), graph.clone(), w);
        let b = fuse(vector, graph, w);
        prop_assert_eq!(&a, &b);
        prop_assert!(a.windows(2).all(|p| p[0].score >= p[1].score));
        let fps: HashSet<&str> = a.iter().map(|r| r.fingerprint.as_str()).collect();
        prop_assert_eq!(fps.len(), a.len());
    }

    #[test]
    fn diversify_caps_and_spreads_documents(
        vector in list(RetrievalSource::Vector),
        top_k in 1usize..12,
    ) {
        let fused = fuse(vector, Vec::new(), SubstrateWeights::new(0.5, 0.5));
        let available: HashSet<String> = fused.iter().map(|r| r.source_document.clone()).collect();
        let out = diversify(fused.clone(), top_k);
        prop_assert_eq!(out.len(), fused.len().min(top_k));

        let head = available.len().min(top_k);
        let docs: HashSet<&str> = out.iter().take(head).map(|r| r.source_document.as_str()).collect();
        prop_assert_eq!(docs.len(), head);
    }
}
