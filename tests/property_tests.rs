use annotation_integrator::bio::annotation::strip_kegg_prefix;
use annotation_integrator::core::consensus::{percentile, vote};
use annotation_integrator::core::overlap::{EGGNOG_COMBINED, FANTASIA_POST, INTERPROSCAN, KOFAMSCAN};
use annotation_integrator::{aggregate, compute_overlaps, SourceTool, TermRecord, TermType};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn kegg_records(pairs: &[(u8, u16)]) -> Vec<TermRecord> {
    pairs
        .iter()
        .filter_map(|(gene, ko)| {
            TermRecord::new(
                &format!("g{}", gene % 8),
                &format!("ko:K{:05}", ko),
                TermType::Kegg,
                SourceTool::KofamScan,
            )
        })
        .collect()
}

fn term_sets(records: &[TermRecord]) -> BTreeMap<String, BTreeSet<String>> {
    aggregate(records)
        .into_iter()
        .map(|row| {
            let terms = row.terms(TermType::Kegg).iter().cloned().collect();
            (row.gene_id, terms)
        })
        .collect()
}

fn gene_set() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set("g[0-9]{1,2}", 0..20)
}

proptest! {
    #[test]
    fn prop_kegg_prefix_strip_is_idempotent(raw in "(ko:){0,3}K[0-9]{5}") {
        let once = strip_kegg_prefix(&raw);
        prop_assert_eq!(strip_kegg_prefix(once), once);
        prop_assert!(!once.starts_with("ko:"));
    }

    #[test]
    fn prop_duplicate_records_do_not_change_set_like_rows(pairs in prop::collection::vec((any::<u8>(), 0u16..50), 0..40)) {
        let records = kegg_records(&pairs);
        let mut doubled = records.clone();
        doubled.extend(records.iter().cloned());

        prop_assert_eq!(aggregate(&doubled), aggregate(&records));
    }

    #[test]
    fn prop_record_order_does_not_change_term_sets(pairs in prop::collection::vec((any::<u8>(), 0u16..50), 0..40)) {
        let records = kegg_records(&pairs);
        let mut reversed = records.clone();
        reversed.reverse();

        prop_assert_eq!(term_sets(&reversed), term_sets(&records));
    }

    #[test]
    fn prop_percentile_is_monotonic_and_bounded(
        values in prop::collection::vec(0.0f64..1.0, 1..50),
        a in 0.0f64..=1.0,
        b in 0.0f64..=1.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let p_lo = percentile(&values, lo).unwrap();
        let p_hi = percentile(&values, hi).unwrap();
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        prop_assert!(p_lo <= p_hi + 1e-12);
        prop_assert!(p_lo >= min - 1e-12 && p_hi <= max + 1e-12);
    }

    #[test]
    fn prop_vote_counts_models_at_or_above_threshold(
        cells in prop::collection::vec((prop::option::of(0.0f64..1.0), 0.0f64..1.0), 0..8),
        min_votes in 1usize..6,
    ) {
        let scores: Vec<Option<f64>> = cells.iter().map(|(s, _)| *s).collect();
        let limits: Vec<f64> = cells.iter().map(|(_, t)| *t).collect();
        let votes = vote(&scores, &limits);

        let expected = cells.iter().filter(|(s, t)| matches!(s, Some(s) if s >= t)).count();
        prop_assert_eq!(votes, expected);
        prop_assert!(votes <= cells.len());
        prop_assert_eq!(votes >= min_votes, expected >= min_votes);
    }

    #[test]
    fn prop_fantasia_exclusive_is_disjoint_from_main_tools(
        kofam in gene_set(),
        ips in gene_set(),
        eggnog in gene_set(),
        fantasia in gene_set(),
    ) {
        let sets = BTreeMap::from([
            (KOFAMSCAN.to_string(), kofam.clone()),
            (INTERPROSCAN.to_string(), ips.clone()),
            (EGGNOG_COMBINED.to_string(), eggnog.clone()),
            (FANTASIA_POST.to_string(), fantasia.clone()),
        ]);
        let result = compute_overlaps(&sets);
        let exclusive = &result.fantasia_exclusive.genes;

        prop_assert!(exclusive.is_subset(&fantasia));
        prop_assert!(exclusive.is_disjoint(&kofam) && exclusive.is_disjoint(&ips) && exclusive.is_disjoint(&eggnog));
        prop_assert!(result.main_tools_intersection.genes.is_subset(&result.main_tools_union.genes));
        prop_assert_eq!(result.all_tools_union.count, result.all_tools_union.genes.len());
    }
}

#[test]
fn test_no_tool_sets_means_empty_overlaps() {
    let result = compute_overlaps(&BTreeMap::new());
    assert!(result.pairs().iter().all(|(_, set)| set.count == 0));
}
