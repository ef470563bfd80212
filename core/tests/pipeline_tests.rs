use sns_core::catalog::TermCatalog;
use sns_core::cooccurrence::analyze;
use sns_core::graph::StemGraph;
use sns_core::promote::promote;
use sns_core::reweight::reweight;
use sns_core::strong::strong_edges;
use sns_core::components::connected_components;
use sns_core::{run, Posting, SnsError, SnsParams, TermArc};

fn catalog(terms: &[(&str, &[(u32, u32)])]) -> TermCatalog {
    let mut c = TermCatalog::new();
    for (text, postings) in terms {
        c.push(*text, postings.iter().map(|&(d, f)| Posting::new(d, f)).collect());
    }
    c
}

fn stems(outcome: &sns_core::SnsOutcome) -> Vec<(String, String)> {
    outcome.table.iter().map(|e| (e.term.clone(), e.stem.clone())).collect()
}

#[test]
fn confirmed_suffix_pairs_are_promoted_whole() {
    // Three pairs share suffixes (x, y) with a 3-letter prefix; (s, z) occurs once.
    let c = catalog(&[
        ("catx", &[(0, 2)]),
        ("caty", &[(0, 1)]),
        ("dogx", &[(1, 1)]),
        ("dogy", &[(1, 3)]),
        ("ratx", &[(2, 1), (3, 1)]),
        ("raty", &[(3, 4)]),
        ("emus", &[(4, 1)]),
        ("emuz", &[(4, 1)]),
    ]);
    let params = SnsParams::new(1, 2).unwrap();

    let analysis = analyze(&c, &params);
    assert_eq!(analysis.buckets.len(), 2);
    let mut counts: Vec<u32> = analysis.buckets.iter().map(|b| b.confirm_count).collect();
    counts.sort();
    assert_eq!(counts, vec![1, 3]);

    let promotion = promote(analysis.buckets);
    assert_eq!(promotion.confirmed_buckets, 1);
    assert_eq!(promotion.arcs.len(), 3);
    assert_eq!(promotion.nodes, vec![0, 1, 2, 3, 4, 5]);

    let outcome = run(&c, &params).unwrap();
    assert_eq!(
        stems(&outcome),
        vec![
            ("catx".to_string(), "cat".to_string()),
            ("caty".to_string(), "cat".to_string()),
            ("dogx".to_string(), "dog".to_string()),
            ("dogy".to_string(), "dog".to_string()),
            ("ratx".to_string(), "rat".to_string()),
            ("raty".to_string(), "rat".to_string()),
        ]
    );
    assert!(outcome.table.get("emus").is_none());
    assert!(outcome.table.get("emuz").is_none());
}

#[test]
fn short_prefix_members_ride_along_with_confirmed_bucket() {
    // "sed"/"sing" share only "s" but their suffix pair (ed, ing) is confirmed
    // by two long-prefix pairs.
    let c = catalog(&[
        ("played", &[(0, 1)]),
        ("playing", &[(0, 1)]),
        ("walked", &[(1, 1)]),
        ("walking", &[(1, 1)]),
        ("sed", &[(2, 1)]),
        ("sing", &[(2, 1)]),
    ]);
    let outcome = run(&c, &SnsParams::new(1, 3).unwrap()).unwrap();
    assert_eq!(outcome.stats.promoted_arcs, 3);
    assert_eq!(outcome.table.get("sing"), Some("s"));
    assert_eq!(outcome.table.get("walking"), Some("walk"));
}

#[test]
fn reweighting_and_pruning_on_triangle() {
    let (a, b, c) = (0, 1, 2);
    let mut graph = StemGraph::build(&[TermArc::new(a, b, 4), TermArc::new(a, c, 3), TermArc::new(b, c, 2)]);
    reweight(&mut graph);
    let refined: Vec<(u32, u32, f64)> = graph.arcs().iter().map(|x| (x.a, x.b, x.refined_weight)).collect();
    assert_eq!(refined, vec![(a, b, 5.0), (a, c, 4.0), (b, c, 3.5)]);

    let pruned = strong_edges(&graph);
    assert!(pruned.edge_between(b, c).is_none());
    assert!(pruned.edge_between(a, b).is_some());
    assert!(pruned.edge_between(a, c).is_some());
    assert_eq!(connected_components(&pruned), vec![vec![a, b, c]]);
}

#[test]
fn walking_family_shares_one_stem() {
    let c = catalog(&[
        ("walking", &[(0, 2), (1, 1)]),
        ("walked", &[(0, 1), (1, 2)]),
        ("walks", &[(0, 1), (2, 1)]),
        ("talking", &[(3, 1)]),
        ("talked", &[(3, 1)]),
        ("talks", &[(3, 2)]),
    ]);
    let outcome = run(&c, &SnsParams::new(2, 3).unwrap()).unwrap();
    assert_eq!(outcome.table.get("walking"), Some("walk"));
    assert_eq!(outcome.table.get("walked"), Some("walk"));
    assert_eq!(outcome.table.get("walks"), Some("walk"));
    assert_eq!(outcome.table.get("talks"), Some("talk"));
}

#[test]
fn isolated_terms_never_get_a_stem() {
    let c = catalog(&[
        ("walking", &[(0, 1)]),
        ("walked", &[(0, 1)]),
        ("talking", &[(1, 1)]),
        ("talked", &[(1, 1)]),
        ("walkway", &[(5, 1)]),
        ("zebra", &[(0, 1)]),
    ]);
    let outcome = run(&c, &SnsParams::new(2, 3).unwrap()).unwrap();
    assert!(outcome.table.get("walkway").is_none());
    assert!(outcome.table.get("zebra").is_none());
    assert_eq!(outcome.table.stem("zebra"), "zebra");
    assert_eq!(outcome.table.len(), 4);
}

#[test]
fn output_is_sorted_and_deterministic() {
    let words = [
        "connect", "connected", "connecting", "connection", "connections", "connects",
        "general", "generally", "generals", "generate", "generated", "generates",
        "station", "stations", "stationed", "nation", "nations", "national",
    ];
    let mut c = TermCatalog::new();
    for (i, w) in words.iter().enumerate() {
        let i = i as u32;
        c.push(*w, vec![Posting::new(i % 4, 1 + i % 3), Posting::new(10 + i % 2, 2)]);
    }
    let params = SnsParams::default();
    let first = run(&c, &params).unwrap();
    let second = run(&c, &params).unwrap();
    assert_eq!(first.table, second.table);
    assert!(!first.table.is_empty());

    let terms: Vec<&str> = first.table.iter().map(|e| e.term.as_str()).collect();
    assert!(terms.windows(2).all(|w| w[0] < w[1]));
    for e in first.table.iter() {
        assert!(e.term.starts_with(&e.stem));
    }
}

#[test]
fn unsupported_configurations_fail_fast() {
    let c = catalog(&[("walking", &[(0, 1)])]);
    assert!(matches!(run(&c, &SnsParams { l1: 5, l2: 3 }), Err(SnsError::InvalidParams(_))));
    assert_eq!(run(&TermCatalog::new(), &SnsParams::default()).unwrap_err(), SnsError::EmptyCatalog);
}
