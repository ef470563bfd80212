//! Runs the SNS stages in order over a catalog.

use crate::catalog::TermCatalog;
use crate::components::{extract_stems, ComponentStats};
use crate::config::SnsParams;
use crate::cooccurrence::analyze;
use crate::error::{Result, SnsError};
use crate::graph::{GraphStats, StemGraph};
use crate::lookup::LookupTable;
use crate::promote::promote;
use crate::reweight::reweight;
use crate::strong::strong_edges;
use serde::Serialize;
use std::io::{self, Write};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Serialize)]
pub struct StageTiming {
    pub stage: &'static str,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StageTimings {
    pub stages: Vec<StageTiming>,
}

impl StageTimings {
    fn record(&mut self, stage: &'static str, started: Instant) {
        let elapsed = started.elapsed();
        tracing::info!(stage, elapsed_s = elapsed.as_secs_f64(), "stage finished");
        self.stages.push(StageTiming { stage, elapsed });
    }

    /// Put a stage measured outside [`run`], such as catalog reading, at the
    /// head of the report.
    pub fn prepend(&mut self, stage: &'static str, elapsed: Duration) {
        tracing::info!(stage, elapsed_s = elapsed.as_secs_f64(), "stage finished");
        self.stages.insert(0, StageTiming { stage, elapsed });
    }

    pub fn total(&self) -> Duration {
        self.stages.iter().map(|s| s.elapsed).sum()
    }

    pub fn write_report<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for s in &self.stages {
            writeln!(writer, "{}\t=\t{:.3} seconds", s.stage, s.elapsed.as_secs_f64())?;
        }
        writeln!(writer, "total\t=\t{:.3} seconds", self.total().as_secs_f64())?;
        writer.flush()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SnsStats {
    pub terms: usize,
    pub examined_pairs: usize,
    pub candidate_pairs: usize,
    pub buckets: usize,
    pub confirmed_buckets: usize,
    pub promoted_arcs: usize,
    pub reweighted_edges: usize,
    pub graph: GraphStats,
    pub pruned_edges: usize,
    pub components: usize,
    pub singletons: usize,
    pub stemmed_terms: usize,
}

#[derive(Debug, Clone)]
pub struct SnsOutcome {
    pub table: LookupTable,
    pub stats: SnsStats,
    pub timings: StageTimings,
}

/// Validate `params`, then run co-occurrence analysis, promotion, graph
/// construction, reweighting, strong-edge pruning and stem extraction.
pub fn run(catalog: &TermCatalog, params: &SnsParams) -> Result<SnsOutcome> {
    params.validate()?;
    if catalog.is_empty() {
        return Err(SnsError::EmptyCatalog);
    }

    let mut timings = StageTimings::default();
    let mut stats = SnsStats { terms: catalog.len(), ..Default::default() };

    let started = Instant::now();
    let analysis = analyze(catalog, params);
    stats.examined_pairs = analysis.examined_pairs;
    stats.candidate_pairs = analysis.candidate_pairs;
    stats.buckets = analysis.buckets.len();
    timings.record("cooccurrence", started);
    tracing::info!(
        examined = stats.examined_pairs,
        candidates = stats.candidate_pairs,
        buckets = stats.buckets,
        "co-occurrence computed"
    );

    let started = Instant::now();
    let promotion = promote(analysis.buckets);
    stats.confirmed_buckets = promotion.confirmed_buckets;
    stats.promoted_arcs = promotion.arcs.len();
    timings.record("promotion", started);
    tracing::info!(
        confirmed = stats.confirmed_buckets,
        arcs = stats.promoted_arcs,
        nodes = promotion.nodes.len(),
        "arcs promoted"
    );

    let started = Instant::now();
    let mut graph = StemGraph::build(&promotion.arcs);
    stats.graph = graph.stats();
    timings.record("graph", started);

    let started = Instant::now();
    stats.reweighted_edges = reweight(&mut graph);
    timings.record("reweighting", started);

    let started = Instant::now();
    let pruned = strong_edges(&graph);
    stats.pruned_edges = graph.edge_count() - pruned.edge_count();
    timings.record("strong_edges", started);
    tracing::info!(removed = stats.pruned_edges, kept = pruned.edge_count(), "strong edges kept");

    let started = Instant::now();
    let (table, components): (LookupTable, ComponentStats) = extract_stems(&pruned, catalog);
    stats.components = components.components;
    stats.singletons = components.singletons;
    stats.stemmed_terms = table.len();
    timings.record("lookup_table", started);
    tracing::info!(
        components = stats.components,
        singletons = stats.singletons,
        stemmed = stats.stemmed_terms,
        stems = table.distinct_stems(),
        "lookup table built"
    );

    Ok(SnsOutcome { table, stats, timings })
}
