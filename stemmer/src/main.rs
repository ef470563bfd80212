use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use sns_core::config::{DEFAULT_L1, DEFAULT_L2};
use sns_core::persist::{load_catalog, load_lookup, load_meta_if_present, save_catalog, save_lookup, save_meta, CatalogPaths, MetaFile};
use sns_core::tokenizer::tokenize_with;
use sns_core::{CatalogBuilder, DocId, SnsParams};
use tracing_subscriber::{EnvFilter, fmt};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

mod memory;

use memory::MemorySampler;

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: String,
    #[serde(default)]
    title: Option<String>,
    body: String,
}

#[derive(Parser)]
#[command(name = "stemmer")]
#[command(about = "Build term catalogs and cluster word forms into stems", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a term catalog from input JSON/JSONL files or a directory
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Output catalog directory
        #[arg(long)]
        output: String,
        /// Keep English stopwords as index terms
        #[arg(long, default_value_t = false)]
        keep_stopwords: bool,
    },
    /// Run the co-occurrence graph stemmer over a catalog
    Stem {
        /// Catalog directory written by `build`
        #[arg(long)]
        catalog: String,
        /// Minimum common prefix length for a pair to be considered
        #[arg(long, default_value_t = DEFAULT_L1)]
        l1: usize,
        /// Common prefix length above which a pair confirms its suffix pair
        #[arg(long, default_value_t = DEFAULT_L2)]
        l2: usize,
        /// Lookup table output (defaults to <catalog>/lookup.txt)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Write per-stage elapsed times to this file
        #[arg(long)]
        timings: Option<PathBuf>,
        /// Log resident memory every N seconds while stemming (0 disables)
        #[arg(long, default_value_t = 0)]
        memory_interval_secs: u64,
    },
    /// Stem words with a lookup table; reads stdin when no text is given
    Apply {
        #[arg(long)]
        lookup: PathBuf,
        text: Vec<String>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, keep_stopwords } => {
            build_catalog(&input, &output, keep_stopwords)
        }
        Commands::Stem { catalog, l1, l2, output, timings, memory_interval_secs } => {
            let params = SnsParams { l1, l2 };
            stem_catalog(&catalog, params, output, timings, memory_interval_secs)
        }
        Commands::Apply { lookup, text } => {
            let stdout = io::stdout();
            if text.is_empty() {
                let mut input = String::new();
                io::stdin().read_to_string(&mut input)?;
                apply_lookup(&lookup, &input, stdout.lock())
            } else {
                apply_lookup(&lookup, &text.join(" "), stdout.lock())
            }
        }
    }
}

fn build_catalog(input: &str, output: &str, keep_stopwords: bool) -> Result<()> {
    let input_path = Path::new(input);
    let out_paths = CatalogPaths::new(output);

    let files = collect_input_files(input_path);
    if files.is_empty() {
        bail!("no .json or .jsonl input found at {}", input_path.display());
    }

    let mut builder = CatalogBuilder::new().keep_stopwords(keep_stopwords);
    for file in files {
        let docs = if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file)?
        } else {
            read_json(&file)?
        };
        for doc in docs {
            ingest_doc(&mut builder, doc);
        }
    }

    let num_docs = builder.num_docs();
    let catalog = builder.finish();
    tracing::info!(num_docs, num_terms = catalog.len(), "ingested documents");

    save_catalog(&out_paths, &catalog)?;
    let meta = MetaFile {
        num_docs,
        num_terms: catalog.len(),
        created_at: now_rfc3339(),
        version: 1,
        params: None,
    };
    save_meta(&out_paths, &meta)?;

    tracing::info!(output, "catalog build complete");
    Ok(())
}

fn collect_input_files(input_path: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    }
    files
}

fn read_jsonl(file: &Path) -> Result<Vec<InputDoc>> {
    let f = File::open(file)?;
    let reader = BufReader::new(f);
    let mut docs = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}", file.display(), idx + 1))?;
        docs.push(doc);
    }
    Ok(docs)
}

fn read_json(file: &Path) -> Result<Vec<InputDoc>> {
    let f = File::open(file)?;
    let reader = BufReader::new(f);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    let docs = match json {
        serde_json::Value::Array(arr) => arr
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<InputDoc>, _>>()?,
        serde_json::Value::Object(_) => vec![serde_json::from_value(json)?],
        _ => Vec::new(),
    };
    Ok(docs)
}

fn ingest_doc(builder: &mut CatalogBuilder, doc: InputDoc) {
    let doc_id: DocId = builder.num_docs();
    // Titles count as part of the document text.
    let text = match &doc.title {
        Some(title) => format!("{title}\n{}", doc.body),
        None => doc.body,
    };
    let tokens = builder.add_document(doc_id, &text);
    tracing::debug!(doc_id, external_id = %doc.id, tokens, "document ingested");
}

fn stem_catalog(
    catalog_dir: &str,
    params: SnsParams,
    output: Option<PathBuf>,
    timings: Option<PathBuf>,
    memory_interval_secs: u64,
) -> Result<()> {
    params.validate()?;
    let paths = CatalogPaths::new(catalog_dir);

    let sampler = if memory_interval_secs > 0 {
        Some(MemorySampler::spawn(Duration::from_secs(memory_interval_secs))?)
    } else {
        None
    };

    let started = Instant::now();
    let catalog = load_catalog(&paths)?.filtered(params.l1);
    let meta = load_meta_if_present(&paths)?;
    let reading = started.elapsed();
    tracing::info!(num_terms = catalog.len(), l1 = params.l1, l2 = params.l2, "catalog loaded");
    let mut outcome = sns_core::run(&catalog, &params)?;
    outcome.timings.prepend("reading", reading);

    let lookup_path = output.unwrap_or_else(|| paths.lookup());
    save_lookup(&lookup_path, &outcome.table)?;
    tracing::info!(
        path = %lookup_path.display(),
        terms = outcome.table.len(),
        stems = outcome.table.distinct_stems(),
        "lookup table written"
    );

    if let Some(path) = timings {
        let f = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        outcome.timings.write_report(BufWriter::new(f))?;
    }

    if let Some(mut meta) = meta {
        meta.params = Some(params);
        save_meta(&paths, &meta)?;
    }

    if let Some(sampler) = sampler {
        let samples = sampler.stop();
        let peak = samples.iter().filter_map(|s| s.resident_mb).fold(0.0f64, f64::max);
        tracing::info!(samples = samples.len(), peak_resident_mb = peak, "memory sampling stopped");
    }
    Ok(())
}

fn apply_lookup<W: Write>(lookup: &Path, text: &str, mut out: W) -> Result<()> {
    let table = load_lookup(lookup)?;
    for (word, _pos) in tokenize_with(text, true) {
        writeln!(out, "{}\t{}", word, table.stem(&word))?;
    }
    out.flush()?;
    Ok(())
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "".into())
}
