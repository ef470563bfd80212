use crate::catalog::TermCatalog;
use crate::lookup::LookupTable;
use crate::SnsParams;
use anyhow::{Context, Result};
use bincode;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub num_terms: usize,
    pub created_at: String,
    pub version: u32,
    /// Parameters of the last stemming run over this catalog, if any.
    #[serde(default)]
    pub params: Option<SnsParams>,
}

pub struct CatalogPaths {
    pub root: PathBuf,
}

impl CatalogPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn catalog(&self) -> PathBuf { self.root.join("catalog.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
    pub fn lookup(&self) -> PathBuf { self.root.join("lookup.txt") }
}

pub fn save_catalog(paths: &CatalogPaths, catalog: &TermCatalog) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.catalog())?;
    let bytes = bincode::serialize(catalog)?;
    f.write_all(&bytes)?;
    Ok(())
}

pub fn load_catalog(paths: &CatalogPaths) -> Result<TermCatalog> {
    let file = paths.catalog();
    let mut f = File::open(&file).with_context(|| format!("opening {}", file.display()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let catalog = bincode::deserialize(&buf)?;
    Ok(catalog)
}

pub fn save_meta(paths: &CatalogPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &CatalogPaths) -> Result<MetaFile> {
    let file = paths.meta();
    let f = File::open(&file).with_context(|| format!("opening {}", file.display()))?;
    read_meta(f, &file)
}

/// Like [`load_meta`], but a catalog without `meta.json` yields `None`.
/// Unreadable or corrupt files are still errors.
pub fn load_meta_if_present(paths: &CatalogPaths) -> Result<Option<MetaFile>> {
    let file = paths.meta();
    match File::open(&file) {
        Ok(f) => read_meta(f, &file).map(Some),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("opening {}", file.display())),
    }
}

fn read_meta(mut f: File, file: &Path) -> Result<MetaFile> {
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)
        .with_context(|| format!("parsing {}", file.display()))?;
    Ok(meta)
}

pub fn save_lookup(path: &Path, table: &LookupTable) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)?;
    }
    let f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    table.write_tsv(BufWriter::new(f))?;
    Ok(())
}

pub fn load_lookup(path: &Path) -> Result<LookupTable> {
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    LookupTable::read_tsv(BufReader::new(f))
}
