use sns_core::persist::{load_catalog, load_lookup, load_meta, load_meta_if_present, save_catalog, save_lookup, save_meta, CatalogPaths, MetaFile};
use sns_core::{CatalogBuilder, LookupTable, SnsParams, StemAssignment};
use tempfile::tempdir;

#[test]
fn catalog_and_meta_survive_a_reload() {
    let dir = tempdir().unwrap();
    let paths = CatalogPaths::new(dir.path());

    let mut builder = CatalogBuilder::new();
    builder.add_document(0, "rivers and river banks");
    builder.add_document(1, "banking on rivers");
    let catalog = builder.finish();
    save_catalog(&paths, &catalog).unwrap();
    save_meta(&paths, &MetaFile {
        num_docs: 2,
        num_terms: catalog.len(),
        created_at: "2024-01-01T00:00:00Z".into(),
        version: 1,
        params: Some(SnsParams::default()),
    })
    .unwrap();

    let loaded = load_catalog(&paths).unwrap();
    assert_eq!(loaded.len(), catalog.len());
    for (x, y) in loaded.iter().zip(catalog.iter()) {
        assert_eq!(x.text, y.text);
        assert_eq!(x.postings, y.postings);
    }
    let meta = load_meta(&paths).unwrap();
    assert_eq!(meta.num_docs, 2);
    assert_eq!(meta.params, Some(SnsParams::default()));
}

#[test]
fn lookup_file_is_tab_separated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out/lookup.txt");
    let table = LookupTable::from_assignments(vec![
        StemAssignment { term: "walks".into(), stem: "walk".into() },
        StemAssignment { term: "walked".into(), stem: "walk".into() },
    ]);
    save_lookup(&path, &table).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "walked\twalk\nwalks\twalk\n");
    assert_eq!(load_lookup(&path).unwrap(), table);
}

#[test]
fn missing_catalog_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(load_catalog(&CatalogPaths::new(dir.path().join("nope"))).is_err());
}

#[test]
fn meta_is_optional_but_must_parse() {
    let dir = tempdir().unwrap();
    let paths = CatalogPaths::new(dir.path());
    assert!(load_meta_if_present(&paths).unwrap().is_none());

    std::fs::write(dir.path().join("meta.json"), "{ not json").unwrap();
    let err = load_meta_if_present(&paths).unwrap_err();
    assert!(format!("{err:#}").contains("meta.json"));
}
