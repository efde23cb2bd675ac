use devreg_kernel::config::load_config;
use devreg_kernel::domain::config::ApiConfig;
use std::path::PathBuf;

#[test]
fn explicit_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("devreg.toml");
    std::fs::write(
        &path,
        "[server]\nport = 8081\n\n[storage]\ndata_dir = \"/srv/devreg\"\nregistry_file = \"registry.json\"\n",
    )
    .unwrap();

    let cfg: ApiConfig = load_config(Some(&path)).unwrap();

    assert_eq!(cfg.server.port, 8081);
    assert_eq!(cfg.storage.data_dir, PathBuf::from("/srv/devreg"));
    assert_eq!(cfg.storage.registry_file, "registry.json");
    assert_eq!(cfg.storage.uploads, "uploads");
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_config::<ApiConfig>(Some(dir.path().join("absent.toml")));
    assert!(result.is_err());
}
