use osci_core::config::{OsciConfig, Overrides, Settings};
use osci_core::context::AppContext;
use osci_core::target::Platform;
use tempfile::TempDir;

#[test]
fn app_context_creates_from_paths() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join("home");
    let config = temp.path().join("config");

    let ctx = AppContext::new(home.clone(), config.clone());

    assert_eq!(ctx.home_dir(), &home);
    assert_eq!(ctx.config_dir(), &config);
    assert_eq!(ctx.config_store().config_path(), config.join("osci.toml"));
}

#[test]
fn app_context_darwin_install_root_is_applications() {
    let temp = TempDir::new().unwrap();
    let ctx = AppContext::new(temp.path().join("home"), temp.path().join("config"));

    assert_eq!(
        ctx.default_install_root(Platform::Darwin),
        std::path::Path::new("/Applications/Open Stage Control")
    );
}

#[test]
fn settings_read_config_through_context() {
    let temp = TempDir::new().unwrap();
    let ctx = AppContext::new(temp.path().join("home"), temp.path().join("config"));
    let store = ctx.config_store();
    store
        .save(&OsciConfig {
            npm: Some("pnpm".to_string()),
            ..OsciConfig::default()
        })
        .unwrap();

    let config = store.load().unwrap();
    let settings = Settings::resolve(&config, &Overrides::default(), &ctx).unwrap();
    assert_eq!(settings.npm, "pnpm");
}
