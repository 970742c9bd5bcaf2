use super::{load_settings_from, normalize_server_url, Settings};

use std::{
    collections::HashMap,
    env, fs,
    path::Path,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

fn no_env(_: &str) -> Option<String> {
    None
}

fn temp_config(tag: &str, contents: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("stakeup_wallet_cli_{tag}_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("wallet.toml");
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn normalizes_bare_host_and_trailing_slash() {
    assert_eq!(normalize_server_url("bank.local:5000/"), "http://bank.local:5000");
    assert_eq!(
        normalize_server_url(" https://bank.example/app/ "),
        "https://bank.example/app"
    );
    assert_eq!(normalize_server_url("   "), Settings::default().server_url);
}

#[test]
fn missing_file_yields_defaults() {
    let settings =
        load_settings_from(Path::new("/nonexistent/wallet.toml"), no_env).expect("settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.request_timeout(), None);
}

#[test]
fn file_values_apply_and_env_wins() {
    let path = temp_config(
        "layering",
        "server_url = \"http://file.example:8080/\"\nrequest_timeout_secs = 15\n",
    );

    let settings = load_settings_from(&path, no_env).expect("settings");
    assert_eq!(settings.server_url, "http://file.example:8080");
    assert_eq!(settings.request_timeout(), Some(Duration::from_secs(15)));

    let env_vars = HashMap::from([
        ("WALLET_SERVER_URL", "http://legacy.example"),
        ("APP__SERVER_URL", "http://app.example"),
        ("APP__REQUEST_TIMEOUT_SECS", "0"),
    ]);
    let settings = load_settings_from(&path, |key| env_vars.get(key).map(|v| v.to_string()))
        .expect("settings");
    assert_eq!(settings.server_url, "http://app.example");
    assert_eq!(settings.request_timeout_secs, Some(0));
    assert_eq!(settings.request_timeout(), None);

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn rejects_unknown_keys_and_bad_timeouts() {
    let path = temp_config("unknown_key", "server = \"http://typo.example\"\n");
    assert!(load_settings_from(&path, no_env).is_err());
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");

    let result = load_settings_from(Path::new("/nonexistent/wallet.toml"), |key| {
        (key == "APP__REQUEST_TIMEOUT_SECS").then(|| "soon".to_string())
    });
    assert!(result.is_err());
}
