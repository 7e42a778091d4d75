//! Settings resolution feeding a full combine run

mod fixtures;

use std::fs;

use tempfile::TempDir;

use fixtures::{body_path, read_json, rules_dir, RULES_ORDERED};
use karabiner_combiner::config::ConfigOrigin;
use karabiner_combiner::{CliOverrides, Combiner, RuleCatalog, Settings};

fn settings_file(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("combine.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_settings_file_drives_full_run() {
    let dir = TempDir::new().unwrap();
    let backup = dir.path().join("karabiner.json");
    let live_dir = dir.path().join("karabiner");
    fs::create_dir(&live_dir).unwrap();
    let live = live_dir.join("karabiner.json");

    let path = settings_file(
        &dir,
        &format!(
            "base = {:?}\nrules_dir = {:?}\nrules = {:?}\ndestinations = [{:?}, {:?}]\n",
            body_path().to_string_lossy(),
            rules_dir().to_string_lossy(),
            RULES_ORDERED,
            backup.to_string_lossy(),
            live.to_string_lossy(),
        ),
    );

    let settings = Settings::resolve(Some(&path), &CliOverrides::default()).unwrap();
    assert_eq!(settings.sources.len(), 2);
    assert_eq!(settings.sources[1].origin, ConfigOrigin::File);

    let combiner = Combiner::new(&settings.base, &settings.rules_dir, &settings.rules).unwrap();
    let saved = combiner.save_all(&settings.destinations).unwrap();

    assert_eq!(saved.len(), 2);
    assert_eq!(read_json(&backup), read_json(&live));
    assert_eq!(
        read_json(&live)["profiles"][0]["complex_modifications"]["rules"]
            .as_array()
            .unwrap()
            .len(),
        4
    );
}

#[test]
fn test_cli_rules_replace_file_rules() {
    let dir = TempDir::new().unwrap();
    let path = settings_file(
        &dir,
        "rules = [\"nav_layer.json\", \"top_layer.json\", \"combo_keys.json\"]\n",
    );

    let cli = CliOverrides {
        rules: Some(vec!["number_layer.json".to_string()]),
        ..Default::default()
    };
    let settings = Settings::resolve(Some(&path), &cli).unwrap();

    assert_eq!(settings.rules, vec!["number_layer.json"]);
    assert_eq!(settings.sources.last().unwrap().origin, ConfigOrigin::Cli);
}

#[test]
fn test_catalog_against_fixture_rules() {
    let catalog = RuleCatalog::scan(&rules_dir(), &RULES_ORDERED[..3]).unwrap();

    assert_eq!(catalog.available.len(), 4);
    assert_eq!(catalog.unlisted, vec!["number_layer.json"]);
    assert!(catalog.is_complete());
}

#[cfg(unix)]
#[test]
fn test_non_utf8_paths_reach_the_filesystem() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = TempDir::new().unwrap();
    let base = dir.path().join(OsStr::from_bytes(b"body\xff.json"));
    fs::copy(body_path(), &base).unwrap();
    let output = dir.path().join(OsStr::from_bytes(b"karabiner\xfe.json"));

    let cli = CliOverrides {
        base: Some(base.clone()),
        rules_dir: Some(rules_dir()),
        destinations: Some(vec![output.clone()]),
        ..Default::default()
    };
    let settings = Settings::build(None, &cli).unwrap();
    assert_eq!(settings.base, base);

    let combiner = Combiner::new(&settings.base, &settings.rules_dir, &settings.rules).unwrap();
    combiner.save_all(&settings.destinations).unwrap();

    assert_eq!(&read_json(&output)["global"], &read_json(&body_path())["global"]);
}

#[test]
fn test_relative_settings_paths_follow_settings_file() {
    let dir = TempDir::new().unwrap();
    let layout = dir.path().join("json_files");
    fs::create_dir_all(layout.join("rules")).unwrap();
    fs::copy(body_path(), layout.join("body.json")).unwrap();
    for name in RULES_ORDERED {
        fs::copy(rules_dir().join(name), layout.join("rules").join(name)).unwrap();
    }
    let path = settings_file(
        &dir,
        "base = \"json_files/body.json\"\n\
         rules_dir = \"json_files/rules\"\n\
         destinations = [\"karabiner.json\"]\n",
    );

    let settings = Settings::resolve(Some(&path), &CliOverrides::default()).unwrap();
    let combiner = Combiner::new(&settings.base, &settings.rules_dir, &settings.rules).unwrap();
    combiner.save_all(&settings.destinations).unwrap();

    assert!(dir.path().join("karabiner.json").exists());
}
