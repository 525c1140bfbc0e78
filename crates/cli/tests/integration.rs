use std::io::Write;

use filehash_analysis::ActionKind;
use filehash_cli::config::{self, Config, Settings};
use filehash_cli::{analyze_file, render_report};

fn write_file(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content).unwrap();
    path
}

#[test]
fn analyzes_file_with_default_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "abc.bin", b"abc");

    let report = analyze_file(&path, &Settings::from_config(&Config::default())).unwrap();

    assert_eq!(report.bytes_seen, 3);
    assert_eq!(report.results.len(), 3);
    assert_eq!(
        report.results["sha256"],
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(report.results["md5"], "900150983cd24fb0d6963f7d28e17f72");
}

#[test]
fn config_file_selects_actions_and_chunk_size() {
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = write_file(
        &dir,
        "filehash.toml",
        b"[analysis]\nchunk_size = 3\nactions = [\"sha1\"]\n\n[output]\npretty = true\n",
    );
    let content: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    let data_path = write_file(&dir, "data.bin", &content);

    let settings = Settings::from_config(&config::load_config(&cfg_path).unwrap());
    assert_eq!(settings.chunk_size, 3);
    assert_eq!(settings.actions, vec![ActionKind::Sha1]);

    let report = analyze_file(&data_path, &settings).unwrap();
    assert_eq!(report.bytes_seen, 10_000);
    assert_eq!(report.results.keys().collect::<Vec<_>>(), vec!["sha1"]);
    assert_eq!(
        report.results["sha1"],
        filehash_core::HashAlgorithm::Sha1.digest_bytes(&content).to_hex()
    );

    let rendered = render_report(&report, settings.pretty).unwrap();
    assert!(rendered.contains('\n'));
    let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(parsed["results"]["sha1"], report.results["sha1"]);
}

#[test]
fn empty_file_reports_no_digests() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "empty.bin", b"");

    let report = analyze_file(&path, &Settings::from_config(&Config::default())).unwrap();
    assert_eq!(report.bytes_seen, 0);
    assert!(report.results.is_empty());

    let rendered = render_report(&report, false).unwrap();
    assert!(rendered.contains("\"results\":{}"));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = analyze_file(
        &dir.path().join("nope.bin"),
        &Settings::from_config(&Config::default()),
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("nope.bin"));
}

#[test]
fn malformed_config_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = write_file(&dir, "broken.toml", b"[analysis\n");
    let err = config::load_config(&cfg_path).unwrap_err();
    assert!(format!("{err:#}").contains("broken.toml"));
}

#[test]
fn config_without_actions_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = write_file(&dir, "none.toml", b"[analysis]\nactions = []\n");
    let err = config::load_config(&cfg_path).unwrap_err();
    assert!(err.to_string().contains("analysis.actions"));

    let cfg_path = write_file(&dir, "zero.toml", b"[analysis]\nchunk_size = 0\n");
    let err = config::load_config(&cfg_path).unwrap_err();
    assert!(err.to_string().contains("analysis.chunk_size"));
}
