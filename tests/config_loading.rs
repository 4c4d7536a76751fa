// tests/config_loading.rs

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use procpool::cli::CliArgs;
use procpool::config::{ConfigFile, Settings, load_and_validate};
use procpool::errors::ProcpoolError;
use procpool_test_utils::builders::RawConfigBuilder;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn loads_full_config_file() {
    let file = write_config(
        r#"
        [pool]
        instances = 4
        repeat = true

        [command]
        path = "/usr/local/bin/worker"
        args = ["--batch", "nightly"]
        env = ["MODE=prod", "EMPTY="]
        dir = "/srv/work"

        [output]
        stdout = "worker.out.log"
        tee = true
        "#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.pool.instances, Some(4));
    assert_eq!(cfg.pool.repeat, Some(true));

    let cmd = cfg.command.as_ref().unwrap();
    assert_eq!(cmd.path, "/usr/local/bin/worker");
    assert_eq!(cmd.args, ["--batch", "nightly"]);
    assert_eq!(cmd.env, ["MODE=prod", "EMPTY="]);
    assert_eq!(cmd.dir, Some(PathBuf::from("/srv/work")));

    assert_eq!(cfg.output.stdout, Some(PathBuf::from("worker.out.log")));
    assert_eq!(cfg.output.stderr, None);
    assert!(cfg.output.tee);
}

#[test]
fn empty_file_uses_defaults() {
    let file = write_config("");
    let cfg = load_and_validate(file.path()).unwrap();

    assert!(cfg.command.is_none());
    assert_eq!(cfg.pool.instances, None);
    assert!(!cfg.output.tee);
}

#[test]
fn invalid_toml_is_reported() {
    let file = write_config("[pool\ninstances = ");
    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, ProcpoolError::TomlError(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_and_validate(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ProcpoolError::IoError(_)));
}

#[test]
fn invalid_env_entry_fails_validation() {
    let raw = RawConfigBuilder::new()
        .command("worker", &[])
        .env("JUSTAKEY")
        .raw();
    let err = ConfigFile::try_from(raw).unwrap_err();
    assert!(matches!(err, ProcpoolError::ConfigError(_)));
}

#[test]
fn cli_command_keeps_file_env_and_dir() {
    let cfg = RawConfigBuilder::new()
        .instances(5)
        .command("file-worker", &["a"])
        .env("MODE=dev")
        .dir("/tmp")
        .build();
    let cli = CliArgs::try_parse_from(["procpool", "cli-worker", "b"]).unwrap();

    let settings = Settings::resolve(&cli, Some(cfg)).unwrap();
    let spec = settings.command_spec().unwrap();

    assert_eq!(settings.pool_options().instances, 5);
    assert_eq!(spec.path(), "cli-worker");
    assert_eq!(spec.arguments(), ["b"]);
    assert_eq!(spec.environment(), ["MODE=dev"]);
    assert_eq!(spec.working_dir(), Some(std::path::Path::new("/tmp")));
}

#[test]
fn output_paths_from_file_are_opened() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("o.log");

    let cfg = RawConfigBuilder::new()
        .command("true", &[])
        .stdout(&out)
        .build();
    let cli = CliArgs::try_parse_from(["procpool"]).unwrap();

    let settings = Settings::resolve(&cli, Some(cfg)).unwrap();
    let spec = settings.command_spec().unwrap();

    assert!(matches!(spec.stdout_sink(), procpool::exec::OutputSink::File(_)));
    assert!(out.exists());
}
