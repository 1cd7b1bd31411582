//! Integration tests for config loading and argument parsing

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use percept::{FormConfig, ImageAddressing, SurveyConfig};
use percept_cli::{Cli, Command, DemoKind, demo_json, load_form_config, load_survey_config};
use tempfile::NamedTempFile;

fn write(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn test_loads_template_survey_config() {
    let file = write(
        r#"{
            "question": {"format": "Who of these is {job}?", "variables": {"job": ["a nurse"]}},
            "images": ["a.jpg", "b.jpg"],
            "time_bar_duration": 6,
            "image_url_prefix": "/static/cfd",
            "post_url": "/post-survey",
            "csrf_token": "abc"
        }"#,
    );

    let config = load_survey_config(file.path()).unwrap();
    assert_eq!(config.questions.pair_count(), 1);
    assert_eq!(config.time_bar_duration, Some(6));
    assert_eq!(config.exit_url, "/");
    assert_eq!(config.csrf_token.as_deref(), Some("abc"));
    assert_eq!(config.image_addressing, ImageAddressing::Prefixed);
}

#[test]
fn test_invalid_survey_config_names_the_file() {
    let file = write(r#"{"pair_questions": [], "post_url": "/post-survey"}"#);

    let err = load_survey_config(file.path()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains(&file.path().display().to_string()));
    assert!(message.contains("at least one complete image pair"));
}

#[test]
fn test_missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_survey_config(&dir.path().join("absent.json")).unwrap_err();
    assert!(err.to_string().contains("could not read survey config"));
}

#[test]
fn test_loads_form_config() {
    let file = write(
        r#"{
            "survey_id": "occupations",
            "questions": [
                {"kind": "AgreementScale", "title": "I enjoyed this"},
                {"kind": "OpenShort", "title": "Anything else?", "min_len": 2, "max_len": 40}
            ]
        }"#,
    );

    let config = load_form_config(file.path()).unwrap();
    assert_eq!(config.questions.len(), 2);
    assert_eq!(config.post_path(), "/survey/occupations");
}

#[test]
fn test_demo_configs_load_back() {
    let pairs = write(&demo_json(DemoKind::Pairs).unwrap());
    assert!(load_survey_config(pairs.path()).unwrap().questions.pair_count() > 64);

    let template: SurveyConfig =
        serde_json::from_str(&demo_json(DemoKind::Template).unwrap()).unwrap();
    template.validate().unwrap();

    let form: FormConfig = serde_json::from_str(&demo_json(DemoKind::Form).unwrap()).unwrap();
    form.validate().unwrap();
}

#[test]
fn test_pairs_needs_config_unless_offline() {
    assert!(Cli::try_parse_from(["percept", "pairs"]).is_err());

    let cli = Cli::try_parse_from(["percept", "pairs", "--offline"]).unwrap();
    let Command::Pairs(args) = cli.command else {
        panic!("expected the pairs command");
    };
    assert!(args.backend.offline);
    assert_eq!(args.config, None);
    assert_eq!(cli.log_file, PathBuf::from("percept.log"));
}

#[test]
fn test_form_arguments() {
    let cli = Cli::try_parse_from([
        "percept",
        "form",
        "--config",
        "form.json",
        "--base-url",
        "https://survey.example.org",
        "--log-file",
        "/tmp/percept.log",
    ])
    .unwrap();

    let Command::Form(args) = cli.command else {
        panic!("expected the form command");
    };
    assert_eq!(args.config, Some(PathBuf::from("form.json")));
    assert_eq!(args.backend.base_url, "https://survey.example.org");
    assert_eq!(args.backend.timeout, 15);
    assert_eq!(cli.log_file, PathBuf::from("/tmp/percept.log"));
}
