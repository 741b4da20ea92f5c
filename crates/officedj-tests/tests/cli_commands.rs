//! CLI command functions run end to end against temp files.

use std::fs;

use officedj_cli::commands;
use officedj_cli::commands::render::RenderOptions;
use officedj_cli::input::InputArgs;
use officedj_compose::Arrangement;

fn input(text: &str, path: &str) -> InputArgs {
    InputArgs {
        text: Some(text.to_string()),
        path: Some(path.to_string()),
        ..InputArgs::default()
    }
}

#[test]
fn analyze_and_blueprint_succeed() {
    let args = input("LED 조명 7개 설치", "/jiwon");
    assert!(commands::analyze::run(&args, true).is_ok());
    assert!(commands::analyze::run(&args, false).is_ok());
    assert!(commands::blueprint::run(&args, true).is_ok());
    assert!(commands::blueprint::run(&args, false).is_ok());
}

#[test]
fn code_command_matches_library() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("loop.js");
    let mut args = input("회의실 3개", "/jungah");
    args.generation = 2;
    commands::code::run(&args, None, out.to_str()).unwrap();
    let expected = Arrangement::compose("회의실 3개", "/jungah", 2).code(None);
    assert_eq!(fs::read_to_string(&out).unwrap(), expected);
}

#[test]
fn render_command_uses_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("session.json");
    fs::write(
        &config,
        r#"{"path_hint": "/jasang", "sample_rate": 8000, "bars": 1}"#,
    )
    .unwrap();
    let out = dir.path().join("loop.wav");
    let args = InputArgs {
        text: Some("주말 라운지".to_string()),
        ..InputArgs::default()
    };

    let options = RenderOptions::resolve(config.to_str(), &args, None, None).unwrap();
    assert_eq!(options.config.path_hint, "/jasang");
    commands::render::run(&args, out.to_str().unwrap(), options.clone(), false).unwrap();
    let first = fs::read(&out).unwrap();
    commands::render::run(&args, out.to_str().unwrap(), options, false).unwrap();
    assert_eq!(fs::read(&out).unwrap(), first);
}

#[test]
fn bad_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("session.json");
    fs::write(&config, r#"{"sample_rate": 12}"#).unwrap();
    let args = InputArgs::default();
    assert!(RenderOptions::resolve(config.to_str(), &args, None, None).is_err());
}
