use std::path::PathBuf;

use draftpad::config::{ConfigFlags, load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".draftpadrc");
    let content = r"
# comment
--watch

--user alice

--store=docs.json
";
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.watch);
    assert_eq!(flags.user, Some("alice".to_string()));
    assert_eq!(flags.store, Some(PathBuf::from("docs.json")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".draftpadrc");
    std::fs::write(&path, "--watch\n--user alice\n").unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "draftpad".to_string(),
        "--user".to_string(),
        "bob".to_string(),
        "--anonymous".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.watch, "file flags should remain enabled");
    assert!(effective.anonymous, "cli flags should be applied");
    assert_eq!(
        effective.user,
        Some("bob".to_string()),
        "cli should override the user"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "draftpad".to_string(),
        "--store=docs.json".to_string(),
        "--user=alice".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.store, Some(PathBuf::from("docs.json")));
    assert_eq!(flags.user, Some("alice".to_string()));
}

#[test]
fn test_missing_config_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let flags = load_config_flags(&dir.path().join("absent")).unwrap();
    assert_eq!(flags, ConfigFlags::default());
}
