use super::*;

#[test]
fn parses_search_command_with_defaults() {
    let cli = Cli::try_parse_from(["launchwatch-cli", "search"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Search {
            prompt_file: None,
            model: None,
            timeout_secs: 600,
        }
    ));
}

#[test]
fn parses_search_command_with_overrides() {
    let cli = Cli::try_parse_from([
        "launchwatch-cli",
        "search",
        "--prompt-file",
        "prompt.txt",
        "--model",
        "gpt-4.1",
        "--timeout-secs",
        "120",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Search {
            prompt_file,
            model,
            timeout_secs,
        } => {
            assert_eq!(prompt_file, Some(PathBuf::from("prompt.txt")));
            assert_eq!(model.as_deref(), Some("gpt-4.1"));
            assert_eq!(timeout_secs, 120);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_extract_command() {
    let cli = Cli::try_parse_from(["launchwatch-cli", "extract", "payload.json"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Extract { file } if file == PathBuf::from("payload.json")
    ));
}

#[test]
fn parses_prompt_command() {
    let cli =
        Cli::try_parse_from(["launchwatch-cli", "prompt"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Prompt));
}

#[test]
fn missing_command_is_an_error() {
    assert!(Cli::try_parse_from(["launchwatch-cli"]).is_err());
}
