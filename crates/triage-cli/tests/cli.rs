//! Integration tests for argument parsing.

use std::path::Path;

use clap::Parser;

use triage_cli::cli::{Cli, Command, LogFormatArg};

#[test]
fn test_assess_defaults() {
    let cli = Cli::try_parse_from(["patient-triage", "assess"]).unwrap();

    assert!(!cli.log_data);
    assert!(matches!(cli.log_format, LogFormatArg::Pretty));
    let Command::Assess(args) = cli.command else {
        panic!("expected assess command");
    };
    assert_eq!(args.page_limit, 20);
    assert_eq!(args.expected_high_risk, 20);
    assert_eq!(args.request_timeout_secs, 30);
    assert!(!args.submit);
    assert!(args.base_url.is_none());
    assert!(args.output.is_none());
}

#[test]
fn test_assess_flags() {
    let cli = Cli::try_parse_from([
        "patient-triage",
        "assess",
        "--base-url",
        "http://localhost:8080/api",
        "--page-limit",
        "5",
        "--expected-high-risk",
        "12",
        "--submit",
        "--output",
        "payload.json",
        "--log-format",
        "json",
        "--log-data",
    ])
    .unwrap();

    assert!(cli.log_data);
    assert!(matches!(cli.log_format, LogFormatArg::Json));
    let Command::Assess(args) = cli.command else {
        panic!("expected assess command");
    };
    assert_eq!(args.base_url.as_deref(), Some("http://localhost:8080/api"));
    assert_eq!(args.page_limit, 5);
    assert_eq!(args.expected_high_risk, 12);
    assert!(args.submit);
    assert_eq!(args.output.as_deref(), Some(Path::new("payload.json")));
}

#[test]
fn test_page_limit_out_of_range_is_rejected() {
    assert!(Cli::try_parse_from(["patient-triage", "assess", "--page-limit", "0"]).is_err());
    assert!(Cli::try_parse_from(["patient-triage", "assess", "--page-limit", "21"]).is_err());
}

#[test]
fn test_variants_subcommand() {
    let cli = Cli::try_parse_from(["patient-triage", "variants"]).unwrap();
    assert!(matches!(cli.command, Command::Variants));
}

#[test]
fn test_subcommand_is_required() {
    assert!(Cli::try_parse_from(["patient-triage"]).is_err());
}
