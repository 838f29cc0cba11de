use std::io::Write;

use clap::Parser;
use evalgen_cli::options::{Args, build_config, parse_extra, resolve_backend};
use evalgen_core::contracts::GuidedBackend;
use serde_json::json;
use tempfile::NamedTempFile;

fn args(extra: &[&str]) -> Args {
    let mut argv = vec!["evalgen"];
    argv.extend_from_slice(extra);
    Args::try_parse_from(argv).expect("arguments should parse")
}

#[test]
fn test_defaults() {
    let args = args(&[]);
    assert_eq!(args.model, "openai::gpt-4o-mini");
    assert_eq!(args.max_connections, 10);
    assert!(!args.no_schema);
    assert!(!args.json);
}

#[test]
fn test_default_config_sends_color_schema() {
    let config = build_config(&args(&[])).unwrap();
    let schema = config.response_schema.expect("schema expected");
    assert_eq!(schema.name, "color");
    assert_eq!(schema.strict, None);
    assert_eq!(schema.description, None);
    assert!(config.extra_body.is_none());
}

#[test]
fn test_no_schema() {
    let config = build_config(&args(&["--no-schema"])).unwrap();
    assert!(config.response_schema.is_none());
}

#[test]
fn test_strict_and_description() {
    let config = build_config(&args(&["--strict", "--schema-description", "An RGB color"])).unwrap();
    let schema = config.response_schema.unwrap();
    assert_eq!(schema.strict, Some(true));
    assert_eq!(schema.description.as_deref(), Some("An RGB color"));
}

#[test]
fn test_parse_extra_json_and_plain_values() {
    assert_eq!(parse_extra("top_k=5").unwrap(), ("top_k".to_string(), json!(5)));
    assert_eq!(
        parse_extra("guided_choice=[\"yes\",\"no\"]").unwrap(),
        ("guided_choice".to_string(), json!(["yes", "no"]))
    );
    assert_eq!(parse_extra("note=hello").unwrap(), ("note".to_string(), json!("hello")));
}

#[test]
fn test_parse_extra_rejects_malformed() {
    assert!(parse_extra("no-equals").is_err());
    assert!(parse_extra("=1").is_err());
}

#[test]
fn test_extra_entries_forwarded() {
    let config = build_config(&args(&["--extra", "top_k=5", "--extra", "repetition_penalty=1.1"])).unwrap();
    let extra = config.extra_body.unwrap();
    assert_eq!(extra["top_k"], json!(5));
    assert_eq!(extra["repetition_penalty"], json!(1.1));
}

#[test]
fn test_guided_choice_vllm() {
    let config = build_config(&args(&["--guided-backend", "vllm", "--guided-choice", "red, green,blue"])).unwrap();
    let extra = config.extra_body.unwrap();
    assert_eq!(extra["guided_choice"], json!(["red", "green", "blue"]));
}

#[test]
fn test_guided_regex_backend_from_model() {
    let config = build_config(&args(&["--model", "sglang::qwen", "--guided-regex", "\\d+,\\d+,\\d+"])).unwrap();
    let extra = config.extra_body.unwrap();
    assert_eq!(extra["regex"], json!("\\d+,\\d+,\\d+"));
    assert!(extra.get("guided_regex").is_none());
}

#[test]
fn test_guided_grammar_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "root ::= \"yes\" | \"no\"").unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let config = build_config(&args(&["--guided-backend", "sglang", "--guided-grammar-file", &path])).unwrap();
    let extra = config.extra_body.unwrap();
    assert_eq!(extra["ebnf"], json!("root ::= \"yes\" | \"no\"\n"));
}

#[test]
fn test_guided_requires_backend_for_other_providers() {
    let err = build_config(&args(&["--guided-regex", "a+"])).unwrap_err();
    assert!(err.to_string().contains("--guided-backend"));
}

#[test]
fn test_guided_options_conflict() {
    let result = Args::try_parse_from(["evalgen", "--guided-regex", "a+", "--guided-choice", "a,b"]);
    assert!(result.is_err());
}

#[test]
fn test_explicit_extra_overrides_guided() {
    let config = build_config(&args(&[
        "--guided-backend",
        "vllm",
        "--guided-regex",
        "a+",
        "--extra",
        "guided_regex=\"b+\"",
    ]))
    .unwrap();
    assert_eq!(config.extra_body.unwrap()["guided_regex"], json!("b+"));
}

#[test]
fn test_resolve_backend() {
    assert_eq!(resolve_backend(Some("SGLang"), "openai::x").unwrap(), GuidedBackend::Sglang);
    assert_eq!(resolve_backend(None, "vllm::meta-llama/Llama-3.1-8B-Instruct").unwrap(), GuidedBackend::Vllm);
    assert!(resolve_backend(Some("tgi"), "vllm::x").is_err());
    assert!(resolve_backend(None, "ollama::llama3").is_err());
}

#[test]
fn test_strict_schema_is_closed() {
    let config = build_config(&args(&["--strict"])).unwrap();
    let schema = config.response_schema.unwrap().schema;

    assert_eq!(schema["additionalProperties"], json!(false));
    assert!(schema["properties"]["red"].get("format").is_none());
}
