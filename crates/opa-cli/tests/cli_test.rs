//! OPA CLI Tests
//!
//! Argument parsing, settings layering and subcommands against a mock OPA server.

use std::{io::Write, path::PathBuf};

use clap::Parser;
use opa_cli::{Cli, CliSettings, Command, DataCommand, PolicyCommand, commands};
use opa_client::{HttpVersion, OpaClient};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, body_string, header, method, path},
};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

fn no_env() -> Option<config::Map<String, String>> {
    Some(config::Map::new())
}

// ============== Argument Parsing ==============

#[test]
fn test_parse_query_with_globals() {
    let cli = parse(&[
        "opa-cli",
        "--url",
        "http://opa:8181",
        "-H",
        "Authorization: Bearer t",
        "query",
        "authz/allow",
        "--input",
        r#"{"user":"alice"}"#,
        "-vv",
    ]);

    assert_eq!(cli.url.as_deref(), Some("http://opa:8181"));
    assert_eq!(
        cli.headers,
        vec![("Authorization".to_string(), "Bearer t".to_string())]
    );
    assert_eq!(cli.verbose, 2);
    assert_eq!(
        cli.command,
        Command::Query {
            path: "authz/allow".to_string(),
            input: Some(r#"{"user":"alice"}"#.to_string()),
            input_file: None,
        }
    );
}

#[test]
fn test_parse_nested_subcommands() {
    let cli = parse(&["opa-cli", "policy", "put", "example", "example.rego"]);
    assert_eq!(
        cli.command,
        Command::Policy(PolicyCommand::Put {
            id: "example".to_string(),
            file: PathBuf::from("example.rego"),
        })
    );

    let cli = parse(&["opa-cli", "data", "delete", "roles/admins"]);
    assert_eq!(
        cli.command,
        Command::Data(DataCommand::Delete {
            path: "roles/admins".to_string()
        })
    );
}

#[test]
fn test_parse_rejects_conflicting_inputs() {
    let result = Cli::try_parse_from([
        "opa-cli",
        "query",
        "a",
        "--input",
        "{}",
        "--input-file",
        "in.json",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_parse_rejects_bad_header() {
    let result = Cli::try_parse_from(["opa-cli", "-H", "nocolon", "health"]);
    assert!(result.is_err());
}

// ============== Settings ==============

#[test]
fn test_settings_defaults() {
    let cli = parse(&["opa-cli", "health"]);
    let settings = CliSettings::load_with_env(&cli, no_env()).unwrap();

    assert_eq!(settings.url, "http://localhost:8181");
    assert_eq!(settings.http_version, None);
    assert!(settings.headers.is_empty());
    assert_eq!(settings.connect_timeout_ms, 5000);
    assert_eq!(settings.read_timeout_ms, 30000);
}

#[test]
fn test_settings_layering() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
url = "http://from-file:8181"
read_timeout_ms = 1000

[headers]
X-Source = "file"
"#
    )
    .unwrap();

    let env = config::Map::from([
        ("OPA_URL".to_string(), "http://from-env:8181".to_string()),
        ("OPA_CONNECT_TIMEOUT_MS".to_string(), "250".to_string()),
    ]);

    let config_path = file.path().to_str().unwrap().to_string();
    let cli = parse(&[
        "opa-cli",
        "--config",
        &config_path,
        "--http2",
        "-H",
        "X-Source: flag",
        "health",
    ]);
    let settings = CliSettings::load_with_env(&cli, Some(env)).unwrap();

    assert_eq!(settings.url, "http://from-env:8181");
    assert_eq!(settings.connect_timeout_ms, 250);
    assert_eq!(settings.read_timeout_ms, 1000);
    assert_eq!(settings.http_version, Some(HttpVersion::Http2));
    assert_eq!(settings.headers.len(), 1);
    assert_eq!(settings.headers["X-Source"], "flag");

    let cli = parse(&["opa-cli", "--url", "http://from-flag:8181", "health"]);
    let env = config::Map::from([("OPA_URL".to_string(), "http://from-env:8181".to_string())]);
    let settings = CliSettings::load_with_env(&cli, Some(env)).unwrap();
    assert_eq!(settings.url, "http://from-flag:8181");
}

#[test]
fn test_settings_http_version_from_env() {
    let cli = parse(&["opa-cli", "health"]);
    for (raw, expected) in [
        ("2", HttpVersion::Http2),
        ("1.1", HttpVersion::Http1_1),
        ("HTTP2", HttpVersion::Http2),
        ("http_1_1", HttpVersion::Http1_1),
    ] {
        let env = config::Map::from([("OPA_HTTP_VERSION".to_string(), raw.to_string())]);
        let settings = CliSettings::load_with_env(&cli, Some(env)).unwrap();
        assert_eq!(settings.http_version, Some(expected), "OPA_HTTP_VERSION={}", raw);
    }

    let env = config::Map::from([("OPA_HTTP_VERSION".to_string(), "3".to_string())]);
    assert!(CliSettings::load_with_env(&cli, Some(env)).is_err());
}

#[test]
fn test_settings_debug_hides_header_values() {
    let cli = parse(&[
        "opa-cli",
        "-H",
        "Authorization: Bearer secret-token",
        "health",
    ]);
    let settings = CliSettings::load_with_env(&cli, no_env()).unwrap();
    let printed = format!("{:?}", settings);

    assert!(printed.contains("Authorization"));
    assert!(printed.contains("http://localhost:8181"));
    assert!(!printed.contains("secret-token"));
}

#[test]
fn test_settings_to_configuration() {
    let cli = parse(&[
        "opa-cli",
        "--url",
        "https://opa.example.com",
        "-H",
        "Authorization: Bearer t",
        "health",
    ]);
    let configuration = CliSettings::load_with_env(&cli, no_env())
        .unwrap()
        .to_configuration();

    assert_eq!(configuration.url, "https://opa.example.com");
    // inferred from the https scheme
    assert_eq!(configuration.http_version, HttpVersion::Http2);
    assert_eq!(configuration.headers["Authorization"], "Bearer t");
}

#[test]
fn test_settings_missing_file() {
    let cli = parse(&["opa-cli", "--config", "/nonexistent/opa.toml", "health"]);
    assert!(CliSettings::load_with_env(&cli, no_env()).is_err());
}

// ============== Commands ==============

fn client_for(server: &MockServer) -> OpaClient {
    OpaClient::builder()
        .opa_configuration(&server.uri())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_query_command() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/data/authz/allow"))
        .and(body_json(json!({"input": {"user": "alice"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": true})))
        .expect(1)
        .mount(&server)
        .await;

    let cli = parse(&[
        "opa-cli",
        "query",
        "authz/allow",
        "--input",
        r#"{"user":"alice"}"#,
    ]);
    let output = commands::run(&client_for(&server), cli.command)
        .await
        .unwrap();
    assert_eq!(output, Some(json!(true)));
}

#[tokio::test]
async fn test_query_command_rejects_bad_input() {
    let server = MockServer::start().await;
    let cli = parse(&["opa-cli", "query", "authz/allow", "--input", "{not json"]);
    assert!(
        commands::run(&client_for(&server), cli.command)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_data_put_from_file() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/data/roles"))
        .and(body_json(json!({"admins": ["alice"]})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"admins": ["alice"]}}"#).unwrap();
    let content = format!("@{}", file.path().display());

    let cli = parse(&["opa-cli", "data", "put", "roles", &content]);
    let output = commands::run(&client_for(&server), cli.command)
        .await
        .unwrap();
    assert_eq!(output, None);
}

#[tokio::test]
async fn test_policy_put_and_list_commands() {
    let server = MockServer::start().await;
    let rego = "package example\n\ndefault allow = false\n";
    Mock::given(method("PUT"))
        .and(path("/v1/policies/example"))
        .and(header("content-type", "text/plain"))
        .and(body_string(rego))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/policies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"id": "example", "raw": rego}]
        })))
        .mount(&server)
        .await;

    let mut file = tempfile::Builder::new().suffix(".rego").tempfile().unwrap();
    write!(file, "{}", rego).unwrap();
    let policy_path = file.path().to_str().unwrap().to_string();

    let client = client_for(&server);
    let cli = parse(&["opa-cli", "policy", "put", "example", &policy_path]);
    assert_eq!(commands::run(&client, cli.command).await.unwrap(), None);

    let cli = parse(&["opa-cli", "policy", "list"]);
    assert_eq!(
        commands::run(&client, cli.command).await.unwrap(),
        Some(json!(["example"]))
    );
}

#[tokio::test]
async fn test_health_command_fails_when_unhealthy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let cli = parse(&["opa-cli", "health"]);
    let err = commands::run(&client_for(&server), cli.command)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("unhealthy"));
}
