use anyhow::Result;
use clap::Parser;
use group_prune::core::ConfigProvider;
use group_prune::{CliConfig, FileErrorLog, GraphClient, PruneEngine, PruneError, TerminalSelector};
use httpmock::prelude::*;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use tempfile::TempDir;

fn config_for(server: &MockServer, error_log: &str, extra: &[&str]) -> CliConfig {
    let base_url = server.base_url();
    let mut args = vec![
        "group-prune",
        "--group-id",
        "12345",
        "--access-token",
        "tok",
        "--location",
        "Austin",
        "--api-url",
        base_url.as_str(),
        "--page-size",
        "2",
        "--batch-size",
        "2",
        "--error-log",
        error_log,
    ];
    args.extend_from_slice(extra);
    CliConfig::try_parse_from(args).unwrap()
}

fn mock_valid_token(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/debug_token");
        then.status(200).json_body(json!({"data": {"is_valid": true}}));
    });
}

#[tokio::test]
async fn test_end_to_end_removal() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let log_path = temp_dir.path().join("error_log.txt");
    let log_path_str = log_path.to_str().unwrap().to_string();

    let server = MockServer::start();
    mock_valid_token(&server);

    // Listing: [1, 2] then [3]
    let next = server.url("/12345/members?access_token=tok&after=p2");
    let first_page = server.mock(|when, then| {
        when.method(GET)
            .path("/12345/members")
            .query_param("limit", "2")
            .query_param("access_token", "tok");
        then.status(200).json_body(json!({
            "data": [{"id": "1", "name": "Ada"}, {"id": "2", "name": "Bob"}],
            "paging": {"next": next}
        }));
    });
    let second_page = server.mock(|when, then| {
        when.method(GET)
            .path("/12345/members")
            .query_param("after", "p2");
        then.status(200).json_body(json!({
            "data": [{"id": "3", "name": "Cy"}],
            "paging": {}
        }));
    });

    // Metadata in two batches
    let lookup_a = server.mock(|when, then| {
        when.method(GET).path("/").query_param("ids", "1,2");
        then.status(200).json_body(json!({
            "1": {"id": "1", "name": "Ada", "location": {"name": "Austin"}},
            "2": {"id": "2", "name": "Bob", "location": {"name": "Dallas"}}
        }));
    });
    let lookup_b = server.mock(|when, then| {
        when.method(GET).path("/").query_param("ids", "3");
        then.status(200).json_body(json!({
            "3": {"id": "3", "name": "Cy", "location": {"name": "austin"}}
        }));
    });

    let delete_ok = server.mock(|when, then| {
        when.method(DELETE).path("/12345/members/1");
        then.status(200).json_body(json!({"success": true}));
    });
    let delete_fail = server.mock(|when, then| {
        when.method(DELETE).path("/12345/members/3");
        then.status(500).body("boom");
    });
    let delete_other = server.mock(|when, then| {
        when.method(DELETE).path("/12345/members/2");
        then.status(200);
    });

    let config = config_for(&server, &log_path_str, &[]);
    let sink = Arc::new(FileErrorLog::open(config.error_log_path())?);
    let client = GraphClient::new(config.api_url());
    let selector = TerminalSelector::new(Cursor::new("all\n"), Vec::new());

    let mut engine = PruneEngine::new(client, selector, config, sink);
    let report = engine.run().await?;

    first_page.assert();
    second_page.assert();
    lookup_a.assert();
    lookup_b.assert();
    delete_ok.assert();
    delete_fail.assert();
    delete_other.assert_hits(0);

    assert_eq!(report.fetched, 3);
    assert_eq!(report.enriched, 3);
    assert_eq!(report.matched, 2);
    assert_eq!(report.selected, 2);
    let summary = report.removal.expect("removal ran");
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failed_ids, vec!["3".to_string()]);

    let log = std::fs::read_to_string(&log_path)?;
    assert!(log.contains(" - ERROR - Error removing user 3: 500 - boom"));
    Ok(())
}

#[tokio::test]
async fn test_failed_lookup_batch_still_filters_the_rest() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let log_path = temp_dir.path().join("error_log.txt");

    let server = MockServer::start();
    mock_valid_token(&server);
    server.mock(|when, then| {
        when.method(GET).path("/12345/members");
        then.status(200).json_body(json!({
            "data": [{"id": "1"}, {"id": "2"}, {"id": "3"}]
        }));
    });
    let broken_lookup = server.mock(|when, then| {
        when.method(GET).path("/").query_param("ids", "1,2");
        then.status(500).body("lookup exploded");
    });
    server.mock(|when, then| {
        when.method(GET).path("/").query_param("ids", "3");
        then.status(200).json_body(json!({
            "3": {"id": "3", "location": {"name": "AUSTIN"}}
        }));
    });

    let config = config_for(&server, log_path.to_str().unwrap(), &[]);
    let sink = Arc::new(FileErrorLog::open(config.error_log_path())?);
    let client = GraphClient::new(config.api_url());
    let selector = TerminalSelector::new(Cursor::new("none\n"), Vec::new());

    let mut engine = PruneEngine::new(client, selector, config, sink);
    let report = engine.run().await?;

    broken_lookup.assert();
    assert_eq!(report.fetched, 3);
    assert_eq!(report.enriched, 1);
    assert_eq!(report.matched, 1);
    assert_eq!(report.selected, 0);
    assert!(report.removal.is_none());

    let log = std::fs::read_to_string(&log_path)?;
    assert!(log.contains("Error fetching metadata batch"));
    Ok(())
}

#[tokio::test]
async fn test_invalid_token_stops_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let log_path = temp_dir.path().join("error_log.txt");

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/debug_token");
        then.status(200).json_body(json!({"data": {"is_valid": false}}));
    });
    let listing = server.mock(|when, then| {
        when.method(GET).path("/12345/members");
        then.status(200).json_body(json!({"data": []}));
    });

    let config = config_for(&server, log_path.to_str().unwrap(), &[]);
    let sink = Arc::new(FileErrorLog::open(config.error_log_path())?);
    let client = GraphClient::new(config.api_url());
    let selector = TerminalSelector::new(Cursor::new(""), Vec::new());

    let mut engine = PruneEngine::new(client, selector, config, sink);
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, PruneError::CredentialError { .. }));
    listing.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_strict_pagination_discards_partial_listing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let log_path = temp_dir.path().join("error_log.txt");

    let server = MockServer::start();
    mock_valid_token(&server);
    let next = server.url("/12345/members?access_token=tok&after=p2");
    server.mock(|when, then| {
        when.method(GET).path("/12345/members").query_param("limit", "2");
        then.status(200).json_body(json!({
            "data": [{"id": "1"}, {"id": "2"}],
            "paging": {"next": next}
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/12345/members").query_param("after", "p2");
        then.status(502).body("bad gateway");
    });

    let config = config_for(&server, log_path.to_str().unwrap(), &["--discard-partial"]);
    let sink = Arc::new(FileErrorLog::open(config.error_log_path())?);
    let client = GraphClient::new(config.api_url());
    let selector = TerminalSelector::new(Cursor::new(""), Vec::new());

    let mut engine = PruneEngine::new(client, selector, config, sink);
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, PruneError::NoMembersError { .. }));
    let log = std::fs::read_to_string(&log_path)?;
    assert!(log.contains("Error fetching group members"));
    Ok(())
}
