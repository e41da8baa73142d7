//! Dashboard server: loads the launch records CSV once, then serves site
//! options, the slider descriptor, and chart specs as JSON for whatever
//! rendering front end consumes them.
//!
//! Endpoints:
//!   GET /api/health   - liveness
//!   GET /api/controls - site options + payload slider descriptor
//!   GET /api/pie?site=ALL
//!   GET /api/scatter?site=ALL&low=0&high=10000

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use launchboard::charts::{payload_scatter, success_pie};
use launchboard::controls::{slider_descriptor, Config, ControlState, PayloadRange, SiteSelection, ALL_SITES};
use launchboard::data::{load_dataset, manifest};
use launchboard::filter::scatter_rows;
use launchboard::logging::{log, log_dataset_loaded, log_request, obj, v_str, Domain, Level};
use launchboard::record::Dataset;

fn main() -> Result<()> {
    let cfg = Config::from_env();

    let path = Path::new(&cfg.csv_path);
    let (dataset, report) = load_dataset(path)
        .with_context(|| format!("failed to load launch records from {}", cfg.csv_path))?;
    log_dataset_loaded(&cfg.csv_path, report.rows, report.bad_rows, dataset.sites().len());
    for warning in &report.warnings {
        log(Level::Warn, Domain::Data, "bad_row", obj(&[("detail", v_str(warning))]));
    }
    let manifest = manifest(path, &dataset, &report)?;
    log(
        Level::Info,
        Domain::Data,
        "dataset_manifest",
        obj(&[
            ("sha256", v_str(&manifest.hash_sha256)),
            ("payload_min", json!(manifest.payload_min)),
            ("payload_max", json!(manifest.payload_max)),
        ]),
    );

    let listener = TcpListener::bind(("127.0.0.1", cfg.port))
        .with_context(|| format!("failed to bind port {}", cfg.port))?;
    log(
        Level::Info,
        Domain::System,
        "listening",
        obj(&[("port", json!(cfg.port)), ("csv", v_str(&cfg.csv_path))]),
    );

    for stream in listener.incoming() {
        let stream = match stream {
            Ok(s) => s,
            Err(_) => continue,
        };
        if let Err(err) = handle_connection(stream, &dataset) {
            log(
                Level::Warn,
                Domain::Server,
                "connection_error",
                obj(&[("error", v_str(&format!("{:#}", err)))]),
            );
        }
    }
    Ok(())
}

fn handle_connection(mut stream: TcpStream, dataset: &Dataset) -> Result<()> {
    let buf_reader = BufReader::new(&stream);
    let request_line = match buf_reader.lines().next() {
        Some(Ok(line)) => line,
        _ => return Ok(()),
    };

    let target = request_line
        .strip_prefix("GET ")
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or("");
    let (path, query) = match target.split_once('?') {
        Some((p, q)) => (p, q),
        None => (target, ""),
    };

    let (status, body) = route(path, query, dataset);
    log_request(path, status_code(status));

    let response = format!(
        "HTTP/1.1 {}\r\n\
         Content-Type: application/json\r\n\
         Access-Control-Allow-Origin: *\r\n\
         Content-Length: {}\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes())?;
    Ok(())
}

fn status_code(status: &str) -> u16 {
    status.split(' ').next().and_then(|s| s.parse().ok()).unwrap_or(0)
}

fn route(path: &str, query: &str, dataset: &Dataset) -> (&'static str, String) {
    match path {
        "/api/health" => ("200 OK", r#"{"status":"ok"}"#.to_string()),
        "/api/controls" => {
            let mut options = vec![ALL_SITES.to_string()];
            options.extend(dataset.sites().iter().cloned());
            let body = json!({
                "site_options": options,
                "payload_slider": slider_descriptor(dataset),
            });
            ("200 OK", body.to_string())
        }
        "/api/pie" => {
            let site = query_param(query, "site").unwrap_or_else(|| ALL_SITES.to_string());
            let spec = success_pie(dataset, &SiteSelection::parse(&site));
            ("200 OK", serde_json::to_string(&spec).unwrap_or_default())
        }
        "/api/scatter" => {
            let site = query_param(query, "site").unwrap_or_else(|| ALL_SITES.to_string());
            let (default_low, default_high) = dataset.payload_bounds();
            let low = query_param(query, "low")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default_low);
            let high = query_param(query, "high")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default_high);
            let payload = match PayloadRange::new(low, high) {
                Ok(range) => range,
                Err(err) => {
                    return (
                        "400 BAD REQUEST",
                        json!({ "error": err.to_string() }).to_string(),
                    )
                }
            };
            let controls = ControlState { site: SiteSelection::parse(&site), payload };
            let rows = scatter_rows(dataset, &controls);
            let spec = payload_scatter(&rows, &controls.site);
            ("200 OK", serde_json::to_string(&spec).unwrap_or_default())
        }
        _ => ("404 NOT FOUND", r#"{"error":"not found"}"#.to_string()),
    }
}

/// First value for `key` in a URL query string. Site names contain spaces,
/// so values arrive percent-encoded.
fn query_param(query: &str, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
