/// HTTP endpoint for the climate query API
///
/// A synchronous request-response loop: each request is parsed, answered
/// from the read-only dataset, and forgotten. No cross-request state.
///
/// Endpoints:
/// - GET / - plain-text listing of available routes
/// - GET /health - service health check
/// - GET /api/v1.0/precipitation - full precipitation table
/// - GET /api/v1.0/stations - distinct station codes
/// - GET /api/v1.0/tobs - temperature observations for the most recent year
/// - GET /api/v1.0/search?start=YYYY-MM-DD&end=YYYY-MM-DD - min/mean/max temperature

use crate::model::{distinct_station_codes, TemperatureSummary};
use crate::queries;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::HashMap;

type JsonResponse = tiny_http::Response<std::io::Cursor<Vec<u8>>>;

const API_ROUTES: &[&str] = &[
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/search",
];

// ---------------------------------------------------------------------------
// Request Parsing
// ---------------------------------------------------------------------------

/// Parse an HTTP query string into key/value pairs.
///
/// Values are percent-decoded; pairs without '=' are ignored; a repeated
/// key keeps its last value.
pub fn parse_query_params(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        if key.is_empty() {
            continue;
        }
        let value = urlencoding::decode(value)
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| value.to_string());
        params.insert(key.to_string(), value);
    }

    params
}

/// Parse a date query parameter. Only `YYYY-MM-DD` is accepted.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}': expected YYYY-MM-DD", s))
}

// ---------------------------------------------------------------------------
// Request Handling
// ---------------------------------------------------------------------------

/// Run the search operation for a raw query string: parse the optional
/// start/end dates and compute the aggregate summary.
pub fn run_search(conn: &Connection, query: &str) -> Result<TemperatureSummary, String> {
    let params = parse_query_params(query);

    let start = params.get("start").map(|s| parse_date(s)).transpose()?;
    let end = params.get("end").map(|s| parse_date(s)).transpose()?;

    queries::temperature_summary(conn, start, end)
}

fn handle_precipitation(conn: &Connection) -> JsonResponse {
    match queries::fetch_all_measurements(conn) {
        Ok(rows) => {
            let entries: Vec<_> = rows.iter().map(|m| m.precipitation_entry()).collect();
            json_response(200, serde_json::json!(entries))
        }
        Err(e) => failure_response(&e),
    }
}

fn handle_stations(conn: &Connection) -> JsonResponse {
    match queries::fetch_stations(conn) {
        Ok(stations) => json_response(200, serde_json::json!(distinct_station_codes(&stations))),
        Err(e) => failure_response(&e),
    }
}

fn handle_tobs(conn: &Connection) -> JsonResponse {
    match queries::fetch_recent_measurements(conn) {
        Ok(rows) => {
            let entries: Vec<_> = rows.iter().map(|m| m.tobs_entry()).collect();
            json_response(200, serde_json::json!(entries))
        }
        Err(e) => failure_response(&e),
    }
}

fn handle_search(conn: &Connection, query: &str) -> JsonResponse {
    match run_search(conn, query) {
        Ok(summary) => json_response(200, serde_json::json!(summary)),
        Err(e) => failure_response(&e),
    }
}

/// Plain-text body for the home route.
pub fn home_text() -> String {
    [
        "Welcome to the climate query service.",
        "",
        "Available routes:",
        "/api/v1.0/precipitation: date, station and precipitation for every measurement.",
        "/api/v1.0/stations: list of station codes in the dataset.",
        "/api/v1.0/tobs: temperature observations for the most recent year of data.",
        "/api/v1.0/search: pass a start date, or start and end dates (YYYY-MM-DD), \
         for the min, mean and max temperature over that range.",
    ]
    .join("\n")
}

fn handle_home() -> JsonResponse {
    text_response(200, home_text())
}

fn handle_health() -> JsonResponse {
    json_response(
        200,
        serde_json::json!({
            "status": "ok",
            "service": "climate_service",
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

// ---------------------------------------------------------------------------
// Response Construction
// ---------------------------------------------------------------------------

/// Uniform failure envelope body for any caught error.
pub fn failure_envelope(message: &str) -> serde_json::Value {
    serde_json::json!({
        "status": "failure",
        "error": message,
    })
}

/// Failures are reported in-band with HTTP 200, not via status codes.
/// Existing consumers check the envelope, so the low-fidelity status
/// stays as-is.
fn failure_response(message: &str) -> JsonResponse {
    json_response(200, failure_envelope(message))
}

/// Create HTTP response with JSON body
fn json_response(status_code: u16, json: serde_json::Value) -> JsonResponse {
    let body = serde_json::to_string(&json).unwrap_or_else(|_| "null".to_string());

    tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(status_code))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                .expect("static header is valid"),
        )
}

/// Create HTTP response with plain-text body
fn text_response(status_code: u16, body: String) -> JsonResponse {
    tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(status_code))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"text/plain; charset=utf-8"[..])
                .expect("static header is valid"),
        )
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start the endpoint server on the specified port and serve forever.
pub fn start_endpoint_server(port: u16, conn: Connection) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    println!("📡 HTTP endpoint listening on http://0.0.0.0:{}", port);
    for route in API_ROUTES {
        println!("   GET {}", route);
    }
    println!();

    serve(server, conn)
}

/// Serve requests from an already-bound server. Split out from
/// `start_endpoint_server` so tests can bind an ephemeral port.
pub fn serve(server: tiny_http::Server, conn: Connection) -> Result<(), String> {
    for request in server.incoming_requests() {
        let url = request.url().to_string();
        let (path, query) = url.split_once('?').unwrap_or((url.as_str(), ""));

        let response = match path {
            "/" => handle_home(),
            "/health" => handle_health(),
            "/api/v1.0/precipitation" => handle_precipitation(&conn),
            "/api/v1.0/stations" => handle_stations(&conn),
            "/api/v1.0/tobs" => handle_tobs(&conn),
            "/api/v1.0/search" => handle_search(&conn, query),
            _ => json_response(
                404,
                serde_json::json!({
                    "error": "Not found",
                    "available_endpoints": API_ROUTES,
                }),
            ),
        };

        if let Err(e) = request.respond(response) {
            eprintln!("Failed to send response: {}", e);
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
