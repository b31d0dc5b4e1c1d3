//! Climate Query Service
//!
//! A small read-only HTTP API over the climate SQLite dataset:
//! station metadata plus daily precipitation and temperature observations.
//! Each request is a single read-and-respond cycle against the dataset;
//! there is no write path and no background work.
//!
//! Usage:
//!   cargo run --release                 # Serve on the default port (5000)
//!   cargo run --release -- --port 8080  # Serve on port 8080
//!
//! Environment:
//!   CLIMATE_DB - path to the pre-populated SQLite dataset file

use climate_service::db;
use climate_service::endpoint;
use std::env;

const DEFAULT_PORT: u16 = 5000;

fn main() {
    println!("🌺 Climate Query Service");
    println!("========================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut port = DEFAULT_PORT;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                if i + 1 < args.len() {
                    port = match args[i + 1].parse() {
                        Ok(p) => p,
                        Err(_) => {
                            eprintln!("Error: --port requires a valid port number, got '{}'", args[i + 1]);
                            std::process::exit(1);
                        }
                    };
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--port PORT]", args[0]);
                std::process::exit(1);
            }
        }
    }

    // Open the dataset read-only and validate the expected tables
    println!("📊 Opening climate dataset...");
    let conn = match db::open_with_validation() {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("\n❌ Failed to open dataset: {}\n", e);
            std::process::exit(1);
        }
    };
    println!("✓ Dataset opened read-only\n");

    // Serve until killed — the endpoint loop is the whole service
    if let Err(e) = endpoint::start_endpoint_server(port, conn) {
        eprintln!("\n❌ Endpoint server error: {}", e);
        std::process::exit(1);
    }
}
