//! # Scan Session Demo
//!
//! Drives a full scan session with a synthetic camera and an offline
//! product lookup. No hardware, no network.
//!
//! ## Usage
//! ```bash
//! # Scan the built-in demo barcodes
//! cargo run -p veriscan-session --bin scan-demo
//!
//! # Scan specific barcodes
//! cargo run -p veriscan-session --bin scan-demo -- 4006381333931 0123456789012
//!
//! # Shorten the inactivity timeout (seconds)
//! cargo run -p veriscan-session --bin scan-demo -- --timeout 10
//! ```
//!
//! The synthetic camera emits a few blank frames, then a frame carrying
//! each requested barcode. After every result the demo dismisses it and
//! scans the next one; once the script runs dry the inactivity countdown
//! takes over and closes the session on its own.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing_subscriber::EnvFilter;

use veriscan_core::{validate_barcode, Product};
use veriscan_session::{
    BarcodeDecoder, CameraDevice, CameraFacing, Frame, ProductLookup, ScanSession, SessionConfig,
    SessionError, SessionResult, SessionState,
};

/// Barcodes scanned when none are given on the command line.
const DEMO_BARCODES: &[&str] = &[
    "4006381333931", // Germany, in the offline catalog
    "5000112637922", // UK, in the offline catalog
    "9990000000009", // no GS1 country assignment
];

/// The offline catalog: (barcode, name, manufacturer).
const CATALOG: &[(&str, &str, &str)] = &[
    ("4006381333931", "Stabilo Boss Highlighter", "Schwan-Stabilo"),
    ("5000112637922", "Coca-Cola Zero 330ml", "Coca-Cola GB"),
    ("8710398526849", "Bref Power Active", "Henkel"),
];

// =============================================================================
// Synthetic hardware
// =============================================================================

/// Camera whose frames carry the scripted barcodes as raw bytes, with a few
/// blank frames between hits so the session visibly idles.
struct ScriptedCamera {
    script: Vec<String>,
    frames_until_next: u32,
}

impl ScriptedCamera {
    fn new(barcodes: Vec<String>) -> Self {
        ScriptedCamera {
            script: barcodes,
            frames_until_next: 2,
        }
    }
}

#[async_trait]
impl CameraDevice for ScriptedCamera {
    async fn open(&mut self) -> SessionResult<()> {
        Ok(())
    }

    async fn next_frame(&mut self) -> SessionResult<Frame> {
        if self.frames_until_next > 0 {
            self.frames_until_next -= 1;
            return Ok(Frame::default());
        }
        self.frames_until_next = 2;
        let data = match self.script.first() {
            Some(barcode) => {
                let bytes = barcode.clone().into_bytes();
                self.script.remove(0);
                bytes
            }
            None => Vec::new(),
        };
        Ok(Frame {
            width: 640,
            height: 480,
            data,
        })
    }

    fn switch_facing(&mut self) -> CameraFacing {
        CameraFacing::Back
    }

    fn release(&mut self) {
        println!("  [camera] released");
    }
}

/// Decoder that reads a frame's payload as a UTF-8 barcode.
struct PayloadDecoder;

impl BarcodeDecoder for PayloadDecoder {
    fn decode(&mut self, frame: &Frame) -> Option<String> {
        if frame.data.is_empty() {
            return None;
        }
        String::from_utf8(frame.data.clone()).ok()
    }
}

/// Lookup backed by the built-in catalog instead of the network.
struct OfflineLookup;

#[async_trait]
impl ProductLookup for OfflineLookup {
    async fn resolve(&self, barcode: &str) -> Product {
        let validation = validate_barcode(barcode);
        match CATALOG.iter().find(|(code, _, _)| *code == barcode) {
            Some((_, name, manufacturer)) => Product {
                name: (*name).to_string(),
                manufacturer: (*manufacturer).to_string(),
                found: true,
                ..Product::refer_to_packaging(barcode, validation.clone())
            },
            None => Product::refer_to_packaging(barcode, validation),
        }
    }
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<(), SessionError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut timeout_secs: u64 = 8;
    let mut barcodes: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--timeout" | "-t" => {
                if i + 1 < args.len() {
                    timeout_secs = args[i + 1].parse().unwrap_or(8);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Veriscan Scan Session Demo");
                println!();
                println!("Usage: scan-demo [OPTIONS] [BARCODE...]");
                println!();
                println!("Options:");
                println!("  -t, --timeout <SECS>   Inactivity timeout (default: 8)");
                println!("  -h, --help             Show this help message");
                return Ok(());
            }
            other => barcodes.push(other.to_string()),
        }
        i += 1;
    }

    if barcodes.is_empty() {
        barcodes = DEMO_BARCODES.iter().map(|b| b.to_string()).collect();
    }

    println!("📷 Veriscan Scan Session Demo");
    println!("=============================");
    println!("Barcodes: {}", barcodes.join(", "));
    println!("Timeout:  {}s", timeout_secs);
    println!();

    let config = SessionConfig {
        sample_interval: Duration::from_millis(200),
        inactivity_timeout: Duration::from_secs(timeout_secs),
        warning_window: Duration::from_secs(3u64.min(timeout_secs.saturating_sub(1))),
    };

    let session = ScanSession::with_config(
        config,
        Box::new(ScriptedCamera::new(barcodes)),
        Box::new(PayloadDecoder),
        Arc::new(OfflineLookup),
    );

    let handle = session.start().await?;
    println!("✓ Camera opened, session running");
    println!();

    let mut rx = handle.subscribe();
    let mut last_state = SessionState::Idle;
    let mut last_countdown = None;

    loop {
        {
            let snap = rx.borrow_and_update();

            if snap.state != last_state {
                println!("  state: {} → {}", last_state, snap.state);
                last_state = snap.state;
            }

            if snap.countdown != last_countdown {
                if let Some(secs) = snap.countdown {
                    println!("  ⏳ closing in {}s (scan or tap to stay)", secs);
                }
                last_countdown = snap.countdown;
            }

            if snap.state == SessionState::ShowingResult {
                if let Some(product) = &snap.product {
                    println!();
                    println!("  ── Result ──────────────────────────────");
                    println!("  Barcode:      {}", product.barcode);
                    println!("  Product:      {}", product.name);
                    println!("  Manufacturer: {}", product.manufacturer);
                    println!("  Country:      {} ({})", product.country_name, product.country_code);
                    println!("  Verdict:      {}", product.verdict());
                    println!("  ────────────────────────────────────────");
                    println!();
                }
            }

            if snap.state == SessionState::Closing {
                break;
            }
        }

        if last_state == SessionState::ShowingResult {
            // A real user would read the card; the demo moves on. The
            // session may close underneath us, so a failed send just ends
            // the loop on the next snapshot.
            tokio::time::sleep(Duration::from_millis(400)).await;
            let _ = handle.dismiss().await;
        }

        if rx.changed().await.is_err() {
            break;
        }
    }

    println!("✓ Session closed");
    Ok(())
}
