//! # veriscan-session: Scan Session Orchestration
//!
//! The stateful layer of Veriscan. One `ScanSession` owns the camera, the
//! decoder and the product lookup for the lifetime of a single scanning
//! session, and pushes [`session::SessionSnapshot`]s to the presentation
//! layer over a `watch` channel.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    veriscan-session (THIS CRATE)                        │
//! │                                                                         │
//! │   Presentation                      Session task                        │
//! │   ┌──────────────┐  SessionCommand  ┌──────────────────────────────┐   │
//! │   │ SessionHandle│ ───────────────► │  select! {                   │   │
//! │   │              │                  │    command channel           │   │
//! │   │  snapshot()  │ ◄─────────────── │    sample tick (500ms)       │   │
//! │   │  subscribe() │ SessionSnapshot  │    countdown tick (1s)       │   │
//! │   └──────────────┘  (watch)         │    resolution completions    │   │
//! │                                     │  }                           │   │
//! │                                     └───────┬──────────┬───────────┘   │
//! │                                             │          │               │
//! │                                  CameraDevice &     ProductLookup      │
//! │                                  BarcodeDecoder    (veriscan-resolve)  │
//! │                                  (injected)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Hardware and resolution are injected behind the traits in [`camera`], so
//! the whole state machine runs under test with fakes and a paused clock.

pub mod camera;
pub mod error;
pub mod session;

pub use camera::{BarcodeDecoder, CameraDevice, CameraFacing, Frame, ProductLookup};
pub use error::{SessionError, SessionResult};
pub use session::{
    ScanSession, SessionCommand, SessionConfig, SessionHandle, SessionSnapshot, SessionState,
};
