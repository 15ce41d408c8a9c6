//! # Scan Session
//!
//! The camera-open-to-camera-close state machine.
//!
//! ## State Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Scan Session Lifecycle                             │
//! │                                                                         │
//! │  ┌──────┐  start()   ┌──────────┐   decode hit    ┌───────────┐        │
//! │  │ Idle │ ─────────► │ Scanning │ ──────────────► │ Resolving │        │
//! │  └──────┘            └──┬───▲───┘                 └─────┬─────┘        │
//! │                         │   │                           │               │
//! │               freeze    │   │  unfreeze      resolution │ settles       │
//! │                         ▼   │                 (always)  │               │
//! │                      ┌──────┴──┐                        ▼               │
//! │                      │ Frozen  │               ┌───────────────┐        │
//! │                      └─────────┘               │ ShowingResult │        │
//! │                         ▲                      └───────┬───────┘        │
//! │                         │        dismiss               │                │
//! │                         └──────────────────────────────┘                │
//! │                                 (back to Scanning)                      │
//! │                                                                         │
//! │  ANY state ──inactivity countdown hits zero──► Closing (exactly once)  │
//! │                                                                         │
//! │  SAMPLING: every sample_interval while Scanning (and only Scanning),   │
//! │  one frame is pulled and decoded inline. Decode hits during Frozen /   │
//! │  Resolving / ShowingResult cannot happen because sampling is halted.   │
//! │                                                                         │
//! │  INACTIVITY: a 1-second tick compares elapsed-since-interaction to     │
//! │  the timeout. Inside the final warning window the snapshot carries a   │
//! │  per-second countdown; any interaction rearms the full duration.       │
//! │                                                                         │
//! │  EXIT: every path out (timeout, shutdown, camera failure) releases     │
//! │  the camera the same way and ends the task, cancelling both tickers.   │
//! │  A resolution still in flight may finish, but its result is discarded  │
//! │  (stale generation) — no resurrecting the UI for a dead scan.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use veriscan_core::{validate_manual_entry, Product};

use crate::camera::{BarcodeDecoder, CameraDevice, CameraFacing, Frame, ProductLookup};
use crate::error::{SessionError, SessionResult};

// =============================================================================
// Constants
// =============================================================================

/// Default frame sampling interval.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(500);

/// Default inactivity timeout before the session closes itself.
pub const DEFAULT_INACTIVITY_TIMEOUT: Duration = Duration::from_secs(30);

/// Default visible-warning window at the end of the countdown.
pub const DEFAULT_WARNING_WINDOW: Duration = Duration::from_secs(5);

// =============================================================================
// Session State
// =============================================================================

/// Where the session currently is in its lifecycle.
///
/// Ephemeral: owned exclusively by the session task and rebuilt fresh each
/// time a session opens. Nothing persists across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Session object exists but the camera is not open yet.
    Idle,
    /// Sampling frames, waiting for a decode hit.
    Scanning,
    /// Preview frozen by the user; sampling suspended.
    Frozen,
    /// A barcode was decoded; resolution is in flight.
    Resolving,
    /// A resolved product is on screen.
    ShowingResult,
    /// Session is over; camera released, timers cancelled.
    Closing,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Scanning => write!(f, "scanning"),
            SessionState::Frozen => write!(f, "frozen"),
            SessionState::Resolving => write!(f, "resolving"),
            SessionState::ShowingResult => write!(f, "showing_result"),
            SessionState::Closing => write!(f, "closing"),
        }
    }
}

// =============================================================================
// Session Configuration
// =============================================================================

/// Timing configuration for one scan session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How often to sample a frame while scanning.
    pub sample_interval: Duration,
    /// Total inactivity duration before auto-close.
    pub inactivity_timeout: Duration,
    /// Length of the visible countdown at the end of the timeout.
    pub warning_window: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            inactivity_timeout: DEFAULT_INACTIVITY_TIMEOUT,
            warning_window: DEFAULT_WARNING_WINDOW,
        }
    }
}

// =============================================================================
// Session Snapshot
// =============================================================================

/// Everything the presentation layer needs to render, broadcast on a
/// `watch` channel after every change.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Unique id of this session instance.
    pub session_id: Uuid,
    /// Current lifecycle state.
    pub state: SessionState,
    /// Resolved product, present only in `ShowingResult`.
    pub product: Option<Product>,
    /// The barcode currently being resolved or shown.
    pub barcode: Option<String>,
    /// Current camera facing.
    pub camera_facing: CameraFacing,
    /// The captured frame while `Frozen`.
    pub frozen_frame: Option<Frame>,
    /// Seconds left in the inactivity warning; `None` when no warning is
    /// showing.
    pub countdown: Option<u64>,
    /// Whether a result is available to share.
    pub share_available: bool,
}

// =============================================================================
// Session Commands
// =============================================================================

/// User intents delivered from the presentation layer.
#[derive(Debug)]
pub enum SessionCommand {
    /// Freeze the preview on the current frame and suspend sampling.
    Freeze,
    /// Resume sampling from a frozen preview.
    Unfreeze,
    /// Dismiss the current result ("scan another").
    Dismiss,
    /// Switch between front and back cameras.
    SwitchCamera,
    /// Share the current result (session only rearms the timer; the
    /// actual share sheet is presentation).
    Share,
    /// Resolve a hand-typed barcode, bypassing the camera.
    SubmitManual(String),
    /// Tear the session down.
    Shutdown,
}

// =============================================================================
// Session Handle
// =============================================================================

/// Handle for driving a running session from the presentation layer.
#[derive(Clone)]
pub struct SessionHandle {
    cmd_tx: mpsc::Sender<SessionCommand>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    /// Returns the latest snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Subscribes to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Waits until the session reaches `Closing`.
    pub async fn wait_closed(&self) {
        let mut rx = self.snapshot_rx.clone();
        while rx.borrow().state != SessionState::Closing {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    pub async fn freeze(&self) -> SessionResult<()> {
        self.send(SessionCommand::Freeze).await
    }

    pub async fn unfreeze(&self) -> SessionResult<()> {
        self.send(SessionCommand::Unfreeze).await
    }

    pub async fn dismiss(&self) -> SessionResult<()> {
        self.send(SessionCommand::Dismiss).await
    }

    pub async fn switch_camera(&self) -> SessionResult<()> {
        self.send(SessionCommand::SwitchCamera).await
    }

    pub async fn share(&self) -> SessionResult<()> {
        self.send(SessionCommand::Share).await
    }

    pub async fn submit_manual(&self, barcode: String) -> SessionResult<()> {
        self.send(SessionCommand::SubmitManual(barcode)).await
    }

    pub async fn shutdown(&self) -> SessionResult<()> {
        self.send(SessionCommand::Shutdown).await
    }

    async fn send(&self, cmd: SessionCommand) -> SessionResult<()> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| SessionError::ChannelClosed)
    }
}

// =============================================================================
// Scan Session
// =============================================================================

/// The session service. Constructed, then consumed by [`ScanSession::start`],
/// which spawns the single task that owns camera, decoder and state.
pub struct ScanSession {
    config: SessionConfig,
    camera: Box<dyn CameraDevice>,
    decoder: Box<dyn BarcodeDecoder>,
    lookup: Arc<dyn ProductLookup>,
}

/// Result of a finished resolution, tagged with the scan generation that
/// started it so stale completions can be discarded.
struct ResolutionDone {
    generation: u64,
    barcode: String,
    product: Product,
}

impl ScanSession {
    /// Creates a session with default timing.
    pub fn new(
        camera: Box<dyn CameraDevice>,
        decoder: Box<dyn BarcodeDecoder>,
        lookup: Arc<dyn ProductLookup>,
    ) -> Self {
        Self::with_config(SessionConfig::default(), camera, decoder, lookup)
    }

    /// Creates a session with explicit timing.
    pub fn with_config(
        config: SessionConfig,
        camera: Box<dyn CameraDevice>,
        decoder: Box<dyn BarcodeDecoder>,
        lookup: Arc<dyn ProductLookup>,
    ) -> Self {
        ScanSession {
            config,
            camera,
            decoder,
            lookup,
        }
    }

    /// Opens the camera and starts the session task.
    ///
    /// Permission failure surfaces HERE, before anything is spawned: a
    /// denied camera means no sampling loop, no timers, no task.
    pub async fn start(mut self) -> SessionResult<SessionHandle> {
        self.camera.open().await?;

        let session_id = Uuid::new_v4();
        info!(%session_id, "Scan session starting");

        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let initial = SessionSnapshot {
            session_id,
            state: SessionState::Idle,
            product: None,
            barcode: None,
            camera_facing: CameraFacing::default(),
            frozen_frame: None,
            countdown: None,
            share_available: false,
        };
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);

        let runner = SessionRunner {
            session_id,
            config: self.config,
            camera: self.camera,
            decoder: self.decoder,
            lookup: self.lookup,
            snapshot_tx,
            state: SessionState::Idle,
            product: None,
            barcode: None,
            camera_facing: CameraFacing::default(),
            frozen_frame: None,
            last_frame: None,
            generation: 0,
            last_interaction: Instant::now(),
        };

        tokio::spawn(runner.run(cmd_rx));

        Ok(SessionHandle {
            cmd_tx,
            snapshot_rx,
        })
    }
}

// =============================================================================
// Session Runner (the task)
// =============================================================================

struct SessionRunner {
    session_id: Uuid,
    config: SessionConfig,
    camera: Box<dyn CameraDevice>,
    decoder: Box<dyn BarcodeDecoder>,
    lookup: Arc<dyn ProductLookup>,
    snapshot_tx: watch::Sender<SessionSnapshot>,

    state: SessionState,
    product: Option<Product>,
    barcode: Option<String>,
    camera_facing: CameraFacing,
    frozen_frame: Option<Frame>,
    last_frame: Option<Frame>,

    /// Incremented whenever the current scan stops mattering (dismiss,
    /// manual re-entry, close). Resolutions carry the generation they were
    /// started under; mismatched completions are dropped.
    generation: u64,

    /// Rearmed on every interaction and successful scan.
    last_interaction: Instant,
}

impl SessionRunner {
    async fn run(mut self, mut cmd_rx: mpsc::Receiver<SessionCommand>) {
        let (done_tx, mut done_rx) = mpsc::channel::<ResolutionDone>(1);

        let mut sample_tick = interval(self.config.sample_interval);
        sample_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut countdown_tick = interval(Duration::from_secs(1));
        countdown_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.transition(SessionState::Scanning);
        self.rearm();

        loop {
            tokio::select! {
                Some(cmd) = cmd_rx.recv() => {
                    if self.handle_command(cmd, &done_tx) {
                        break;
                    }
                }

                _ = sample_tick.tick() => {
                    if self.state == SessionState::Scanning {
                        if !self.sample_frame(&done_tx).await {
                            // Camera died mid-session; close like any other
                            // exit path.
                            break;
                        }
                    }
                }

                _ = countdown_tick.tick() => {
                    if self.check_inactivity() {
                        info!(session_id = %self.session_id, "Inactivity countdown reached zero");
                        break;
                    }
                }

                Some(done) = done_rx.recv() => {
                    self.handle_resolution_done(done);
                }
            }
        }

        self.close();
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Handles one user intent. Returns true when the session should end.
    fn handle_command(
        &mut self,
        cmd: SessionCommand,
        done_tx: &mpsc::Sender<ResolutionDone>,
    ) -> bool {
        match cmd {
            SessionCommand::Freeze => {
                if self.state == SessionState::Scanning {
                    self.frozen_frame = self.last_frame.clone();
                    self.transition(SessionState::Frozen);
                }
                self.rearm();
            }

            SessionCommand::Unfreeze => {
                if self.state == SessionState::Frozen {
                    self.frozen_frame = None;
                    self.transition(SessionState::Scanning);
                }
                self.rearm();
            }

            SessionCommand::Dismiss => {
                if self.state == SessionState::ShowingResult {
                    debug!(session_id = %self.session_id, "Result dismissed");
                    self.generation += 1;
                    self.product = None;
                    self.barcode = None;
                    self.transition(SessionState::Scanning);
                }
                self.rearm();
            }

            SessionCommand::SwitchCamera => {
                // Facing changes rearm the timer but never the scan state.
                self.camera_facing = self.camera.switch_facing();
                self.rearm();
                self.publish();
            }

            SessionCommand::Share => {
                self.rearm();
            }

            SessionCommand::SubmitManual(raw) => {
                self.rearm();
                match validate_manual_entry(&raw) {
                    Ok(barcode) if self.state != SessionState::Resolving => {
                        debug!(session_id = %self.session_id, %barcode, "Manual entry accepted");
                        self.generation += 1;
                        self.product = None;
                        self.begin_resolution(barcode, done_tx);
                    }
                    Ok(_) => {
                        debug!(session_id = %self.session_id, "Manual entry ignored: resolution in flight");
                    }
                    Err(e) => {
                        warn!(session_id = %self.session_id, %e, "Manual entry rejected");
                    }
                }
            }

            SessionCommand::Shutdown => {
                info!(session_id = %self.session_id, "Shutdown requested");
                return true;
            }
        }
        false
    }

    // =========================================================================
    // Sampling
    // =========================================================================

    /// Pulls and decodes one frame. Returns false when the camera failed
    /// and the session must close.
    async fn sample_frame(&mut self, done_tx: &mpsc::Sender<ResolutionDone>) -> bool {
        let frame = match self.camera.next_frame().await {
            Ok(frame) => frame,
            Err(e) => {
                warn!(session_id = %self.session_id, %e, "Camera failed mid-session");
                return false;
            }
        };

        let decoded = self.decoder.decode(&frame);
        self.last_frame = Some(frame);

        // Most frames decode to nothing; that is the steady state.
        if let Some(barcode) = decoded {
            info!(session_id = %self.session_id, %barcode, "Barcode decoded");
            self.rearm(); // a successful scan counts as activity
            self.begin_resolution(barcode, done_tx);
        }
        true
    }

    /// Moves to `Resolving` and spawns the lookup tagged with the current
    /// generation. Sampling halts automatically because the sample arm only
    /// fires in `Scanning`.
    fn begin_resolution(&mut self, barcode: String, done_tx: &mpsc::Sender<ResolutionDone>) {
        self.barcode = Some(barcode.clone());
        self.transition(SessionState::Resolving);

        let lookup = self.lookup.clone();
        let tx = done_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let product = lookup.resolve(&barcode).await;
            // Receiver gone means the session already closed; discard.
            let _ = tx
                .send(ResolutionDone {
                    generation,
                    barcode,
                    product,
                })
                .await;
        });
    }

    fn handle_resolution_done(&mut self, done: ResolutionDone) {
        if done.generation != self.generation || self.state != SessionState::Resolving {
            debug!(
                session_id = %self.session_id,
                barcode = %done.barcode,
                "Discarding stale resolution"
            );
            return;
        }

        info!(
            session_id = %self.session_id,
            barcode = %done.barcode,
            found = done.product.found,
            is_valid = done.product.is_valid,
            verdict = %done.product.verdict(),
            "Resolution settled"
        );
        self.product = Some(done.product);
        self.rearm();
        self.transition(SessionState::ShowingResult);
    }

    // =========================================================================
    // Inactivity
    // =========================================================================

    /// Evaluates the countdown. Returns true when the session must close.
    fn check_inactivity(&mut self) -> bool {
        let elapsed = self.last_interaction.elapsed();

        if elapsed >= self.config.inactivity_timeout {
            return true;
        }

        let warning_starts = self
            .config
            .inactivity_timeout
            .saturating_sub(self.config.warning_window);
        if elapsed >= warning_starts {
            let remaining = (self.config.inactivity_timeout - elapsed).as_secs();
            self.publish_countdown(Some(remaining.max(1)));
        }
        false
    }

    /// Rearms the full inactivity duration and cancels any visible warning.
    fn rearm(&mut self) {
        self.last_interaction = Instant::now();
        self.publish_countdown(None);
    }

    fn publish_countdown(&self, countdown: Option<u64>) {
        let mut snapshot = self.snapshot();
        snapshot.countdown = countdown;
        let _ = self.snapshot_tx.send(snapshot);
    }

    // =========================================================================
    // State & Teardown
    // =========================================================================

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            debug!(
                session_id = %self.session_id,
                from = %self.state,
                to = %next,
                "State transition"
            );
            self.state = next;
        }
        self.publish();
    }

    fn publish(&self) {
        let _ = self.snapshot_tx.send(self.snapshot());
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id,
            state: self.state,
            product: self.product.clone(),
            barcode: self.barcode.clone(),
            camera_facing: self.camera_facing,
            frozen_frame: self.frozen_frame.clone(),
            countdown: None,
            share_available: self.product.is_some(),
        }
    }

    /// The single teardown path: every way out of the loop lands here.
    fn close(mut self) {
        self.camera.release();
        // Anything still resolving is now a stale generation by definition:
        // the receiver drops with this struct.
        self.generation += 1;
        self.state = SessionState::Closing;
        self.product = None;
        self.frozen_frame = None;
        self.publish();
        info!(session_id = %self.session_id, "Scan session closed");
    }
}

// =============================================================================
// Tests
// =============================================================================
