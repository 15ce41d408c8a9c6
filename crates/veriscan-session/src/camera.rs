//! # Injected Capabilities
//!
//! The session never touches hardware or the network directly. Camera
//! access, barcode decoding and product resolution are all injected behind
//! these traits, so the state machine runs under test with fakes and zero
//! devices.
//!
//! ## Capability Seams
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ScanSession Dependencies                           │
//! │                                                                         │
//! │  CameraDevice     open / next_frame / switch_facing / release          │
//! │                   open() is the ONLY place permission errors surface   │
//! │                                                                         │
//! │  BarcodeDecoder   decode(frame) -> Option<String>                      │
//! │                   None on most frames; that is normal, not a failure   │
//! │                                                                         │
//! │  ProductLookup    resolve(barcode) -> Product (never fails)            │
//! │                   implemented for veriscan_resolve::ProductResolver    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;

use veriscan_core::Product;
use veriscan_resolve::ProductResolver;

use crate::error::SessionResult;

// =============================================================================
// Frame
// =============================================================================

/// One captured camera frame, opaque to the session.
///
/// The session never inspects pixels; it only moves frames from the camera
/// to the decoder and holds onto the last one for freeze.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Encoded image bytes in whatever format the camera produces.
    pub data: Vec<u8>,
}

// =============================================================================
// Camera Facing
// =============================================================================

/// Which camera the device is currently using.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraFacing {
    /// Rear camera (default for barcode scanning).
    #[default]
    Back,
    /// Front camera.
    Front,
}

impl CameraFacing {
    /// The other facing.
    pub fn toggled(self) -> Self {
        match self {
            CameraFacing::Back => CameraFacing::Front,
            CameraFacing::Front => CameraFacing::Back,
        }
    }
}

// =============================================================================
// Capability Traits
// =============================================================================

/// Camera device owned exclusively by the active session.
///
/// `open()` must be called (and succeed) before `next_frame()`; permission
/// problems surface there as [`SessionError::CameraDenied`] and nowhere
/// else. `release()` must be idempotent: every session exit path calls it.
///
/// [`SessionError::CameraDenied`]: crate::error::SessionError::CameraDenied
#[async_trait]
pub trait CameraDevice: Send {
    /// Acquires the device, prompting for permission if needed.
    async fn open(&mut self) -> SessionResult<()>;

    /// Captures the next frame.
    async fn next_frame(&mut self) -> SessionResult<Frame>;

    /// Switches between front and back cameras; returns the new facing.
    fn switch_facing(&mut self) -> CameraFacing;

    /// Releases the device. Idempotent.
    fn release(&mut self);
}

/// Barcode decoder treated as a black box.
///
/// Invoked once per sampled frame; returning `None` is the steady state
/// and carries no diagnostic value.
pub trait BarcodeDecoder: Send {
    fn decode(&mut self, frame: &Frame) -> Option<String>;
}

/// Product resolution seam.
///
/// Mirrors `ProductResolver::resolve`: asynchronous and infallible. The
/// indirection exists so session tests control resolution timing.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    async fn resolve(&self, barcode: &str) -> Product;
}

#[async_trait]
impl ProductLookup for ProductResolver {
    async fn resolve(&self, barcode: &str) -> Product {
        ProductResolver::resolve(self, barcode).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_facing_toggles() {
        assert_eq!(CameraFacing::Back.toggled(), CameraFacing::Front);
        assert_eq!(CameraFacing::Front.toggled(), CameraFacing::Back);
        assert_eq!(CameraFacing::default(), CameraFacing::Back);
    }
}
