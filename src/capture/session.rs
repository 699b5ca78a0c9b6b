use serde::{Deserialize, Serialize};

use crate::error::CaptureError;

/// Which acquisition surface is currently visible. Exactly one of the
/// non-idle modes may be active at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    Idle,
    QuickAddMenu,
    CameraActive,
    UploadDialogOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionKind {
    Upload,
    Camera,
    Barcode,
}

/// Transient per-session state of the capture orchestrator.
#[derive(Debug)]
pub struct CaptureSession {
    pub mode: CaptureMode,
    pub is_submitting: bool,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self {
            mode: CaptureMode::Idle,
            is_submitting: false,
        }
    }

    /// Opens the quick-add menu. Only valid from `Idle`; any surface that
    /// is already open must be closed first.
    pub fn request_quick_add_menu(&mut self) -> Result<(), CaptureError> {
        if self.mode != CaptureMode::Idle {
            return Err(CaptureError::InvalidTransition(
                "quick-add menu requires idle state",
            ));
        }
        self.mode = CaptureMode::QuickAddMenu;
        Ok(())
    }

    /// Picks an acquisition surface from the quick-add menu. Opening one
    /// surface closes the menu, so at most one surface is ever visible.
    /// Barcode scanning is a documented stub: the menu closes and the
    /// caller gets an unsupported-action diagnostic, nothing else happens.
    pub fn select_acquisition(&mut self, kind: AcquisitionKind) -> Result<(), CaptureError> {
        if self.mode != CaptureMode::QuickAddMenu {
            return Err(CaptureError::InvalidTransition(
                "selection requires the quick-add menu to be open",
            ));
        }
        match kind {
            AcquisitionKind::Upload => {
                self.mode = CaptureMode::UploadDialogOpen;
                Ok(())
            }
            AcquisitionKind::Camera => {
                self.mode = CaptureMode::CameraActive;
                Ok(())
            }
            AcquisitionKind::Barcode => {
                self.mode = CaptureMode::Idle;
                Err(CaptureError::UnsupportedAction("barcode"))
            }
        }
    }

    /// Closes whatever surface is open. An in-flight submission is not
    /// cancelled; it completes on its own and clears `is_submitting`.
    pub fn close(&mut self) -> Result<(), CaptureError> {
        if self.mode == CaptureMode::Idle {
            return Err(CaptureError::InvalidTransition("nothing is open"));
        }
        self.mode = CaptureMode::Idle;
        Ok(())
    }

    pub fn begin_submission(&mut self) {
        self.is_submitting = true;
    }

    pub fn finish_submission(&mut self) {
        self.is_submitting = false;
    }
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod session_tests {
    use super::*;

    fn surfaces_open(s: &CaptureSession) -> usize {
        match s.mode {
            CaptureMode::Idle => 0,
            _ => 1,
        }
    }

    #[test]
    fn quick_add_menu_opens_only_from_idle() {
        let mut s = CaptureSession::new();
        s.request_quick_add_menu().expect("idle -> menu");
        assert_eq!(s.mode, CaptureMode::QuickAddMenu);

        let err = s.request_quick_add_menu().unwrap_err();
        assert!(matches!(err, CaptureError::InvalidTransition(_)));
        // state must not be corrupted by the rejected call
        assert_eq!(s.mode, CaptureMode::QuickAddMenu);
    }

    #[test]
    fn at_most_one_surface_after_every_call() {
        let mut s = CaptureSession::new();
        // representative walk through the full state space
        s.request_quick_add_menu().unwrap();
        assert!(surfaces_open(&s) <= 1);
        s.select_acquisition(AcquisitionKind::Camera).unwrap();
        assert!(surfaces_open(&s) <= 1);
        assert_eq!(s.mode, CaptureMode::CameraActive);
        s.close().unwrap();
        assert!(surfaces_open(&s) <= 1);
        s.request_quick_add_menu().unwrap();
        s.select_acquisition(AcquisitionKind::Upload).unwrap();
        assert_eq!(s.mode, CaptureMode::UploadDialogOpen);
        assert!(surfaces_open(&s) <= 1);
        s.close().unwrap();
        assert_eq!(s.mode, CaptureMode::Idle);
    }

    #[test]
    fn selection_outside_menu_is_rejected() {
        let mut s = CaptureSession::new();
        let err = s.select_acquisition(AcquisitionKind::Camera).unwrap_err();
        assert!(matches!(err, CaptureError::InvalidTransition(_)));
        assert_eq!(s.mode, CaptureMode::Idle);

        s.request_quick_add_menu().unwrap();
        s.select_acquisition(AcquisitionKind::Camera).unwrap();
        let err = s.select_acquisition(AcquisitionKind::Upload).unwrap_err();
        assert!(matches!(err, CaptureError::InvalidTransition(_)));
        assert_eq!(s.mode, CaptureMode::CameraActive);
    }

    #[test]
    fn barcode_is_a_reported_stub() {
        let mut s = CaptureSession::new();
        s.request_quick_add_menu().unwrap();
        let err = s.select_acquisition(AcquisitionKind::Barcode).unwrap_err();
        assert!(matches!(err, CaptureError::UnsupportedAction("barcode")));
        // menu closed, nothing left open
        assert_eq!(s.mode, CaptureMode::Idle);
    }

    #[test]
    fn close_from_idle_is_rejected() {
        let mut s = CaptureSession::new();
        let err = s.close().unwrap_err();
        assert!(matches!(err, CaptureError::InvalidTransition(_)));
    }

    #[test]
    fn close_does_not_cancel_a_submission() {
        let mut s = CaptureSession::new();
        s.request_quick_add_menu().unwrap();
        s.select_acquisition(AcquisitionKind::Camera).unwrap();
        s.begin_submission();
        s.close().unwrap();
        // fire-and-forget: the surface is gone but the upload keeps going
        assert_eq!(s.mode, CaptureMode::Idle);
        assert!(s.is_submitting);
        s.finish_submission();
        assert!(!s.is_submitting);
    }
}
