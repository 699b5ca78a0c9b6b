use serde::{Deserialize, Serialize};

use crate::capture::session::{AcquisitionKind, CaptureMode, CaptureSession};
use crate::ledger::record::NutritionRecord;

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub kind: AcquisitionKind,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub mode: CaptureMode,
    pub is_submitting: bool,
}

impl SessionView {
    pub fn of(session: &CaptureSession) -> Self {
        Self {
            mode: session.mode,
            is_submitting: session.is_submitting,
        }
    }
}

/// JSON submit variant: raw image bytes in the body, content type optional.
#[derive(Debug, Deserialize)]
pub struct SubmitImageJson {
    pub image: serde_bytes::ByteBuf,
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

fn default_content_type() -> String {
    "image/jpeg".into()
}

/// Outcome of one submission, surfaced as a value rather than an HTTP
/// error: a failed analysis is a normal, recoverable result of the call.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub applied: bool,
    /// True when fresh provisional macros landed and the edit surface
    /// should be presented to the user.
    pub open_editor: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<NutritionRecord>,
}
