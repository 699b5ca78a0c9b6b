use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::analysis::dto::{AnalysisOutcome, AnalysisSuccess};
use crate::error::CaptureError;
use crate::ledger::dto::EditCompletion;
use crate::ledger::reconcile::reconcile;

/// The four macro quantities tracked per entry and per day, same unit
/// across the set. Conceptually all fields are >= 0; results of the
/// reconciliation arithmetic are deliberately not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacroSet {
    pub calories: f64,
    pub carbohydrates: f64,
    pub protein: f64,
    pub fat: f64,
}

/// The running daily nutrition record. Accepted mutations produce a new
/// value rather than mutating in place, so consumers can detect change
/// cheaply through `edit_version`.
#[derive(Debug, Clone, Serialize)]
pub struct NutritionRecord {
    /// Label of the most recently processed entry.
    pub dish_name: String,
    /// Presigned URL of the entry's image; the ledger never owns the bytes.
    pub image_reference: String,
    /// Running daily aggregate shown to the user.
    pub current_macros: MacroSet,
    /// Aggregate as of the moment the previous entry was finalized; the
    /// anchor for the next reconciliation.
    pub baseline_macros: MacroSet,
    /// Opaque line items of the most recent entry, in display order,
    /// replaced wholesale on every update.
    pub ingredients: Vec<serde_json::Value>,
    /// Strictly increases on every accepted result or edit.
    pub edit_version: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
}

impl NutritionRecord {
    pub fn new() -> Self {
        Self {
            dish_name: String::new(),
            image_reference: String::new(),
            current_macros: MacroSet::default(),
            baseline_macros: MacroSet::default(),
            ingredients: Vec::new(),
            edit_version: 0,
            started_at: OffsetDateTime::now_utc(),
        }
    }

    /// Folds an analysis outcome into the ledger. A failure leaves the
    /// record untouched and is reported to the caller; a validated success
    /// replaces the entry fields and bumps the version. The fresh macros
    /// are provisional, so the caller is expected to open the edit surface
    /// next. `baseline_macros` is intentionally not touched here: only
    /// `apply_edit` finalizes an entry into the baseline, so an entry that
    /// is received but never edited never becomes part of the next
    /// entry's anchor.
    pub fn receive_result(&self, outcome: &AnalysisOutcome) -> Result<NutritionRecord, CaptureError> {
        match outcome {
            AnalysisOutcome::Success(s) => Ok(self.with_result(s)),
            AnalysisOutcome::Failure { reason } => {
                Err(CaptureError::ServiceFailure(reason.clone()))
            }
        }
    }

    fn with_result(&self, s: &AnalysisSuccess) -> NutritionRecord {
        NutritionRecord {
            dish_name: s.dish.clone(),
            image_reference: s.image_url.clone(),
            current_macros: s.macros,
            baseline_macros: self.baseline_macros,
            ingredients: s.ingredients.clone(),
            edit_version: self.edit_version + 1,
            started_at: self.started_at,
        }
    }

    /// Finalizes a user edit: reconciles the edited totals against the
    /// running aggregate, then snapshots them as the baseline for the next
    /// entry. Applying the same edit twice yields the same aggregate both
    /// times, since the second application re-states the same entry.
    pub fn apply_edit(&self, edit: &EditCompletion) -> NutritionRecord {
        let edited = edit.edited_macros();
        NutritionRecord {
            dish_name: edit.meal_name.clone(),
            image_reference: edit.image_url.clone(),
            current_macros: reconcile(edited, self),
            baseline_macros: edited,
            ingredients: edit.ingredients.clone(),
            edit_version: self.edit_version + 1,
            started_at: self.started_at,
        }
    }
}

impl Default for NutritionRecord {
    fn default() -> Self {
        Self::new()
    }
}
