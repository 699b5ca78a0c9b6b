use serde::{Deserialize, Serialize};

use crate::capture::session::CaptureMode;
use crate::ledger::reconcile::lenient_macro;
use crate::ledger::record::{MacroSet, NutritionRecord};

/// Payload of the edit surface once the user finalizes an entry. Macro
/// totals arrive as form strings; parsing is deliberately permissive
/// (missing or non-numeric values count as zero).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditCompletion {
    pub meal_name: String,
    #[serde(rename = "imageURL", default)]
    pub image_url: String,
    #[serde(default)]
    pub total_calories: serde_json::Value,
    #[serde(default)]
    pub total_carbs: serde_json::Value,
    #[serde(default)]
    pub total_proteins: serde_json::Value,
    #[serde(default)]
    pub total_fat: serde_json::Value,
    #[serde(default)]
    pub ingredients: Vec<serde_json::Value>,
}

impl EditCompletion {
    pub fn edited_macros(&self) -> MacroSet {
        MacroSet {
            calories: lenient_macro(&self.total_calories),
            carbohydrates: lenient_macro(&self.total_carbs),
            protein: lenient_macro(&self.total_proteins),
            fat: lenient_macro(&self.total_fat),
        }
    }
}

/// Read-only snapshot handed to the presentation layer.
#[derive(Debug, Serialize)]
pub struct DailySnapshot {
    #[serde(flatten)]
    pub record: NutritionRecord,
    pub mode: CaptureMode,
    pub is_submitting: bool,
}
