use crate::ledger::record::{MacroSet, NutritionRecord};

/// Folds an edited entry's totals into the running daily aggregate without
/// double-counting the entry or losing what earlier entries contributed.
///
/// Per field: `delta = edited - (current - baseline)`, then
/// `new_current = current + delta`. The delta form makes explicit that
/// only the current entry's contribution is being corrected; everything
/// accumulated before it sits in `baseline` and passes through untouched.
/// Algebraically this is `edited + baseline`.
pub fn reconcile(edited: MacroSet, prior: &NutritionRecord) -> MacroSet {
    let cur = prior.current_macros;
    let base = prior.baseline_macros;
    MacroSet {
        calories: cur.calories + (edited.calories - (cur.calories - base.calories)),
        carbohydrates: cur.carbohydrates
            + (edited.carbohydrates - (cur.carbohydrates - base.carbohydrates)),
        protein: cur.protein + (edited.protein - (cur.protein - base.protein)),
        fat: cur.fat + (edited.fat - (cur.fat - base.fat)),
    }
}

/// Permissive macro parsing for the edit form: numbers pass through,
/// numeric strings are parsed, anything else (missing, empty, garbage)
/// coerces to zero rather than erroring. Contrast with the strict gate on
/// analysis-service responses.
pub fn lenient_macro(raw: &serde_json::Value) -> f64 {
    match raw {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}
