use serde::Deserialize;

use crate::error::CaptureError;
use crate::ledger::record::MacroSet;

/// Result of one analysis submission, after validation.
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    Success(AnalysisSuccess),
    Failure { reason: String },
}

#[derive(Debug, Clone)]
pub struct AnalysisSuccess {
    pub dish: String,
    pub image_url: String,
    pub macros: MacroSet,
    pub ingredients: Vec<serde_json::Value>,
}

/// Wire shape of the analysis service response, taken at face value.
/// Everything is optional here; `validate` decides what to trust.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnalysisResponse {
    #[serde(default)]
    pub success: bool,
    pub final_nutrition_data: Option<RawNutritionData>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNutritionData {
    pub dish: Option<String>,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
    pub macros: Option<RawMacros>,
    pub ingredients: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
pub struct RawMacros {
    pub calories: Option<serde_json::Value>,
    pub carbohydrates: Option<serde_json::Value>,
    pub protein: Option<serde_json::Value>,
    pub fat: Option<serde_json::Value>,
}

/// Strict gate on a claimed success: all four macro fields must be present
/// and numeric and `ingredients` must be present, otherwise the payload is
/// treated as a failure and never reaches the ledger. Dish name and image
/// URL are cosmetic and default to empty.
pub fn validate(raw: RawAnalysisResponse) -> Result<AnalysisSuccess, CaptureError> {
    if !raw.success {
        return Err(CaptureError::ServiceFailure(
            raw.error
                .unwrap_or_else(|| "analysis service reported failure".into()),
        ));
    }
    let data = raw
        .final_nutrition_data
        .ok_or(CaptureError::MalformedResponse)?;
    let macros = data.macros.ok_or(CaptureError::MalformedResponse)?;
    let numeric = |v: Option<serde_json::Value>| {
        v.as_ref()
            .and_then(serde_json::Value::as_f64)
            .ok_or(CaptureError::MalformedResponse)
    };
    let macros = MacroSet {
        calories: numeric(macros.calories)?,
        carbohydrates: numeric(macros.carbohydrates)?,
        protein: numeric(macros.protein)?,
        fat: numeric(macros.fat)?,
    };
    let ingredients = data.ingredients.ok_or(CaptureError::MalformedResponse)?;
    Ok(AnalysisSuccess {
        dish: data.dish.unwrap_or_default(),
        image_url: data.image_url.unwrap_or_default(),
        macros,
        ingredients,
    })
}

#[cfg(test)]
mod validate_tests {
    use super::*;
    use serde_json::json;

    fn raw(body: serde_json::Value) -> RawAnalysisResponse {
        serde_json::from_value(body).expect("raw response always deserializes")
    }

    fn full_body() -> serde_json::Value {
        json!({
            "success": true,
            "finalNutritionData": {
                "dish": "ramen",
                "imageURL": "https://cdn.fake/ramen.jpg",
                "macros": {"calories": 550, "carbohydrates": 70, "protein": 25, "fat": 18},
                "ingredients": [{"name": "noodles"}, {"name": "broth"}]
            }
        })
    }

    #[test]
    fn complete_success_passes_the_gate() {
        let s = validate(raw(full_body())).expect("valid payload");
        assert_eq!(s.dish, "ramen");
        assert_eq!(s.macros.calories, 550.0);
        assert_eq!(s.ingredients.len(), 2);
    }

    #[test]
    fn missing_protein_is_malformed() {
        let mut body = full_body();
        body["finalNutritionData"]["macros"]
            .as_object_mut()
            .unwrap()
            .remove("protein");
        let err = validate(raw(body)).unwrap_err();
        assert!(matches!(err, CaptureError::MalformedResponse));
    }

    #[test]
    fn non_numeric_macro_is_malformed() {
        let mut body = full_body();
        body["finalNutritionData"]["macros"]["fat"] = json!("lots");
        let err = validate(raw(body)).unwrap_err();
        assert!(matches!(err, CaptureError::MalformedResponse));
    }

    #[test]
    fn missing_ingredients_is_malformed() {
        let mut body = full_body();
        body["finalNutritionData"]
            .as_object_mut()
            .unwrap()
            .remove("ingredients");
        let err = validate(raw(body)).unwrap_err();
        assert!(matches!(err, CaptureError::MalformedResponse));
    }

    #[test]
    fn unsuccessful_response_carries_its_reason() {
        let err = validate(raw(json!({"success": false, "error": "image too dark"}))).unwrap_err();
        match err {
            CaptureError::ServiceFailure(reason) => assert_eq!(reason, "image too dark"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_dish_and_url_default_to_empty() {
        let mut body = full_body();
        let data = body["finalNutritionData"].as_object_mut().unwrap();
        data.remove("dish");
        data.remove("imageURL");
        let s = validate(raw(body)).expect("still valid");
        assert!(s.dish.is_empty());
        assert!(s.image_url.is_empty());
    }
}
