use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::dto::AnalysisOutcome;
use crate::capture::dto::SubmitResponse;
use crate::state::AppState;

/// Runs one image submission end to end: store the image, obtain its
/// presigned reference, forward to the analyzer, fold the outcome into the
/// ledger. Never fails synchronously; every failure mode comes back inside
/// the response. The submitting flag is cleared on completion either way.
///
/// There is no correlation id between a submission and its result: a late
/// result is applied to whichever record is current when it lands
/// (last-write-wins).
pub async fn submit_image(st: &AppState, image: Bytes, content_type: &str) -> SubmitResponse {
    st.session.lock().await.begin_submission();
    let outcome = run_submission(st, image, content_type).await;
    st.session.lock().await.finish_submission();

    let mut ledger = st.ledger.write().await;
    match ledger.receive_result(&outcome) {
        Ok(next) => {
            *ledger = next;
            info!(version = ledger.edit_version, dish = %ledger.dish_name, "analysis applied to ledger");
            SubmitResponse {
                applied: true,
                open_editor: true,
                reason: None,
                record: Some(ledger.clone()),
            }
        }
        Err(e) => {
            warn!(error = %e, "submission did not reach the ledger");
            SubmitResponse {
                applied: false,
                open_editor: false,
                reason: Some(e.to_string()),
                record: None,
            }
        }
    }
}

async fn run_submission(st: &AppState, image: Bytes, content_type: &str) -> AnalysisOutcome {
    let key = capture_key(content_type);

    if let Err(e) = st.storage.put_object(&key, image.clone(), content_type).await {
        warn!(error = %e, %key, "image store failed");
        return AnalysisOutcome::Failure {
            reason: format!("image store failed: {e}"),
        };
    }
    let image_reference = match st.storage.presign_get(&key, st.config.presign_ttl_secs).await {
        Ok(url) => url,
        Err(e) => {
            warn!(error = %e, %key, "presign failed");
            return AnalysisOutcome::Failure {
                reason: format!("presign failed: {e}"),
            };
        }
    };

    match st.analyzer.analyze(image, content_type).await {
        AnalysisOutcome::Success(mut s) => {
            // the ledger references our stored copy, not whatever URL the
            // service echoes back
            s.image_url = image_reference;
            AnalysisOutcome::Success(s)
        }
        failure => failure,
    }
}

fn capture_key(content_type: &str) -> String {
    let ext = ext_from_mime(content_type).unwrap_or("bin");
    format!("captures/{}.{}", Uuid::new_v4(), ext)
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

#[cfg(test)]
mod submit_tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::analysis::dto::AnalysisSuccess;
    use crate::analysis::service::ScriptedAnalyzer;
    use crate::ledger::record::MacroSet;

    fn success(dish: &str, calories: f64) -> AnalysisOutcome {
        AnalysisOutcome::Success(AnalysisSuccess {
            dish: dish.into(),
            image_url: "https://service.echo/ignored.jpg".into(),
            macros: MacroSet {
                calories,
                carbohydrates: 10.0,
                protein: 5.0,
                fat: 2.0,
            },
            ingredients: vec![json!({"name": "rice"})],
        })
    }

    #[test]
    fn test_capture_key_extension() {
        assert!(capture_key("image/jpeg").ends_with(".jpg"));
        assert!(capture_key("image/png").ends_with(".png"));
        assert!(capture_key("application/octet-stream").ends_with(".bin"));
    }

    #[tokio::test]
    async fn successful_submission_lands_in_the_ledger() {
        let st = AppState::fake_with_analyzer(Arc::new(ScriptedAnalyzer::new([success(
            "fried rice",
            600.0,
        )])));

        let resp = submit_image(&st, Bytes::from_static(b"jpegbytes"), "image/jpeg").await;
        assert!(resp.applied);
        assert!(resp.open_editor);
        assert!(resp.reason.is_none());

        let rec = st.ledger.read().await.clone();
        assert_eq!(rec.dish_name, "fried rice");
        assert_eq!(rec.current_macros.calories, 600.0);
        assert_eq!(rec.edit_version, 1);
        // reference points at our stored copy, not the service echo
        assert!(rec.image_reference.starts_with("https://fake.local/captures/"));
        assert!(rec.image_reference.ends_with(".jpg"));

        assert!(!st.session.lock().await.is_submitting);
    }

    #[tokio::test]
    async fn failed_analysis_leaves_the_ledger_untouched() {
        let st = AppState::fake_with_analyzer(Arc::new(ScriptedAnalyzer::new([
            AnalysisOutcome::Failure {
                reason: "image too dark".into(),
            },
        ])));

        let resp = submit_image(&st, Bytes::from_static(b"jpegbytes"), "image/jpeg").await;
        assert!(!resp.applied);
        assert!(!resp.open_editor);
        assert!(resp.reason.unwrap().contains("image too dark"));

        let rec = st.ledger.read().await.clone();
        assert_eq!(rec.edit_version, 0);
        assert_eq!(rec.current_macros, MacroSet::default());
        assert!(!st.session.lock().await.is_submitting);
    }

    #[tokio::test]
    async fn later_submission_wins() {
        let st = AppState::fake_with_analyzer(Arc::new(ScriptedAnalyzer::new([
            success("first", 100.0),
            success("second", 200.0),
        ])));

        submit_image(&st, Bytes::from_static(b"a"), "image/jpeg").await;
        submit_image(&st, Bytes::from_static(b"b"), "image/jpeg").await;

        let rec = st.ledger.read().await.clone();
        assert_eq!(rec.dish_name, "second");
        assert_eq!(rec.current_macros.calories, 200.0);
        assert_eq!(rec.edit_version, 2);
    }

    #[tokio::test]
    async fn unscripted_analyzer_reports_failure() {
        let st = AppState::fake();
        let resp = submit_image(&st, Bytes::from_static(b"a"), "image/jpeg").await;
        assert!(!resp.applied);
        assert_eq!(st.ledger.read().await.edit_version, 0);
    }
}
