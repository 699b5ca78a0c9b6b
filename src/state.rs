use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::{Mutex, RwLock};

use crate::analysis::service::{HttpAnalyzer, NutritionAnalyzer, ScriptedAnalyzer};
use crate::capture::session::CaptureSession;
use crate::config::AppConfig;
use crate::ledger::record::NutritionRecord;
use crate::storage::{Storage, StorageClient};

/// One lock per owned entity, never held across a call to the analyzer.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn StorageClient>,
    pub analyzer: Arc<dyn NutritionAnalyzer>,
    pub session: Arc<Mutex<CaptureSession>>,
    pub ledger: Arc<RwLock<NutritionRecord>>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let storage = Arc::new(Storage::from_config(&config).await?) as Arc<dyn StorageClient>;
        let analyzer = Arc::new(HttpAnalyzer::from_config(&config)) as Arc<dyn NutritionAnalyzer>;
        Ok(Self::from_parts(config, storage, analyzer))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        storage: Arc<dyn StorageClient>,
        analyzer: Arc<dyn NutritionAnalyzer>,
    ) -> Self {
        Self {
            config,
            storage,
            analyzer,
            session: Arc::new(Mutex::new(CaptureSession::new())),
            ledger: Arc::new(RwLock::new(NutritionRecord::new())),
        }
    }

    pub fn fake() -> Self {
        Self::fake_with_analyzer(Arc::new(ScriptedAnalyzer::new([])))
    }

    pub fn fake_with_analyzer(analyzer: Arc<dyn NutritionAnalyzer>) -> Self {
        #[derive(Clone)]
        struct FakeStorage;
        #[async_trait]
        impl StorageClient for FakeStorage {
            async fn put_object(&self, _k: &str, _b: Bytes, _ct: &str) -> anyhow::Result<()> {
                Ok(())
            }
            async fn presign_get(&self, k: &str, _s: u64) -> anyhow::Result<String> {
                Ok(format!("https://fake.local/{}", k))
            }
        }

        let config = Arc::new(AppConfig {
            analyzer_endpoint: "http://fake.local/analyze".into(),
            analyzer_api_key: None,
            minio_endpoint: "fake".into(),
            minio_bucket: "fake".into(),
            minio_access_key: "fake".into(),
            minio_secret_key: "fake".into(),
            presign_ttl_secs: 600,
        });

        Self::from_parts(config, Arc::new(FakeStorage) as Arc<dyn StorageClient>, analyzer)
    }
}
