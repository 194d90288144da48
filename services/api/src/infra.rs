use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use scoresheet::config::PersistenceConfig;
use scoresheet::error::AppError;
use scoresheet::workflows::evaluation::{PersistError, RecordSink, Rubric, SubmissionPayload};
use tracing::{debug, info};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Reads the rubric file when one is configured, otherwise the standard tables.
pub(crate) fn load_rubric(path: Option<&Path>) -> Result<Arc<Rubric>, AppError> {
    let rubric = match path {
        Some(path) => {
            info!(path = %path.display(), "loading rubric from file");
            Rubric::from_path(path)?
        }
        None => Rubric::standard(),
    };
    Ok(Arc::new(rubric))
}

/// Posts each score record as JSON to the configured record store. The call is not timed
/// out; a save stays in flight until the store answers or the connection fails.
pub(crate) struct HttpRecordSink {
    client: reqwest::Client,
    endpoint: String,
    require_ack: bool,
}

impl HttpRecordSink {
    pub(crate) fn new(endpoint: impl Into<String>, require_ack: bool) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| AppError::Http(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            require_ack,
        })
    }
}

#[async_trait]
impl RecordSink for HttpRecordSink {
    async fn persist(&self, payload: &SubmissionPayload) -> Result<(), PersistError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|err| PersistError::Transport(err.to_string()))?;

        let status = response.status();
        debug!(%status, endpoint = %self.endpoint, "record store responded");
        if self.require_ack && !status.is_success() {
            return Err(PersistError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRecordSink {
    records: Arc<Mutex<Vec<SubmissionPayload>>>,
}

impl InMemoryRecordSink {
    pub(crate) fn records(&self) -> Vec<SubmissionPayload> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl RecordSink for InMemoryRecordSink {
    async fn persist(&self, payload: &SubmissionPayload) -> Result<(), PersistError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(payload.clone());
        Ok(())
    }
}

/// Record store picked from configuration at startup.
pub(crate) enum ConfiguredSink {
    Http(HttpRecordSink),
    Memory(InMemoryRecordSink),
}

impl ConfiguredSink {
    pub(crate) fn from_config(config: &PersistenceConfig) -> Result<Self, AppError> {
        match &config.endpoint {
            Some(endpoint) => {
                info!(%endpoint, require_ack = config.require_ack, "using http record store");
                Ok(Self::Http(HttpRecordSink::new(
                    endpoint.clone(),
                    config.require_ack,
                )?))
            }
            None => {
                info!("no record store endpoint configured; keeping records in memory");
                Ok(Self::Memory(InMemoryRecordSink::default()))
            }
        }
    }
}

#[async_trait]
impl RecordSink for ConfiguredSink {
    async fn persist(&self, payload: &SubmissionPayload) -> Result<(), PersistError> {
        match self {
            Self::Http(sink) => sink.persist(payload).await,
            Self::Memory(sink) => sink.persist(payload).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoresheet::workflows::evaluation::{InfoField, ScoringState};

    fn payload() -> SubmissionPayload {
        let mut state = ScoringState::new(Arc::new(Rubric::standard()));
        state.set_info(InfoField::Name, "Lea Cruz");
        state.set_info(InfoField::School, "Pasig Science HS");
        state.set_info(InfoField::Division, "Pasig City");
        SubmissionPayload::from_state(&state)
    }

    #[tokio::test]
    async fn memory_sink_keeps_records_in_order() {
        let sink = InMemoryRecordSink::default();
        sink.persist(&payload()).await.expect("stored");
        sink.persist(&payload()).await.expect("stored");

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Lea Cruz");
    }

    #[test]
    fn missing_endpoint_selects_memory_sink() {
        let config = PersistenceConfig {
            endpoint: None,
            require_ack: false,
        };
        let sink = ConfiguredSink::from_config(&config).expect("sink builds");
        assert!(matches!(sink, ConfiguredSink::Memory(_)));
    }

    #[test]
    fn endpoint_selects_http_sink() {
        let config = PersistenceConfig {
            endpoint: Some("http://127.0.0.1:9/records".to_string()),
            require_ack: true,
        };
        match ConfiguredSink::from_config(&config).expect("sink builds") {
            ConfiguredSink::Http(sink) => {
                assert!(sink.require_ack);
                assert_eq!(sink.endpoint, "http://127.0.0.1:9/records");
            }
            ConfiguredSink::Memory(_) => panic!("expected http sink"),
        }
    }

    #[tokio::test]
    async fn unreachable_store_is_a_transport_error() {
        let sink = HttpRecordSink::new("http://127.0.0.1:9/records", false).expect("client");
        match sink.persist(&payload()).await {
            Err(PersistError::Transport(_)) => {}
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn standard_rubric_is_used_without_a_path() {
        let rubric = load_rubric(None).expect("standard rubric");
        assert_eq!(*rubric, Rubric::standard());
    }
}
