use actix_web::{
    HttpResponse, Responder, ResponseError, get,
    http::{StatusCode, header::ContentType},
    web::{Data, Path},
};
use podlogs::error::PodLogsError;
use podlogs::key::artifact_key;
use podlogs::store::ContentStore;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum LogsError {
    #[error("no archived logs for {0}")]
    NotFound(String),

    #[error("failed to check existence of {key}")]
    Existence {
        key: String,
        #[source]
        source: PodLogsError,
    },

    #[error("failed to fetch {key}")]
    Fetch {
        key: String,
        #[source]
        source: PodLogsError,
    },
}

impl LogsError {
    pub fn to_message(&self) -> &'static str {
        // Store errors may carry endpoints or bucket names, keep them out of responses.
        match self {
            LogsError::NotFound(_) => "not found",
            LogsError::Existence { .. } => "failed to check existence",
            LogsError::Fetch { .. } => "failed to fetch data",
        }
    }
}

impl ResponseError for LogsError {
    fn status_code(&self) -> StatusCode {
        match self {
            LogsError::NotFound(_) => StatusCode::NOT_FOUND,
            LogsError::Existence { .. } | LogsError::Fetch { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_message())
    }
}

/// Returns the archived log of `container` in pod `namespace/name` as plain text.
///
/// Only artifacts stored under the default `<namespace>/<name>` key prefix are reachable.
#[get("/{namespace}/{name}/{container}")]
pub async fn read_logs(
    store: Data<dyn ContentStore>,
    path: Path<(String, String, String)>,
) -> Result<impl Responder, LogsError> {
    let (namespace, name, container) = path.into_inner();
    let key = artifact_key(&format!("{namespace}/{name}"), &container);

    let exists = store.has(&key).await.map_err(|source| {
        error!(key, error = %source, "failed to check existence of archived logs");
        LogsError::Existence {
            key: key.clone(),
            source,
        }
    })?;
    if !exists {
        debug!(key, "archived logs not found");
        return Err(LogsError::NotFound(key));
    }

    let data = store.get(&key).await.map_err(|source| {
        error!(key, error = %source, "failed to fetch archived logs");
        LogsError::Fetch {
            key: key.clone(),
            source,
        }
    })?;

    Ok(HttpResponse::Ok()
        .insert_header(ContentType::plaintext())
        .body(data))
}
