use dossier_formats::DossierError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterrogationError {
    #[error("no suspect registered under citizen id {0:?}")]
    UnknownSuspect(String),
    #[error("suspect {0:?} is already registered")]
    DuplicateSuspect(String),
    #[error("failed to read engine config {path}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse engine config {path}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Dossier(#[from] DossierError),
}
