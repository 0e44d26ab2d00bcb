use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("code d'algorithme invalide : '{0}' (A~G)")]
    UnknownStrategy(String),

    #[error("grille invalide : {0}")]
    InvalidCandidate(String),

    #[error("configuration invalide : {0}")]
    InvalidConfig(String),

    #[error("lecture de la configuration : {0}")]
    Io(#[from] std::io::Error),

    #[error("format de la configuration : {0}")]
    Json(#[from] serde_json::Error),
}
