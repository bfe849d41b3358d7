use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimplifyError {
    #[error("Upstream fetch failed for {resource}: {message}")]
    Fetch { resource: String, message: String },

    #[error("Unsupported paint type {paint_type:?} on node {node_id}")]
    UnsupportedPaint { node_id: String, paint_type: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimplifyError>;
