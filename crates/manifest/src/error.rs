use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("reading manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("HCL parse error: {0}")]
    Hcl(#[from] hcl::Error),

    #[error("compose YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("procfile parse error at line {line}: {message}")]
    Procfile { line: usize, message: String },

    #[error("invalid port mapping: {0}")]
    PortMapping(String),

    #[error("could not infer manifest format from path {path:?}; pass an explicit format tag")]
    UnknownFormat { path: String },

    #[error("unrecognized component type {0:?}")]
    UnknownComponentType(String),

    #[error("serializing component spec: {0}")]
    Spec(#[from] serde_json::Error),
}
