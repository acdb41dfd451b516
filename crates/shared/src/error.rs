use thiserror::Error;

/// Fatal widget-configuration failures, raised synchronously at build time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required widget `type`")]
    MissingKind,
    #[error("unknown widget kind `{kind}`")]
    UnknownKind { kind: String },
    #[error("widget configuration rejected: {detail}")]
    Invalid { detail: String },
}

impl ConfigError {
    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::Invalid {
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service `{name}` is already registered")]
    AlreadyRegistered { name: String },
    #[error("service `{name}` is not registered")]
    NotRegistered { name: String },
    #[error("export name `{name}` is already taken")]
    ExportTaken { name: String },
}

/// Strict enumerated-string parse failure. Lenient fallback handling
/// (warn + default) is the widget factory's concern, not the parser's.
#[derive(Debug, Error)]
#[error("unrecognized {kind} value `{value}`")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
