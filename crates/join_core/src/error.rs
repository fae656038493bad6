use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("invalid_input - {0}")]
    InvalidInput(String),
    #[error("invalid_data - {0}")]
    InvalidData(String),
    #[error("not_found - {kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },
    #[error("duplicate_id - {kind} id {id} already exists")]
    DuplicateId { kind: &'static str, id: u64 },
    #[error("io_error - {0}")]
    Io(String),
    #[error("remote_error - {0}")]
    Remote(String),
}

impl AppError {
    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn io<M: Into<String>>(message: M) -> Self {
        Self::Io(message.into())
    }

    pub fn remote<M: Into<String>>(message: M) -> Self {
        Self::Remote(message.into())
    }

    pub fn task_not_found(id: u64) -> Self {
        Self::NotFound { kind: "task", id }
    }

    pub fn contact_not_found(id: u64) -> Self {
        Self::NotFound { kind: "contact", id }
    }

    pub fn subtask_not_found(id: u64) -> Self {
        Self::NotFound { kind: "subtask", id }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidData(_) => "invalid_data",
            Self::NotFound { .. } => "not_found",
            Self::DuplicateId { .. } => "duplicate_id",
            Self::Io(_) => "io_error",
            Self::Remote(_) => "remote_error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::InvalidInput(message)
            | Self::InvalidData(message)
            | Self::Io(message)
            | Self::Remote(message) => message.clone(),
            Self::NotFound { kind, id } => format!("{kind} {id} not found"),
            Self::DuplicateId { kind, id } => format!("{kind} id {id} already exists"),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidData(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
