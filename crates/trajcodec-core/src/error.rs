use crate::config::{ConfigError, Mode};
use crate::core::io::fields::FieldParseError;
use crate::core::models::topology::ModelError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrajectoryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Format error: {message}")]
    Format { message: String },
    #[error("Field parse error: {0}")]
    FieldParse(#[from] FieldParseError),
    #[error("Value {value} for {context} does not fit the '{format}' column")]
    ValueTooLarge {
        context: &'static str,
        value: String,
        format: &'static str,
    },
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
    #[error("Step {step} is out of range for a trajectory with {nsteps} steps")]
    StepOutOfRange { step: usize, nsteps: usize },
    #[error("Cannot {operation} a trajectory opened in {mode} mode")]
    Mode { operation: &'static str, mode: Mode },
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl TrajectoryError {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrajectoryError>;
