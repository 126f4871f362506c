use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("No python interpreter available to create the virtual environment")]
    MissingPython,
    #[error("Failed to run `{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{step} failed: {output}")]
    Step { step: &'static str, output: String },
    #[error("Entry point {0:?} is missing after installation")]
    MissingEntryPoint(PathBuf),
    #[error(transparent)]
    Io(#[from] io::Error),
}
