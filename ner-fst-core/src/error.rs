//! # Erros de Configuração
//!
//! Todos os erros do crate acontecem na **construção** do autômato: nomes de
//! estados que não existem, padrões regex inválidos ou arquivos de configuração
//! malformados. Depois que a [`AutomatonTable`](crate::automaton::AutomatonTable)
//! foi construída, o processamento de texto nunca falha.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("initial state '{0}' is not declared")]
    UnknownInitialState(String),

    #[error("transition {from} -> {to} references undeclared state '{missing}'")]
    UnknownState {
        from: String,
        to: String,
        missing: String,
    },

    #[error("state '{0}' is declared more than once")]
    DuplicateState(String),

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot read configuration {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
