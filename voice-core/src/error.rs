//! # Erros do Construtor de Dataset
//!
//! Todos os módulos do `voice-core` retornam [`Result`], cujo erro é o enum
//! [`DatasetError`]. A única situação "ruim" que **não** é erro é a falta de
//! exemplos para atingir o tamanho pedido de um split: isso vira um aviso
//! (ver [`crate::driver`]).

use std::path::PathBuf;

use thiserror::Error;

/// Erros que podem abortar a construção de um split.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// O arquivo de destino já existe. Nada é sobrescrito.
    #[error("o caminho já contém o arquivo {path}; arquivos existentes não são sobrescritos")]
    OutputExists { path: PathBuf },

    /// O léxico do detector de voz passiva não pôde ser carregado nem após a reinstalação.
    #[error("não foi possível carregar o léxico de particípios em {path}: {source}")]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Violação de contrato na entrada (sentença vazia, entrada mal formada).
    #[error("entrada inválida: {0}")]
    InvalidInput(String),

    /// Configuração inconsistente.
    #[error("configuração inválida: {0}")]
    InvalidConfig(String),

    #[error("erro de E/S em {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON inválido em {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DatasetError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        DatasetError::Json {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DatasetError>;
