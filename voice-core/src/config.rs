//! # Configuração da Construção do Dataset
//!
//! Todos os campos têm padrão, então um arquivo de configuração JSON pode
//! conter só o que muda:
//!
//! ```json
//! { "input_path": "data/webnlg_2017", "train_size": 2000, "type": "mixed" }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, Result};
use crate::labeler::LabelMode;

/// Tamanho padrão de cada split: na prática "sem limite".
pub const DEFAULT_SPLIT_SIZE: usize = 99999;
pub const DEFAULT_SEED: u64 = 1337;

/// Parâmetros de uma execução completa (train/dev/test).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Diretório com `train.json`, `dev.json` e `test.json`.
    pub input_path: PathBuf,
    /// Diretório de destino (criado se não existir).
    pub output_path: PathBuf,
    pub train_size: usize,
    pub dev_size: usize,
    pub test_size: usize,
    /// Semente registrada no log; nenhuma etapa usa aleatoriedade.
    pub seed: u64,
    #[serde(rename = "type")]
    pub mode: LabelMode,
    /// Léxico de particípios irregulares (o embutido se ausente).
    pub lexicon_path: Option<PathBuf>,
    /// Processa os três splits em paralelo.
    pub parallel_splits: bool,
    /// Mostra barra de progresso.
    pub progress: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/webnlg_2017"),
            output_path: PathBuf::from("data/webnlg_active_passive_subset"),
            train_size: DEFAULT_SPLIT_SIZE,
            dev_size: DEFAULT_SPLIT_SIZE,
            test_size: DEFAULT_SPLIT_SIZE,
            seed: DEFAULT_SEED,
            mode: LabelMode::Distinct,
            lexicon_path: None,
            parallel_splits: false,
            progress: true,
        }
    }
}

impl DatasetConfig {
    /// Lê a configuração de um arquivo JSON.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| DatasetError::json(path, e))
    }

    /// Verifica a consistência dos parâmetros.
    ///
    /// Tamanho 0 é válido: o split é gravado vazio.
    pub fn validate(&self) -> Result<()> {
        if self.input_path == self.output_path {
            return Err(DatasetError::InvalidConfig(
                "input_path e output_path devem ser diretórios diferentes".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DatasetConfig::default();
        assert_eq!(config.train_size, 99999);
        assert_eq!(config.seed, 1337);
        assert_eq!(config.mode, LabelMode::Distinct);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DatasetConfig =
            serde_json::from_str(r#"{"train_size": 10, "type": "mixed"}"#).unwrap();
        assert_eq!(config.train_size, 10);
        assert_eq!(config.dev_size, DEFAULT_SPLIT_SIZE);
        assert_eq!(config.mode, LabelMode::Mixed);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let result: std::result::Result<DatasetConfig, _> =
            serde_json::from_str(r#"{"type": "shuffled"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_accepts_zero_size() {
        let config = DatasetConfig {
            dev_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_same_paths() {
        let config = DatasetConfig {
            output_path: PathBuf::from("data/webnlg_2017"),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"seed": 7, "parallel_splits": true}"#).unwrap();
        let config = DatasetConfig::from_json_file(&path).unwrap();
        assert_eq!(config.seed, 7);
        assert!(config.parallel_splits);
    }
}
