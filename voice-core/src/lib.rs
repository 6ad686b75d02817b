//! # voice-core — Dataset de Voz Ativa/Passiva
//!
//! Este crate constrói splits train/dev/test de sentenças rotuladas por voz
//! gramatical (ativa ou passiva) a partir de um corpus de geração de texto no
//! estilo WebNLG, em que cada entrada traz várias lexicalizações do mesmo conteúdo.
//!
//! ## Arquitetura do Sistema
//!
//! O dado flui em um pipeline linear, por split:
//!
//! 1.  **Entrada**: arquivo JSON do split ([`dataset`]).
//! 2.  **Segmentação** ([`tokenizer`]): lexicalização → sentenças → tokens.
//! 3.  **Detecção de voz** ([`rule_based`], [`voice`]): cada sentença é ativa ou
//!     passiva; a lexicalização é ativa, passiva ou mista por unanimidade.
//! 4.  **Rotulação** ([`labeler`]): entradas viram registros rotulados
//!     (modo `distinct` ou `mixed`).
//! 5.  **Divisão balanceada** ([`splitter`]): registros são reduzidos ao tamanho
//!     alvo mantendo 50/50 entre as classes.
//! 6.  **Saída**: o split é gravado no diretório de destino ([`driver`]).
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use voice_core::{balanced_split, label_entry, Entry, LabelMode, RuleBasedOracle};
//!
//! let oracle = RuleBasedOracle::default();
//! let entry = Entry::from_texts([
//!     "The city operates the airport.",
//!     "The airport is operated by the city.",
//! ]);
//!
//! let records = label_entry(&entry, 0, LabelMode::Distinct, &oracle).unwrap();
//! let outcome = balanced_split(records, 2, LabelMode::Distinct);
//! assert_eq!(outcome.counts.active, 1);
//! assert_eq!(outcome.counts.passive, 1);
//! ```
//!
//! ## Módulos Principais
//!
//! - [`splitter`]: o algoritmo de balanceamento e corte.
//! - [`labeler`]: rotulação das entradas.
//! - [`driver`]: orquestração dos três splits.

pub mod config;
pub mod dataset;
pub mod driver;
pub mod error;
pub mod labeler;
pub mod lexicalisation;
pub mod rule_based;
pub mod splitter;
pub mod tokenizer;
pub mod voice;

pub use config::DatasetConfig;
pub use driver::{run, run_split, RunReport, Split, SplitReport};
pub use error::{DatasetError, Result};
pub use labeler::{label_entry, LabelMode};
pub use lexicalisation::{Entry, LabeledRecord, Lexicalisation, VoiceClass, VoiceLabel};
pub use splitter::{balanced_split, SplitOutcome};
pub use voice::{RuleBasedOracle, VoiceOracle};
