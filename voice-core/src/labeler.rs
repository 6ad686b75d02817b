//! # Rotulador de Entradas
//!
//! Transforma uma [`Entry`] do corpus em zero ou mais [`LabeledRecord`]s.
//!
//! ## Modos
//!
//! - **Distinct**: um registro por lexicalização, marcado como ativo ou passivo.
//!   Lexicalizações de voz mista são descartadas.
//! - **Mixed**: um registro por entrada, com as listas de lexicalizações ativas e
//!   passivas. Só é emitido se as duas listas forem não vazias (uso contrastivo).
//!
//! O rotulador é uma função pura da entrada e do oráculo: rodar duas vezes produz
//! os mesmos registros.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lexicalisation::{Entry, LabeledRecord, VoiceLabel};
use crate::voice::VoiceOracle;

/// Modo de construção do dataset (campo `type` da configuração).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    /// Um registro por lexicalização, balanceado por voz.
    #[default]
    Distinct,
    /// Um registro por entrada com pares ativo/passivo, sem balanceamento.
    Mixed,
}

impl LabelMode {
    pub fn name(&self) -> &'static str {
        match self {
            LabelMode::Distinct => "distinct",
            LabelMode::Mixed => "mixed",
        }
    }
}

/// Rotula uma entrada.
///
/// `position` é a posição 0-based da entrada no arquivo; o `originalIdx`
/// gravado é `position + 1`. A chave textual do arquivo não é usada.
pub fn label_entry<O: VoiceOracle + ?Sized>(
    entry: &Entry,
    position: usize,
    mode: LabelMode,
    oracle: &O,
) -> Result<Vec<LabeledRecord>> {
    let original_idx = position + 1;

    match mode {
        LabelMode::Distinct => {
            let mut records = Vec::new();
            for lexicalisation in entry.lexicalisations() {
                let Some(class) = oracle.lexicalisation_voice(lexicalisation.text())?.class() else {
                    continue;
                };
                records.push(LabeledRecord::Distinct {
                    entry_fields: entry.fields().clone(),
                    lexicalisation: lexicalisation.clone(),
                    original_idx,
                    class,
                });
            }
            Ok(records)
        }
        LabelMode::Mixed => {
            let mut active = Vec::new();
            let mut passive = Vec::new();
            for lexicalisation in entry.lexicalisations() {
                match oracle.lexicalisation_voice(lexicalisation.text())? {
                    VoiceLabel::Active => active.push(lexicalisation.clone()),
                    VoiceLabel::Passive => passive.push(lexicalisation.clone()),
                    VoiceLabel::Mixed => {}
                }
            }
            if active.is_empty() || passive.is_empty() {
                return Ok(vec![]);
            }
            Ok(vec![LabeledRecord::Mixed {
                entry_fields: entry.fields().clone(),
                original_idx,
                active,
                passive,
            }])
        }
    }
}

/// Rotula todas as entradas em ordem, concatenando os registros.
///
/// `on_entry` é chamado após cada entrada com o número de lexicalizações processadas
/// (usado pela barra de progresso).
pub fn label_entries<O, F>(
    entries: &[Entry],
    mode: LabelMode,
    oracle: &O,
    mut on_entry: F,
) -> Result<Vec<LabeledRecord>>
where
    O: VoiceOracle + ?Sized,
    F: FnMut(usize),
{
    let mut records = Vec::new();
    for (position, entry) in entries.iter().enumerate() {
        records.extend(label_entry(entry, position, mode, oracle)?);
        on_entry(entry.lexicalisations().len());
    }
    Ok(records)
}
