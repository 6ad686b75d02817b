//! # Oráculo de Voz
//!
//! Interface entre o rotulador de entradas e o detector de voz passiva.
//! O rotulador nunca conhece o detector concreto: ele recebe um [`VoiceOracle`]
//! como parâmetro, o que permite trocar o motor de regras por um stub
//! determinístico nos testes.
//!
//! A voz de uma lexicalização é decidida por unanimidade entre as sentenças:
//!
//! - todas passivas → [`VoiceLabel::Passive`]
//! - todas ativas → [`VoiceLabel::Active`]
//! - qualquer outra combinação → [`VoiceLabel::Mixed`]

use std::path::Path;

use crate::error::{DatasetError, Result};
use crate::lexicalisation::VoiceLabel;
use crate::rule_based::PassiveRuleEngine;
use crate::tokenizer::{split_sentences, tokenize};

/// Classificador de voz gramatical.
pub trait VoiceOracle {
    /// A sentença está na voz passiva?
    ///
    /// Sentença vazia é violação de contrato.
    fn sentence_is_passive(&self, sentence: &str) -> Result<bool>;

    /// Segmenta um texto em sentenças.
    fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        split_sentences(text)
    }

    /// Voz de uma lexicalização inteira (unanimidade entre as sentenças).
    fn lexicalisation_voice(&self, text: &str) -> Result<VoiceLabel> {
        let verdicts = self
            .sentences(text)
            .into_iter()
            .map(|s| self.sentence_is_passive(s))
            .collect::<Result<Vec<bool>>>()?;

        // Sem sentenças, "todas passivas" vale por vacuidade e é testado primeiro
        if verdicts.iter().all(|&p| p) {
            Ok(VoiceLabel::Passive)
        } else if verdicts.iter().all(|&p| !p) {
            Ok(VoiceLabel::Active)
        } else {
            Ok(VoiceLabel::Mixed)
        }
    }
}

impl<T: VoiceOracle + ?Sized> VoiceOracle for &T {
    fn sentence_is_passive(&self, sentence: &str) -> Result<bool> {
        (**self).sentence_is_passive(sentence)
    }

    fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        (**self).sentences(text)
    }
}

/// Oráculo baseado no [`PassiveRuleEngine`].
pub struct RuleBasedOracle {
    engine: PassiveRuleEngine,
}

impl RuleBasedOracle {
    pub fn new(engine: PassiveRuleEngine) -> Self {
        Self { engine }
    }

    /// Carrega o oráculo com o léxico de `lexicon_path`, ou o embutido se `None`.
    pub fn load(lexicon_path: Option<&Path>) -> Result<Self> {
        let engine = match lexicon_path {
            Some(path) => PassiveRuleEngine::from_lexicon_file(path)?,
            None => PassiveRuleEngine::new(),
        };
        Ok(Self::new(engine))
    }

    pub fn engine(&self) -> &PassiveRuleEngine {
        &self.engine
    }
}

impl Default for RuleBasedOracle {
    fn default() -> Self {
        Self::new(PassiveRuleEngine::new())
    }
}

impl VoiceOracle for RuleBasedOracle {
    fn sentence_is_passive(&self, sentence: &str) -> Result<bool> {
        if sentence.trim().is_empty() {
            return Err(DatasetError::InvalidInput(
                "sentença vazia passada ao detector de voz".to_string(),
            ));
        }
        Ok(self.engine.is_passive(&tokenize(sentence)))
    }
}
