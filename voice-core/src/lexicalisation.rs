//! # Modelo de Dados: Entradas, Lexicalizações e Registros Rotulados
//!
//! Uma **entrada** do corpus descreve um mesmo conteúdo semântico através de várias
//! **lexicalizações** alternativas (frases diferentes que dizem a mesma coisa).
//!
//! ```text
//! Entry ─┬─ "lexicalisations": [ Lexicalisation, Lexicalisation, ... ]
//!        └─ (metadados arbitrários: category, size, modifiedtripleset, ...)
//! ```
//!
//! Os metadados não são interpretados: eles atravessam o pipeline intactos e
//! na mesma ordem em que apareciam no arquivo de entrada.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Campo que guarda o texto de uma lexicalização.
pub const LEX_FIELD: &str = "lex";
/// Campo que guarda a lista de lexicalizações de uma entrada.
pub const LEXICALISATIONS_FIELD: &str = "lexicalisations";
pub const ORIGINAL_IDX_FIELD: &str = "originalIdx";
pub const IS_PASSIVE_FIELD: &str = "is_passive";
pub const ACTIVE_LEXICALISATIONS_FIELD: &str = "active_lexicalisations";
pub const PASSIVE_LEXICALISATIONS_FIELD: &str = "passive_lexicalisations";

/// Uma realização textual do conteúdo de uma entrada.
///
/// Guarda o objeto JSON completo (para repassar os metadados) e uma cópia do
/// texto em `lex`, que é o único campo lido pelo sistema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Lexicalisation {
    text: String,
    fields: Map<String, Value>,
}

impl Lexicalisation {
    /// Cria uma lexicalização contendo apenas o campo `lex`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut fields = Map::new();
        fields.insert(LEX_FIELD.to_string(), Value::String(text.clone()));
        Self { text, fields }
    }

    /// O texto bruto (campo `lex`).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl TryFrom<Map<String, Value>> for Lexicalisation {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let text = match fields.get(LEX_FIELD) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(format!("campo \"lex\" deve ser string, encontrado {other}"))
            }
            None => return Err("lexicalização sem o campo \"lex\"".to_string()),
        };
        Ok(Self { text, fields })
    }
}

impl From<Lexicalisation> for Map<String, Value> {
    fn from(lex: Lexicalisation) -> Self {
        lex.fields
    }
}

/// Uma entrada do corpus.
///
/// O campo `lexicalisations` é obrigatório; todo o resto é metadado opaco.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Entry {
    fields: Map<String, Value>,
    lexicalisations: Vec<Lexicalisation>,
}

impl Entry {
    /// Cria uma entrada a partir de textos, sem metadados extras.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lexicalisations: Vec<Lexicalisation> =
            texts.into_iter().map(Lexicalisation::new).collect();
        let mut fields = Map::new();
        fields.insert(
            LEXICALISATIONS_FIELD.to_string(),
            lexicalisations_to_value(&lexicalisations),
        );
        Self {
            fields,
            lexicalisations,
        }
    }

    pub fn lexicalisations(&self) -> &[Lexicalisation] {
        &self.lexicalisations
    }

    /// Objeto JSON original da entrada (inclusive `lexicalisations`).
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl TryFrom<Map<String, Value>> for Entry {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let raw = fields
            .get(LEXICALISATIONS_FIELD)
            .cloned()
            .ok_or_else(|| "entrada sem o campo \"lexicalisations\"".to_string())?;
        let lexicalisations: Vec<Lexicalisation> =
            serde_json::from_value(raw).map_err(|e| e.to_string())?;
        Ok(Self {
            fields,
            lexicalisations,
        })
    }
}

impl From<Entry> for Map<String, Value> {
    fn from(entry: Entry) -> Self {
        entry.fields
    }
}

/// Voz gramatical de uma lexicalização inteira.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceLabel {
    /// Todas as sentenças estão na voz ativa.
    Active,
    /// Todas as sentenças estão na voz passiva.
    Passive,
    /// As sentenças discordam. Nunca é persistido.
    Mixed,
}

impl VoiceLabel {
    /// Classe binária correspondente (`None` para `Mixed`).
    pub fn class(self) -> Option<VoiceClass> {
        match self {
            VoiceLabel::Active => Some(VoiceClass::Active),
            VoiceLabel::Passive => Some(VoiceClass::Passive),
            VoiceLabel::Mixed => None,
        }
    }
}

/// Classe binária usada no balanceamento (`a` / `p`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceClass {
    Active,
    Passive,
}

impl VoiceClass {
    /// Valor gravado em `is_passive`.
    pub fn flag(self) -> u8 {
        match self {
            VoiceClass::Active => 0,
            VoiceClass::Passive => 1,
        }
    }

    /// Nome curto usado nos contadores e logs.
    pub fn short_name(self) -> &'static str {
        match self {
            VoiceClass::Active => "a",
            VoiceClass::Passive => "p",
        }
    }
}

/// Registro produzido pelo rotulador de entradas.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "Map<String, Value>")]
pub enum LabeledRecord {
    /// Modo `distinct`: uma única lexicalização com sua classe.
    Distinct {
        /// Campos da entrada de origem.
        entry_fields: Map<String, Value>,
        lexicalisation: Lexicalisation,
        /// Índice 1-based da entrada no arquivo de origem.
        original_idx: usize,
        class: VoiceClass,
    },
    /// Modo `mixed`: as lexicalizações ativas e passivas da mesma entrada (ambas não vazias).
    Mixed {
        entry_fields: Map<String, Value>,
        original_idx: usize,
        active: Vec<Lexicalisation>,
        passive: Vec<Lexicalisation>,
    },
}

impl LabeledRecord {
    /// Classe binária do registro; registros `Mixed` não têm classe única.
    pub fn class(&self) -> Option<VoiceClass> {
        match self {
            LabeledRecord::Distinct { class, .. } => Some(*class),
            LabeledRecord::Mixed { .. } => None,
        }
    }

    pub fn original_idx(&self) -> usize {
        match self {
            LabeledRecord::Distinct { original_idx, .. }
            | LabeledRecord::Mixed { original_idx, .. } => *original_idx,
        }
    }
}

impl From<LabeledRecord> for Map<String, Value> {
    fn from(record: LabeledRecord) -> Self {
        match record {
            LabeledRecord::Distinct {
                mut entry_fields,
                lexicalisation,
                original_idx,
                class,
            } => {
                entry_fields.insert(
                    ORIGINAL_IDX_FIELD.to_string(),
                    Value::String(original_idx.to_string()),
                );
                entry_fields.insert(
                    LEXICALISATIONS_FIELD.to_string(),
                    Value::Array(vec![Value::Object(lexicalisation.into())]),
                );
                entry_fields.insert(IS_PASSIVE_FIELD.to_string(), Value::from(class.flag()));
                entry_fields
            }
            LabeledRecord::Mixed {
                mut entry_fields,
                original_idx,
                active,
                passive,
            } => {
                entry_fields.insert(
                    ORIGINAL_IDX_FIELD.to_string(),
                    Value::String(original_idx.to_string()),
                );
                entry_fields.insert(
                    PASSIVE_LEXICALISATIONS_FIELD.to_string(),
                    lexicalisations_to_value(&passive),
                );
                entry_fields.insert(
                    ACTIVE_LEXICALISATIONS_FIELD.to_string(),
                    lexicalisations_to_value(&active),
                );
                entry_fields
            }
        }
    }
}

fn lexicalisations_to_value(lexs: &[Lexicalisation]) -> Value {
    Value::Array(
        lexs.iter()
            .map(|l| Value::Object(l.fields.clone()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_preserves_metadata() {
        let raw = json!({
            "category": "Airport",
            "lexicalisations": [{"comment": "good", "lex": "The runway is long.", "lid": "Id1"}],
            "size": "1"
        });
        let entry: Entry = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(entry.lexicalisations().len(), 1);
        assert_eq!(entry.lexicalisations()[0].text(), "The runway is long.");
        assert_eq!(serde_json::to_value(&entry).unwrap(), raw);
    }

    #[test]
    fn test_entry_without_lexicalisations_is_rejected() {
        let result: Result<Entry, _> = serde_json::from_value(json!({"category": "Food"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_null_lex_is_rejected() {
        let result: Result<Lexicalisation, _> = serde_json::from_value(json!({"lex": null}));
        assert!(result.is_err());
    }

    #[test]
    fn test_distinct_record_fields() {
        let entry: Entry = serde_json::from_value(json!({
            "category": "Food",
            "lexicalisations": [{"lex": "A"}, {"lex": "B"}]
        }))
        .unwrap();
        let record = LabeledRecord::Distinct {
            entry_fields: entry.fields().clone(),
            lexicalisation: entry.lexicalisations()[1].clone(),
            original_idx: 7,
            class: VoiceClass::Passive,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "category": "Food",
                "lexicalisations": [{"lex": "B"}],
                "originalIdx": "7",
                "is_passive": 1
            })
        );
        // a ordem dos campos segue a do arquivo original
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["category", "lexicalisations", "originalIdx", "is_passive"]);
    }

    #[test]
    fn test_mixed_record_keeps_original_lexicalisations() {
        let entry = Entry::from_texts(["active one", "passive one"]);
        let record = LabeledRecord::Mixed {
            entry_fields: entry.fields().clone(),
            original_idx: 1,
            active: vec![entry.lexicalisations()[0].clone()],
            passive: vec![entry.lexicalisations()[1].clone()],
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["lexicalisations"].as_array().unwrap().len(), 2);
        assert_eq!(value["active_lexicalisations"], json!([{"lex": "active one"}]));
        assert_eq!(value["passive_lexicalisations"], json!([{"lex": "passive one"}]));
        assert_eq!(value["originalIdx"], json!("1"));
        assert!(value.get("is_passive").is_none());
    }
}
