//! # Leitura e Escrita dos Arquivos de Split
//!
//! Entrada (`train.json`, `dev.json`, `test.json`):
//!
//! ```json
//! { "entries": [ { "1": { "lexicalisations": [ {"lex": "..."} ] } }, { "2": { ... } } ] }
//! ```
//!
//! Cada elemento é um objeto de chave única. A chave é apenas informativa: o
//! `originalIdx` vem da posição do elemento na lista.
//!
//! A saída usa o mesmo formato, com as chaves renumeradas `1..N`, indentado com
//! três espaços.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DatasetError, Result};
use crate::lexicalisation::{Entry, LabeledRecord};
use crate::splitter::IndexedRecord;

#[derive(Deserialize)]
struct CorpusFile {
    entries: Vec<Map<String, Value>>,
}

#[derive(Serialize)]
struct OutputFile<'a> {
    entries: Vec<HashMap<String, &'a LabeledRecord>>,
}

/// Lê as entradas de um arquivo de split.
pub fn load_entries(path: &Path) -> Result<Vec<Entry>> {
    let content = std::fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
    parse_entries(&content).map_err(|err| match err {
        ParseError::Json(source) => DatasetError::json(path, source),
        ParseError::Shape(msg) => {
            DatasetError::InvalidInput(format!("{}: {msg}", path.display()))
        }
    })
}

enum ParseError {
    Json(serde_json::Error),
    Shape(String),
}

fn parse_entries(content: &str) -> std::result::Result<Vec<Entry>, ParseError> {
    let corpus: CorpusFile = serde_json::from_str(content).map_err(ParseError::Json)?;

    corpus
        .entries
        .into_iter()
        .enumerate()
        .map(|(position, wrapper)| {
            if wrapper.len() != 1 {
                return Err(ParseError::Shape(format!(
                    "elemento {} deveria ter uma única chave, tem {}",
                    position + 1,
                    wrapper.len()
                )));
            }
            let Some((_, Value::Object(fields))) = wrapper.into_iter().next() else {
                return Err(ParseError::Shape(format!(
                    "elemento {} não contém um objeto de entrada",
                    position + 1
                )));
            };
            Entry::try_from(fields)
                .map_err(|msg| ParseError::Shape(format!("entrada {}: {msg}", position + 1)))
        })
        .collect()
}

/// Total de lexicalizações (tamanho máximo possível de um split Distinct).
pub fn total_lexicalisations(entries: &[Entry]) -> usize {
    entries.iter().map(|e| e.lexicalisations().len()).sum()
}

/// Serializa os registros no formato de saída, com indentação de 3 espaços.
pub fn write_records<W: Write>(writer: W, records: &[IndexedRecord]) -> Result<W> {
    let file = OutputFile {
        entries: records
            .iter()
            .map(|r| HashMap::from([(r.index.to_string(), &r.record)]))
            .collect(),
    };
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"   ");
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    file.serialize(&mut serializer)
        .map_err(|e| DatasetError::json("<saída>", e))?;
    Ok(serializer.into_inner())
}

/// Grava o dataset em `path`. Falha com [`DatasetError::OutputExists`] se o
/// arquivo já existir (a criação é exclusiva).
pub fn save_dataset(path: &Path, records: &[IndexedRecord]) -> Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => DatasetError::OutputExists {
                path: path.to_path_buf(),
            },
            _ => DatasetError::io(path, e),
        })?;

    let mut writer = write_records(BufWriter::new(file), records).map_err(|err| match err {
        DatasetError::Json { source, .. } => DatasetError::json(path, source),
        other => other,
    })?;
    writer.flush().map_err(|e| DatasetError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicalisation::{Lexicalisation, VoiceClass};
    use serde_json::json;

    const CORPUS: &str = r#"{
        "entries": [
            {"1": {"category": "Airport", "lexicalisations": [{"lex": "A."}, {"lex": "B."}]}},
            {"7": {"lexicalisations": [{"lex": "C."}]}}
        ]
    }"#;

    fn record(idx: usize) -> IndexedRecord {
        IndexedRecord {
            index: idx,
            record: LabeledRecord::Distinct {
                entry_fields: Map::new(),
                lexicalisation: Lexicalisation::new("x"),
                original_idx: idx,
                class: VoiceClass::Active,
            },
        }
    }

    #[test]
    fn test_parse_entries() {
        let entries = parse_entries(CORPUS).ok().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(total_lexicalisations(&entries), 3);
        assert_eq!(entries[0].fields()["category"], "Airport");
    }

    #[test]
    fn test_parse_rejects_multi_key_element() {
        let bad = r#"{"entries": [{"1": {"lexicalisations": []}, "2": {"lexicalisations": []}}]}"#;
        assert!(matches!(parse_entries(bad), Err(ParseError::Shape(_))));
    }

    #[test]
    fn test_parse_rejects_bad_json() {
        assert!(matches!(parse_entries("{"), Err(ParseError::Json(_))));
    }

    #[test]
    fn test_write_records_format() {
        let bytes = write_records(Vec::new(), &[record(1), record(2)]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\n   \"entries\""));
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["entries"][0]["1"]["originalIdx"], json!("1"));
        assert_eq!(value["entries"][1]["2"]["is_passive"], json!(0));
    }

    #[test]
    fn test_save_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.json");
        std::fs::write(&path, "original").unwrap();
        let err = save_dataset(&path, &[record(1)]).unwrap_err();
        assert!(matches!(err, DatasetError::OutputExists { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_entries(&dir.path().join("dev.json")).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }
}
