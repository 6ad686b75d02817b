//! # Tokenizador e Segmentador de Sentenças (Inglês)
//!
//! Responsável por duas etapas do pipeline de detecção de voz:
//!
//! 1. **Segmentação de sentenças** ([`split_sentences`]): quebra uma lexicalização
//!    em sentenças usando as fronteiras do Unicode (UAX #29), com um reparo para
//!    abreviações inglesas ("Mr. Smith", "U.S. Army") que o algoritmo padrão
//!    trataria como fim de sentença.
//! 2. **Tokenização de palavras** ([`tokenize`]): divide uma sentença em tokens
//!    preservando o offset original de cada um.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use voice_core::tokenizer::{split_sentences, tokenize};
//!
//! let sentences = split_sentences("Mr. Smith built the bridge. It was opened in 1990.");
//! assert_eq!(sentences.len(), 2);
//!
//! // "It's" vira "It" + "'s"
//! let tokens = tokenize("It's been built.");
//! assert_eq!(tokens[1].text, "'s");
//! ```

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Um token extraído do texto original.
///
/// Mantém a posição exata no texto (`start` e `end`, em bytes) para que as
/// regras possam reportar onde um indicador de voz passiva foi encontrado.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// O texto do token (ex: "was", ",", "built").
    pub text: String,
    /// Índice de byte inicial no texto original (inclusive).
    pub start: usize,
    /// Índice de byte final no texto original (exclusivo).
    pub end: usize,
    /// Índice sequencial do token na lista (0, 1, 2...).
    pub index: usize,
}

impl Token {
    /// Texto em minúsculas, usado por todas as regras.
    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }

    pub fn is_word(&self) -> bool {
        self.text.chars().next().map(char::is_alphanumeric).unwrap_or(false)
    }
}

/// Abreviações comuns em inglês cujo ponto não encerra a sentença
const ABBREVIATIONS: &[&str] = &[
    "Mr", "Mrs", "Ms", "Dr", "Prof", "Sr", "Jr", "St", "Mt", "Ft",
    "Gen", "Col", "Lt", "Sgt", "Capt", "Cmdr", "Adm", "Gov", "Sen", "Rep",
    "Rev", "Hon", "Pres", "Inc", "Ltd", "Co", "Corp", "Bros", "No", "vs",
    "approx", "ca", "cf", "e.g", "i.e", "Jan", "Feb", "Mar", "Apr", "Aug",
    "Sep", "Sept", "Oct", "Nov", "Dec", "Ave", "Blvd", "Rd", "km", "ft",
];

/// Palavras que costumam abrir uma nova sentença ("... D.C. It has ...")
const SENTENCE_STARTERS: &[&str] = &[
    "A", "An", "The", "This", "That", "These", "Those", "It", "Its", "He", "His",
    "She", "Her", "They", "Their", "We", "Our", "There", "In", "On", "At", "As",
    "However", "Both",
];

/// Clíticos ingleses separados do token anterior ("it's" → "it", "'s")
const CLITICS: &[&str] = &["n't", "'s", "'re", "'ve", "'ll", "'m", "'d"];

/// Divide o texto em sentenças (sem espaços nas bordas).
///
/// Texto vazio (ou só espaços) não tem sentenças.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut pending_start: Option<usize> = None;
    let segments: Vec<(usize, &str)> = text.split_sentence_bound_indices().collect();

    for (i, (offset, segment)) in segments.iter().enumerate() {
        let start = *pending_start.get_or_insert(*offset);
        let next = segments.get(i + 1).map(|(_, next)| *next);
        let merge = next.is_some_and(|next| {
            ends_with_abbreviation(segment) && !starts_new_sentence(next)
        });
        if merge {
            // Junta com o próximo segmento
            continue;
        }
        let sentence = text[start..offset + segment.len()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        pending_start = None;
    }

    sentences
}

/// Verifica se o segmento termina com uma abreviação (ex: "Mr.", "U.S.", "F.")
fn ends_with_abbreviation(segment: &str) -> bool {
    let trimmed = segment.trim_end();
    let Some(without_dot) = trimmed.strip_suffix('.') else {
        return false;
    };
    let last_word = without_dot
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(|c: char| !c.is_alphanumeric());

    if last_word.is_empty() {
        return false;
    }
    if ABBREVIATIONS.contains(&last_word) {
        return true;
    }
    // Iniciais: "F", "U.S", "D.C"
    last_word
        .split('.')
        .all(|part| part.chars().count() == 1 && part.chars().all(char::is_uppercase))
}

/// Verifica se o segmento começa com uma palavra típica de início de sentença
fn starts_new_sentence(segment: &str) -> bool {
    let first_word = segment
        .split(|c: char| !c.is_alphanumeric())
        .find(|w| !w.is_empty())
        .unwrap_or("");
    SENTENCE_STARTERS.contains(&first_word)
}

/// Tokeniza uma sentença em palavras e pontuações.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = tokenize_standard(text);

    // Re-indexa os tokens
    for (i, token) in tokens.iter_mut().enumerate() {
        token.index = i;
    }
    tokens
}

fn tokenize_standard(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current_start = 0;
    let mut current_text = String::new();
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (byte_pos, ch) = chars[i];

        if ch.is_alphanumeric() || (ch == '-' && !current_text.is_empty()) {
            if current_text.is_empty() {
                current_start = byte_pos;
            }
            current_text.push(ch);
        } else if ch == '.' && !current_text.is_empty() {
            let is_abbrev = ABBREVIATIONS.contains(&current_text.as_str());
            let current_is_num = current_text.chars().all(char::is_numeric);
            let next_is_num = chars
                .get(i + 1)
                .map(|(_, c)| c.is_numeric())
                .unwrap_or(false);

            if is_abbrev || (current_is_num && next_is_num) {
                current_text.push('.');
            } else {
                flush_token(&mut tokens, &mut current_text, current_start, byte_pos);
                push_token(&mut tokens, ".".to_string(), byte_pos, byte_pos + 1);
            }
        } else if (ch == '\'' || ch == '\u{2019}') && !current_text.is_empty() {
            current_text.push('\'');
        } else if ch.is_whitespace() {
            flush_token(&mut tokens, &mut current_text, current_start, byte_pos);
        } else {
            flush_token(&mut tokens, &mut current_text, current_start, byte_pos);
            push_token(&mut tokens, ch.to_string(), byte_pos, byte_pos + ch.len_utf8());
        }
        i += 1;
    }

    flush_token(&mut tokens, &mut current_text, current_start, text.len());

    tokens
}

/// Fecha o token acumulado, separando um clítico final se houver
fn flush_token(tokens: &mut Vec<Token>, text: &mut String, start: usize, end: usize) {
    if text.is_empty() {
        return;
    }
    let lower = text.to_lowercase();
    let clitic = CLITICS
        .iter()
        .find(|c| lower.ends_with(*c) && lower.len() > c.len());

    match clitic {
        Some(clitic) => {
            let split_at = text.len() - clitic.len();
            // Offsets contam bytes do original; o apóstrofo tipográfico ocupa 3 bytes
            let clitic_bytes = end - start - split_at;
            push_token(tokens, text[..split_at].to_string(), start, end - clitic_bytes);
            push_token(tokens, text[split_at..].to_string(), end - clitic_bytes, end);
        }
        None => push_token(tokens, text.clone(), start, end),
    }
    text.clear();
}

/// Adiciona um token diretamente
fn push_token(tokens: &mut Vec<Token>, text: String, start: usize, end: usize) {
    tokens.push(Token {
        text,
        start,
        end,
        index: 0,
    });
}
