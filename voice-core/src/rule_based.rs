//! # Motor de Regras — Indicadores de Voz Passiva
//!
//! Sem um parser de dependências, a voz passiva é detectada por regras sobre os
//! tokens de uma sentença. Cada regra leva o nome do rótulo de dependência que
//! um parser atribuiria ao mesmo fenômeno:
//!
//! | Regra       | Padrão                                          | Exemplo                    |
//! |-------------|-------------------------------------------------|----------------------------|
//! | `auxpass`   | forma de *be*/*get* + (advérbios) + particípio  | "was **built**"            |
//! | `agent`     | "by" logo após o particípio                     | "built **by** Smith"       |
//! | `nsubjpass` | palavra imediatamente antes do auxiliar passivo | "**bridge** was built"     |
//!
//! Uma sentença é passiva se e somente se existe pelo menos um `auxpass`.
//!
//! ## Léxico de particípios
//!
//! Particípios regulares (`-ed`) são reconhecidos por regex; os irregulares
//! ("built", "born", "written"...) vêm de um léxico. O léxico embutido
//! ([`BUNDLED_LEXICON`]) pode ser substituído por um arquivo, uma palavra por linha.

use std::collections::HashSet;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DatasetError, Result};
use crate::tokenizer::Token;

/// Léxico embutido de particípios irregulares, no mesmo formato do arquivo externo.
pub const BUNDLED_LEXICON: &str = "\
# particípios irregulares do inglês (um por linha)
arisen awoken beaten become begun bent bet bid bitten bled blown broken bred
brought broadcast built burnt burst bought cast caught chosen clung come cost
crept cut dealt dug done drawn dreamt driven drunk eaten fallen fed felt fought
found fled flown forbidden forgotten forgiven frozen gotten given gone ground
grown hung had heard hidden hit held hurt kept knelt known laid led leant
learnt left lent let lain lit lost made meant met mistaken paid proven put
quit read ridden rung risen run said seen sought sold sent set sewn shaken
shed shone shot shown shrunk shut sung sunk sat slain slept slid spoken sped
spent spilt spun split spread sprung stood stolen stuck stung stridden struck
strung sworn swept swollen swum swung taken taught torn told thought thrown
thrust trodden understood undertaken upheld upset woken worn woven wed wept
won wound withdrawn withheld written born borne overseen overtaken overthrown
rebuilt rewritten retold undone unwound foreseen inlaid mislaid misled
";

/// Formas de *be* e *get* que funcionam como auxiliar passivo
const PASSIVE_AUXILIARIES: &[&str] = &[
    "am", "is", "are", "was", "were", "be", "been", "being", "'s", "'re", "'m",
    "get", "gets", "got", "gotten", "getting",
];

/// Advérbios que podem aparecer entre o auxiliar e o particípio
const INTERVENING_ADVERBS: &[&str] = &[
    "not", "n't", "never", "also", "already", "still", "often", "always", "once",
    "first", "later", "now", "then", "being", "been", "just", "only", "even", "mainly",
    "mostly", "widely", "officially", "originally",
];

/// Número máximo de tokens entre o auxiliar e o particípio
const MAX_INTERVENING: usize = 2;

/// Palavras em `-ed` que não são particípios (adjetivos e substantivos comuns)
const ED_EXCEPTIONS: &[&str] = &[
    "red", "bed", "need", "seed", "feed", "speed", "bred", "shed", "wed", "led",
    "fed", "bled", "sled", "hundred", "indeed", "naked", "sacred", "wicked",
    "beloved", "aged", "learned", "rugged", "ragged", "crooked", "talented",
];

/// Uma correspondência de regra: qual token foi marcado e por qual regra
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleMatch {
    pub token_index: usize,
    pub rule_name: String,
    pub confidence: f64,
}

/// Motor de regras com léxico de particípios irregulares
pub struct PassiveRuleEngine {
    /// Particípios irregulares (lowercase)
    irregular_participles: HashSet<String>,
    /// Particípios regulares: palavra terminada em -ed
    regular_participle: Regex,
    /// Auxiliares passivos (be/get)
    auxiliaries: Vec<String>,
    /// Advérbios tolerados entre auxiliar e particípio
    adverbs: Vec<String>,
}

impl PassiveRuleEngine {
    /// Cria o motor com o léxico embutido.
    pub fn new() -> Self {
        Self::with_lexicon(BUNDLED_LEXICON)
    }

    /// Cria o motor com um léxico no formato de texto (palavras separadas por espaço
    /// ou quebra de linha, `#` inicia comentário).
    pub fn with_lexicon(lexicon: &str) -> Self {
        let irregular_participles = parse_lexicon(lexicon);
        Self {
            irregular_participles,
            regular_participle: Regex::new(r"^[a-z]+ed$").expect("regex estática válida"),
            auxiliaries: PASSIVE_AUXILIARIES.iter().map(|s| s.to_string()).collect(),
            adverbs: INTERVENING_ADVERBS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Carrega o léxico de um arquivo.
    ///
    /// Se o arquivo não existir, o léxico embutido é instalado naquele caminho e a
    /// leitura é tentada **uma** única vez mais. Qualquer falha após isso é propagada.
    pub fn from_lexicon_file(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Self::with_lexicon(&content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "Léxico não encontrado em {}; instalando o léxico embutido",
                    path.display()
                );
                install_bundled_lexicon(path)?;
                let content = std::fs::read_to_string(path).map_err(|source| {
                    DatasetError::ModelLoad {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                Ok(Self::with_lexicon(&content))
            }
            Err(source) => Err(DatasetError::ModelLoad {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn lexicon_size(&self) -> usize {
        self.irregular_participles.len()
    }

    pub fn add_participle(&mut self, word: &str) {
        self.irregular_participles.insert(word.to_lowercase());
    }

    /// O token (lowercase) é um particípio passado?
    pub fn is_participle(&self, lower: &str) -> bool {
        if self.irregular_participles.contains(lower) {
            return true;
        }
        self.regular_participle.is_match(lower) && !ED_EXCEPTIONS.contains(&lower)
    }

    /// Aplica todas as regras à sequência de tokens de uma sentença.
    pub fn apply(&self, tokens: &[Token]) -> Vec<RuleMatch> {
        let lowered: Vec<String> = tokens.iter().map(Token::lower).collect();
        let mut matches = Vec::new();

        for (i, word) in lowered.iter().enumerate() {
            if !self.auxiliaries.contains(word) {
                continue;
            }

            // 1. auxpass: auxiliar + até MAX_INTERVENING advérbios + particípio
            let Some(participle) = self.find_participle_after(&lowered, i) else {
                continue;
            };
            matches.push(RuleMatch {
                token_index: participle,
                rule_name: "auxpass".to_string(),
                confidence: 0.85,
            });

            // 2. agent: "by" logo após o particípio
            if lowered.get(participle + 1).map(|w| w == "by").unwrap_or(false) {
                matches.push(RuleMatch {
                    token_index: participle + 1,
                    rule_name: "agent".to_string(),
                    confidence: 0.95,
                });
            }

            // 3. nsubjpass: palavra antes do auxiliar
            if i > 0 && tokens[i - 1].is_word() && !self.auxiliaries.contains(&lowered[i - 1]) {
                matches.push(RuleMatch {
                    token_index: i - 1,
                    rule_name: "nsubjpass".to_string(),
                    confidence: 0.60,
                });
            }
        }

        matches
    }

    /// Uma sentença é passiva se alguma regra `auxpass` disparou.
    pub fn is_passive(&self, tokens: &[Token]) -> bool {
        let matches = self.apply(tokens);
        let passive = matches.iter().any(|m| m.rule_name == "auxpass");
        debug!(rules = matches.len(), passive, "regras de voz aplicadas");
        passive
    }

    fn find_participle_after(&self, lowered: &[String], aux: usize) -> Option<usize> {
        for offset in 1..=MAX_INTERVENING + 1 {
            let j = aux + offset;
            let word = lowered.get(j)?;
            if self.is_participle(word) {
                return Some(j);
            }
            if !self.is_intervening(word) {
                return None;
            }
        }
        None
    }

    fn is_intervening(&self, word: &str) -> bool {
        self.adverbs.iter().any(|a| a == word) || (word.len() > 4 && word.ends_with("ly"))
    }
}

impl Default for PassiveRuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_lexicon(lexicon: &str) -> HashSet<String> {
    lexicon
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .flat_map(str::split_whitespace)
        .map(str::to_lowercase)
        .collect()
}

fn install_bundled_lexicon(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DatasetError::io(parent, e))?;
    }
    std::fs::write(path, BUNDLED_LEXICON).map_err(|e| DatasetError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn passive(text: &str) -> bool {
        PassiveRuleEngine::new().is_passive(&tokenize(text))
    }

    #[test]
    fn test_simple_passive() {
        assert!(passive("The bridge was built in 1990."));
        assert!(passive("Alan Bean was born in Wheeler, Texas."));
        assert!(passive("The book was written by Orwell."));
    }

    #[test]
    fn test_simple_active() {
        assert!(!passive("Smith built the bridge in 1990."));
        assert!(!passive("The runway is 3000 metres long."));
        assert!(!passive("Alan Bean is a test pilot."));
    }

    #[test]
    fn test_regular_participle_with_adverb() {
        assert!(passive("The airport is also operated by the city."));
        assert!(passive("The dish is mainly served cold."));
    }

    #[test]
    fn test_ed_exception_is_not_participle() {
        assert!(!passive("The car is red."));
    }

    #[test]
    fn test_contracted_auxiliary() {
        assert!(passive("It's been renamed twice."));
    }

    #[test]
    fn test_agent_and_nsubjpass_matches() {
        let engine = PassiveRuleEngine::new();
        let tokens = tokenize("The book was written by Orwell.");
        let matches = engine.apply(&tokens);
        let names: Vec<&str> = matches.iter().map(|m| m.rule_name.as_str()).collect();
        assert_eq!(names, vec!["auxpass", "agent", "nsubjpass"]);
        assert_eq!(matches[0].token_index, 3);
        assert_eq!(matches[2].token_index, 1);
    }

    #[test]
    fn test_custom_lexicon() {
        let mut engine = PassiveRuleEngine::with_lexicon("# vazio\n");
        assert_eq!(engine.lexicon_size(), 0);
        assert!(!engine.is_passive(&tokenize("The bridge was built.")));
        engine.add_participle("Built");
        assert!(engine.is_passive(&tokenize("The bridge was built.")));
    }

    #[test]
    fn test_missing_lexicon_file_is_installed_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models").join("participles.txt");
        let engine = PassiveRuleEngine::from_lexicon_file(&path).unwrap();
        assert!(path.exists());
        assert_eq!(engine.lexicon_size(), PassiveRuleEngine::new().lexicon_size());
    }

    #[test]
    fn test_existing_lexicon_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("participles.txt");
        std::fs::write(&path, "built\nsung # comentário\n").unwrap();
        let engine = PassiveRuleEngine::from_lexicon_file(&path).unwrap();
        assert_eq!(engine.lexicon_size(), 2);
    }

    #[test]
    fn test_unreadable_lexicon_is_model_load_error() {
        let dir = tempfile::tempdir().unwrap();
        // um diretório não pode ser lido como arquivo
        let err = PassiveRuleEngine::from_lexicon_file(dir.path()).err().unwrap();
        assert!(matches!(err, DatasetError::ModelLoad { .. }));
    }
}
