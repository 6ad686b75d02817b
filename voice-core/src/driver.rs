//! # Orquestrador dos Splits
//!
//! Para cada split (`train`, `dev`, `test`), de forma independente:
//!
//! 1. Recusa rodar se o arquivo de destino já existe (antes de qualquer escrita).
//! 2. Lê as entradas do arquivo de origem.
//! 3. Rotula todas as entradas ([`crate::labeler`]).
//! 4. Aplica o divisor balanceado ([`crate::splitter`]).
//! 5. Avisa (sem falhar) se o split ficou menor que o pedido.
//! 6. Cria o diretório de saída e grava o arquivo.
//!
//! Nenhum estado é compartilhado entre splits, por isso o modo
//! `parallel_splits` pode processá-los no pool do Rayon.

use std::path::PathBuf;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::DatasetConfig;
use crate::dataset::{load_entries, save_dataset, total_lexicalisations};
use crate::error::{DatasetError, Result};
use crate::labeler::label_entries;
use crate::splitter::{balanced_split, ClassCounts};
use crate::voice::VoiceOracle;

/// Os três splits, na ordem em que são processados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    Train,
    Dev,
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Dev, Split::Test];

    pub fn name(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Dev => "dev",
            Split::Test => "test",
        }
    }

    /// Nome do arquivo, igual na origem e no destino.
    pub fn file_name(&self) -> &'static str {
        match self {
            Split::Train => "train.json",
            Split::Dev => "dev.json",
            Split::Test => "test.json",
        }
    }

    /// Tamanho alvo do split segundo a configuração.
    pub fn target_size(&self, config: &DatasetConfig) -> usize {
        match self {
            Split::Train => config.train_size,
            Split::Dev => config.dev_size,
            Split::Test => config.test_size,
        }
    }
}

/// Resumo de um split gravado.
#[derive(Debug, Clone, Serialize)]
pub struct SplitReport {
    pub split: Split,
    pub output_file: PathBuf,
    pub requested: usize,
    pub written: usize,
    /// Registros rotulados disponíveis antes do divisor.
    pub candidates: usize,
    pub counts: ClassCounts,
    pub trimmed: usize,
    /// Quantos registros faltaram para o tamanho pedido.
    pub shortfall: Option<usize>,
}

/// Resumo de uma execução completa.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub seed: u64,
    pub splits: Vec<SplitReport>,
}

impl RunReport {
    pub fn total_written(&self) -> usize {
        self.splits.iter().map(|s| s.written).sum()
    }

    /// Splits que não atingiram o tamanho pedido.
    pub fn shortfalls(&self) -> impl Iterator<Item = &SplitReport> {
        self.splits.iter().filter(|s| s.shortfall.is_some())
    }
}

/// Executa os três splits.
///
/// No modo sequencial a execução para no primeiro erro; os splits anteriores
/// já gravados permanecem.
pub fn run<O>(config: &DatasetConfig, oracle: &O) -> Result<RunReport>
where
    O: VoiceOracle + Sync + ?Sized,
{
    config.validate()?;
    info!(
        seed = config.seed,
        mode = config.mode.name(),
        input = %config.input_path.display(),
        output = %config.output_path.display(),
        "Iniciando construção do dataset ativo/passivo"
    );

    // Uma única área de desenho para as barras dos três splits
    let multi_progress = MultiProgress::new();
    let splits = if config.parallel_splits {
        Split::ALL
            .par_iter()
            .map(|split| run_split_with_progress(config, *split, oracle, &multi_progress))
            .collect::<Result<Vec<_>>>()?
    } else {
        Split::ALL
            .iter()
            .map(|split| run_split_with_progress(config, *split, oracle, &multi_progress))
            .collect::<Result<Vec<_>>>()?
    };

    Ok(RunReport {
        seed: config.seed,
        splits,
    })
}

/// Executa um único split.
pub fn run_split<O>(config: &DatasetConfig, split: Split, oracle: &O) -> Result<SplitReport>
where
    O: VoiceOracle + ?Sized,
{
    run_split_with_progress(config, split, oracle, &MultiProgress::new())
}

fn run_split_with_progress<O>(
    config: &DatasetConfig,
    split: Split,
    oracle: &O,
    multi_progress: &MultiProgress,
) -> Result<SplitReport>
where
    O: VoiceOracle + ?Sized,
{
    let destination = config.output_path.join(split.file_name());
    if destination.exists() {
        return Err(DatasetError::OutputExists { path: destination });
    }

    let target_size = split.target_size(config);
    let entries = load_entries(&config.input_path.join(split.file_name()))?;
    let total_lexs = total_lexicalisations(&entries);
    info!(
        split = split.name(),
        entries = entries.len(),
        lexicalisations = total_lexs,
        target_size,
        "Split carregado"
    );

    let progress = progress_bar(
        multi_progress,
        config.progress,
        total_lexs as u64,
        split.file_name(),
    );
    let records = label_entries(&entries, config.mode, oracle, |n| progress.inc(n as u64))?;
    progress.finish_and_clear();

    let outcome = balanced_split(records, target_size, config.mode);
    if let Some(missing) = outcome.shortfall() {
        warn!(
            split = split.name(),
            missing,
            "Número de amostras pedido {} não disponível. Obtido {}",
            target_size,
            outcome.len()
        );
    }

    std::fs::create_dir_all(&config.output_path)
        .map_err(|e| DatasetError::io(&config.output_path, e))?;
    save_dataset(&destination, &outcome.records)?;

    info!(
        split = split.name(),
        written = outcome.len(),
        active = outcome.counts.active,
        passive = outcome.counts.passive,
        trimmed = outcome.trimmed,
        "Split gravado em {}",
        destination.display()
    );

    Ok(SplitReport {
        split,
        output_file: destination,
        requested: target_size,
        written: outcome.len(),
        candidates: outcome.candidates,
        counts: outcome.counts,
        trimmed: outcome.trimmed,
        shortfall: outcome.shortfall(),
    })
}

fn progress_bar(
    multi_progress: &MultiProgress,
    enabled: bool,
    len: u64,
    label: &'static str,
) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let style = ProgressStyle::with_template("{msg:>10} [{bar:40}] {pos}/{len} lexicalizações")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    let bar = multi_progress.add(ProgressBar::new(len).with_style(style));
    bar.set_message(label);
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeler::LabelMode;
    use crate::voice::stub::MarkerOracle;
    use indicatif::ProgressDrawTarget;
    use serde_json::{json, Value};
    use std::path::Path;

    /// Grava um arquivo de split com uma entrada por grupo de lexicalizações.
    fn write_split(dir: &Path, file: &str, groups: &[&[&str]]) {
        let entries: Vec<Value> = groups
            .iter()
            .enumerate()
            .map(|(i, lexs)| {
                let lexs: Vec<Value> = lexs.iter().map(|l| json!({ "lex": l })).collect();
                json!({ (i + 1).to_string(): { "category": "Test", "lexicalisations": lexs } })
            })
            .collect();
        std::fs::write(dir.join(file), json!({ "entries": entries }).to_string()).unwrap();
    }

    fn setup(groups: &[&[&str]]) -> (tempfile::TempDir, DatasetConfig) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        std::fs::create_dir_all(&input).unwrap();
        for split in Split::ALL {
            write_split(&input, split.file_name(), groups);
        }
        let config = DatasetConfig {
            input_path: input,
            output_path: dir.path().join("out"),
            progress: false,
            ..Default::default()
        };
        (dir, config)
    }

    fn read_output(config: &DatasetConfig, split: Split) -> Vec<(String, Value)> {
        let text = std::fs::read_to_string(config.output_path.join(split.file_name())).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        value["entries"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| {
                let (k, v) = e.as_object().unwrap().iter().next().unwrap();
                (k.clone(), v.clone())
            })
            .collect()
    }

    #[test]
    fn test_run_writes_three_balanced_splits() {
        let (_dir, config) = setup(&[
            &["A1.", "P1 [P]."],
            &["A2.", "A3.", "Mixed [P]. Voice."],
            &["P2 [P].", "A4."],
        ]);
        let config = DatasetConfig {
            train_size: 4,
            ..config
        };
        let report = run(&config, &MarkerOracle).unwrap();

        assert_eq!(report.splits.len(), 3);
        assert_eq!(report.splits[0].written, 4);
        assert_eq!(report.splits[0].shortfall, None);

        let train = read_output(&config, Split::Train);
        let keys: Vec<&str> = train.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["1", "2", "3", "4"]);
        let lexs: Vec<&str> = train
            .iter()
            .map(|(_, v)| v["lexicalisations"][0]["lex"].as_str().unwrap())
            .collect();
        assert_eq!(lexs, vec!["A1.", "P1 [P].", "A2.", "P2 [P]."]);
        let original: Vec<&str> = train.iter().map(|(_, v)| v["originalIdx"].as_str().unwrap()).collect();
        assert_eq!(original, vec!["1", "1", "2", "3"]);

        // dev/test com tamanho padrão: corte a partir do fim deixa 2 + 2
        let dev = &report.splits[1];
        assert_eq!(dev.counts, ClassCounts { active: 2, passive: 2 });
        assert_eq!(dev.trimmed, 2);
        assert_eq!(dev.shortfall, Some(99999 - 4));
    }

    #[test]
    fn test_existing_output_is_never_overwritten() {
        for blocked in Split::ALL {
            let (_dir, config) = setup(&[&["A.", "P [P]."]]);
            std::fs::create_dir_all(&config.output_path).unwrap();
            let existing = config.output_path.join(blocked.file_name());
            std::fs::write(&existing, "keep me").unwrap();

            let err = run(&config, &MarkerOracle).unwrap_err();
            assert!(matches!(err, DatasetError::OutputExists { .. }));
            assert_eq!(std::fs::read_to_string(&existing).unwrap(), "keep me");
        }
    }

    #[test]
    fn test_shortfall_is_a_warning_not_an_error() {
        let groups: Vec<Vec<&str>> = (0..5).map(|_| vec!["A.", "P [P]."]).collect();
        let groups: Vec<&[&str]> = groups.iter().map(|g| g.as_slice()).collect();
        let (_dir, config) = setup(&groups);
        let config = DatasetConfig {
            train_size: 1000,
            ..config
        };
        let report = run_split(&config, Split::Train, &MarkerOracle).unwrap();
        assert_eq!(report.written, 10);
        assert_eq!(report.shortfall, Some(990));
        assert!(config.output_path.join("train.json").exists());
    }

    #[test]
    fn test_mixed_mode_takes_entries_in_order() {
        let (_dir, config) = setup(&[
            &["A1.", "P1 [P]."],
            &["A2.", "A3."],
            &["A4.", "P2 [P].", "A5."],
            &["A6.", "P3 [P]."],
            &["A7.", "P4 [P]."],
        ]);
        let config = DatasetConfig {
            mode: LabelMode::Mixed,
            train_size: 2,
            ..config
        };
        let report = run_split(&config, Split::Train, &MarkerOracle).unwrap();
        assert_eq!(report.written, 2);

        let train = read_output(&config, Split::Train);
        assert_eq!(train[0].1["originalIdx"], "1");
        assert_eq!(train[1].1["originalIdx"], "3");
        assert_eq!(train[1].1["active_lexicalisations"].as_array().unwrap().len(), 2);
        assert_eq!(train[1].1["passive_lexicalisations"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_parallel_splits_match_sequential() {
        let groups: &[&[&str]] = &[&["A1.", "P1 [P]."], &["A2.", "A3.", "P2 [P]."]];
        let (_dir_a, sequential) = setup(groups);
        let (_dir_b, parallel) = setup(groups);
        let parallel = DatasetConfig {
            parallel_splits: true,
            ..parallel
        };

        run(&sequential, &MarkerOracle).unwrap();
        run(&parallel, &MarkerOracle).unwrap();
        for split in Split::ALL {
            assert_eq!(read_output(&sequential, split), read_output(&parallel, split));
        }
    }

    #[test]
    fn test_zero_size_writes_empty_split() {
        let (_dir, config) = setup(&[&["A1.", "P1 [P]."], &["A2.", "P2 [P]."]]);
        let config = DatasetConfig {
            dev_size: 0,
            ..config
        };
        let report = run(&config, &MarkerOracle).unwrap();

        let dev = &report.splits[1];
        assert_eq!(dev.split, Split::Dev);
        assert_eq!(dev.written, 0);
        assert_eq!(dev.shortfall, None);
        assert!(read_output(&config, Split::Dev).is_empty());
        assert_eq!(report.splits[0].written, 4);
    }

    #[test]
    fn test_progress_bars_share_one_multi_progress() {
        let multi_progress = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        let bars: Vec<ProgressBar> = Split::ALL
            .iter()
            .map(|split| progress_bar(&multi_progress, true, 10, split.file_name()))
            .collect();
        for bar in &bars {
            assert_eq!(bar.length(), Some(10));
        }
        bars[1].inc(3);
        assert_eq!(bars[1].position(), 3);
        assert_eq!(bars[0].position(), 0);

        let hidden = progress_bar(&multi_progress, false, 10, "train.json");
        assert!(hidden.is_hidden());
    }

    #[test]
    fn test_missing_input_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatasetConfig {
            input_path: dir.path().join("nothing"),
            output_path: dir.path().join("out"),
            progress: false,
            ..Default::default()
        };
        let err = run(&config, &MarkerOracle).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
        assert!(!config.output_path.join("train.json").exists());
    }
}
