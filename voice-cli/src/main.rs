//! CLI que gera os splits train/dev/test do dataset de voz ativa/passiva

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use voice_core::{driver, DatasetConfig, LabelMode, RuleBasedOracle};

/// Modo de construção (espelha `LabelMode` para o clap)
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMode {
    /// Amostras distintas ativo/passivo, balanceadas
    Distinct,
    /// Amostras com pares ativo/passivo (aprendizado contrastivo)
    Mixed,
}

impl From<CliMode> for LabelMode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Distinct => LabelMode::Distinct,
            CliMode::Mixed => LabelMode::Mixed,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "voice-dataset", version, about = "Cria o subconjunto ativo/passivo de um corpus WebNLG")]
struct Cli {
    /// Arquivo JSON de configuração (os argumentos abaixo têm precedência)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Diretório com os arquivos de entrada
    #[arg(long)]
    input_path: Option<PathBuf>,

    /// Diretório onde os arquivos criados serão gravados
    #[arg(long)]
    output_path: Option<PathBuf>,

    /// Quantidade de amostras de treino
    #[arg(long)]
    train_size: Option<usize>,

    /// Quantidade de amostras de validação
    #[arg(long)]
    dev_size: Option<usize>,

    /// Quantidade de amostras de teste
    #[arg(long)]
    test_size: Option<usize>,

    /// Semente do gerador aleatório
    #[arg(long)]
    seed: Option<u64>,

    /// Amostras distintas ou mistas
    #[arg(long = "type", value_enum)]
    mode: Option<CliMode>,

    /// Léxico de particípios irregulares (instalado se não existir)
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Processa os três splits em paralelo
    #[arg(long)]
    parallel_splits: bool,

    /// Desativa a barra de progresso
    #[arg(long)]
    no_progress: bool,

    /// Grava o resumo da execução em JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// Nível de log quando RUST_LOG não está definido
    #[arg(long, default_value = "info", env = "VOICE_LOG_LEVEL")]
    log_level: String,
}

impl Cli {
    /// Monta a configuração final: arquivo (ou padrão) + argumentos.
    fn into_config(self) -> Result<(DatasetConfig, Option<PathBuf>)> {
        let mut config = match &self.config {
            Some(path) => DatasetConfig::from_json_file(path)
                .with_context(|| format!("lendo configuração {}", path.display()))?,
            None => DatasetConfig::default(),
        };

        if let Some(path) = self.input_path {
            config.input_path = path;
        }
        if let Some(path) = self.output_path {
            config.output_path = path;
        }
        if let Some(size) = self.train_size {
            config.train_size = size;
        }
        if let Some(size) = self.dev_size {
            config.dev_size = size;
        }
        if let Some(size) = self.test_size {
            config.test_size = size;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        if self.lexicon.is_some() {
            config.lexicon_path = self.lexicon;
        }
        config.parallel_splits |= self.parallel_splits;
        if self.no_progress {
            config.progress = false;
        }

        Ok((config, self.report))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let (config, report_path) = cli.into_config()?;

    let oracle = RuleBasedOracle::load(config.lexicon_path.as_deref())
        .context("carregando o detector de voz passiva")?;
    info!(
        participles = oracle.engine().lexicon_size(),
        "Detector de voz passiva carregado"
    );

    let report = driver::run(&config, &oracle).context("construção do dataset falhou")?;

    info!(
        total = report.total_written(),
        incomplete_splits = report.shortfalls().count(),
        "✅ Dataset gravado em {}",
        config.output_path.display()
    );

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, json)
            .with_context(|| format!("gravando relatório {}", path.display()))?;
    }

    Ok(())
}
