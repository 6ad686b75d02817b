//! # Divisor Balanceado
//!
//! Coração do sistema: recebe os registros rotulados (na ordem das entradas
//! originais) e um tamanho alvo, e produz a sequência final de um split.
//!
//! ## Modo Distinct — procedimento em duas fases
//!
//! 1. **Acumulação**: percorre os registros mantendo os contadores `a`/`p`.
//!    Um registro entra se o contador da sua classe ainda está abaixo de
//!    `alvo / 2` (divisão real). A varredura para assim que **as duas** classes
//!    atingem `alvo / 2`.
//! 2. **Corte** (só se a entrada acabou antes da parada): a classe majoritária
//!    perde registros do **fim** para o início até os contadores empatarem.
//!    Os exemplos mais antigos de cada classe são preservados.
//!
//! Com alvo ímpar cada classe chega a `ceil(alvo / 2)`, então um split
//! completo tem `alvo + 1` registros.
//!
//! ```text
//! entrada:  A1 A2 A3 P1        alvo = 4
//! acumula:  A1 A2 P1           (A3 ignorado: a = 2 já atingiu 4/2)
//! corte:    A1 P1              (A2 removido, vindo do fim)
//! ```
//!
//! ## Modo Mixed
//!
//! Sem balanceamento: os registros entram na ordem até `alvo` ou até acabar a entrada.

use serde::Serialize;
use tracing::debug;

use crate::labeler::LabelMode;
use crate::lexicalisation::{LabeledRecord, VoiceClass};

/// Um registro com seu índice 1-based no dataset de saída.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedRecord {
    pub index: usize,
    pub record: LabeledRecord,
}

/// Contadores por classe (`a` e `p`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassCounts {
    pub active: usize,
    pub passive: usize,
}

impl ClassCounts {
    pub fn get(&self, class: VoiceClass) -> usize {
        match class {
            VoiceClass::Active => self.active,
            VoiceClass::Passive => self.passive,
        }
    }

    fn get_mut(&mut self, class: VoiceClass) -> &mut usize {
        match class {
            VoiceClass::Active => &mut self.active,
            VoiceClass::Passive => &mut self.passive,
        }
    }

    pub fn total(&self) -> usize {
        self.active + self.passive
    }
}

/// Estado da fase de acumulação.
#[derive(Debug, Default)]
struct SplitAccumulator {
    counts: ClassCounts,
    output: Vec<IndexedRecord>,
}

impl SplitAccumulator {
    fn push(&mut self, class: VoiceClass, record: LabeledRecord) {
        let index = self.counts.total() + 1;
        self.output.push(IndexedRecord { index, record });
        *self.counts.get_mut(class) += 1;
    }

    /// Renumera os registros sobreviventes com `1..N`.
    fn renumber(&mut self) {
        for (i, item) in self.output.iter_mut().enumerate() {
            item.index = i + 1;
        }
    }
}

/// Como a fase de acumulação terminou.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanEnd {
    /// As duas classes atingiram `alvo / 2`.
    Filled,
    /// A entrada acabou antes.
    Exhausted,
}

/// Resultado do divisor para um split.
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    pub records: Vec<IndexedRecord>,
    /// Contadores finais (após o corte). Zerados no modo Mixed.
    pub counts: ClassCounts,
    /// Registros removidos pelo corte.
    pub trimmed: usize,
    /// A entrada acabou antes de a condição de parada disparar.
    pub exhausted: bool,
    /// Registros candidatos recebidos.
    pub candidates: usize,
    pub target_size: usize,
}

impl SplitOutcome {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Quantos registros faltaram para o alvo, se faltaram.
    pub fn shortfall(&self) -> Option<usize> {
        (self.len() < self.target_size).then(|| self.target_size - self.len())
    }
}

/// Aplica o divisor do modo indicado.
pub fn balanced_split(
    records: Vec<LabeledRecord>,
    target_size: usize,
    mode: LabelMode,
) -> SplitOutcome {
    match mode {
        LabelMode::Distinct => split_distinct(records, target_size),
        LabelMode::Mixed => split_mixed(records, target_size),
    }
}

/// Divisor balanceado do modo Distinct (acumula, depois corta se necessário).
pub fn split_distinct(records: Vec<LabeledRecord>, target_size: usize) -> SplitOutcome {
    let candidates = records.len();
    let (mut acc, end) = accumulate(records, target_size);

    let trimmed = match end {
        ScanEnd::Filled => 0,
        ScanEnd::Exhausted => trim_majority(&mut acc),
    };
    acc.renumber();

    SplitOutcome {
        records: acc.output,
        counts: acc.counts,
        trimmed,
        exhausted: end == ScanEnd::Exhausted,
        candidates,
        target_size,
    }
}

/// Fase 1: acumula registros enquanto a classe de cada um tiver vaga.
fn accumulate(records: Vec<LabeledRecord>, target_size: usize) -> (SplitAccumulator, ScanEnd) {
    let half = target_size as f64 / 2.0;
    let mut acc = SplitAccumulator::default();

    for record in records {
        if acc.counts.active as f64 >= half && acc.counts.passive as f64 >= half {
            return (acc, ScanEnd::Filled);
        }
        // Registros sem classe única não participam do balanceamento
        let Some(class) = record.class() else {
            continue;
        };
        if (acc.counts.get(class) as f64) < half {
            acc.push(class, record);
        }
    }

    (acc, ScanEnd::Exhausted)
}

/// Fase 2: remove registros da classe majoritária, do fim para o início,
/// até empatar os contadores. Retorna quantos foram removidos.
fn trim_majority(acc: &mut SplitAccumulator) -> usize {
    let (smaller, larger) = if acc.counts.active < acc.counts.passive {
        (VoiceClass::Active, VoiceClass::Passive)
    } else {
        (VoiceClass::Passive, VoiceClass::Active)
    };
    let mut excess = acc.counts.get(larger) - acc.counts.get(smaller);
    let mut removed = 0;
    let mut i = acc.output.len();

    while excess > 0 && i > 0 {
        i -= 1;
        if acc.output[i].record.class() != Some(larger) {
            continue;
        }
        let dropped = acc.output.remove(i);
        debug!(
            index = dropped.index,
            original_idx = dropped.record.original_idx(),
            class = larger.short_name(),
            "registro removido no corte"
        );
        *acc.counts.get_mut(larger) -= 1;
        excess -= 1;
        removed += 1;
    }

    removed
}

/// Divisor do modo Mixed: primeiros `target_size` registros, em ordem.
pub fn split_mixed(records: Vec<LabeledRecord>, target_size: usize) -> SplitOutcome {
    let candidates = records.len();
    let exhausted = candidates <= target_size;
    let records: Vec<IndexedRecord> = records
        .into_iter()
        .take(target_size)
        .enumerate()
        .map(|(j, record)| IndexedRecord {
            index: j + 1,
            record,
        })
        .collect();

    SplitOutcome {
        records,
        counts: ClassCounts::default(),
        trimmed: 0,
        exhausted,
        candidates,
        target_size,
    }
}
