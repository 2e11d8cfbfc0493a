//! # Transdutor — Motor de Execução
//!
//! O [`Transducer`] é um **cursor** sobre uma [`AutomatonTable`] compartilhada:
//! guarda o estado atual, o buffer de tokens consumidos e o rótulo pendente.
//!
//! ## Algoritmo (um passo por token)
//!
//! 1. Tenta casar o token a partir do estado atual.
//! 2. **Casou**: avança, acrescenta o token ao buffer e, se a transição tiver
//!    rótulo, ele sobrescreve o rótulo pendente.
//! 3. **Não casou**:
//!    - se o buffer tem tokens **e** um rótulo, emite o trecho (*flush*);
//!      um buffer sem rótulo é descartado em silêncio;
//!    - volta ao estado inicial com buffer vazio;
//!    - tenta o **mesmo** token mais uma única vez a partir do estado inicial.
//!      Se falhar de novo, o token é descartado e o próximo começa do zero.
//!
//! Ao fim da entrada, o buffer restante é emitido pela mesma regra.
//!
//! Estados marcados como finais **não** encerram o casamento: o flush só
//! acontece numa falha de transição ou no fim da entrada.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use ner_fst_core::{AutomatonTable, TransducerConfig, Transducer};
//!
//! let table = AutomatonTable::build(&TransducerConfig::reference()).unwrap();
//! let mut transducer = Transducer::new(&table);
//!
//! let spans = transducer.process_text("Contact john@example.com today");
//! assert_eq!(spans.len(), 1);
//! assert_eq!(spans[0].text, "john@example.com");
//! assert_eq!(spans[0].label, "EMAIL");
//! ```

use std::sync::mpsc;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::automaton::AutomatonTable;
use crate::state::StateId;
use crate::tokenizer::{tokenize, Token};

/// Um trecho rotulado extraído do texto.
///
/// `text` são os tokens consumidos unidos por um espaço simples; `label` é o
/// último rótulo presente no caminho percorrido.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledSpan {
    pub text: String,
    pub label: String,
    /// Índice do primeiro token (inclusivo)
    pub start_token: usize,
    /// Índice do último token (inclusivo)
    pub end_token: usize,
    /// Offset de byte inicial no texto original
    pub start: usize,
    /// Offset de byte final no texto original
    pub end: usize,
}

/// Eventos emitidos durante o processamento.
///
/// Permitem que a interface visualize o percurso do cursor passo a passo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EngineEvent {
    /// Entrada tokenizada.
    TokenizationDone { tokens: Vec<Token>, total: usize },
    /// O token casou e o cursor avançou de estado.
    Advanced {
        token_index: usize,
        token_text: String,
        from: String,
        to: String,
        label: Option<String>,
    },
    /// Um trecho rotulado foi emitido.
    Flushed { span: LabeledSpan },
    /// O buffer foi descartado por nunca ter recebido rótulo.
    Discarded { tokens: Vec<String> },
    /// Após o reset, o mesmo token é tentado de novo no estado inicial.
    Retried { token_index: usize, token_text: String },
    /// A nova tentativa também falhou; o token não entra em nenhum trecho.
    TokenDropped { token_index: usize, token_text: String },
    /// Fim do processamento.
    Done {
        spans: Vec<LabeledSpan>,
        total_tokens: usize,
        processing_ms: u64,
    },
}

fn emit(tx: Option<&mpsc::Sender<EngineEvent>>, event: impl FnOnce() -> EngineEvent) {
    if let Some(tx) = tx {
        let _ = tx.send(event());
    }
}

/// Cursor de execução sobre uma tabela compartilhada.
///
/// Não deve ser usado por duas chamadas simultâneas; para processar em paralelo
/// crie um cursor por thread (ver [`process_batch`]).
pub struct Transducer<'a> {
    table: &'a AutomatonTable,
    current: StateId,
    buffer: Vec<Token>,
    pending_label: Option<&'a str>,
}

impl<'a> Transducer<'a> {
    pub fn new(table: &'a AutomatonTable) -> Self {
        Self {
            table,
            current: table.initial(),
            buffer: vec![],
            pending_label: None,
        }
    }

    pub fn table(&self) -> &'a AutomatonTable {
        self.table
    }

    pub fn current_state(&self) -> StateId {
        self.current
    }

    pub fn buffer(&self) -> &[Token] {
        &self.buffer
    }

    pub fn pending_label(&self) -> Option<&'a str> {
        self.pending_label
    }

    /// Volta para `(estado inicial, buffer vazio, sem rótulo)`.
    pub fn reset(&mut self) {
        self.current = self.table.initial();
        self.buffer.clear();
        self.pending_label = None;
    }

    /// Extrai os trechos rotulados de `text`, na ordem em que aparecem.
    ///
    /// O cursor é reiniciado no começo de cada chamada, então o resultado não
    /// depende de chamadas anteriores.
    pub fn process_text(&mut self, text: &str) -> Vec<LabeledSpan> {
        self.run(text, None)
    }

    /// Igual a [`process_text`](Self::process_text), mas também envia cada
    /// passo do cursor pelo canal `tx`.
    ///
    /// # Fluxo de Eventos
    /// 1. `TokenizationDone`
    /// 2. Por token: `Advanced`, ou `Flushed`/`Discarded` + `Retried` + (`Advanced` | `TokenDropped`)
    /// 3. `Flushed`/`Discarded` final, se houver buffer
    /// 4. `Done`
    pub fn process_streaming(&mut self, text: &str, tx: mpsc::Sender<EngineEvent>) -> Vec<LabeledSpan> {
        self.run(text, Some(&tx))
    }

    fn run(&mut self, text: &str, tx: Option<&mpsc::Sender<EngineEvent>>) -> Vec<LabeledSpan> {
        let start = Instant::now();
        self.reset();

        let tokens = tokenize(text);
        emit(tx, || EngineEvent::TokenizationDone {
            tokens: tokens.clone(),
            total: tokens.len(),
        });

        let mut spans = Vec::new();
        for token in &tokens {
            if self.advance(token, tx) {
                continue;
            }

            self.flush(&mut spans, tx);

            // Uma única nova tentativa, a partir do estado inicial
            emit(tx, || EngineEvent::Retried {
                token_index: token.index,
                token_text: token.text.clone(),
            });
            if !self.advance(token, tx) {
                debug!(token = %token.text, index = token.index, "token descartado");
                emit(tx, || EngineEvent::TokenDropped {
                    token_index: token.index,
                    token_text: token.text.clone(),
                });
            }
        }
        self.flush(&mut spans, tx);

        emit(tx, || EngineEvent::Done {
            spans: spans.clone(),
            total_tokens: tokens.len(),
            processing_ms: start.elapsed().as_millis() as u64,
        });
        spans
    }

    /// Tenta uma transição a partir do estado atual. Retorna `false` se nenhuma casar.
    fn advance(&mut self, token: &Token, tx: Option<&mpsc::Sender<EngineEvent>>) -> bool {
        let table = self.table;
        let from = table.state(self.current);
        let Some((next, label)) = from.match_token(&token.text) else {
            return false;
        };

        trace!(token = %token.text, from = from.name(), to = table.state(next).name(), "transição");
        emit(tx, || EngineEvent::Advanced {
            token_index: token.index,
            token_text: token.text.clone(),
            from: from.name().to_string(),
            to: table.state(next).name().to_string(),
            label: label.map(str::to_string),
        });

        self.current = next;
        self.buffer.push(token.clone());
        if label.is_some() {
            self.pending_label = label;
        }
        true
    }

    /// Emite o buffer se ele tiver rótulo e reinicia o cursor em qualquer caso.
    fn flush(&mut self, spans: &mut Vec<LabeledSpan>, tx: Option<&mpsc::Sender<EngineEvent>>) {
        if let (Some(first), Some(last)) = (self.buffer.first(), self.buffer.last()) {
            match self.pending_label {
                Some(label) => {
                    let span = LabeledSpan {
                        text: self
                            .buffer
                            .iter()
                            .map(|t| t.text.as_str())
                            .collect::<Vec<_>>()
                            .join(" "),
                        label: label.to_string(),
                        start_token: first.index,
                        end_token: last.index,
                        start: first.start,
                        end: last.end,
                    };
                    debug!(text = %span.text, label, "trecho emitido");
                    emit(tx, || EngineEvent::Flushed { span: span.clone() });
                    spans.push(span);
                }
                None => {
                    trace!(tokens = self.buffer.len(), "buffer sem rótulo descartado");
                    emit(tx, || EngineEvent::Discarded {
                        tokens: self.buffer.iter().map(|t| t.text.clone()).collect(),
                    });
                }
            }
        }
        self.reset();
    }
}

/// Processa vários textos em paralelo (Rayon), um cursor novo por texto.
///
/// A tabela é apenas lida, então todas as threads a compartilham.
/// O resultado mantém a ordem de `texts`.
pub fn process_batch<S>(table: &AutomatonTable, texts: &[S]) -> Vec<Vec<LabeledSpan>>
where
    S: AsRef<str> + Sync,
{
    texts
        .par_iter()
        .map(|text| Transducer::new(table).process_text(text.as_ref()))
        .collect()
}
