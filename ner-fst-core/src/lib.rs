//! # ner-fst-core — Extração de Entidades por Transdutor de Estados Finitos
//!
//! Este crate extrai trechos rotulados (pessoas, datas, e-mails, telefones,
//! endereços, preços, URLs) de texto livre percorrendo um pequeno autômato
//! declarativo sobre tokens separados por espaço. Cada transição é guardada por
//! uma expressão regular que precisa casar com o token **inteiro**.
//!
//! ## Arquitetura do Sistema
//!
//! 1.  **Configuração** ([`config`]): estados, estado inicial e transições ordenadas (dados, não lógica).
//! 2.  **Tabela** ([`automaton`]): construída uma vez, valida nomes e compila padrões; imutável.
//! 3.  **Estados** ([`state`]): a primeira transição declarada que casa vence.
//! 4.  **Tokenização** ([`tokenizer`]): espaços em branco + remoção de pontos nas bordas.
//! 5.  **Execução** ([`transducer`]): cursor que avança, acumula, emite e se recupera de falhas.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use ner_fst_core::{AutomatonTable, Transducer, TransducerConfig};
//!
//! // 1. Constrói a tabela a partir da configuração de referência
//! let table = AutomatonTable::build(&TransducerConfig::reference()).unwrap();
//!
//! // 2. Cria um cursor e processa o texto
//! let mut transducer = Transducer::new(&table);
//! let spans = transducer.process_text("100 forint");
//!
//! assert_eq!(spans[0].text, "100 forint");
//! assert_eq!(spans[0].label, "PRICE");
//! ```

pub mod automaton;
pub mod config;
pub mod corpus;
pub mod error;
pub mod state;
pub mod tokenizer;
pub mod transducer;

pub use automaton::AutomatonTable;
pub use config::{StateDef, TransducerConfig, TransitionDef};
pub use error::ConfigError;
pub use state::{State, StateId, Transition};
pub use tokenizer::Token;
pub use transducer::{process_batch, EngineEvent, LabeledSpan, Transducer};
