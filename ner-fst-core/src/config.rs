//! # Configuração do Transdutor
//!
//! A configuração é **dado**, não lógica: uma lista de estados, o nome do estado
//! inicial e uma lista ordenada de transições. Cada transição diz "estando em
//! `from_state`, se o token casar **inteiro** com `pattern`, vá para `to_state`
//! e (opcionalmente) marque o trecho com `label`".
//!
//! ## Formato JSON
//!
//! ```json
//! {
//!   "states": [{ "name": "q0" }, { "name": "q_email", "is_final": true }],
//!   "initial_state": "q0",
//!   "transitions": [
//!     { "from_state": "q0", "pattern": "[a-z]+@[a-z]+\\.[a-z]{2,}", "to_state": "q_email", "label": "EMAIL" }
//!   ]
//! }
//! ```
//!
//! A ordem das transições de um mesmo estado é significativa: a primeira que
//! casar vence. Reordenar muda o comportamento observável.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Declaração de um estado.
///
/// `is_final` é preservado por fidelidade à configuração, mas o motor de
/// execução não o consulta: chegar a um estado final não encerra o casamento.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDef {
    pub name: String,
    #[serde(default)]
    pub is_final: bool,
}

/// Declaração de uma transição guardada por regex.
///
/// A regex usa semântica de **casamento completo**: o token inteiro precisa
/// satisfazer o padrão (não basta conter um trecho que case).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDef {
    pub from_state: String,
    pub pattern: String,
    pub to_state: String,
    /// Rótulo emitido (ex: "EMAIL"). Transições sem rótulo apenas avançam.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Configuração completa de um transdutor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransducerConfig {
    pub states: Vec<StateDef>,
    pub initial_state: String,
    pub transitions: Vec<TransitionDef>,
}

impl TransducerConfig {
    /// Cria uma configuração vazia com o estado inicial já declarado.
    pub fn new(initial_state: &str) -> Self {
        Self {
            states: vec![StateDef {
                name: initial_state.to_string(),
                is_final: false,
            }],
            initial_state: initial_state.to_string(),
            transitions: vec![],
        }
    }

    /// Configuração de referência para textos em húngaro.
    ///
    /// Reconhece telefones, preços, endereços (CEP → cidade → rua → tipo de
    /// logradouro → número), nomes de pessoas, e-mails, datas e URLs.
    ///
    /// Os padrões de nomes usam classes Unicode (`\p{Lu}`, `\p{Ll}`) para
    /// cobrir letras acentuadas como "á", "ő" e "ű".
    pub fn reference() -> Self {
        let mut config = Self::new("q0");

        for (name, is_final) in [
            ("q1_person", false),
            ("q_date", true),
            ("q2_person", true),
            ("q_email", true),
            ("q_phone", true),
            ("q_url", true),
            ("q_number", false),
            ("q_currency", true),
            ("q_postalcode", false),
            ("q_city", false),
            ("q_street", false),
            ("q_street_type", false),
            ("q_address", true),
        ] {
            config.add_state(name, is_final);
        }

        // Telefones: 06 ou +36, prefixo de área e número local
        config.add_transition(
            "q0",
            r"(06|\+36)\d{2}[\s\-]?\d{3}[\s\-]?\d{4}",
            "q_phone",
            Some("PHONE_NUMBER"),
        );
        // Número solto, que pode virar preço
        config.add_transition("q0", r"\d+", "q_number", None);
        config.add_transition(
            "q_number",
            r"\s?(forint|HUF|EUR|USD|dollars|euros|yen|pounds|GBP)",
            "q_currency",
            Some("PRICE"),
        );
        // Endereços: CEP → cidade → rua → tipo → número
        config.add_transition("q0", r"\d{4},?", "q_postalcode", Some("POSTALCODE"));
        config.add_transition(
            "q_postalcode",
            r"\p{Lu}\p{Ll}+(?: \p{L}+)*,?",
            "q_city",
            Some("CITY"),
        );
        config.add_transition("q_city", r"[\p{L}\s]+", "q_street", Some("ADDRESS"));
        config.add_transition(
            "q_street",
            r"(utca|tér|út|körút)",
            "q_street_type",
            Some("ADDRESS"),
        );
        config.add_transition("q_street_type", r"\d+", "q_address", Some("ADDRESS"));
        // Pessoas: o primeiro nome sozinho não recebe rótulo
        config.add_transition("q0", r"\p{Lu}\p{Ll}+", "q1_person", None);
        config.add_transition("q1_person", r"\p{Lu}\p{Ll}+", "q1_person", Some("PERSON"));
        config.add_transition("q1_person", r"\p{Lu}\p{Ll}+", "q2_person", Some("PERSON"));
        config.add_transition(
            "q0",
            r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}",
            "q_email",
            Some("EMAIL"),
        );
        config.add_transition(
            "q0",
            r"(\d{4}[.\-]?\d{2}[.\-]?\d{2}|\d{2}[.\-]?\d{2}[.\-]?\d{4}|\d{2}/\d{2}/\d{4})",
            "q_date",
            Some("DATE"),
        );
        config.add_transition(
            "q0",
            r"https?://[A-Za-z0-9.-]+(?:/[A-Za-z0-9&%_./-]*)?",
            "q_url",
            Some("URL"),
        );

        config
    }

    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    pub fn states(&self) -> &[StateDef] {
        &self.states
    }

    pub fn transitions(&self) -> &[TransitionDef] {
        &self.transitions
    }

    pub fn add_state(&mut self, name: &str, is_final: bool) {
        self.states.push(StateDef {
            name: name.to_string(),
            is_final,
        });
    }

    /// Acrescenta uma transição ao final da lista (menor prioridade no `from_state`).
    ///
    /// Um rótulo vazio (`Some("")`) é guardado como ausente.
    pub fn add_transition(&mut self, from_state: &str, pattern: &str, to_state: &str, label: Option<&str>) {
        self.transitions.push(TransitionDef {
            from_state: from_state.to_string(),
            pattern: pattern.to_string(),
            to_state: to_state.to_string(),
            label: label.filter(|l| !l.is_empty()).map(str::to_string),
        });
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for TransducerConfig {
    fn default() -> Self {
        Self::reference()
    }
}

impl fmt::Display for TransducerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TransducerConfig(initial={}, states={}, transitions={})",
            self.initial_state,
            self.states.len(),
            self.transitions.len()
        )
    }
}
