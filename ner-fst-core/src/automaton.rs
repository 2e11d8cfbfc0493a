//! # Tabela do Autômato
//!
//! Construída **uma única vez** a partir de uma [`TransducerConfig`]:
//!
//! 1. Cria um [`State`] por declaração (nomes duplicados são rejeitados).
//! 2. Resolve o estado inicial.
//! 3. Anexa cada transição, na ordem declarada, ao seu estado de origem,
//!    compilando o padrão na hora.
//!
//! Qualquer nome não resolvido ou padrão inválido aborta a construção com
//! [`ConfigError`]. Depois de construída a tabela é somente leitura e pode ser
//! compartilhada entre vários [`Transducer`](crate::transducer::Transducer)s.

use std::collections::HashMap;

use tracing::info;

use crate::config::TransducerConfig;
use crate::error::{ConfigError, Result};
use crate::state::{State, StateId, Transition};

#[derive(Debug, Clone)]
pub struct AutomatonTable {
    states: Vec<State>,
    index: HashMap<String, StateId>,
    initial: StateId,
}

impl AutomatonTable {
    pub fn build(config: &TransducerConfig) -> Result<Self> {
        let mut states = Vec::with_capacity(config.states().len());
        let mut index = HashMap::with_capacity(config.states().len());

        for def in config.states() {
            let id = StateId(states.len());
            if index.insert(def.name.clone(), id).is_some() {
                return Err(ConfigError::DuplicateState(def.name.clone()));
            }
            states.push(State::new(&def.name, def.is_final));
        }

        let initial = *index
            .get(config.initial_state())
            .ok_or_else(|| ConfigError::UnknownInitialState(config.initial_state().to_string()))?;

        for def in config.transitions() {
            let lookup = |name: &str| {
                index.get(name).copied().ok_or_else(|| ConfigError::UnknownState {
                    from: def.from_state.clone(),
                    to: def.to_state.clone(),
                    missing: name.to_string(),
                })
            };
            let from = lookup(&def.from_state)?;
            let to = lookup(&def.to_state)?;
            // Rótulo vazio equivale a rótulo ausente
            let label = def.label.clone().filter(|l| !l.is_empty());
            let transition = Transition::compile(&def.pattern, to, label)?;
            states[from.0].push_transition(transition);
        }

        let table = Self {
            states,
            index,
            initial,
        };
        info!(
            states = table.len(),
            transitions = table.transition_count(),
            initial = table.state(table.initial).name(),
            "autômato construído"
        );
        Ok(table)
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// `id` sempre vem desta tabela, então o índice é válido.
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.0]
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.index.get(name).copied()
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn transition_count(&self) -> usize {
        self.states.iter().map(|s| s.transitions().len()).sum()
    }
}

impl TryFrom<&TransducerConfig> for AutomatonTable {
    type Error = ConfigError;

    fn try_from(config: &TransducerConfig) -> Result<Self> {
        Self::build(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_reference() {
        let table = AutomatonTable::build(&TransducerConfig::reference()).unwrap();
        assert_eq!(table.len(), 14);
        assert_eq!(table.transition_count(), 14);
        assert_eq!(table.state(table.initial()).name(), "q0");

        // q0 tem 7 transições de saída, na ordem declarada
        let q0 = table.state(table.initial());
        assert_eq!(q0.transitions().len(), 7);
        assert_eq!(q0.transitions()[0].label(), Some("PHONE_NUMBER"));
        assert_eq!(q0.transitions()[6].label(), Some("URL"));

        let email = table.state_id("q_email").unwrap();
        assert!(table.state(email).is_final());
        assert!(table.state(email).transitions().is_empty());
    }

    #[test]
    fn test_unknown_initial_state() {
        let mut config = TransducerConfig::reference();
        config.initial_state = "nope".to_string();
        let err = AutomatonTable::build(&config).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownInitialState(ref n) if n == "nope"));
    }

    #[test]
    fn test_unknown_target_state() {
        let mut config = TransducerConfig::new("q0");
        config.add_transition("q0", "x", "ghost", Some("X"));
        let err = AutomatonTable::build(&config).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownState { ref missing, .. } if missing == "ghost"));
    }

    #[test]
    fn test_unknown_source_state() {
        let mut config = TransducerConfig::new("q0");
        config.add_transition("ghost", "x", "q0", None);
        let err = AutomatonTable::build(&config).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownState { ref missing, .. } if missing == "ghost"));
    }

    #[test]
    fn test_duplicate_state() {
        let mut config = TransducerConfig::new("q0");
        config.add_state("q0", true);
        let err = AutomatonTable::build(&config).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateState(ref n) if n == "q0"));
    }

    #[test]
    fn test_invalid_pattern_fails_at_build() {
        let mut config = TransducerConfig::new("q0");
        config.add_state("q1", false);
        config.add_transition("q0", "[a-z", "q1", None);
        let err = AutomatonTable::build(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn test_table_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AutomatonTable>();
    }
}
