//! # Estados e Transições
//!
//! Um [`State`] guarda suas transições de saída **na ordem declarada**.
//! A única primitiva de comparação do motor é [`State::match_token`]:
//! percorre as transições em ordem e devolve a primeira cujo padrão casa
//! com o token inteiro. Não há backtracking nem exploração de alternativas.

use regex::Regex;

use crate::error::{ConfigError, Result};

/// Índice de um estado dentro da [`AutomatonTable`](crate::automaton::AutomatonTable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(pub(crate) usize);

impl StateId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Regra imutável: padrão (já compilado), estado de destino e rótulo opcional.
#[derive(Debug, Clone)]
pub struct Transition {
    pattern: String,
    regex: Regex,
    target: StateId,
    label: Option<String>,
}

impl Transition {
    /// Compila `pattern` ancorado nas duas pontas (`^(?:...)$`),
    /// garantindo a semântica de casamento completo.
    pub(crate) fn compile(pattern: &str, target: StateId, label: Option<String>) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
            ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            target,
            label,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn target(&self) -> StateId {
        self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn full_match(&self, token: &str) -> bool {
        self.regex.is_match(token)
    }
}

/// Nó nomeado do autômato.
#[derive(Debug, Clone)]
pub struct State {
    name: String,
    is_final: bool,
    transitions: Vec<Transition>,
}

impl State {
    pub(crate) fn new(name: &str, is_final: bool) -> Self {
        Self {
            name: name.to_string(),
            is_final,
            transitions: vec![],
        }
    }

    pub(crate) fn push_transition(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Anotação descritiva: o motor não encerra nem descarrega ao chegar aqui.
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Retorna o destino e o rótulo da primeira transição que casa com `token`,
    /// ou `None` se nenhuma casar.
    pub fn match_token(&self, token: &str) -> Option<(StateId, Option<&str>)> {
        self.transitions
            .iter()
            .find(|t| t.full_match(token))
            .map(|t| (t.target, t.label()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(transitions: &[(&str, usize, Option<&str>)]) -> State {
        let mut state = State::new("s", false);
        for (pattern, target, label) in transitions {
            state.push_transition(
                Transition::compile(pattern, StateId(*target), label.map(str::to_string)).unwrap(),
            );
        }
        state
    }

    #[test]
    fn test_full_match_not_substring() {
        let state = state_with(&[(r"\d+", 1, Some("NUM"))]);
        assert_eq!(state.match_token("123"), Some((StateId(1), Some("NUM"))));
        // Contém dígitos, mas não é só dígitos
        assert_eq!(state.match_token("abc123"), None);
        assert_eq!(state.match_token("123abc"), None);
    }

    #[test]
    fn test_alternation_is_fully_anchored() {
        // Sem o grupo (?:...), "^a|b$" aceitaria "ax"
        let state = state_with(&[("a|b", 1, None)]);
        assert!(state.match_token("ax").is_none());
        assert!(state.match_token("xb").is_none());
        assert!(state.match_token("b").is_some());
    }

    #[test]
    fn test_first_declared_transition_wins() {
        let state = state_with(&[("[a-z]+", 1, None), ("abc", 2, Some("ABC"))]);
        assert_eq!(state.match_token("abc"), Some((StateId(1), None)));
    }

    #[test]
    fn test_empty_token_and_no_transitions() {
        let state = state_with(&[(r"\d+", 1, None)]);
        assert!(state.match_token("").is_none());
        assert!(State::new("vazio", true).match_token("qualquer").is_none());
    }

    #[test]
    fn test_unicode_letters() {
        let state = state_with(&[(r"\p{Lu}\p{Ll}+", 1, None)]);
        assert!(state.match_token("Kovács").is_some());
        assert!(state.match_token("Győr").is_some());
        assert!(state.match_token("kovács").is_none());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Transition::compile("(unclosed", StateId(0), None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
    }
}
