//! # Tokenizador por Espaços
//!
//! O transdutor trabalha sobre tokens delimitados por espaço em branco.
//! A única normalização é remover pontos (`.`) do início e do fim de cada token:
//! "12." vira "12", "...fim..." vira "fim", mas "www.exemplo.hu" fica intacto.
//!
//! Tokens que ficam vazios após o corte (ex: "...") **continuam** na lista;
//! eles simplesmente não casam com quase nenhum padrão.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use ner_fst_core::tokenizer::tokenize;
//!
//! let tokens = tokenize("Fizetés: 100 forint.");
//! let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, vec!["Fizetés:", "100", "forint"]);
//! ```

use serde::{Deserialize, Serialize};

/// Um token extraído do texto original.
///
/// `start` e `end` apontam para o texto **já sem os pontos** dentro da entrada,
/// o que permite destacar as entidades na interface sem alterar a formatação.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// O texto do token sem pontos nas bordas.
    pub text: String,
    /// Índice de byte inicial no texto original (inclusive).
    pub start: usize,
    /// Índice de byte final no texto original (exclusivo).
    pub end: usize,
    /// Índice sequencial do token na lista (0, 1, 2...).
    pub index: usize,
}

/// Divide `text` em tokens por espaço em branco e corta os pontos das bordas.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        match (is_separator(c), word_start) {
            (true, Some(start)) => {
                tokens.push(make_token(text, start, i, tokens.len()));
                word_start = None;
            }
            (false, None) => word_start = Some(i),
            _ => {}
        }
    }
    if let Some(start) = word_start {
        tokens.push(make_token(text, start, text.len(), tokens.len()));
    }

    tokens
}

/// Espaço em branco Unicode mais os separadores de arquivo, grupo, registro
/// e unidade (U+001C–U+001F).
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

fn make_token(text: &str, start: usize, end: usize, index: usize) -> Token {
    let word = &text[start..end];
    let without_leading = word.trim_start_matches('.');
    let trimmed = without_leading.trim_end_matches('.');
    let start = start + (word.len() - without_leading.len());
    Token {
        text: trimmed.to_string(),
        start,
        end: start + trimmed.len(),
        index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        tokenize(input).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_whitespace_split() {
        assert_eq!(texts("a  b\tc\nd"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n ").is_empty());
    }

    #[test]
    fn test_trim_dots_only_at_edges() {
        assert_eq!(texts("..fim.. 2024.01.15. www.pelda.hu"), vec!["fim", "2024.01.15", "www.pelda.hu"]);
    }

    #[test]
    fn test_dot_only_token_is_kept_empty() {
        let tokens = tokenize("a ... b");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].text, "");
        assert_eq!(tokens[1].start, tokens[1].end);
    }

    #[test]
    fn test_offsets_point_to_trimmed_text() {
        let input = "Ár: .100. forint";
        let tokens = tokenize(input);
        assert_eq!(tokens[1].text, "100");
        assert_eq!(&input[tokens[1].start..tokens[1].end], "100");
        assert_eq!(tokens[2].index, 2);
    }

    #[test]
    fn test_control_separators_split() {
        assert_eq!(texts("100\u{1f}forint\u{1c}x"), vec!["100", "forint", "x"]);
    }

    #[test]
    fn test_multibyte_offsets() {
        let input = "Győr körút";
        let tokens = tokenize(input);
        assert_eq!(&input[tokens[0].start..tokens[0].end], "Győr");
        assert_eq!(&input[tokens[1].start..tokens[1].end], "körút");
    }
}
