//! # Textos de Demonstração
//!
//! Frases curtas, em húngaro e inglês, que exercitam cada rótulo da
//! configuração de referência. Usadas pela interface web.

/// Retorna pares `(domínio, texto)`.
pub fn demo_texts() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "contato",
            "Kovács János hívta a 06209876543 számot, írj neki: janos.kovacs@pelda.hu.",
        ),
        (
            "endereço",
            "A csomagot a 1051, Budapest, Fő utca 12. címre küldtük.",
        ),
        (
            "comércio",
            "A jegy ára 4500 forint, külföldről 15 EUR.",
        ),
        (
            "agenda",
            "Az értekezlet 2024-03-15 napján lesz, részletek: https://pelda.hu/esemenyek",
        ),
        (
            "inglês",
            "Contact john@example.com today or call +36301234567.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::AutomatonTable;
    use crate::config::TransducerConfig;
    use crate::transducer::process_batch;

    #[test]
    fn test_every_demo_text_yields_entities() {
        let table = AutomatonTable::build(&TransducerConfig::reference()).unwrap();
        let texts: Vec<&str> = demo_texts().into_iter().map(|(_, t)| t).collect();
        for (text, spans) in texts.iter().zip(process_batch(&table, &texts[..])) {
            assert!(!spans.is_empty(), "nenhuma entidade em: {text}");
        }
    }
}
