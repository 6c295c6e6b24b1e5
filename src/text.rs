//! Case folding and title casing for names shown in the form.

/// Portuguese articles, prepositions and contractions that stay lowercase
/// inside a title-cased name.
const STOPWORDS: &[&str] = &[
    "de", "do", "da", "dos", "das", "a", "o", "e", "em", "na", "no", "nos", "nas", "ao", "aos",
    "à", "às", "ào", "àos", "as", "os",
];

/// Normal form used when comparing a query against a candidate.
pub fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// Lower-cases the text and capitalizes the first letter of every word.
///
/// Words are separated by single spaces, so runs of spaces survive unchanged.
/// With `ignore_stopwords` set, function words such as "da" or "dos" are
/// left in lowercase.
pub fn to_title_case(text: &str, ignore_stopwords: bool) -> String {
    text.to_lowercase()
        .split(' ')
        .map(|word| {
            if ignore_stopwords && STOPWORDS.contains(&word) {
                return word.to_string();
            }

            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn keeps_stopwords_lowercase() {
        assert_eq!(to_title_case("MARIA da silva", true), "Maria da Silva");
        assert_eq!(to_title_case("joão DOS santos e souza", true), "João dos Santos e Souza");
    }

    #[test]
    fn capitalizes_stopwords_when_asked_to() {
        assert_eq!(to_title_case("MARIA da silva", false), "Maria Da Silva");
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert_eq!(to_title_case("", true), "");
        assert_eq!(to_title_case("", false), "");
    }

    #[test]
    fn preserves_spacing_between_words() {
        assert_eq!(to_title_case("  ana   lima ", false), "  Ana   Lima ");
    }

    #[test]
    fn handles_accented_initials() {
        assert_eq!(to_title_case("ÉRICA ávila", true), "Érica Ávila");
        assert_eq!(to_title_case("à", true), "à");
    }

    #[test]
    fn fold_is_lowercase() {
        assert_eq!(fold("Ana@Example.COM"), "ana@example.com");
    }
}
