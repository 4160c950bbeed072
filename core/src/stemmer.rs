use rust_stemmers::{Algorithm, Stemmer};

/// Reduces a word to the root form the index was built with.
pub trait Stem: Send + Sync {
    fn stem(&self, word: &str) -> String;
}

impl Stem for Stemmer {
    fn stem(&self, word: &str) -> String { Stemmer::stem(self, word).into_owned() }
}

impl<F> Stem for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn stem(&self, word: &str) -> String { self(word) }
}

/// Stemmer for an indexer language code. WebHelp ships stemmers for English, German and French only.
pub fn stemmer_for_language(language: &str) -> Option<Box<dyn Stem>> {
    let algorithm = match language.to_lowercase().as_str() {
        "en" => Algorithm::English,
        "de" => Algorithm::German,
        "fr" => Algorithm::French,
        _ => return None,
    };
    Some(Box::new(Stemmer::create(algorithm)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_stemmer_is_selected() {
        let s = stemmer_for_language("en").expect("english stemmer");
        assert_eq!(s.stem("running"), "run");
        assert!(stemmer_for_language("ja").is_none());
    }

    #[test]
    fn closures_are_stemmers() {
        let s = |w: &str| w.trim_end_matches('s').to_string();
        assert_eq!(Stem::stem(&s, "cats"), "cat");
    }
}
