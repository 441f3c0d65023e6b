//! Bilingual word tables for the speech parser.
//!
//! Each language is described by a [`LexiconTable`] of regex fragments: filler
//! words, conjunctions, number words, unit words, the egg word and (Russian
//! only) food-name aliases. Fragments are always matched against whole tokens,
//! so a filler never fires inside a longer word. Russian fragments carry their
//! own `\w*` suffixes to cover inflected forms; English fragments are plain
//! words.

use crate::{errors::Error, models::Unit};
use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;

/// Supported utterance languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Russian, tag `ru`
    Russian,
    /// English, tag `en`
    English,
}

impl Language {
    /// BCP-47 primary tag
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Russian => "ru",
            Self::English => "en",
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    /// Accepts a primary tag with an optional region (`en`, `ru-RU`, `en_GB`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        match primary.as_str() {
            "ru" | "russian" => Ok(Self::Russian),
            "en" | "english" => Ok(Self::English),
            _ => Err(Error::UnknownLanguage { tag: s.to_string() }),
        }
    }
}

/// Raw per-language word lists
pub struct LexiconTable {
    /// Words dropped before segmentation
    pub fillers: &'static [&'static str],
    /// Tokens that separate food phrases
    pub conjunctions: &'static [&'static str],
    /// Number words and their values
    pub numbers: &'static [(&'static str, f64)],
    /// Unit words, target unit and multiplier
    pub units: &'static [(&'static str, Unit, f64)],
    /// Word for eggs, which default to pieces
    pub egg: &'static str,
    /// Native food names mapped to catalog search phrases.
    /// The first matching row wins, so qualified foods precede their qualifiers.
    pub aliases: &'static [(&'static str, &'static str)],
}

const ENGLISH_TABLE: LexiconTable = LexiconTable {
    fillers: &[
        "i", "we", "ate", "eat", "eaten", "had", "have", "has", "just", "for", "breakfast",
        "lunch", "dinner", "supper", "snack", "today", "tonight", "yesterday", "this", "morning",
        "my", "some", "a", "an", "the", "of", "about", "around",
    ],
    conjunctions: &["and", "then", "plus", "with", "also", ",", ";"],
    numbers: &[
        ("one", 1.0),
        ("two", 2.0),
        ("three", 3.0),
        ("four", 4.0),
        ("five", 5.0),
        ("six", 6.0),
        ("seven", 7.0),
        ("eight", 8.0),
        ("nine", 9.0),
        ("ten", 10.0),
        ("half", 0.5),
    ],
    units: &[
        ("kg|kgs|kilos?|kilograms?|kilogrammes?", Unit::Grams, 1000.0),
        ("g|gr|grams?|grammes?", Unit::Grams, 1.0),
        ("l|liters?|litres?", Unit::Millilitres, 1000.0),
        ("ml|milliliters?|millilitres?", Unit::Millilitres, 1.0),
        ("pieces?|pcs|pc", Unit::Pieces, 1.0),
    ],
    egg: "eggs?",
    aliases: &[],
};

const RUSSIAN_TABLE: LexiconTable = LexiconTable {
    fillers: &[
        "я", "мы", "на", "в", "во", "за", "сегодня", "вчера", "утром", "днем", "вечером",
        "только", "что", "немного", "ел", "ела", "ели", r"съе\w*", r"поел\w*", r"покуша\w*",
        r"выпил\w*", r"попил\w*", r"завтрак\w*", r"позавтрак\w*", r"обед\w*", r"пообеда\w*",
        r"ужин\w*", r"поужина\w*", r"перекус\w*",
    ],
    conjunctions: &["и", "а", "с", "потом", "затем", "плюс", "еще", "также", ",", ";"],
    numbers: &[
        ("один", 1.0),
        ("одна", 1.0),
        ("одно", 1.0),
        ("одну", 1.0),
        ("два", 2.0),
        ("две", 2.0),
        ("три", 3.0),
        ("четыре", 4.0),
        ("пять", 5.0),
        ("шесть", 6.0),
        ("семь", 7.0),
        ("восемь", 8.0),
        ("девять", 9.0),
        ("десять", 10.0),
        ("половина", 0.5),
        ("половину", 0.5),
        ("половинка", 0.5),
        ("половинку", 0.5),
        ("пол", 0.5),
    ],
    units: &[
        (r"кг|кило|килограмм\w*", Unit::Grams, 1000.0),
        (r"г|гр|грамм\w*", Unit::Grams, 1.0),
        (r"л|литр\w*", Unit::Millilitres, 1000.0),
        (r"мл|миллилитр\w*", Unit::Millilitres, 1.0),
        (r"шт|штук\w*", Unit::Pieces, 1.0),
    ],
    egg: r"яйц\w*|яиц|яйко|яичк\w*",
    aliases: &[
        (r"яйц\w*|яиц|яйко|яичк\w*", "eggs"),
        (r"индейк\w*|индюш\w*", "turkey breast"),
        (r"курин\w*|куриц\w*|грудк\w*", "chicken breast"),
        (r"оливков\w*", "olive oil"),
        (r"рис\w*", "rice"),
        (r"банан\w*", "banana"),
        (r"брокколи", "broccoli"),
        (r"лосос\w*|семг\w*", "salmon"),
        (r"йогурт\w*", "greek yogurt"),
        (r"овсян\w*|овес|овса", "oats"),
        (r"батат\w*", "sweet potato"),
        (r"творог\w*|творож\w*", "cottage cheese"),
        (r"миндал\w*", "almonds"),
        (r"фарш\w*|говядин\w*|говяж\w*", "ground beef"),
        (r"макарон\w*|паст\w*|спагетти", "pasta"),
        (r"помидор\w*|томат\w*", "tomatoes"),
        (r"авокадо", "avocado"),
        (r"молок\w*", "milk"),
        (r"хлеб\w*", "bread"),
        (r"шпинат\w*", "spinach"),
    ],
};

/// A table compiled into whole-token matchers
pub struct Lexicon {
    filler: Regex,
    conjunction: Regex,
    numbers: &'static [(&'static str, f64)],
    units: Vec<(Regex, Unit, f64)>,
    egg: Regex,
    aliases: Vec<(Regex, &'static str)>,
    quantity_unit: Regex,
}

fn whole_token(fragments: &[&str]) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", fragments.join("|")))
}

lazy_static! {
    static ref NUMERAL: Regex =
        Regex::new(r"^\d+(?:\.\d+)?$").expect("Numeral pattern should be valid");
    static ref ENGLISH: Lexicon =
        Lexicon::compile(&ENGLISH_TABLE).expect("English lexicon patterns should be valid");
    static ref RUSSIAN: Lexicon =
        Lexicon::compile(&RUSSIAN_TABLE).expect("Russian lexicon patterns should be valid");
}

impl Lexicon {
    /// Compiles a table. Fails only on a malformed fragment.
    pub fn compile(table: &LexiconTable) -> Result<Self, regex::Error> {
        let conjunctions: Vec<String> = table.conjunctions.iter().map(|c| regex::escape(c)).collect();
        let conjunctions: Vec<&str> = conjunctions.iter().map(String::as_str).collect();

        let units = table
            .units
            .iter()
            .map(|(fragment, unit, factor)| Ok((whole_token(&[*fragment])?, *unit, *factor)))
            .collect::<Result<Vec<_>, regex::Error>>()?;

        let aliases = table
            .aliases
            .iter()
            .map(|(pattern, canonical)| Ok((Regex::new(&format!(r"\b(?:{pattern})\b"))?, *canonical)))
            .collect::<Result<Vec<_>, regex::Error>>()?;

        let number_words: Vec<&str> = table.numbers.iter().map(|(word, _)| *word).collect();
        let unit_words: Vec<&str> = table.units.iter().map(|(fragment, _, _)| *fragment).collect();
        let quantity_unit = Regex::new(&format!(
            r"\b(?:\d+(?:\.\d+)?|{})\s+(?:{}|{})\b",
            number_words.join("|"),
            unit_words.join("|"),
            table.egg
        ))?;

        Ok(Self {
            filler: whole_token(table.fillers)?,
            conjunction: whole_token(&conjunctions)?,
            numbers: table.numbers,
            units,
            egg: whole_token(&[table.egg])?,
            aliases,
            quantity_unit,
        })
    }

    /// The compiled lexicon for `language`.
    #[must_use]
    pub fn for_language(language: Language) -> &'static Self {
        match language {
            Language::Russian => &RUSSIAN,
            Language::English => &ENGLISH,
        }
    }

    /// Whether `token` carries no food information.
    #[must_use]
    pub fn is_filler(&self, token: &str) -> bool {
        self.filler.is_match(token)
    }

    /// Whether `token` separates two food phrases.
    #[must_use]
    pub fn is_conjunction(&self, token: &str) -> bool {
        self.conjunction.is_match(token)
    }

    /// Positive value of a numeral or number word.
    #[must_use]
    pub fn quantity(&self, token: &str) -> Option<f64> {
        let value = if NUMERAL.is_match(token) {
            token.parse::<f64>().ok()?
        } else {
            self.numbers
                .iter()
                .find(|(word, _)| *word == token)
                .map(|(_, value)| *value)?
        };
        (value.is_finite() && value > 0.0).then_some(value)
    }

    /// Target unit and multiplier of a unit word.
    #[must_use]
    pub fn unit(&self, token: &str) -> Option<(Unit, f64)> {
        self.units
            .iter()
            .find(|(pattern, _, _)| pattern.is_match(token))
            .map(|(_, unit, factor)| (*unit, *factor))
    }

    /// Whether `token` names eggs.
    #[must_use]
    pub fn is_egg(&self, token: &str) -> bool {
        self.egg.is_match(token)
    }

    /// Catalog search phrase for a native food phrase, if any alias matches.
    #[must_use]
    pub fn alias(&self, phrase: &str) -> Option<&'static str> {
        self.aliases
            .iter()
            .find(|(pattern, _)| pattern.is_match(phrase))
            .map(|(_, canonical)| *canonical)
    }

    /// Byte offsets in `text` where a quantity followed by a unit (or eggs) begins.
    #[must_use]
    pub fn quantity_unit_starts(&self, text: &str) -> Vec<usize> {
        self.quantity_unit.find_iter(text).map(|m| m.start()).collect()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_language_tags() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::English);
        assert_eq!("ru-RU".parse::<Language>().unwrap(), Language::Russian);
        assert_eq!("EN_gb".parse::<Language>().unwrap(), Language::English);
        assert!(matches!(
            "de".parse::<Language>(),
            Err(Error::UnknownLanguage { tag }) if tag == "de"
        ));
        assert_eq!(Language::Russian.tag(), "ru");
    }

    #[test]
    fn test_english_fillers_are_whole_words() {
        let en = Lexicon::for_language(Language::English);
        assert!(en.is_filler("ate"));
        assert!(en.is_filler("breakfast"));
        assert!(!en.is_filler("oats"));
        assert!(!en.is_filler("avocado"));
        assert!(en.is_conjunction("and"));
        assert!(en.is_conjunction(","));
        assert!(!en.is_conjunction("banana"));
    }

    #[test]
    fn test_russian_filler_stems_stay_inside_tokens() {
        let ru = Lexicon::for_language(Language::Russian);
        assert!(ru.is_filler("я"));
        assert!(ru.is_filler("съела"));
        assert!(ru.is_filler("завтраком"));
        assert!(ru.is_filler("поужинал"));
        assert!(!ru.is_filler("яблоко"));
        assert!(!ru.is_filler("яйца"));
        assert!(!ru.is_filler("нас"));
    }

    #[test]
    fn test_quantities() {
        let en = Lexicon::for_language(Language::English);
        let ru = Lexicon::for_language(Language::Russian);
        assert_eq!(en.quantity("200"), Some(200.0));
        assert_eq!(en.quantity("1.5"), Some(1.5));
        assert_eq!(en.quantity("three"), Some(3.0));
        assert_eq!(en.quantity("half"), Some(0.5));
        assert_eq!(en.quantity("0"), None);
        assert_eq!(en.quantity("rice"), None);
        assert_eq!(ru.quantity("две"), Some(2.0));
        assert_eq!(ru.quantity("половинку"), Some(0.5));
        assert_eq!(ru.quantity("two"), None);
    }

    #[test]
    fn test_units() {
        let en = Lexicon::for_language(Language::English);
        let ru = Lexicon::for_language(Language::Russian);
        assert_eq!(en.unit("kg"), Some((Unit::Grams, 1000.0)));
        assert_eq!(en.unit("grams"), Some((Unit::Grams, 1.0)));
        assert_eq!(en.unit("litres"), Some((Unit::Millilitres, 1000.0)));
        assert_eq!(en.unit("piece"), Some((Unit::Pieces, 1.0)));
        assert_eq!(en.unit("grape"), None);
        assert_eq!(ru.unit("граммов"), Some((Unit::Grams, 1.0)));
        assert_eq!(ru.unit("килограмма"), Some((Unit::Grams, 1000.0)));
        assert_eq!(ru.unit("миллилитров"), Some((Unit::Millilitres, 1.0)));
        assert_eq!(ru.unit("штуки"), Some((Unit::Pieces, 1.0)));
        assert_eq!(ru.unit("гречка"), None);
    }

    #[test]
    fn test_russian_aliases() {
        let ru = Lexicon::for_language(Language::Russian);
        assert_eq!(ru.alias("куриной грудки"), Some("chicken breast"));
        assert_eq!(ru.alias("риса"), Some("rice"));
        assert_eq!(ru.alias("оливкового масла"), Some("olive oil"));
        assert_eq!(ru.alias("яйца"), Some("eggs"));
        assert_eq!(ru.alias("куриных яйца"), Some("eggs"));
        assert_eq!(ru.alias("грудки индейки"), Some("turkey breast"));
        assert_eq!(ru.alias("грудки"), Some("chicken breast"));
        assert_eq!(ru.alias("кефира"), None);
        assert!(ru.is_egg("яйцо"));
        assert!(ru.is_egg("яиц"));
        assert_eq!(Lexicon::for_language(Language::English).alias("rice"), None);
    }

    #[test]
    fn test_quantity_unit_starts() {
        let en = Lexicon::for_language(Language::English);
        let text = "200 g chicken breast 2 eggs 150 grams rice";
        assert_eq!(en.quantity_unit_starts(text), vec![0, 21, 28]);
        assert!(en.quantity_unit_starts("banana bread").is_empty());

        let ru = Lexicon::for_language(Language::Russian);
        assert_eq!(ru.quantity_unit_starts("0.5 л молока 100 г хлеба").len(), 2);
    }
}
