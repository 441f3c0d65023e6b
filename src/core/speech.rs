//! Free-text utterance to meal entries.
//!
//! The parser is best effort: anything it cannot tie to both a quantity and a
//! catalog product is dropped, and an empty result simply means nothing was
//! recognised.
//!
//! Pipeline: normalise the text into tokens, drop filler words, split into food
//! phrases, then resolve each phrase to a quantity, a unit and a product.

use crate::{
    core::{fuzzy, product::ProductMap},
    models::{MealItem, Unit},
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace};

pub use crate::core::lexicon::{Language, Lexicon};

lazy_static! {
    static ref DECIMAL_COMMA: Regex =
        Regex::new(r"(\d),(\d)").expect("Decimal comma pattern should be valid");
    static ref NOISE: Regex =
        Regex::new(r"[^\p{L}\d\s.,;%]").expect("Noise pattern should be valid");
    static ref DIGIT_LETTER: Regex =
        Regex::new(r"(\d)(\p{L})").expect("Digit-letter pattern should be valid");
    static ref LETTER_DIGIT: Regex =
        Regex::new(r"(\p{L})(\d)").expect("Letter-digit pattern should be valid");
    static ref SEPARATOR: Regex =
        Regex::new(r"\s*([,;])\s*").expect("Separator pattern should be valid");
}

/// Lowercases and tokenises an utterance.
///
/// Decimal commas become points, glued quantities are split from their units
/// (`200g` becomes `200 g`), and commas and semicolons become tokens of their own.
#[must_use]
pub fn normalize(text: &str) -> Vec<String> {
    let text = text.to_lowercase().replace('ё', "е");
    let text = DECIMAL_COMMA.replace_all(&text, "${1}.${2}");
    let text = NOISE.replace_all(&text, " ");
    let text = DIGIT_LETTER.replace_all(&text, "${1} ${2}");
    let text = LETTER_DIGIT.replace_all(&text, "${1} ${2}");
    let text = SEPARATOR.replace_all(&text, " ${1} ");

    text.split_whitespace()
        .map(|token| token.trim_matches('.'))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits filler-free tokens into food phrases.
///
/// Conjunctions are tried first. When they yield at most one phrase, the text is
/// cut at every quantity-unit pair instead; anything before the first pair
/// stays with it.
fn segment(tokens: &[String], lexicon: &Lexicon) -> Vec<String> {
    let by_conjunction: Vec<String> = tokens
        .split(|token| lexicon.is_conjunction(token))
        .filter(|part| !part.is_empty())
        .map(|part| part.join(" "))
        .collect();
    if by_conjunction.len() > 1 {
        return by_conjunction;
    }

    let text = tokens
        .iter()
        .filter(|token| !lexicon.is_conjunction(token))
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    let starts = lexicon.quantity_unit_starts(&text);
    if starts.len() < 2 {
        return by_conjunction;
    }

    let mut bounds: Vec<usize> = starts.into_iter().skip(1).collect();
    bounds.insert(0, 0);
    bounds.push(text.len());
    bounds
        .windows(2)
        .map(|w| text[w[0]..w[1]].trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Resolves one food phrase, or `None` if it lacks a quantity or a product.
fn resolve_segment(segment: &str, lexicon: &Lexicon, products: &ProductMap) -> Option<MealItem> {
    let mut words: Vec<&str> = segment.split_whitespace().collect();

    let position = words.iter().position(|w| lexicon.quantity(w).is_some())?;
    let mut quantity = lexicon.quantity(words.remove(position))?;

    let mut unit = None;
    if let Some(index) = words.iter().position(|w| lexicon.unit(w).is_some()) {
        if let Some((found, factor)) = lexicon.unit(words.remove(index)) {
            quantity *= factor;
            unit = Some(found);
        }
    }
    if unit.is_none() && words.iter().any(|w| lexicon.is_egg(w)) {
        unit = Some(Unit::Pieces);
    }

    let mut phrase = words.join(" ");
    if let Some(canonical) = lexicon.alias(&phrase) {
        trace!("Alias '{}' -> '{}'", phrase, canonical);
        phrase = canonical.to_string();
    }
    if phrase.is_empty() {
        return None;
    }

    let product = fuzzy::best_match(products.values(), &phrase)?;
    Some(MealItem {
        product_id: product.id,
        quantity,
        unit: unit.unwrap_or(product.default_unit),
    })
}

/// Turns a spoken or typed meal description into catalog entries.
///
/// Returns an empty list when nothing could be recognised.
#[must_use]
pub fn parse_speech_utterance(text: &str, language: Language, products: &ProductMap) -> Vec<MealItem> {
    let lexicon = Lexicon::for_language(language);
    let tokens: Vec<String> = normalize(text)
        .into_iter()
        .filter(|token| !lexicon.is_filler(token))
        .collect();

    let entries: Vec<MealItem> = segment(&tokens, lexicon)
        .iter()
        .filter_map(|phrase| resolve_segment(phrase, lexicon, products))
        .collect();

    debug!(
        "Recognised {} entr{} in {} utterance",
        entries.len(),
        if entries.len() == 1 { "y" } else { "ies" },
        language.tag()
    );
    entries
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::builtin_product_map;

    fn id_of(products: &ProductMap, name: &str) -> i64 {
        products.values().find(|p| p.name == name).unwrap().id
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize("I ate 200g Chicken, and 1,5 kg RICE."),
            vec!["i", "ate", "200", "g", "chicken", ",", "and", "1.5", "kg", "rice"]
        );
        assert_eq!(normalize("Съела ёжика!"), vec!["съела", "ежика"]);
    }

    #[test]
    fn test_english_two_entries() {
        let products = builtin_product_map();
        let entries = parse_speech_utterance(
            "200 grams chicken breast and 1 piece banana",
            Language::English,
            &products,
        );
        assert_eq!(
            entries,
            vec![
                MealItem {
                    product_id: id_of(&products, "Chicken Breast"),
                    quantity: 200.0,
                    unit: Unit::Grams,
                },
                MealItem {
                    product_id: id_of(&products, "Banana"),
                    quantity: 1.0,
                    unit: Unit::Pieces,
                },
            ]
        );
    }

    #[test]
    fn test_english_fillers_eggs_and_number_words() {
        let products = builtin_product_map();
        let entries = parse_speech_utterance(
            "I had two eggs and half an avocado for breakfast",
            Language::English,
            &products,
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].product_id, id_of(&products, "Eggs"));
        assert_eq!(entries[0].quantity, 2.0);
        assert_eq!(entries[0].unit, Unit::Pieces);
        assert_eq!(entries[1].product_id, id_of(&products, "Avocado"));
        assert_eq!(entries[1].quantity, 0.5);
        assert_eq!(entries[1].unit, Unit::Pieces);
    }

    #[test]
    fn test_english_split_on_quantity_unit_pairs() {
        let products = builtin_product_map();
        let entries = parse_speech_utterance("1.5kg salmon 150 g rice", Language::English, &products);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].product_id, id_of(&products, "Salmon"));
        assert_eq!(entries[0].quantity, 1500.0);
        assert_eq!(entries[0].unit, Unit::Grams);
        assert_eq!(entries[1].product_id, id_of(&products, "Rice (white)"));
        assert_eq!(entries[1].quantity, 150.0);
    }

    #[test]
    fn test_russian_utterance() {
        let products = builtin_product_map();
        let entries = parse_speech_utterance(
            "Я съел 200 грамм куриной грудки и два яйца на завтрак",
            Language::Russian,
            &products,
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].product_id, id_of(&products, "Chicken Breast"));
        assert_eq!(entries[0].quantity, 200.0);
        assert_eq!(entries[0].unit, Unit::Grams);
        assert_eq!(entries[1].product_id, id_of(&products, "Eggs"));
        assert_eq!(entries[1].quantity, 2.0);
        assert_eq!(entries[1].unit, Unit::Pieces);
    }

    #[test]
    fn test_russian_qualified_foods() {
        let products = builtin_product_map();
        let eggs = parse_speech_utterance("два куриных яйца", Language::Russian, &products);
        assert_eq!(
            eggs,
            vec![MealItem {
                product_id: id_of(&products, "Eggs"),
                quantity: 2.0,
                unit: Unit::Pieces,
            }]
        );

        let turkey = parse_speech_utterance("200 грамм грудки индейки", Language::Russian, &products);
        assert_eq!(
            turkey,
            vec![MealItem {
                product_id: id_of(&products, "Turkey Breast"),
                quantity: 200.0,
                unit: Unit::Grams,
            }]
        );

        let chicken = parse_speech_utterance("150 г куриной грудки", Language::Russian, &products);
        assert_eq!(chicken.len(), 1);
        assert_eq!(chicken[0].product_id, id_of(&products, "Chicken Breast"));
    }

    #[test]
    fn test_russian_litres_and_pair_split() {
        let products = builtin_product_map();
        let entries = parse_speech_utterance("0,5 л молока 100 г хлеба", Language::Russian, &products);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].product_id, id_of(&products, "Milk (2%)"));
        assert_eq!(entries[0].quantity, 500.0);
        assert_eq!(entries[0].unit, Unit::Millilitres);
        assert_eq!(entries[1].product_id, id_of(&products, "Bread (whole wheat)"));
        assert_eq!(entries[1].quantity, 100.0);
    }

    #[test]
    fn test_unrecognised_segments_are_dropped() {
        let products = builtin_product_map();
        assert!(parse_speech_utterance("", Language::English, &products).is_empty());
        assert!(parse_speech_utterance("hello there", Language::English, &products).is_empty());
        // No quantity
        assert!(parse_speech_utterance("some banana", Language::English, &products).is_empty());

        let entries = parse_speech_utterance(
            "100 g xyzzy and 2 banana",
            Language::English,
            &products,
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].product_id, id_of(&products, "Banana"));
        assert_eq!(entries[0].unit, Unit::Pieces);
    }
}
