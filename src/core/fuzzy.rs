//! Typo-tolerant product name scoring.
//!
//! A query is scored token by token against a product name. Each token earns
//! points for a substring hit (earlier and longer is better) or, failing that,
//! for an in-order subsequence hit. A token that matches neither way zeroes the
//! whole query. A second pass adds a bonus for tokens within a small edit
//! distance of some word of the name.

use crate::{core::macros::round_half_up, entities::ProductModel};
use std::cmp::Ordering;

/// Classic Levenshtein edit distance over chars, single-row DP.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let cost = usize::from(ca != cb);
            row[j + 1] = (above + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Points for one query token from the substring / subsequence pass, or `None`
/// when the token is not even a subsequence of the name.
#[allow(clippy::cast_precision_loss)]
fn match_points(name: &[char], token: &[char]) -> Option<f64> {
    if let Some(index) = name.windows(token.len()).position(|w| w == token) {
        let coverage = round_half_up(token.len() as f64 / name.len() as f64 * 20.0);
        return Some(100.0 - index as f64 + coverage.min(20.0));
    }

    let mut matched = 0;
    let mut gaps = 0;
    for c in name {
        if matched == token.len() {
            break;
        }
        if *c == token[matched] {
            matched += 1;
        } else {
            gaps += 1;
        }
    }
    if matched != token.len() {
        return None;
    }
    let density = token.len() as f64 / (token.len() + gaps) as f64;
    Some(50.0 + round_half_up(density * 20.0))
}

/// Bonus for a token within edit distance of some name word.
#[allow(clippy::cast_precision_loss)]
fn typo_bonus(name_tokens: &[&str], token: &str) -> f64 {
    let max_distance = (token.chars().count() / 4).clamp(1, 2);
    let best = name_tokens
        .iter()
        .map(|nt| levenshtein(token, nt))
        .min()
        .unwrap_or(usize::MAX);
    if best <= max_distance {
        30.0 + 5.0 * (max_distance - best) as f64
    } else {
        0.0
    }
}

/// Scores how well `query` matches `name`. Higher is better; 0 means no match.
///
/// An empty query scores 1 so that it matches everything.
#[must_use]
pub fn fuzzy_score(name: &str, query: &str) -> f64 {
    let name = name.to_lowercase();
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return 1.0;
    }

    let name_chars: Vec<char> = name.chars().collect();
    let name_tokens: Vec<&str> = name
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .filter(|t| !t.is_empty())
        .collect();
    let tokens: Vec<&str> = query.split_whitespace().collect();

    let mut total = 0.0;
    for token in &tokens {
        let token_chars: Vec<char> = token.chars().collect();
        match match_points(&name_chars, &token_chars) {
            Some(points) => total += points,
            None => return 0.0,
        }
    }
    for token in &tokens {
        total += typo_bonus(&name_tokens, token);
    }
    total
}

fn by_score_then_name(a: &(f64, &ProductModel), b: &(f64, &ProductModel)) -> Ordering {
    b.0.total_cmp(&a.0).then_with(|| a.1.name.cmp(&b.1.name))
}

/// The best-scoring product for `query`, ties going to the alphabetically first name.
///
/// Products scoring 0 are never returned.
pub fn best_match<'a, I>(products: I, query: &str) -> Option<&'a ProductModel>
where
    I: IntoIterator<Item = &'a ProductModel>,
{
    products
        .into_iter()
        .map(|p| (fuzzy_score(&p.name, query), p))
        .filter(|(score, _)| *score > 0.0)
        .min_by(by_score_then_name)
        .map(|(_, p)| p)
}

/// Products matching `query`, best first. An empty query lists every product by name.
pub fn search_products<'a, I>(products: I, query: &str) -> Vec<&'a ProductModel>
where
    I: IntoIterator<Item = &'a ProductModel>,
{
    if query.trim().is_empty() {
        let mut all: Vec<&ProductModel> = products.into_iter().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        return all;
    }

    let mut scored: Vec<(f64, &ProductModel)> = products
        .into_iter()
        .map(|p| (fuzzy_score(&p.name, query), p))
        .filter(|(score, _)| *score > 0.0)
        .collect();
    scored.sort_by(by_score_then_name);
    scored.into_iter().map(|(_, p)| p).collect()
}
