//! Meal candidate generator.
//!
//! Candidates are built from pairs and triples of available lots. Each lot
//! offers a handful of discretized portions; every combination of portions for
//! an item set is scored against an ideal macro target, and the best-scoring
//! combinations win.

use crate::{
    core::{
        eggs::{EggAllowance, count_eggs},
        expiration::{is_due_today_or_expired, is_expired},
        macros::{meal_macros, weight_in_grams},
        product::ProductMap,
    },
    entities::{ProductModel, inventory_lot},
    models::{MacroTotals, MealCandidate, MealItem, MealTier, Unit},
};
use chrono::NaiveDate;
use tracing::debug;

/// Portion ladder for gram/millilitre products
pub const PORTION_LADDER_GRAMS: [f64; 5] = [50.0, 100.0, 150.0, 200.0, 300.0];
/// Largest piece count offered for piece-based products
pub const MAX_PIECES_PER_PORTION: u32 = 3;
/// Fallback portion when no ladder size fits
pub const FALLBACK_PORTION_GRAMS: f64 = 100.0;
/// Portion combinations tried per item set
pub const MAX_COMBINATIONS_PER_SET: usize = 200;
/// Only this many leading lots take part in triples
pub const TRIPLE_POOL_SIZE: usize = 10;
/// Default number of candidates returned
pub const DEFAULT_MAX_CANDIDATES: usize = 3;
/// Score given to every meal when the target has no calories
pub const NO_TARGET_SCORE: f64 = 1000.0;

/// Knobs for one generator run
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOptions {
    /// How many candidates to return
    pub max_candidates: usize,
    /// Reference day for expiration filtering
    pub today: NaiveDate,
    /// Also drop lots due on `today` (planning for tomorrow)
    pub exclude_due_today: bool,
    /// Egg limit to respect, if the catalog has eggs
    pub egg_allowance: Option<EggAllowance>,
}

impl GeneratorOptions {
    /// Options for suggesting a meal to eat today.
    #[must_use]
    pub const fn for_today(today: NaiveDate) -> Self {
        Self {
            max_candidates: DEFAULT_MAX_CANDIDATES,
            today,
            exclude_due_today: false,
            egg_allowance: None,
        }
    }

    /// Options for simulating tomorrow's meals.
    #[must_use]
    pub const fn for_tomorrow(today: NaiveDate) -> Self {
        Self {
            exclude_due_today: true,
            ..Self::for_today(today)
        }
    }

    /// Sets the candidate cap.
    #[must_use]
    pub const fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    /// Sets the egg allowance.
    #[must_use]
    pub const fn with_egg_allowance(mut self, allowance: Option<EggAllowance>) -> Self {
        self.egg_allowance = allowance;
        self
    }
}

/// A lot the generator may draw from
#[derive(Debug, Clone, Copy)]
pub struct AvailableLot<'a> {
    /// Catalog product of the lot
    pub product: &'a ProductModel,
    /// Usable mass of the lot in grams
    pub max_grams: f64,
}

/// Filters lots down to the ones a meal can be built from.
///
/// Expired lots are always dropped, lots due today only when
/// `exclude_due_today` is set. Lots with unknown products or no usable mass
/// are dropped as well.
#[must_use]
pub fn available_lots<'a>(
    lots: &[inventory_lot::Model],
    products: &'a ProductMap,
    today: NaiveDate,
    exclude_due_today: bool,
) -> Vec<AvailableLot<'a>> {
    lots.iter()
        .filter(|lot| !is_expired(lot.expiration_date, today))
        .filter(|lot| !(exclude_due_today && is_due_today_or_expired(lot.expiration_date, today)))
        .filter_map(|lot| {
            let product = products.get(&lot.product_id)?;
            let max_grams = weight_in_grams(lot.quantity, lot.unit, product);
            (max_grams > 0.0).then_some(AvailableLot { product, max_grams })
        })
        .collect()
}

fn piece_weight(product: &ProductModel) -> Option<f64> {
    if product.default_unit == Unit::Pieces {
        product.piece_weight_grams.filter(|w| *w > 0.0)
    } else {
        None
    }
}

/// Portion sizes in grams offered for a lot holding `max_grams` of `product`.
#[must_use]
pub fn portion_sizes(max_grams: f64, product: &ProductModel) -> Vec<f64> {
    let mut portions: Vec<f64> = match piece_weight(product) {
        Some(weight) => (1..=MAX_PIECES_PER_PORTION)
            .map(|pieces| f64::from(pieces) * weight)
            .filter(|grams| *grams <= max_grams)
            .collect(),
        None => PORTION_LADDER_GRAMS
            .iter()
            .copied()
            .filter(|grams| *grams <= max_grams)
            .collect(),
    };
    if portions.is_empty() && max_grams > 0.0 {
        portions.push(max_grams.min(FALLBACK_PORTION_GRAMS));
    }
    portions
}

/// Bounded walk over the Cartesian product of per-item portion options.
///
/// The last item's option advances fastest. Stops after `cap` combinations
/// or when every combination has been produced.
#[derive(Debug, Clone)]
pub struct PortionCombinations<'a> {
    options: &'a [Vec<f64>],
    indices: Vec<usize>,
    produced: usize,
    cap: usize,
    exhausted: bool,
}

impl<'a> PortionCombinations<'a> {
    /// Starts a walk over `options` yielding at most `cap` combinations.
    #[must_use]
    pub fn new(options: &'a [Vec<f64>], cap: usize) -> Self {
        Self {
            options,
            indices: vec![0; options.len()],
            produced: 0,
            cap,
            exhausted: options.is_empty() || options.iter().any(Vec::is_empty),
        }
    }

    fn advance(&mut self) {
        for position in (0..self.indices.len()).rev() {
            self.indices[position] += 1;
            if self.indices[position] < self.options[position].len() {
                return;
            }
            self.indices[position] = 0;
        }
        self.exhausted = true;
    }
}

impl Iterator for PortionCombinations<'_> {
    type Item = Vec<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted || self.produced >= self.cap {
            return None;
        }
        let combination = self
            .indices
            .iter()
            .zip(self.options)
            .map(|(index, options)| options[*index])
            .collect();
        self.produced += 1;
        self.advance();
        Some(combination)
    }
}

/// Mean relative deviation of kcal, protein, fat and carbs from `ideal`.
///
/// Each denominator is floored at 1.
#[must_use]
pub fn average_deviation(meal: &MacroTotals, ideal: &MacroTotals) -> f64 {
    let deviation = |actual: f64, target: f64| (actual - target).abs() / target.max(1.0);
    (deviation(meal.kcal, ideal.kcal)
        + deviation(meal.protein, ideal.protein)
        + deviation(meal.fat, ideal.fat)
        + deviation(meal.carbs, ideal.carbs))
        / 4.0
}

/// Scores a meal against `ideal`. Lower is better.
///
/// A target without calories gives every meal [`NO_TARGET_SCORE`] and a red tier.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn score_meal(meal: &MacroTotals, ideal: &MacroTotals) -> (f64, MealTier) {
    if ideal.kcal == 0.0 {
        return (NO_TARGET_SCORE, MealTier::Red);
    }

    let avg = average_deviation(meal, ideal);
    let tier = if avg <= 0.10 {
        MealTier::Green
    } else if avg <= 0.20 {
        MealTier::Yellow
    } else {
        MealTier::Red
    };
    (avg * 100.0 + 0.5 * meal.simple_carbs, tier)
}

fn meal_item(lot: &AvailableLot<'_>, grams: f64) -> MealItem {
    let quantity = piece_weight(lot.product).map_or(grams, |weight| grams / weight);
    MealItem {
        product_id: lot.product.id,
        quantity,
        unit: lot.product.default_unit,
    }
}

fn candidates_for_set(
    set: &[AvailableLot<'_>],
    ideal: &MacroTotals,
    products: &ProductMap,
    egg_allowance: Option<&EggAllowance>,
    out: &mut Vec<MealCandidate>,
) {
    let options: Vec<Vec<f64>> = set
        .iter()
        .map(|lot| portion_sizes(lot.max_grams, lot.product))
        .collect();

    for portions in PortionCombinations::new(&options, MAX_COMBINATIONS_PER_SET) {
        let items: Vec<MealItem> = set
            .iter()
            .zip(&portions)
            .map(|(lot, grams)| meal_item(lot, *grams))
            .collect();

        if let Some(allowance) = egg_allowance {
            if count_eggs(&items, products, allowance.product_id) > allowance.remaining {
                continue;
            }
        }

        let totals = meal_macros(&items, products);
        let (score, tier) = score_meal(&totals, ideal);
        out.push(MealCandidate {
            items,
            totals,
            tier,
            score,
        });
    }
}

/// Suggests up to `options.max_candidates` meals closest to `ideal`, best first.
///
/// Returns an empty list when fewer than two lots are usable.
#[must_use]
pub fn generate_candidates(
    lots: &[inventory_lot::Model],
    products: &ProductMap,
    ideal: &MacroTotals,
    options: &GeneratorOptions,
) -> Vec<MealCandidate> {
    let available = available_lots(lots, products, options.today, options.exclude_due_today);
    let egg_allowance = options.egg_allowance.as_ref();
    let mut candidates = Vec::new();

    for i in 0..available.len() {
        for j in i + 1..available.len() {
            candidates_for_set(
                &[available[i], available[j]],
                ideal,
                products,
                egg_allowance,
                &mut candidates,
            );
        }
    }

    let pool = &available[..available.len().min(TRIPLE_POOL_SIZE)];
    for i in 0..pool.len() {
        for j in i + 1..pool.len() {
            for k in j + 1..pool.len() {
                candidates_for_set(
                    &[pool[i], pool[j], pool[k]],
                    ideal,
                    products,
                    egg_allowance,
                    &mut candidates,
                );
            }
        }
    }

    debug!(
        "Scored {} combinations from {} available lots",
        candidates.len(),
        available.len()
    );

    candidates.sort_by(|a, b| a.score.total_cmp(&b.score));
    candidates.truncate(options.max_candidates);
    candidates
}
