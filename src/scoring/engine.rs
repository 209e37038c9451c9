use serde::Serialize;

use super::inputs::InputRecord;
use crate::catalog::{Catalog, Category};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactorScore {
    pub factor: String,
    pub option: String,
    pub score: i32,
}

/// Sum of one category's factor weights for one method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryScore {
    pub score: i32,
    /// Factors that had a value, in declaration order
    pub breakdown: Vec<FactorScore>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryScores {
    pub geometry: CategoryScore,
    pub ore_zone: CategoryScore,
    pub hanging_wall: CategoryScore,
    pub footwall: CategoryScore,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> &CategoryScore {
        match category {
            Category::Geometry => &self.geometry,
            Category::OreZone => &self.ore_zone,
            Category::HangingWall => &self.hanging_wall,
            Category::Footwall => &self.footwall,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryScore)> {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    pub fn total(&self) -> i32 {
        self.geometry.score + self.ore_zone.score + self.hanging_wall.score + self.footwall.score
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodResult {
    pub method: String,
    pub total_score: i32,
    /// Authoritative disqualification, whatever the total says
    pub is_eliminated: bool,
    pub elimination_reasons: Vec<String>,
    pub category_scores: CategoryScores,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoringResult {
    /// One result per method, in catalog order
    pub results: Vec<MethodResult>,
    /// `results` by total score, highest first; ties keep catalog order
    pub ranked_methods: Vec<MethodResult>,
    pub recommended_methods: Vec<MethodResult>,
    pub eliminated_methods: Vec<MethodResult>,
}

impl ScoringResult {
    /// 1-based position of `method` in the ranking.
    pub fn rank_of(&self, method: &str) -> Option<usize> {
        self.ranked_methods
            .iter()
            .position(|r| r.method == method)
            .map(|i| i + 1)
    }

    pub fn result_for(&self, method: &str) -> Option<&MethodResult> {
        self.results.iter().find(|r| r.method == method)
    }
}

/// Score the factors of one category for one method.
///
/// Factors without a value are skipped and left out of the breakdown.
pub fn score_category(
    catalog: &Catalog,
    method: &str,
    category: Category,
    inputs: &InputRecord,
) -> CategoryScore {
    let mut score = 0;
    let mut breakdown = Vec::new();

    for factor in &catalog.category(category).factors {
        let Some(option) = inputs.get(factor) else {
            continue;
        };
        let weight = catalog.weight(method, factor, option);
        score += weight;
        breakdown.push(FactorScore {
            factor: factor.clone(),
            option: option.to_string(),
            score: weight,
        });
    }

    CategoryScore { score, breakdown }
}

/// Score one method across all four categories and check for elimination.
pub fn calculate_method_result(
    catalog: &Catalog,
    method: &str,
    inputs: &InputRecord,
) -> MethodResult {
    let category_scores = CategoryScores {
        geometry: score_category(catalog, method, Category::Geometry, inputs),
        ore_zone: score_category(catalog, method, Category::OreZone, inputs),
        hanging_wall: score_category(catalog, method, Category::HangingWall, inputs),
        footwall: score_category(catalog, method, Category::Footwall, inputs),
    };

    let total_score = category_scores.total();

    // Every eliminating factor is reported, not just the first
    let elimination_reasons: Vec<String> = category_scores
        .iter()
        .flat_map(|(_, category)| category.breakdown.iter())
        .filter(|entry| catalog.is_eliminating(entry.score))
        .map(|entry| {
            let label = catalog
                .factor(&entry.factor)
                .map(|f| f.label.as_str())
                .unwrap_or(entry.factor.as_str());
            format!("{}: {} (score: {})", label, entry.option, entry.score)
        })
        .collect();

    MethodResult {
        method: method.to_string(),
        total_score,
        is_eliminated: !elimination_reasons.is_empty(),
        elimination_reasons,
        category_scores,
    }
}

/// Score every catalog method, rank them, and split recommended from eliminated.
///
/// Inputs are expected to have passed [`super::validate_inputs`]; missing or
/// unknown values contribute zero rather than failing.
pub fn calculate_scores(catalog: &Catalog, inputs: &InputRecord) -> ScoringResult {
    let results: Vec<MethodResult> = catalog
        .methods()
        .iter()
        .map(|method| calculate_method_result(catalog, method, inputs))
        .collect();

    // Vec::sort_by is stable, so equal totals keep catalog order
    let mut ranked_methods = results.clone();
    ranked_methods.sort_by(|a, b| b.total_score.cmp(&a.total_score));

    let (recommended_methods, eliminated_methods): (Vec<_>, Vec<_>) = ranked_methods
        .iter()
        .cloned()
        .partition(|r| !r.is_eliminated);

    tracing::debug!(
        methods = results.len(),
        recommended = recommended_methods.len(),
        eliminated = eliminated_methods.len(),
        top = ranked_methods.first().map(|r| r.method.as_str()).unwrap_or("-"),
        "methods ranked"
    );

    ScoringResult {
        results,
        ranked_methods,
        recommended_methods,
        eliminated_methods,
    }
}
