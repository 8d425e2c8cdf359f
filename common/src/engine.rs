//! レシピ照合エンジン
//!
//! 手持ち材料とカタログを照合し、一致率の高い順に並べる純粋関数。
//! I/Oや共有の可変状態を持たないため、複数リクエストから同時に呼び出せる。
//!
//! ## 処理フロー
//! 1. フィルタ（食事制限・難易度・最大時間）で絞り込み
//! 2. レシピごとに材料を照合してスコアを計算（`parallel` 機能有効時は並列）
//! 3. 一致率 → 人気度 → 調理時間 の順で安定ソートし、上位を返す

use crate::filter::passes_filters;
use crate::options::MatchOptions;
use crate::pantry::{normalize_ingredients, Pantry};
use crate::strategy::{
    evaluate_ingredients, ExactMatch, IngredientMatch, MatchOutcome, MatchStrategy,
    SimilarityMatch, SubstitutionMatch,
};
use crate::tables::IngredientTables;
use crate::types::{MatchResult, Recipe, SubstitutionDetail};
use std::collections::HashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// 同点時の並び順に使う人気度（評価など）
///
/// 外部の評価データはエンジンの外で保持し、呼び出し時に注入する。
pub trait Popularity: Sync {
    fn popularity(&self, recipe_id: &str) -> f64;
}

/// 人気度なし（すべて0）
pub struct NoPopularity;

impl Popularity for NoPopularity {
    fn popularity(&self, _recipe_id: &str) -> f64 {
        0.0
    }
}

impl Popularity for HashMap<String, f64> {
    fn popularity(&self, recipe_id: &str) -> f64 {
        self.get(recipe_id).copied().unwrap_or(0.0)
    }
}

/// 1レシピのスコア内訳
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeScore {
    /// 材料ごとの照合結果（重複除去後の材料順）
    pub ingredients: Vec<IngredientMatch>,
    pub have: usize,
    pub similar: usize,
    pub substituted: usize,
    pub needed: usize,
    pub match_score: u8,
}

impl RecipeScore {
    fn from_matches(ingredients: Vec<IngredientMatch>) -> Self {
        let count = |pred: fn(&MatchOutcome) -> bool| {
            ingredients.iter().filter(|m| pred(&m.outcome)).count()
        };
        let have = count(|o| matches!(o, MatchOutcome::Exact));
        let similar = count(|o| matches!(o, MatchOutcome::Similar(_)));
        let substituted = count(|o| matches!(o, MatchOutcome::Substituted(_)));
        let needed = ingredients.len().max(1);
        let tenths = ingredients.iter().map(|m| m.outcome.weight_tenths()).sum::<u64>();
        let match_score = compute_match_score(tenths, needed);

        Self {
            ingredients,
            have,
            similar,
            substituted,
            needed,
            match_score,
        }
    }

    /// 置換の詳細（材料順）
    pub fn substitution_details(&self) -> Vec<SubstitutionDetail> {
        self.ingredients
            .iter()
            .filter_map(|m| match &m.outcome {
                MatchOutcome::Substituted(substitute) => Some(SubstitutionDetail {
                    original: m.ingredient.clone(),
                    substitute: substitute.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    /// 出力形式へ変換
    ///
    /// `have` は完全一致と類似一致の合計。
    pub fn into_result(self, recipe: &Recipe) -> MatchResult {
        MatchResult {
            recipe: recipe.clone(),
            match_score: self.match_score,
            have: self.have + self.similar,
            needed: self.needed,
            substitutions_suggested: self.substituted,
            substitution_details: self.substitution_details(),
        }
    }
}

/// 一致率を計算（0〜100、四捨五入）
///
/// `tenths` は材料ごとの重み（10分の1単位）の合計。
/// `tenths / 10 / 必要数 × 100` を整数演算で求める。
pub fn compute_match_score(tenths: u64, needed: usize) -> u8 {
    let needed = needed.max(1) as u64;
    // round(tenths * 10 / needed)、0.5は切り上げ
    let score = (tenths * 20 + needed) / (needed * 2);
    score.min(100) as u8
}

/// 照合エンジン
#[derive(Debug, Clone)]
pub struct RecipeMatcher {
    tables: IngredientTables,
}

impl Default for RecipeMatcher {
    fn default() -> Self {
        Self::new(IngredientTables::builtin())
    }
}

impl RecipeMatcher {
    pub fn new(tables: IngredientTables) -> Self {
        Self {
            tables: tables.normalized(),
        }
    }

    pub fn tables(&self) -> &IngredientTables {
        &self.tables
    }

    /// 1レシピのスコアを計算（フィルタは適用しない）
    pub fn score_recipe(&self, pantry: &Pantry, recipe: &Recipe) -> RecipeScore {
        let required = normalize_ingredients(&recipe.ingredients);
        let exact = ExactMatch;
        let similar = SimilarityMatch { tables: &self.tables };
        let substitution = SubstitutionMatch { tables: &self.tables };
        let chain: [&dyn MatchStrategy; 3] = [&exact, &similar, &substitution];

        RecipeScore::from_matches(evaluate_ingredients(&required, pantry, &chain))
    }

    /// 手持ち材料とカタログを照合
    pub fn match_recipes<S: AsRef<str>>(
        &self,
        available: &[S],
        recipes: &[Recipe],
        options: &MatchOptions,
    ) -> Vec<MatchResult> {
        self.match_recipes_with(available, recipes, options, &NoPopularity)
    }

    /// 人気度を同点時の並び順に使って照合
    pub fn match_recipes_with<S: AsRef<str>>(
        &self,
        available: &[S],
        recipes: &[Recipe],
        options: &MatchOptions,
        popularity: &dyn Popularity,
    ) -> Vec<MatchResult> {
        let pantry = Pantry::from_inputs(available);
        self.match_pantry(&pantry, recipes, options, popularity)
    }

    /// 正規化済みパントリーで照合
    pub fn match_pantry(
        &self,
        pantry: &Pantry,
        recipes: &[Recipe],
        options: &MatchOptions,
        popularity: &dyn Popularity,
    ) -> Vec<MatchResult> {
        let candidates: Vec<&Recipe> = recipes
            .iter()
            .filter(|r| passes_filters(r, options))
            .collect();

        #[cfg(feature = "parallel")]
        let scored: Vec<MatchResult> = candidates
            .par_iter()
            .filter_map(|r| self.score_candidate(pantry, r, options))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let scored: Vec<MatchResult> = candidates
            .iter()
            .filter_map(|r| self.score_candidate(pantry, r, options))
            .collect();

        log::debug!(
            "照合: カタログ{}件 → フィルタ後{}件 → 採用{}件",
            recipes.len(),
            candidates.len(),
            scored.len()
        );

        rank_matches(scored, popularity, options.limit)
    }

    /// 結果に含めるレシピだけスコア付きで返す
    fn score_candidate(
        &self,
        pantry: &Pantry,
        recipe: &Recipe,
        options: &MatchOptions,
    ) -> Option<MatchResult> {
        let score = self.score_recipe(pantry, recipe);

        // 材料のないレシピは常に除外
        if score.ingredients.is_empty() {
            log::debug!("材料なしのため除外: {}", recipe.id);
            return None;
        }
        if score.match_score == 0 && !options.include_unmatched {
            return None;
        }

        Some(score.into_result(recipe))
    }
}

/// 一致率（降順）→ 人気度（降順）→ 調理時間（昇順）で安定ソートし、上位 `limit` 件を返す
pub fn rank_matches(
    matches: Vec<MatchResult>,
    popularity: &dyn Popularity,
    limit: usize,
) -> Vec<MatchResult> {
    let mut keyed: Vec<(f64, MatchResult)> = matches
        .into_iter()
        .map(|m| (popularity.popularity(&m.recipe.id), m))
        .collect();

    keyed.sort_by(|(pop_a, a), (pop_b, b)| {
        b.match_score
            .cmp(&a.match_score)
            .then_with(|| pop_b.total_cmp(pop_a))
            .then_with(|| a.recipe.time.cmp(&b.recipe.time))
    });

    keyed.into_iter().take(limit).map(|(_, m)| m).collect()
}

/// 組み込みテーブルで照合
///
/// # Examples
/// ```
/// use recipe_match_common::{match_recipes, MatchOptions, Recipe};
///
/// let recipes = vec![Recipe {
///     id: "r1".to_string(),
///     ingredients: vec!["tomato".to_string()],
///     ..Default::default()
/// }];
/// let matches = match_recipes(&["Cherry Tomato"], &recipes, &MatchOptions::default());
/// assert_eq!(matches[0].match_score, 90);
/// ```
pub fn match_recipes<S: AsRef<str>>(
    available: &[S],
    recipes: &[Recipe],
    options: &MatchOptions,
) -> Vec<MatchResult> {
    RecipeMatcher::default().match_recipes(available, recipes, options)
}
