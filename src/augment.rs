//! 生成AIレシピの取り込み
//!
//! 外部のテキスト生成APIが返したレスポンスをレシピとして取り込み、
//! 照合結果に重複なく追加する。API呼び出し自体は行わない。
//!
//! ## 処理フロー
//! 1. レスポンスからJSONを抽出してパース（失敗時は静的カタログから選択）
//! 2. IDのないレシピに採番
//! 3. 同じエンジンでスコアを計算し、既存の結果にないIDだけ末尾に追加

use recipe_match_common::{
    parse_generated_recipes, passes_filters, static_selection, MatchOptions, MatchResult, Pantry,
    Recipe, RecipeMatcher,
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;

/// 取り込んだレシピの出所
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationSource {
    /// 生成AIのレスポンス
    Ai,
    /// レスポンスなし（静的カタログから選択）
    Static,
    /// レスポンスを解析できなかったため静的カタログから選択
    StaticFallback,
}

impl fmt::Display for GenerationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationSource::Ai => write!(f, "ai"),
            GenerationSource::Static => write!(f, "static"),
            GenerationSource::StaticFallback => write!(f, "static-fallback"),
        }
    }
}

/// 取り込み結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedRecipes {
    pub source: GenerationSource,
    pub recipes: Vec<Recipe>,
}

/// IDのないレシピに `ai_<ハッシュ>_<番号>` を採番
///
/// ハッシュは `seed` とタイトルから計算するため、同じ入力なら同じIDになる。
pub fn assign_missing_ids(recipes: &mut [Recipe], seed: &str) {
    for (i, recipe) in recipes.iter_mut().enumerate() {
        if !recipe.id.trim().is_empty() {
            continue;
        }

        let mut hasher = Sha256::new();
        hasher.update(seed.as_bytes());
        hasher.update(recipe.title.as_bytes());
        let digest = hex::encode(hasher.finalize());

        recipe.id = format!("ai_{}_{}", &digest[..8], i);
    }
}

/// 生成レスポンスをレシピに変換
///
/// # Arguments
/// * `response` - 生成APIのレスポンス本文（なければ None）
/// * `catalog` - 代替に使う静的カタログ
/// * `options` - 代替選択に使うフィルタ
/// * `count` - 代替選択の件数
pub fn resolve_generated(
    response: Option<&str>,
    catalog: &[Recipe],
    options: &MatchOptions,
    count: usize,
) -> GeneratedRecipes {
    let Some(response) = response else {
        return GeneratedRecipes {
            source: GenerationSource::Static,
            recipes: static_selection(catalog, options, count),
        };
    };

    match parse_generated_recipes(response) {
        Ok(mut recipes) => {
            assign_missing_ids(&mut recipes, response);
            GeneratedRecipes {
                source: GenerationSource::Ai,
                recipes,
            }
        }
        Err(e) => {
            log::warn!("生成レシピを解析できないため静的カタログを使用: {}", e);
            GeneratedRecipes {
                source: GenerationSource::StaticFallback,
                recipes: static_selection(catalog, options, count),
            }
        }
    }
}

/// 生成レシピを照合結果に追加（IDで重複除去）
///
/// 既存の結果の順序は変えず、新しいレシピをスコア順に末尾へ追加する。
/// フィルタ条件と一致率0%の扱いは通常の照合と同じ。
pub fn merge_generated(
    matches: Vec<MatchResult>,
    generated: &[Recipe],
    matcher: &RecipeMatcher,
    pantry: &Pantry,
    options: &MatchOptions,
) -> Vec<MatchResult> {
    let mut seen: HashSet<String> = matches.iter().map(|m| m.recipe.id.clone()).collect();

    let mut additions: Vec<MatchResult> = generated
        .iter()
        .filter(|r| passes_filters(r, options))
        .filter(|r| seen.insert(r.id.clone()))
        .filter_map(|r| {
            let score = matcher.score_recipe(pantry, r);
            if score.ingredients.is_empty() {
                return None;
            }
            if score.match_score == 0 && !options.include_unmatched {
                return None;
            }
            Some(score.into_result(r))
        })
        .collect();

    additions.sort_by(|a, b| {
        b.match_score
            .cmp(&a.match_score)
            .then_with(|| a.recipe.time.cmp(&b.recipe.time))
    });

    log::debug!("生成レシピ: {}件中{}件を追加", generated.len(), additions.len());

    let mut merged = matches;
    merged.extend(additions);
    merged
}
