//! 照合結果の表示
//!
//! - テキスト: ページ単位のレシピカード
//! - JSON: `{ "matches": [...] }`

use crate::error::Result;
use recipe_match_common::{MatchOutcome, MatchResponse, MatchResult, Recipe, RecipeScore};
use std::fmt::Write;

/// ページ情報
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// 1始まりのページ番号
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

/// 結果をページに分割
///
/// ページ番号は1〜最終ページに丸める。`per_page` が0なら全件を1ページにする。
pub fn paginate(matches: &[MatchResult], page: usize, per_page: usize) -> (&[MatchResult], PageInfo) {
    let total = matches.len();
    let per_page = if per_page == 0 { total.max(1) } else { per_page };
    let total_pages = total.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let start = ((page - 1) * per_page).min(total);
    let end = (start + per_page).min(total);

    (
        &matches[start..end],
        PageInfo {
            page,
            total_pages,
            total,
        },
    )
}

/// レシピカード
pub fn format_card(result: &MatchResult, servings: f64) -> String {
    let recipe = &result.recipe;
    let mut out = String::new();

    let difficulty = recipe
        .difficulty
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());

    let _ = writeln!(out, "■ {} [{}]", recipe.title, recipe.id);
    let _ = writeln!(
        out,
        "  {} • {}分 • {} • 一致率 {}% ({}/{})",
        if recipe.cuisine.is_empty() { "-" } else { recipe.cuisine.as_str() },
        recipe.time,
        difficulty,
        result.match_score,
        result.have,
        result.needed
    );

    if !recipe.description.is_empty() {
        let _ = writeln!(out, "  {}", recipe.description);
    }
    if !recipe.diet.is_empty() {
        let _ = writeln!(out, "  食事制限: {}", recipe.diet.join(", "));
    }

    let _ = writeln!(out, "  材料: {}", recipe.ingredients.join(", "));

    for detail in &result.substitution_details {
        let _ = writeln!(out, "  置換: {} → {}", detail.original, detail.substitute);
    }

    if !recipe.steps.is_empty() {
        let _ = writeln!(out, "  手順:");
        for (i, step) in recipe.steps.iter().enumerate() {
            let _ = writeln!(out, "    {}. {}", i + 1, step);
        }
    }

    if let Some(nutrition) = recipe.nutrition {
        let scaled = nutrition.scaled(servings);
        let _ = writeln!(
            out,
            "  栄養({}人前): {:.0}kcal / たんぱく質 {:.1}g / 炭水化物 {:.1}g / 脂質 {:.1}g",
            servings,
            scaled.calories,
            scaled.protein,
            scaled.carbs,
            scaled.fat
        );
    }

    out
}

/// テキスト形式で1ページ分を出力
pub fn render_text(matches: &[MatchResult], page: usize, per_page: usize, servings: f64) -> String {
    if matches.is_empty() {
        return "一致するレシピが見つかりませんでした。\n".to_string();
    }

    let (items, info) = paginate(matches, page, per_page);
    let mut out = String::new();

    for item in items {
        out.push_str(&format_card(item, servings));
        out.push('\n');
    }

    let _ = writeln!(out, "ページ {}/{}（全{}件）", info.page, info.total_pages, info.total);
    out
}

/// JSON形式で出力
pub fn render_json(matches: &[MatchResult]) -> Result<String> {
    let response = MatchResponse {
        matches: matches.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&response)?)
}

/// 材料ごとの照合内訳
pub fn format_explanation(recipe: &Recipe, score: &RecipeScore) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "■ {} [{}]", recipe.title, recipe.id);
    for m in &score.ingredients {
        let detail = match &m.outcome {
            MatchOutcome::Similar(via) | MatchOutcome::Substituted(via) => format!(" ({})", via),
            MatchOutcome::Exact | MatchOutcome::Unmet => String::new(),
        };
        let _ = writeln!(
            out,
            "  {:<10} x{:.1}  {}{}",
            m.outcome.label(),
            m.outcome.weight(),
            m.ingredient,
            detail
        );
    }
    let _ = writeln!(
        out,
        "  一致率 {}%（完全一致 {} / 類似 {} / 置換 {} / 必要 {}）",
        score.match_score, score.have, score.similar, score.substituted, score.needed
    );

    out
}
