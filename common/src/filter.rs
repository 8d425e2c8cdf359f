//! レシピの絞り込み（食事制限・難易度・最大時間）
//!
//! 絞り込みはスコア計算より前に行う。除外されたレシピはスコアに関係なく結果に出ない。

use crate::options::MatchOptions;
use crate::types::Recipe;

/// レシピがフィルタ条件を満たすか
pub fn passes_filters(recipe: &Recipe, options: &MatchOptions) -> bool {
    // 負の調理時間はデータ不整合として除外
    if recipe.time < 0 {
        return false;
    }

    if !options.diet.allows(&recipe.diet) {
        return false;
    }

    if let Some(difficulty) = options.difficulty {
        if recipe.difficulty != Some(difficulty) {
            return false;
        }
    }

    if let Some(max_time) = options.max_time {
        if recipe.time > max_time {
            return false;
        }
    }

    true
}

/// 条件を満たすレシピを元の順序で返す
pub fn filter_recipes<'r>(recipes: &'r [Recipe], options: &MatchOptions) -> Vec<&'r Recipe> {
    recipes.iter().filter(|r| passes_filters(r, options)).collect()
}

/// スコアを使わない静的な選択（生成AIが使えない場合の代替）
///
/// カタログ順に条件を満たすレシピを `count` 件まで返す。
pub fn static_selection(recipes: &[Recipe], options: &MatchOptions, count: usize) -> Vec<Recipe> {
    recipes
        .iter()
        .filter(|r| passes_filters(r, options))
        .take(count)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Difficulty;

    fn recipe(id: &str, difficulty: Difficulty, time: i64, diet: &[&str]) -> Recipe {
        Recipe {
            id: id.to_string(),
            difficulty: Some(difficulty),
            time,
            diet: diet.iter().map(|d| d.to_string()).collect(),
            ingredients: vec!["egg".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_diet_filter_excludes() {
        let options = MatchOptions::default().with_diet("vegan");
        assert!(!passes_filters(&recipe("a", Difficulty::Easy, 10, &["vegetarian"]), &options));
        assert!(passes_filters(&recipe("b", Difficulty::Easy, 10, &["Vegan", "gluten-free"]), &options));
    }

    #[test]
    fn test_difficulty_filter() {
        let options = MatchOptions::default().with_difficulty("HARD");
        assert!(passes_filters(&recipe("a", Difficulty::Hard, 90, &[]), &options));
        assert!(!passes_filters(&recipe("b", Difficulty::Easy, 10, &[]), &options));

        let unknown = Recipe { difficulty: None, ..recipe("c", Difficulty::Hard, 10, &[]) };
        assert!(!passes_filters(&unknown, &options));
    }

    #[test]
    fn test_max_time_filter_inclusive() {
        let options = MatchOptions::default().with_max_time("30");
        assert!(passes_filters(&recipe("a", Difficulty::Easy, 30, &[]), &options));
        assert!(!passes_filters(&recipe("b", Difficulty::Easy, 31, &[]), &options));
    }

    #[test]
    fn test_non_numeric_max_time_unconstrained() {
        let options = MatchOptions::default().with_max_time("whenever");
        assert!(passes_filters(&recipe("a", Difficulty::Easy, 600, &[]), &options));
    }

    #[test]
    fn test_negative_time_excluded() {
        let options = MatchOptions::default();
        assert!(!passes_filters(&recipe("a", Difficulty::Easy, -5, &[]), &options));
    }

    #[test]
    fn test_static_selection_keeps_catalog_order() {
        let recipes = vec![
            recipe("a", Difficulty::Easy, 10, &["vegan"]),
            recipe("b", Difficulty::Easy, 10, &[]),
            recipe("c", Difficulty::Medium, 20, &["vegan"]),
            recipe("d", Difficulty::Easy, 5, &["vegan"]),
        ];
        let options = MatchOptions::default().with_diet("vegan");

        let selected = static_selection(&recipes, &options, 2);
        let ids: Vec<&str> = selected.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);

        assert_eq!(filter_recipes(&recipes, &options).len(), 3);
    }
}
