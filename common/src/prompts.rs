//! プロンプト生成モジュール
//!
//! 外部のテキスト生成APIにレシピを生成させるためのプロンプト。
//! API呼び出し自体はこのクレートでは行わない。

use crate::options::MatchRequest;

/// システムプロンプト
pub const SYSTEM_PROMPT: &str = "You are a strict JSON-producing assistant.";

/// 1回の生成で要求するレシピ数の既定値
pub const DEFAULT_GENERATION_COUNT: usize = 5;

/// レシピ生成プロンプトを構築
///
/// # Arguments
/// * `request` - 照合リクエスト（材料とフィルタ）
/// * `count` - 生成するレシピ数
///
/// # Returns
/// 厳密なJSON配列での出力を求めるプロンプト文字列
pub fn build_generation_prompt(request: &MatchRequest, count: usize) -> String {
    let ingredients = if request.ingredients.is_empty() {
        "none".to_string()
    } else {
        request.ingredients.join(", ")
    };

    format!(
        "You are a helpful recipe generator. Given available ingredients: {ingredients}, \
dietary preference: {diet}, difficulty: {difficulty}, maxTime: {max_time}. \
Please generate {count} recipe objects strictly as a JSON array. \
Each recipe object must have these fields: id (unique short string), title, cuisine, \
difficulty (easy|medium|hard), time (minutes integer), diet (array), ingredients (array of strings), \
steps (array of short strings), nutrition (object with calories, protein, carbs, fat as integers), \
description (short). Return only valid JSON - no extra commentary.",
        diet = request.diet_label(),
        difficulty = request.difficulty_label(),
        max_time = request.max_time_label(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_generation_prompt() {
        let request: MatchRequest = serde_json::from_str(
            r#"{"ingredients": ["tomato", "egg"], "diet": "vegetarian", "maxTime": 30}"#,
        )
        .unwrap();

        let prompt = build_generation_prompt(&request, 3);
        assert!(prompt.contains("tomato, egg"));
        assert!(prompt.contains("dietary preference: vegetarian"));
        assert!(prompt.contains("difficulty: any"));
        assert!(prompt.contains("maxTime: 30"));
        assert!(prompt.contains("generate 3 recipe objects"));
    }

    #[test]
    fn test_build_generation_prompt_no_ingredients() {
        let prompt = build_generation_prompt(&MatchRequest::default(), DEFAULT_GENERATION_COUNT);
        assert!(prompt.contains("available ingredients: none"));
        assert!(prompt.contains("generate 5 recipe objects"));
    }
}
