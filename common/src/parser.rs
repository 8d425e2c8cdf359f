//! 生成AIレスポンスパーサー
//!
//! テキスト生成APIのレスポンスからJSONを抽出し、
//! レシピ配列としてパースする

use crate::error::{Error, Result};
use crate::types::Recipe;
use serde_json::Value;

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の [...] 配列（最初の `[` から最後の `]` まで）
/// 3. エラー
///
/// # Examples
/// ```
/// use recipe_match_common::extract_json;
///
/// let response = "Here you go: [{\"id\": \"a\"}] enjoy!";
/// let json = extract_json(response).unwrap();
/// assert_eq!(json, "[{\"id\": \"a\"}]");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    // ```json ... ``` ブロックを探す
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + "```json".len();
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    // 生の [...] を探す
    if let Some(start) = response.find('[') {
        if let Some(end) = response.rfind(']') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

/// 生成されたレシピ配列をパース
///
/// オブジェクト以外の要素は読み飛ばす。`id` が欠けている要素は空文字のまま返すので、
/// 呼び出し側で採番すること。
pub fn parse_generated_recipes(response: &str) -> Result<Vec<Recipe>> {
    let json_str = extract_json(response)?;
    let value: Value = serde_json::from_str(json_str)
        .map_err(|e| Error::Parse(format!("レシピJSONパースエラー: {}", e)))?;

    let items = match value {
        Value::Array(items) => items,
        other => return Err(Error::Parse(format!("レシピ配列ではありません: {}", kind(&other)))),
    };

    let recipes = items
        .into_iter()
        .filter(Value::is_object)
        .map(serde_json::from_value::<Recipe>)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::Parse(format!("レシピJSONパースエラー: {}", e)))?;

    Ok(recipes)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // extract_json テスト
    // =============================================

    #[test]
    fn test_extract_json_with_block() {
        let response = r#"Here are your recipes:
```json
[
  {"id": "a1", "title": "Salad"}
]
```
Enjoy."#;

        let json = extract_json(response).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("Salad"));
    }

    #[test]
    fn test_extract_json_with_surrounding_text() {
        let response = r#"Sure! [{"id": "x"}] Hope this helps."#;
        assert_eq!(extract_json(response).unwrap(), r#"[{"id": "x"}]"#);
    }

    #[test]
    fn test_extract_json_error() {
        let result = extract_json("I cannot help with that.");
        if let Err(Error::Parse(msg)) = result {
            assert!(msg.contains("JSONが見つかりません"));
        } else {
            panic!("Expected Parse error");
        }
    }

    #[test]
    fn test_extract_json_reversed_brackets() {
        assert!(extract_json("] nothing [").is_err());
    }

    // =============================================
    // parse_generated_recipes テスト
    // =============================================

    #[test]
    fn test_parse_generated_recipes() {
        let response = r#"```json
[
  {
    "id": "ai-1",
    "title": "Tomato Soup",
    "cuisine": "Italian",
    "difficulty": "easy",
    "time": 25,
    "diet": ["vegan"],
    "ingredients": ["tomato", "onion", "olive oil"],
    "steps": ["Chop", "Simmer"],
    "nutrition": {"calories": 180, "protein": 4, "carbs": 20, "fat": 9},
    "description": "Warm soup"
  },
  {"title": "No Id Toast", "ingredients": ["bread"], "time": "10"}
]
```"#;

        let recipes = parse_generated_recipes(response).unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].id, "ai-1");
        assert_eq!(recipes[0].ingredients.len(), 3);
        assert_eq!(recipes[1].id, "");
        assert_eq!(recipes[1].time, 10);
    }

    #[test]
    fn test_parse_generated_recipes_skips_non_objects() {
        let recipes = parse_generated_recipes(r#"[1, "two", {"id": "ok"}]"#).unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].id, "ok");
    }

    #[test]
    fn test_parse_generated_recipes_invalid_json() {
        let result = parse_generated_recipes("[{\"id\": \"broken\",]");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_generated_recipes_not_array() {
        let result = parse_generated_recipes("```json\n{\"id\": \"x\"}\n```");
        if let Err(Error::Parse(msg)) = result {
            assert!(msg.contains("object"));
        } else {
            panic!("Expected Parse error");
        }
    }
}
