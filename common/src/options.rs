//! 照合オプション
//!
//! - MatchRequest: 境界で受け取る入力（型の揺れを許容）
//! - MatchOptions: エンジンに渡す型付きの設定
//!
//! 不正な値（数値でない maxTime、未知の難易度など）はエラーにせず「制約なし」に倒す。

use crate::types::Difficulty;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 返却する最大件数
pub const DEFAULT_RESULT_LIMIT: usize = 20;

/// 「制約なし」を表すフィルタ値
pub const ANY: &str = "any";

/// 先頭の整数を取り出す（"30 min" → 30、"abc" → None）
pub fn parse_leading_int(value: &str) -> Option<i64> {
    lazy_static::lazy_static! {
        static ref LEADING_INT_RE: Regex = Regex::new(r"^\s*([+-]?\d+)").unwrap();
    }

    LEADING_INT_RE
        .captures(value)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

/// 食事制限フィルタ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DietFilter {
    #[default]
    Any,
    /// 正規化済みタグを含むレシピのみ
    Only(String),
}

impl DietFilter {
    pub fn parse(value: &str) -> Self {
        let normalized = value.trim().to_lowercase();
        if normalized.is_empty() || normalized == ANY {
            DietFilter::Any
        } else {
            DietFilter::Only(normalized)
        }
    }

    pub fn allows(&self, tags: &[String]) -> bool {
        match self {
            DietFilter::Any => true,
            DietFilter::Only(tag) => tags.iter().any(|t| t.trim().to_lowercase() == *tag),
        }
    }
}

/// 照合オプション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOptions {
    pub diet: DietFilter,
    /// None なら難易度を問わない
    pub difficulty: Option<Difficulty>,
    /// 最大調理時間（分）。None なら制約なし
    pub max_time: Option<i64>,
    /// 返却件数の上限
    pub limit: usize,
    /// 一致率0%のレシピも結果に含める
    pub include_unmatched: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            diet: DietFilter::Any,
            difficulty: None,
            max_time: None,
            limit: DEFAULT_RESULT_LIMIT,
            include_unmatched: false,
        }
    }
}

impl MatchOptions {
    pub fn with_diet(mut self, diet: &str) -> Self {
        self.diet = DietFilter::parse(diet);
        self
    }

    pub fn with_difficulty(mut self, difficulty: &str) -> Self {
        self.difficulty = parse_difficulty(difficulty);
        self
    }

    pub fn with_max_time(mut self, max_time: &str) -> Self {
        self.max_time = parse_max_time(max_time);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_unmatched(mut self, include: bool) -> Self {
        self.include_unmatched = include;
        self
    }
}

/// 難易度フィルタ値をパース（"any"・未知の値は制約なし）
pub fn parse_difficulty(value: &str) -> Option<Difficulty> {
    value.parse().ok()
}

/// 最大時間フィルタ値をパース（"any"・数値でない値は制約なし）
pub fn parse_max_time(value: &str) -> Option<i64> {
    if value.trim().eq_ignore_ascii_case(ANY) {
        return None;
    }
    parse_leading_int(value)
}

/// 照合リクエスト（境界の入力形式）
///
/// ```json
/// { "ingredients": ["tomato"], "diet": "vegan", "difficulty": "easy", "maxTime": "30" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub ingredients: Vec<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub diet: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub difficulty: Option<String>,

    /// 数値または文字列
    #[serde(default)]
    pub max_time: Option<Value>,
}

impl MatchRequest {
    /// 型付きオプションへ変換
    pub fn options(&self) -> MatchOptions {
        let mut options = MatchOptions::default();
        if let Some(diet) = &self.diet {
            options.diet = DietFilter::parse(diet);
        }
        if let Some(difficulty) = &self.difficulty {
            options.difficulty = parse_difficulty(difficulty);
        }
        options.max_time = match &self.max_time {
            Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Some(Value::String(s)) => parse_max_time(s),
            _ => None,
        };
        options
    }

    /// プロンプト表示用のフィルタ値
    pub fn diet_label(&self) -> &str {
        self.diet.as_deref().unwrap_or(ANY)
    }

    pub fn difficulty_label(&self) -> &str {
        self.difficulty.as_deref().unwrap_or(ANY)
    }

    pub fn max_time_label(&self) -> String {
        match &self.max_time {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            _ => ANY.to_string(),
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    })
}
