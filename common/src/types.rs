//! レシピ・照合結果の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - Recipe: カタログから読み込むレシピ（エンジンへの入力、不変）
//! - MatchResult: 照合エンジンの出力（Recipe + スコア情報）
//! - MatchResponse: 境界での出力形式 `{ "matches": [...] }`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 難易度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(format!("Unknown difficulty: {}. Use easy, medium, or hard", s)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// 栄養情報（1人前）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Nutrition {
    /// 人数分に換算した栄養情報
    pub fn scaled(&self, servings: f64) -> Self {
        let factor = if servings.is_finite() && servings > 0.0 { servings } else { 1.0 };
        Self {
            calories: self.calories * factor,
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
        }
    }
}

/// カタログのレシピ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub cuisine: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, deserialize_with = "de::difficulty", skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,

    /// 調理時間（分）。負値はフィルタで除外される
    #[serde(default, deserialize_with = "de::minutes")]
    pub time: i64,

    /// 食事制限タグ（空なら制約なし）
    #[serde(default, deserialize_with = "de::string_list")]
    pub diet: Vec<String>,

    #[serde(default, deserialize_with = "de::string_list")]
    pub ingredients: Vec<String>,

    #[serde(default, deserialize_with = "de::string_list")]
    pub steps: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
}

/// 置換の詳細（元の材料 → 手元にある代替材料）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionDetail {
    pub original: String,
    pub substitute: String,
}

/// 照合結果（1レシピにつき1件）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    #[serde(flatten)]
    pub recipe: Recipe,

    /// 0〜100の一致率
    pub match_score: u8,

    /// 完全一致・類似一致の数
    pub have: usize,

    /// 必要な材料の種類数（最低1）
    pub needed: usize,

    pub substitutions_suggested: usize,

    #[serde(default)]
    pub substitution_details: Vec<SubstitutionDetail>,
}

/// 照合APIの出力
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    pub matches: Vec<MatchResult>,
}

/// 生成AIやJSON入力の揺れを吸収するデシリアライザ
mod de {
    use super::Difficulty;
    use crate::options::parse_leading_int;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        })
    }

    pub fn difficulty<'de, D>(deserializer: D) -> Result<Option<Difficulty>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s.parse().ok(),
            _ => None,
        })
    }

    pub fn minutes<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .unwrap_or(0),
            Value::String(s) => parse_leading_int(&s).unwrap_or(0),
            _ => 0,
        })
    }

    pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
            Value::String(s) => vec![s],
            _ => Vec::new(),
        })
    }
}
