//! レシピ評価（読み取り専用）
//!
//! `{ "レシピID": 評価 }` 形式のJSONファイルを読み込み、
//! 照合結果の同点時の並び順に使う。ファイルがなくてもエラーにしない。

use recipe_match_common::Popularity;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// 評価データ
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingBook {
    ratings: HashMap<String, f64>,
}

impl RatingBook {
    /// 評価ファイルを読み込み
    ///
    /// ファイルがない場合・壊れている場合は空の評価を返す。
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                log::warn!("評価ファイルを開けません: {}: {}", path.display(), e);
                return Self::default();
            }
        };

        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, HashMap<String, f64>>(reader) {
            Ok(ratings) => Self { ratings },
            Err(e) => {
                log::warn!("評価ファイルが不正なため無視します: {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_map(ratings: HashMap<String, f64>) -> Self {
        Self { ratings }
    }

    /// レシピの評価（未評価は0）
    pub fn rating(&self, recipe_id: &str) -> f64 {
        self.ratings.get(recipe_id).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

impl Popularity for RatingBook {
    fn popularity(&self, recipe_id: &str) -> f64 {
        let rating = self.rating(recipe_id);
        if rating.is_finite() {
            rating
        } else {
            0.0
        }
    }
}
