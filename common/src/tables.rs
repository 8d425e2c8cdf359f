//! 材料テーブル（類似グループ・置換表）
//!
//! 表記ゆれ（tomato / tomatoes / cherry tomato）と、
//! 代替可能な材料（milk → almond milk）を静的データとして保持する。
//! エンジンには不変の設定として注入する。

use crate::error::{Error, Result};
use crate::pantry::normalize_ingredient;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// 類似グループ（代表名 + 表記ゆれ）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarityGroup {
    pub canonical: String,
    #[serde(default)]
    pub variants: Vec<String>,
}

impl SimilarityGroup {
    pub fn new(canonical: &str, variants: &[&str]) -> Self {
        Self {
            canonical: canonical.to_string(),
            variants: variants.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// 代表名または表記ゆれに含まれるか
    pub fn contains(&self, name: &str) -> bool {
        self.canonical == name || self.variants.iter().any(|v| v == name)
    }

    /// 代表名を先頭にした全メンバー
    pub fn members(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.canonical.as_str()).chain(self.variants.iter().map(String::as_str))
    }

    fn normalized(&self) -> Self {
        Self {
            canonical: normalize_ingredient(&self.canonical),
            variants: self
                .variants
                .iter()
                .map(|v| normalize_ingredient(v))
                .filter(|v| !v.is_empty())
                .collect(),
        }
    }
}

/// 材料テーブル
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientTables {
    /// 類似グループ（先に定義されたものが優先）
    #[serde(default)]
    pub similarity: Vec<SimilarityGroup>,
    /// 材料 → 代替候補（候補は優先順）
    #[serde(default)]
    pub substitutions: BTreeMap<String, Vec<String>>,
}

impl IngredientTables {
    /// 組み込みテーブル
    pub fn builtin() -> Self {
        let similarity = vec![
            SimilarityGroup::new("tomato", &["tomatoes", "cherry tomato", "roma tomato"]),
            SimilarityGroup::new("onion", &["onions", "shallot", "scallion", "green onion"]),
            SimilarityGroup::new("cheese", &["cheddar", "mozzarella", "parmesan", "feta"]),
            SimilarityGroup::new("pepper", &["bell pepper", "green pepper", "red pepper"]),
            SimilarityGroup::new("oil", &["olive oil", "vegetable oil", "canola oil"]),
        ];

        let mut substitutions = BTreeMap::new();
        let mut sub = |key: &str, candidates: &[&str]| {
            substitutions.insert(
                key.to_string(),
                candidates.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            );
        };
        sub("milk", &["almond milk", "soy milk", "oat milk", "coconut milk"]);
        sub("butter", &["margarine", "olive oil", "coconut oil"]);
        sub("egg", &["flax egg", "applesauce", "chia egg"]);
        sub("chicken", &["turkey", "tofu", "tempeh"]);
        sub("beef", &["lamb", "pork", "plant-based beef"]);
        sub("pasta", &["rice noodles", "zucchini noodles", "quinoa"]);
        sub("rice", &["quinoa", "couscous", "bulgur"]);
        sub("flour", &["almond flour", "coconut flour", "oat flour"]);
        sub("sugar", &["honey", "maple syrup", "agave"]);
        sub("soy sauce", &["tamari", "coconut aminos", "worcestershire sauce"]);

        Self { similarity, substitutions }
    }

    /// JSONファイルから読み込み（非WASM環境のみ）
    #[cfg(not(feature = "wasm"))]
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => Error::Config(format!("{}: {}", path.display(), other)),
        })
    }

    /// JSON文字列から読み込み
    ///
    /// 1つの材料が代表名の異なる複数の類似グループに属する場合は `Error::Config`。
    pub fn from_json(json: &str) -> Result<Self> {
        let tables: Self = serde_json::from_str(json)?;
        let tables = tables.normalized();
        tables.validate()?;
        Ok(tables)
    }

    fn validate(&self) -> Result<()> {
        let mut owner: HashMap<&str, &str> = HashMap::new();
        for group in &self.similarity {
            for member in group.members() {
                match owner.get(member) {
                    Some(canonical) if *canonical != group.canonical => {
                        return Err(Error::Config(format!(
                            "材料 '{}' が類似グループ '{}' と '{}' の両方に含まれています",
                            member, canonical, group.canonical
                        )));
                    }
                    Some(_) => {}
                    None => {
                        owner.insert(member, group.canonical.as_str());
                    }
                }
            }
        }
        Ok(())
    }

    /// 全エントリを正規化（小文字化・空白除去、空の代表名は除外）
    pub fn normalized(&self) -> Self {
        let similarity = self
            .similarity
            .iter()
            .map(SimilarityGroup::normalized)
            .filter(|g| !g.canonical.is_empty())
            .collect();

        let substitutions = self
            .substitutions
            .iter()
            .map(|(key, candidates)| {
                let candidates = candidates
                    .iter()
                    .map(|c| normalize_ingredient(c))
                    .filter(|c| !c.is_empty())
                    .collect();
                (normalize_ingredient(key), candidates)
            })
            .filter(|(key, _)| !key.is_empty())
            .collect();

        Self { similarity, substitutions }
    }

    /// テーブルをマージ（後から追加した設定が優先）
    ///
    /// 同じ代表名のグループは置き換え、新しいグループは末尾に追加する。
    pub fn merge(&mut self, other: &IngredientTables) {
        for group in &other.similarity {
            match self.similarity.iter_mut().find(|g| g.canonical == group.canonical) {
                Some(existing) => *existing = group.clone(),
                None => self.similarity.push(group.clone()),
            }
        }
        self.substitutions.extend(other.substitutions.clone());
    }

    /// 材料が属する類似グループ（最初に見つかったもの）
    pub fn similarity_group(&self, ingredient: &str) -> Option<&SimilarityGroup> {
        self.similarity.iter().find(|g| g.contains(ingredient))
    }

    /// 材料の代替候補（優先順）
    pub fn substitutes(&self, ingredient: &str) -> &[String] {
        self.substitutions
            .get(ingredient)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
