//! 手持ち材料（パントリー）
//!
//! 材料名は小文字化・前後空白除去で比較する。

use std::collections::HashSet;

/// 材料名を正規化
pub fn normalize_ingredient(name: &str) -> String {
    name.trim().to_lowercase()
}

/// 材料リストを正規化（空要素を除去、重複は最初の出現を残す）
pub fn normalize_ingredients<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .map(|n| normalize_ingredient(n.as_ref()))
        .filter(|n| !n.is_empty())
        .filter(|n| seen.insert(n.clone()))
        .collect()
}

/// カンマ区切りの入力を分割（"tomato, onion" → ["tomato", "onion"]）
pub fn split_ingredient_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// 正規化済みの手持ち材料
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pantry {
    items: Vec<String>,
    index: HashSet<String>,
}

impl Pantry {
    pub fn from_inputs<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items = normalize_ingredients(inputs);
        let index = items.iter().cloned().collect();
        Self { items, index }
    }

    /// 正規化済みの名前で存在確認
    pub fn contains(&self, normalized: &str) -> bool {
        self.index.contains(normalized)
    }

    /// 材料を追加（既にあれば false）
    pub fn add(&mut self, name: &str) -> bool {
        let normalized = normalize_ingredient(name);
        if normalized.is_empty() || !self.index.insert(normalized.clone()) {
            return false;
        }
        self.items.push(normalized);
        true
    }

    /// 材料を削除（なければ false）
    pub fn remove(&mut self, name: &str) -> bool {
        let normalized = normalize_ingredient(name);
        if !self.index.remove(&normalized) {
            return false;
        }
        self.items.retain(|i| *i != normalized);
        true
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
