//! レシピカタログ読み込みモジュール
//!
//! - JSONファイル: レシピ配列
//! - フォルダ: 直下の `*.json` をファイル名順に読み込み（配列または単一レシピ）

use crate::error::{RecipeMatchError, Result};
use recipe_match_common::Recipe;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// カタログを読み込む
///
/// 同じIDのレシピが複数ある場合は最初のものを残す。
pub fn load_catalog(path: &Path) -> Result<Vec<Recipe>> {
    if !path.exists() {
        return Err(RecipeMatchError::CatalogNotFound(path.display().to_string()));
    }

    let files = if path.is_dir() {
        list_catalog_files(path)
    } else {
        vec![path.to_path_buf()]
    };

    let mut recipes = Vec::new();
    for file in &files {
        let loaded = load_catalog_file(file)?;
        log::debug!("カタログ読み込み: {} ({}件)", file.display(), loaded.len());
        recipes.extend(loaded);
    }

    Ok(dedup_by_id(recipes))
}

/// フォルダ直下のJSONファイル一覧（ファイル名順）
pub fn list_catalog_files(folder: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        })
        .collect();

    files.sort();
    files
}

/// 1ファイルを読み込む（配列または単一レシピ）
pub fn load_catalog_file(file: &Path) -> Result<Vec<Recipe>> {
    let content = std::fs::read_to_string(file)?;
    let invalid = |reason: String| RecipeMatchError::InvalidCatalog(file.display().to_string(), reason);

    let value: Value = serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;
    match value {
        Value::Array(_) => serde_json::from_value(value).map_err(|e| invalid(e.to_string())),
        Value::Object(_) => serde_json::from_value(value)
            .map(|recipe| vec![recipe])
            .map_err(|e| invalid(e.to_string())),
        _ => Err(invalid("レシピ配列またはレシピオブジェクトが必要です".into())),
    }
}

fn dedup_by_id(recipes: Vec<Recipe>) -> Vec<Recipe> {
    let mut seen = HashSet::new();
    recipes
        .into_iter()
        .filter(|r| {
            if r.id.is_empty() || seen.insert(r.id.clone()) {
                true
            } else {
                log::warn!("重複したレシピIDを無視: {}", r.id);
                false
            }
        })
        .collect()
}
