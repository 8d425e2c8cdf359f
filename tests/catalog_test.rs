//! カタログ・評価ファイル・設定の読み込みテスト

use recipe_match::catalog::{list_catalog_files, load_catalog};
use recipe_match::config::Config;
use recipe_match::ratings::RatingBook;
use recipe_match_common::{Difficulty, Popularity};
use std::path::PathBuf;
use tempfile::tempdir;

const CATALOG: &str = r#"[
  {
    "id": "r1",
    "title": "Tomato Pasta",
    "cuisine": "Italian",
    "difficulty": "easy",
    "time": 20,
    "diet": ["vegetarian"],
    "ingredients": ["pasta", "tomato", "garlic"],
    "steps": ["Boil pasta", "Make sauce"],
    "nutrition": { "calories": 400, "protein": 12, "carbs": 70, "fat": 8 }
  },
  {
    "id": 2,
    "title": "Omelette",
    "difficulty": "unknown",
    "time": "10 min",
    "ingredients": ["egg", "butter"]
  }
]"#;

/// 単一ファイルのカタログ（IDや時間の表記ゆれを許容）
#[test]
fn test_load_catalog_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("recipes.json");
    std::fs::write(&path, CATALOG).unwrap();

    let recipes = load_catalog(&path).expect("カタログ読み込み失敗");
    assert_eq!(recipes.len(), 2);

    assert_eq!(recipes[0].difficulty, Some(Difficulty::Easy));
    assert!(recipes[0].nutrition.is_some());

    assert_eq!(recipes[1].id, "2");
    assert_eq!(recipes[1].time, 10);
    assert_eq!(recipes[1].difficulty, None);
}

/// フォルダのカタログ（ファイル名順、配列と単一オブジェクトの混在、重複IDは先勝ち）
#[test]
fn test_load_catalog_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("a.json"), CATALOG).unwrap();
    std::fs::write(
        dir.path().join("b.json"),
        r#"{ "id": "r3", "title": "Rice", "time": 30, "ingredients": ["rice"] }"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("c.json"),
        r#"[{ "id": "r1", "title": "Duplicate", "ingredients": ["x"] }]"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a catalog").unwrap();

    let files = list_catalog_files(dir.path());
    assert_eq!(files.len(), 3);

    let recipes = load_catalog(dir.path()).expect("カタログ読み込み失敗");
    let ids: Vec<&str> = recipes.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["r1", "2", "r3"]);
    assert_eq!(recipes[0].title, "Tomato Pasta");
}

/// 空フォルダは空のカタログ
#[test]
fn test_load_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let recipes = load_catalog(dir.path()).expect("カタログ読み込み失敗");
    assert!(recipes.is_empty());
}

/// 評価ファイルの読み込み
#[test]
fn test_rating_book_load() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("ratings.json");
    std::fs::write(&path, r#"{ "r1": 5, "r2": 3.5 }"#).unwrap();

    let book = RatingBook::load(&path);
    assert_eq!(book.len(), 2);
    assert_eq!(book.popularity("r2"), 3.5);
    assert_eq!(book.popularity("r9"), 0.0);
}

/// 壊れた評価ファイルは無視
#[test]
fn test_rating_book_corrupt_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("ratings.json");
    std::fs::write(&path, "not json").unwrap();

    let book = RatingBook::load(&path);
    assert!(book.is_empty());
}

/// 設定の保存と読み込み
#[test]
fn test_config_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("config.json");

    let config = Config {
        catalog_path: Some(PathBuf::from("/recipes")),
        page_size: 10,
        include_unmatched: true,
        ..Default::default()
    };
    config.save_to(&path).expect("設定保存失敗");

    let loaded = Config::load_from(&path).expect("設定読み込み失敗");
    assert_eq!(loaded, config);
}

/// 設定ファイルがなければデフォルト
#[test]
fn test_config_missing_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let loaded = Config::load_from(&dir.path().join("config.json")).expect("設定読み込み失敗");
    assert_eq!(loaded, Config::default());
}
