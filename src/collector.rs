//! 材料入力モジュール
//!
//! - 引数: `-i "milk, egg" -i flour` のようなカンマ区切り
//! - 対話: 1行ずつ入力、空行で終了、`-材料名` で削除

use crate::error::{RecipeMatchError, Result};
use dialoguer::Input;
use recipe_match_common::{normalize_ingredient, split_ingredient_list, Pantry};

/// 1行分の入力操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PantryEdit {
    /// 材料を追加
    Add(String),
    /// 材料を削除
    Remove(String),
    /// 入力終了
    Done,
}

/// 引数の材料リストから在庫を作成
pub fn pantry_from_args(values: &[String]) -> Pantry {
    Pantry::from_inputs(values.iter().flat_map(|v| split_ingredient_list(v)))
}

/// 入力行を操作に変換
pub fn parse_edit(line: &str) -> PantryEdit {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return PantryEdit::Done;
    }

    match trimmed.strip_prefix('-') {
        Some(rest) => PantryEdit::Remove(normalize_ingredient(rest)),
        None => PantryEdit::Add(trimmed.to_string()),
    }
}

/// 操作を在庫に適用（変更があれば true）
pub fn apply_edit(pantry: &mut Pantry, edit: &PantryEdit) -> bool {
    match edit {
        PantryEdit::Add(line) => {
            let mut changed = false;
            for item in split_ingredient_list(line) {
                changed |= pantry.add(&item);
            }
            changed
        }
        PantryEdit::Remove(item) => pantry.remove(item),
        PantryEdit::Done => false,
    }
}

/// 対話式で材料を入力
///
/// `initial` の材料から開始し、空行で確定する。
pub fn collect_interactive(initial: Pantry) -> Result<Pantry> {
    let mut pantry = initial;

    println!("🥕 材料を入力してください");
    println!("---");
    println!("操作: [材料名]追加（カンマ区切り可） [-材料名]削除 [Enter]確定");
    println!("---\n");

    loop {
        if !pantry.is_empty() {
            println!("  在庫: {}", pantry.items().join(", "));
        }

        let line: String = Input::new()
            .with_prompt("材料")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| RecipeMatchError::Config(format!("入力エラー: {}", e)))?;

        let edit = parse_edit(&line);
        if edit == PantryEdit::Done {
            break;
        }

        if !apply_edit(&mut pantry, &edit) {
            match &edit {
                PantryEdit::Remove(item) => println!("  → 在庫にありません: {}", item),
                _ => println!("  → 変更なし"),
            }
        }
    }

    println!("\n✓ 材料 {}件", pantry.len());
    Ok(pantry)
}
