use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecipeMatchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("レシピカタログが見つかりません: {0}。`recipe-match config --set-catalog PATH` で設定してください")]
    CatalogNotFound(String),

    #[error("レシピカタログが不正: {0}: {1}")]
    InvalidCatalog(String, String),

    #[error("レシピが見つかりません: {0}")]
    RecipeNotFound(String),

    #[error("レシピ生成エラー: {0}")]
    Generator(String),

    #[error("材料が入力されていません")]
    NoIngredients,

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] recipe_match_common::Error),
}

pub type Result<T> = std::result::Result<T, RecipeMatchError>;
