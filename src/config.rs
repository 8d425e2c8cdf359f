use crate::error::{RecipeMatchError, Result};
use recipe_match_common::{MatchOptions, MatchRequest, Pantry, DEFAULT_RESULT_LIMIT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// カタログパスを上書きする環境変数
pub const CATALOG_ENV: &str = "RECIPE_MATCH_CATALOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog_path: Option<PathBuf>,
    pub ratings_path: Option<PathBuf>,
    pub tables_path: Option<PathBuf>,
    pub result_limit: usize,
    pub page_size: usize,
    pub include_unmatched: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            ratings_path: None,
            tables_path: None,
            result_limit: DEFAULT_RESULT_LIMIT,
            page_size: 5,
            include_unmatched: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| RecipeMatchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("recipe-match"))
    }

    /// カタログのパスを解決（引数 → 環境変数 → 設定ファイル の順）
    pub fn resolve_catalog(&self, cli_path: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = cli_path {
            return Ok(path.to_path_buf());
        }

        // 環境変数を優先
        if let Ok(path) = std::env::var(CATALOG_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }

        self.catalog_path
            .clone()
            .ok_or_else(|| RecipeMatchError::CatalogNotFound("未設定".into()))
    }

    /// 評価ファイルのパス（未設定なら設定ディレクトリの ratings.json）
    pub fn resolve_ratings(&self, cli_path: Option<&Path>) -> Option<PathBuf> {
        cli_path
            .map(Path::to_path_buf)
            .or_else(|| self.ratings_path.clone())
            .or_else(|| Self::config_dir().ok().map(|d| d.join("ratings.json")))
    }

    /// 検索条件と設定値から照合オプションを作成（match / augment 共通）
    ///
    /// `all` または設定の `include_unmatched` で一致率0%も含める。
    /// どちらでもなく材料が空なら `NoIngredients`。
    pub fn match_options(
        &self,
        request: &MatchRequest,
        pantry: &Pantry,
        limit: Option<usize>,
        all: bool,
    ) -> Result<MatchOptions> {
        let include_unmatched = all || self.include_unmatched;
        if pantry.is_empty() && !include_unmatched {
            return Err(RecipeMatchError::NoIngredients);
        }

        Ok(request
            .options()
            .with_limit(limit.unwrap_or(self.result_limit))
            .with_unmatched(include_unmatched))
    }

    pub fn set_catalog(&mut self, path: PathBuf) -> Result<()> {
        self.catalog_path = Some(path);
        self.save()
    }

    pub fn set_ratings(&mut self, path: PathBuf) -> Result<()> {
        self.ratings_path = Some(path);
        self.save()
    }

    pub fn set_tables(&mut self, path: PathBuf) -> Result<()> {
        self.tables_path = Some(path);
        self.save()
    }
}
