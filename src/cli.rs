use clap::{Args, Parser, Subcommand};
use recipe_match_common::DEFAULT_GENERATION_COUNT;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recipe-match")]
#[command(about = "手持ち材料からレシピを探すツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// カスタム材料テーブル（JSON、組み込みテーブルに追加）
    #[arg(long, global = true)]
    pub tables: Option<PathBuf>,
}

/// 材料とフィルタの共通引数
#[derive(Args, Clone, Debug, Default)]
pub struct QueryArgs {
    /// 手持ち材料（カンマ区切り、複数指定可）
    #[arg(short, long = "ingredient")]
    pub ingredients: Vec<String>,

    /// 対話式で材料を入力
    #[arg(long)]
    pub interactive: bool,

    /// 照合リクエストJSON（ingredients/diet/difficulty/maxTime）
    #[arg(long)]
    pub request: Option<PathBuf>,

    /// 食事制限 (vegan/vegetarian/... any)
    #[arg(short, long)]
    pub diet: Option<String>,

    /// 難易度 (easy/medium/hard/any)
    #[arg(long)]
    pub difficulty: Option<String>,

    /// 最大調理時間（分）
    #[arg(short = 't', long)]
    pub max_time: Option<String>,

    /// レシピカタログ（JSONファイルまたはフォルダ）
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 手持ち材料でレシピを検索
    Match {
        #[command(flatten)]
        query: QueryArgs,

        /// 最大件数（省略時は設定値）
        #[arg(short, long)]
        limit: Option<usize>,

        /// 一致率0%のレシピも表示
        #[arg(long)]
        all: bool,

        /// 評価ファイル（同点時の並び順に使用）
        #[arg(long)]
        ratings: Option<PathBuf>,

        /// 出力形式 (text/json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// 表示ページ
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// 栄養表示の人数
        #[arg(short, long, default_value = "1")]
        servings: f64,
    },

    /// 1レシピの照合内訳を表示
    Explain {
        /// レシピID
        #[arg(required = true)]
        recipe_id: String,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// 生成AIのレシピを結果に追加
    Augment {
        #[command(flatten)]
        query: QueryArgs,

        /// 生成APIのレスポンスファイル（省略時はカタログから選択）
        #[arg(short, long)]
        response: Option<PathBuf>,

        /// 代替選択の件数
        #[arg(short = 'n', long, default_value_t = DEFAULT_GENERATION_COUNT)]
        count: usize,

        /// 一致率0%のレシピも表示
        #[arg(long)]
        all: bool,

        /// 評価ファイル
        #[arg(long)]
        ratings: Option<PathBuf>,

        /// 出力形式 (text/json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// 表示ページ
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// レシピ生成プロンプトを出力
    Prompt {
        #[command(flatten)]
        query: QueryArgs,

        /// 生成するレシピ数
        #[arg(short = 'n', long, default_value_t = DEFAULT_GENERATION_COUNT)]
        count: usize,

        /// システムプロンプトも出力
        #[arg(long)]
        with_system: bool,
    },

    /// 類似・置換テーブルを表示
    Tables {
        /// 材料を指定して該当エントリのみ表示
        #[arg(short, long)]
        ingredient: Option<String>,
    },

    /// 設定を表示/編集
    Config {
        /// カタログのパスを設定
        #[arg(long)]
        set_catalog: Option<PathBuf>,

        /// 評価ファイルのパスを設定
        #[arg(long)]
        set_ratings: Option<PathBuf>,

        /// カスタム材料テーブルのパスを設定
        #[arg(long)]
        set_tables: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_parse_match_command() {
        let cli = Cli::try_parse_from([
            "recipe-match", "match", "-i", "milk, egg", "-i", "flour", "--diet", "vegan", "-t", "30", "--all",
        ])
        .unwrap();

        match cli.command {
            Commands::Match { query, all, format, .. } => {
                assert_eq!(query.ingredients.len(), 2);
                assert_eq!(query.diet.as_deref(), Some("vegan"));
                assert_eq!(query.max_time.as_deref(), Some("30"));
                assert!(all);
                assert_eq!(format, OutputFormat::Text);
            }
            _ => panic!("match コマンドとして解析されていない"),
        }
    }

    #[test]
    fn test_parse_augment_all_and_page() {
        let cli = Cli::try_parse_from([
            "recipe-match", "augment", "-i", "tomato", "-r", "response.txt", "--all", "-p", "2",
        ])
        .unwrap();

        match cli.command {
            Commands::Augment { all, page, response, .. } => {
                assert!(all);
                assert_eq!(page, 2);
                assert_eq!(response, Some(PathBuf::from("response.txt")));
            }
            _ => panic!("augment コマンドとして解析されていない"),
        }

        let cli = Cli::try_parse_from(["recipe-match", "augment", "-i", "tomato"]).unwrap();
        match cli.command {
            Commands::Augment { all, page, .. } => {
                assert!(!all);
                assert_eq!(page, 1);
            }
            _ => panic!("augment コマンドとして解析されていない"),
        }
    }
}
