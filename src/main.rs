use clap::Parser;
use recipe_match::{augment, catalog, cli, collector, config, error, ratings, render};
use recipe_match_common::{
    build_generation_prompt, IngredientTables, MatchRequest, Pantry, RecipeMatcher, SYSTEM_PROMPT,
};
use cli::{Cli, Commands, OutputFormat, QueryArgs};
use config::Config;
use error::{RecipeMatchError, Result};
use ratings::RatingBook;
use std::path::Path;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli) {
        eprintln!("エラー: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Match { query, limit, all, ratings, format, page, servings } => {
            let matcher = load_matcher(cli.tables.as_deref(), &config)?;
            let (request, pantry) = build_query(&query)?;
            let options = config.match_options(&request, &pantry, limit, all)?;

            let recipes = catalog::load_catalog(&config.resolve_catalog(query.catalog.as_deref())?)?;
            let book = load_ratings(&config, ratings.as_deref());

            log::info!("材料 {}件 / レシピ {}件で照合", pantry.len(), recipes.len());
            let matches = matcher.match_pantry(&pantry, &recipes, &options, &book);

            match format {
                OutputFormat::Json => println!("{}", render::render_json(&matches)?),
                OutputFormat::Text => {
                    println!("🍳 recipe-match - レシピ検索\n");
                    println!("材料: {}\n", pantry.items().join(", "));
                    print!("{}", render::render_text(&matches, page, config.page_size, servings));
                }
            }
        }

        Commands::Explain { recipe_id, query } => {
            let matcher = load_matcher(cli.tables.as_deref(), &config)?;
            let (_, pantry) = build_query(&query)?;
            let recipes = catalog::load_catalog(&config.resolve_catalog(query.catalog.as_deref())?)?;

            let recipe = recipes
                .iter()
                .find(|r| r.id == recipe_id)
                .ok_or_else(|| RecipeMatchError::RecipeNotFound(recipe_id.clone()))?;

            let score = matcher.score_recipe(&pantry, recipe);
            print!("{}", render::format_explanation(recipe, &score));
        }

        Commands::Augment { query, response, count, all, ratings, format, page } => {
            let matcher = load_matcher(cli.tables.as_deref(), &config)?;
            let (request, pantry) = build_query(&query)?;
            let options = config.match_options(&request, &pantry, None, all)?;

            let recipes = catalog::load_catalog(&config.resolve_catalog(query.catalog.as_deref())?)?;
            let book = load_ratings(&config, ratings.as_deref());

            let response_text = match &response {
                Some(path) => Some(read_response(path)?),
                None => None,
            };

            let matches = matcher.match_pantry(&pantry, &recipes, &options, &book);
            let generated = augment::resolve_generated(response_text.as_deref(), &recipes, &options, count);
            let before = matches.len();
            let merged = augment::merge_generated(matches, &generated.recipes, &matcher, &pantry, &options);

            match format {
                OutputFormat::Json => println!("{}", render::render_json(&merged)?),
                OutputFormat::Text => {
                    println!("✨ recipe-match - 生成レシピの追加\n");
                    println!("取得元: {} ({}件)", generated.source, generated.recipes.len());
                    println!("✔ {}件を追加\n", merged.len() - before);
                    print!("{}", render::render_text(&merged, page, config.page_size, 1.0));
                }
            }
        }

        Commands::Prompt { query, count, with_system } => {
            let (request, _) = build_query(&query)?;
            if with_system {
                println!("{}\n", SYSTEM_PROMPT);
            }
            println!("{}", build_generation_prompt(&request, count));
        }

        Commands::Tables { ingredient } => {
            let matcher = load_matcher(cli.tables.as_deref(), &config)?;
            let tables = matcher.tables();

            match ingredient {
                Some(name) => {
                    let name = recipe_match_common::normalize_ingredient(&name);
                    match tables.similarity_group(&name) {
                        Some(group) => println!("類似: {}", group.members().collect::<Vec<_>>().join(", ")),
                        None => println!("類似: なし"),
                    }
                    let substitutes = tables.substitutes(&name);
                    if substitutes.is_empty() {
                        println!("置換: なし");
                    } else {
                        println!("置換: {}", substitutes.join(", "));
                    }
                }
                None => println!("{}", serde_json::to_string_pretty(tables)?),
            }
        }

        Commands::Config { set_catalog, set_ratings, set_tables, show } => {
            let mut config = config;

            if let Some(path) = set_catalog {
                config.set_catalog(path)?;
                println!("✔ カタログを設定しました");
            }

            if let Some(path) = set_ratings {
                config.set_ratings(path)?;
                println!("✔ 評価ファイルを設定しました");
            }

            if let Some(path) = set_tables {
                config.set_tables(path)?;
                println!("✔ 材料テーブルを設定しました");
            }

            if show {
                let display = |p: &Option<std::path::PathBuf>| {
                    p.as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "未設定".to_string())
                };
                println!("設定:");
                println!("  カタログ: {}", display(&config.catalog_path));
                println!("  評価ファイル: {}", display(&config.ratings_path));
                println!("  材料テーブル: {}", display(&config.tables_path));
                println!("  最大件数: {}", config.result_limit);
                println!("  ページサイズ: {}", config.page_size);
                println!("  一致率0%を含める: {}", if config.include_unmatched { "はい" } else { "いいえ" });
            }
        }
    }

    Ok(())
}

/// 組み込みテーブルにカスタムテーブルを重ねて照合エンジンを作成
fn load_matcher(cli_tables: Option<&Path>, config: &Config) -> Result<RecipeMatcher> {
    let mut tables = IngredientTables::builtin();

    let custom_path = cli_tables.map(Path::to_path_buf).or_else(|| config.tables_path.clone());
    if let Some(path) = custom_path {
        if !path.exists() {
            return Err(RecipeMatchError::FileNotFound(path.display().to_string()));
        }
        let custom = IngredientTables::from_file(&path)?;
        log::debug!(
            "カスタムテーブル: 類似 {}件 / 置換 {}件",
            custom.similarity.len(),
            custom.substitutions.len()
        );
        tables.merge(&custom);
    }

    Ok(RecipeMatcher::new(tables))
}

/// リクエストファイルと引数から照合条件と在庫を作成（引数が優先）
fn build_query(query: &QueryArgs) -> Result<(MatchRequest, Pantry)> {
    let mut request = match &query.request {
        Some(path) => {
            if !path.exists() {
                return Err(RecipeMatchError::FileNotFound(path.display().to_string()));
            }
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str::<MatchRequest>(&content)?
        }
        None => MatchRequest::default(),
    };

    request.ingredients.extend(query.ingredients.iter().cloned());
    if let Some(diet) = &query.diet {
        request.diet = Some(diet.clone());
    }
    if let Some(difficulty) = &query.difficulty {
        request.difficulty = Some(difficulty.clone());
    }
    if let Some(max_time) = &query.max_time {
        request.max_time = Some(serde_json::Value::String(max_time.clone()));
    }

    let mut pantry = collector::pantry_from_args(&request.ingredients);
    if query.interactive {
        pantry = collector::collect_interactive(pantry)?;
    }
    request.ingredients = pantry.items().to_vec();

    Ok((request, pantry))
}

fn load_ratings(config: &Config, cli_path: Option<&Path>) -> RatingBook {
    config
        .resolve_ratings(cli_path)
        .map(|path| RatingBook::load(&path))
        .unwrap_or_default()
}

fn read_response(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(RecipeMatchError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Err(RecipeMatchError::Generator(format!(
            "レスポンスが空です: {}",
            path.display()
        )));
    }
    Ok(content)
}
