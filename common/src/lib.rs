//! Recipe Match Common Library
//!
//! レシピ照合の型・材料テーブル・照合エンジン（I/Oなし）

pub mod types;
pub mod error;
pub mod options;
pub mod pantry;
pub mod tables;
pub mod strategy;
pub mod filter;
pub mod engine;
pub mod parser;
pub mod prompts;

pub use types::{Difficulty, MatchResponse, MatchResult, Nutrition, Recipe, SubstitutionDetail};
pub use error::{Error, Result};
pub use options::{DietFilter, MatchOptions, MatchRequest, DEFAULT_RESULT_LIMIT};
pub use pantry::{normalize_ingredient, split_ingredient_list, Pantry};
pub use tables::{IngredientTables, SimilarityGroup};
pub use strategy::{IngredientMatch, MatchOutcome};
pub use filter::{filter_recipes, passes_filters, static_selection};
pub use engine::{match_recipes, rank_matches, NoPopularity, Popularity, RecipeMatcher, RecipeScore};
pub use parser::{extract_json, parse_generated_recipes};
pub use prompts::{build_generation_prompt, DEFAULT_GENERATION_COUNT, SYSTEM_PROMPT};
