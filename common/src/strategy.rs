//! 材料ごとの照合戦略
//!
//! 完全一致 → 類似一致 → 置換 → 不足 の順に戦略を並べ、各材料に加点候補を列挙させる。
//!
//! ## 評価順序
//! 1. 満点の一致（完全一致）を材料順に確定
//! 2. 残りの材料と手持ち材料を、類似・置換の重みの合計が最大になるよう割り当て
//!
//! 手持ち材料1つにつき、1レシピ内で加点できるのは1回まで。
//! 完全一致を先に確定させるため、完全一致が類似・置換に格下げされることはない。

use crate::pantry::Pantry;
use crate::tables::IngredientTables;
use std::collections::{HashMap, HashSet};

/// 満点の重み（10分の1単位）
pub const FULL_CREDIT_TENTHS: u64 = 10;

/// 材料1つの照合結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// 手持ちにそのまま存在
    Exact,
    /// 同じ類似グループの材料が手持ちにある（値は使った手持ち材料）
    Similar(String),
    /// 代替材料が手持ちにある（値は使った代替材料）
    Substituted(String),
    /// 該当なし
    Unmet,
}

impl MatchOutcome {
    /// 重み（10分の1単位）: 完全一致 1.0 / 類似 0.9 / 置換 0.7
    pub fn weight_tenths(&self) -> u64 {
        match self {
            MatchOutcome::Exact => FULL_CREDIT_TENTHS,
            MatchOutcome::Similar(_) => 9,
            MatchOutcome::Substituted(_) => 7,
            MatchOutcome::Unmet => 0,
        }
    }

    pub fn weight(&self) -> f64 {
        self.weight_tenths() as f64 / 10.0
    }

    pub fn is_unmet(&self) -> bool {
        matches!(self, MatchOutcome::Unmet)
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchOutcome::Exact => "exact",
            MatchOutcome::Similar(_) => "similar",
            MatchOutcome::Substituted(_) => "substitute",
            MatchOutcome::Unmet => "missing",
        }
    }
}

/// 材料ごとの照合結果（レシピの材料順）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientMatch {
    pub ingredient: String,
    pub outcome: MatchOutcome,
}

/// 1レシピの評価中に使える手持ち材料
pub struct PantryPool<'p> {
    pantry: &'p Pantry,
    used: HashSet<String>,
}

impl<'p> PantryPool<'p> {
    pub fn new(pantry: &'p Pantry) -> Self {
        Self {
            pantry,
            used: HashSet::new(),
        }
    }

    /// 手持ちにあり、まだ加点に使っていないか
    pub fn is_available(&self, item: &str) -> bool {
        self.pantry.contains(item) && !self.used.contains(item)
    }

    fn take(&mut self, item: &str) {
        self.used.insert(item.to_string());
    }
}

/// 加点候補（結果と、加点に使う手持ち材料）
pub type Candidate = (MatchOutcome, String);

/// 照合戦略
pub trait MatchStrategy: Sync {
    /// 使える手持ち材料ごとの結果を優先順に返す
    fn candidates(&self, ingredient: &str, pool: &PantryPool<'_>) -> Vec<Candidate>;
}

/// 完全一致
pub struct ExactMatch;

impl MatchStrategy for ExactMatch {
    fn candidates(&self, ingredient: &str, pool: &PantryPool<'_>) -> Vec<Candidate> {
        if pool.is_available(ingredient) {
            vec![(MatchOutcome::Exact, ingredient.to_string())]
        } else {
            Vec::new()
        }
    }
}

/// 類似グループによる一致
pub struct SimilarityMatch<'t> {
    pub tables: &'t IngredientTables,
}

impl MatchStrategy for SimilarityMatch<'_> {
    fn candidates(&self, ingredient: &str, pool: &PantryPool<'_>) -> Vec<Candidate> {
        // グループに属さない材料は単独グループ（完全一致以外の加点なし）
        let Some(group) = self.tables.similarity_group(ingredient) else {
            return Vec::new();
        };
        group
            .members()
            .filter(|member| *member != ingredient && pool.is_available(member))
            .map(|member| (MatchOutcome::Similar(member.to_string()), member.to_string()))
            .collect()
    }
}

/// 置換表による一致
pub struct SubstitutionMatch<'t> {
    pub tables: &'t IngredientTables,
}

impl MatchStrategy for SubstitutionMatch<'_> {
    fn candidates(&self, ingredient: &str, pool: &PantryPool<'_>) -> Vec<Candidate> {
        self.tables
            .substitutes(ingredient)
            .iter()
            .filter(|candidate| pool.is_available(candidate))
            .map(|candidate| (MatchOutcome::Substituted(candidate.clone()), candidate.clone()))
            .collect()
    }
}

/// 戦略を順に適用して材料ごとの結果を求める
///
/// # Arguments
/// * `required` - 正規化・重複除去済みの必要材料
/// * `pantry` - 手持ち材料
/// * `chain` - 優先順の戦略
///
/// # Returns
/// 必要材料と同じ順序の照合結果
pub fn evaluate_ingredients(
    required: &[String],
    pantry: &Pantry,
    chain: &[&dyn MatchStrategy],
) -> Vec<IngredientMatch> {
    let mut outcomes = vec![MatchOutcome::Unmet; required.len()];
    let mut pool = PantryPool::new(pantry);

    // 1. 満点の一致を確定
    for (idx, ingredient) in required.iter().enumerate() {
        let full = chain.iter().find_map(|strategy| {
            strategy
                .candidates(ingredient, &pool)
                .into_iter()
                .find(|(outcome, _)| outcome.weight_tenths() == FULL_CREDIT_TENTHS)
        });
        if let Some((outcome, item)) = full {
            pool.take(&item);
            outcomes[idx] = outcome;
        }
    }

    // 2. 残りを重み最大で割り当て
    let open: Vec<usize> = (0..required.len()).filter(|&i| outcomes[i].is_unmet()).collect();
    let mut item_index: HashMap<String, usize> = HashMap::new();
    let mut edges: Vec<Vec<(usize, MatchOutcome)>> = Vec::with_capacity(open.len());

    for &idx in &open {
        let mut row: Vec<(usize, MatchOutcome)> = Vec::new();
        for strategy in chain {
            for (outcome, item) in strategy.candidates(&required[idx], &pool) {
                let weight = outcome.weight_tenths();
                if weight == 0 || weight >= FULL_CREDIT_TENTHS {
                    continue;
                }
                let next = item_index.len();
                let j = *item_index.entry(item).or_insert(next);
                // 同じ手持ち材料は重みの大きい候補だけ残す
                match row.iter_mut().find(|(existing, _)| *existing == j) {
                    Some(slot) if slot.1.weight_tenths() < weight => slot.1 = outcome,
                    Some(_) => {}
                    None => row.push((j, outcome)),
                }
            }
        }
        edges.push(row);
    }

    let weights: Vec<Vec<(usize, u64)>> = edges
        .iter()
        .map(|row| row.iter().map(|(j, o)| (*j, o.weight_tenths())).collect())
        .collect();

    for (row, assigned) in max_weight_assignment(&weights, item_index.len()).into_iter().enumerate() {
        if let Some(j) = assigned {
            if let Some((_, outcome)) = edges[row].iter().find(|(item, _)| *item == j) {
                outcomes[open[row]] = outcome.clone();
            }
        }
    }

    required
        .iter()
        .cloned()
        .zip(outcomes)
        .map(|(ingredient, outcome)| IngredientMatch { ingredient, outcome })
        .collect()
}

/// 材料と手持ち材料の重み最大の割り当て（1対1）
///
/// 利得が正の増加路がなくなるまで、利得最大の増加路で割り当てを更新する。
/// 同じ利得なら材料順・候補順で先のものを選ぶ。
///
/// # Arguments
/// * `edges` - 材料ごとの `(手持ち材料の番号, 重み)`
/// * `item_count` - 手持ち材料の数
///
/// # Returns
/// 材料ごとに割り当てた手持ち材料の番号
fn max_weight_assignment(edges: &[Vec<(usize, u64)>], item_count: usize) -> Vec<Option<usize>> {
    let n = edges.len();
    let source = n + item_count;
    let sink = source + 1;
    let node_count = sink + 1;

    let mut by_ingredient: Vec<Option<usize>> = vec![None; n];
    let mut by_item: Vec<Option<usize>> = vec![None; item_count];

    let weight = |i: usize, j: usize| -> i64 {
        edges[i]
            .iter()
            .find(|(item, _)| *item == j)
            .map_or(0, |(_, w)| *w as i64)
    };

    // 割り当てが1組ずつ増えるので、繰り返しは材料数まで
    for _ in 0..n {
        let mut gain: Vec<Option<i64>> = vec![None; node_count];
        let mut parent = vec![source; node_count];
        gain[source] = Some(0);

        for _ in 0..node_count {
            let mut changed = false;

            for i in 0..n {
                if by_ingredient[i].is_none() {
                    changed |= relax(&mut gain, &mut parent, source, i, 0);
                }
            }
            for (i, row) in edges.iter().enumerate() {
                for &(j, w) in row {
                    if by_ingredient[i] != Some(j) {
                        changed |= relax(&mut gain, &mut parent, i, n + j, w as i64);
                    }
                }
            }
            for (j, owner) in by_item.iter().enumerate() {
                match owner {
                    Some(i) => changed |= relax(&mut gain, &mut parent, n + j, *i, -weight(*i, j)),
                    None => changed |= relax(&mut gain, &mut parent, n + j, sink, 0),
                }
            }

            if !changed {
                break;
            }
        }

        match gain[sink] {
            Some(g) if g > 0 => {}
            _ => break,
        }

        // sink から source へ戻りながら、材料 → 手持ち材料 の辺を割り当てに反映
        let mut node = parent[sink];
        while node != source {
            let prev = parent[node];
            if node >= n {
                let j = node - n;
                by_ingredient[prev] = Some(j);
                by_item[j] = Some(prev);
            }
            node = prev;
        }
    }

    by_ingredient
}

fn relax(gain: &mut [Option<i64>], parent: &mut [usize], from: usize, to: usize, w: i64) -> bool {
    let Some(base) = gain[from] else {
        return false;
    };
    let candidate = base + w;
    if gain[to].map_or(true, |g| candidate > g) {
        gain[to] = Some(candidate);
        parent[to] = from;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(tables: &IngredientTables) -> (ExactMatch, SimilarityMatch<'_>, SubstitutionMatch<'_>) {
        (ExactMatch, SimilarityMatch { tables }, SubstitutionMatch { tables })
    }

    fn required(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_exact_before_similar() {
        let tables = IngredientTables::builtin();
        let (exact, similar, sub) = chain(&tables);
        let pantry = Pantry::from_inputs(["tomato", "cherry tomato"]);

        let result = evaluate_ingredients(&required(&["tomato"]), &pantry, &[&exact, &similar, &sub]);
        assert_eq!(result[0].outcome, MatchOutcome::Exact);
    }

    #[test]
    fn test_similar_match_uses_group_member() {
        let tables = IngredientTables::builtin();
        let (exact, similar, sub) = chain(&tables);
        let pantry = Pantry::from_inputs(["shallot"]);

        let result = evaluate_ingredients(&required(&["green onion"]), &pantry, &[&exact, &similar, &sub]);
        assert_eq!(result[0].outcome, MatchOutcome::Similar("shallot".to_string()));
    }

    #[test]
    fn test_similar_beats_substitution() {
        let tables = IngredientTables::from_json(
            r#"{
                "similarity": [{"canonical": "cheese", "variants": ["cheddar"]}],
                "substitutions": {"cheese": ["nutritional yeast"]}
            }"#,
        )
        .unwrap();
        let (exact, similar, sub) = chain(&tables);
        let pantry = Pantry::from_inputs(["nutritional yeast", "cheddar"]);

        let result = evaluate_ingredients(&required(&["cheese"]), &pantry, &[&exact, &similar, &sub]);
        assert_eq!(result[0].outcome, MatchOutcome::Similar("cheddar".to_string()));
    }

    #[test]
    fn test_substitution_first_available_candidate() {
        let tables = IngredientTables::builtin();
        let (exact, similar, sub) = chain(&tables);
        let pantry = Pantry::from_inputs(["oat milk", "soy milk"]);

        let result = evaluate_ingredients(&required(&["milk"]), &pantry, &[&exact, &similar, &sub]);
        assert_eq!(result[0].outcome, MatchOutcome::Substituted("soy milk".to_string()));
    }

    #[test]
    fn test_pantry_item_credits_once() {
        let tables = IngredientTables::builtin();
        let (exact, similar, sub) = chain(&tables);
        let pantry = Pantry::from_inputs(["cherry tomato"]);

        let result = evaluate_ingredients(
            &required(&["tomato", "roma tomato"]),
            &pantry,
            &[&exact, &similar, &sub],
        );
        assert_eq!(result[0].outcome, MatchOutcome::Similar("cherry tomato".to_string()));
        assert_eq!(result[1].outcome, MatchOutcome::Unmet);
    }

    #[test]
    fn test_exact_claimed_before_similarity_pass() {
        let tables = IngredientTables::builtin();
        let (exact, similar, sub) = chain(&tables);
        let pantry = Pantry::from_inputs(["cherry tomato"]);

        // 材料順では "tomato" が先だが、完全一致の "cherry tomato" が優先される
        let result = evaluate_ingredients(
            &required(&["tomato", "cherry tomato"]),
            &pantry,
            &[&exact, &similar, &sub],
        );
        assert_eq!(result[0].outcome, MatchOutcome::Unmet);
        assert_eq!(result[1].outcome, MatchOutcome::Exact);
    }

    #[test]
    fn test_unknown_ingredient_unmet() {
        let tables = IngredientTables::builtin();
        let (exact, similar, sub) = chain(&tables);
        let pantry = Pantry::from_inputs(["egg"]);

        let result = evaluate_ingredients(&required(&["saffron"]), &pantry, &[&exact, &similar, &sub]);
        assert!(result[0].outcome.is_unmet());
    }

    #[test]
    fn test_pantry_items_assigned_for_best_total() {
        let tables = IngredientTables::builtin();
        let (exact, similar, sub) = chain(&tables);
        let pantry = Pantry::from_inputs(["olive oil", "vegetable oil"]);

        // "oil" が "olive oil" を取ると "butter" の置換先がなくなる
        let result = evaluate_ingredients(&required(&["oil", "butter"]), &pantry, &[&exact, &similar, &sub]);
        assert_eq!(result[0].outcome, MatchOutcome::Similar("vegetable oil".to_string()));
        assert_eq!(result[1].outcome, MatchOutcome::Substituted("olive oil".to_string()));

        let tenths: u64 = result.iter().map(|m| m.outcome.weight_tenths()).sum();
        assert_eq!(tenths, 16);
    }

    #[test]
    fn test_assignment_reroutes_through_matched_item() {
        let assigned = max_weight_assignment(&[vec![(0, 9), (1, 9)], vec![(0, 7)]], 2);
        assert_eq!(assigned, vec![Some(1), Some(0)]);
    }

    #[test]
    fn test_assignment_keeps_heavier_edge_on_conflict() {
        let assigned = max_weight_assignment(&[vec![(0, 7)], vec![(0, 9)]], 1);
        assert_eq!(assigned, vec![None, Some(0)]);

        assert!(max_weight_assignment(&[], 0).is_empty());
        assert_eq!(max_weight_assignment(&[vec![]], 0), vec![None]);
    }

    #[test]
    fn test_outcome_weights() {
        assert_eq!(MatchOutcome::Exact.weight(), 1.0);
        assert_eq!(MatchOutcome::Similar(String::new()).weight(), 0.9);
        assert_eq!(MatchOutcome::Substituted(String::new()).weight(), 0.7);
        assert_eq!(MatchOutcome::Unmet.weight_tenths(), 0);
    }
}
