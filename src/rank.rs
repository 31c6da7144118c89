//! Ordering of result sets by a selected metric.

use std::cmp::Ordering;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::recipe::Recipe;

/// Sort key for [`rank`]. Always ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RankMetric {
    /// Ascending by the "Calories" nutrient.
    #[default]
    Calories,
    /// Ascending by preparation time.
    PrepTime,
}

impl RankMetric {
    fn compare(self, a: &Recipe, b: &Recipe) -> Ordering {
        match self {
            Self::Calories => a.calories().total_cmp(&b.calories()),
            Self::PrepTime => a.prep_minutes().cmp(&b.prep_minutes()),
        }
    }
}

/// Order `recipes` by `metric`. Ties keep their input order.
#[must_use]
pub fn rank(mut recipes: Vec<Recipe>, metric: RankMetric) -> Vec<Recipe> {
    // sort_by is stable
    recipes.sort_by(|a, b| metric.compare(a, b));
    recipes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{DisplayFilter, filter};
    use crate::recipe::{RecipeId, nutrient};

    fn recipe(id: &str, calories: Option<f64>, minutes: Option<u32>) -> Recipe {
        Recipe {
            id: RecipeId::new(id),
            title: id.to_string(),
            image_url: None,
            ready_in_minutes: minutes,
            nutrients: calories
                .map(|c| (nutrient::CALORIES, c))
                .into_iter()
                .collect(),
            ingredients: Vec::new(),
        }
    }

    fn ids(recipes: &[Recipe]) -> Vec<&str> {
        recipes.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_by_calories_ascending() {
        let ranked = rank(
            vec![
                recipe("a", Some(600.0), None),
                recipe("b", Some(120.5), None),
                recipe("c", Some(300.0), None),
            ],
            RankMetric::Calories,
        );
        assert_eq!(ids(&ranked), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_missing_calories_sort_first() {
        let ranked = rank(
            vec![recipe("a", Some(10.0), None), recipe("b", None, None)],
            RankMetric::Calories,
        );
        assert_eq!(ids(&ranked), vec!["b", "a"]);
    }

    #[test]
    fn test_by_prep_time_treats_missing_as_zero() {
        let ranked = rank(
            vec![
                recipe("a", None, Some(45)),
                recipe("b", None, None),
                recipe("c", None, Some(15)),
            ],
            RankMetric::PrepTime,
        );
        assert_eq!(ids(&ranked), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = rank(
            vec![
                recipe("first", Some(250.0), Some(20)),
                recipe("low", Some(100.0), Some(20)),
                recipe("second", Some(250.0), Some(20)),
                recipe("missing", None, Some(20)),
            ],
            RankMetric::Calories,
        );
        assert_eq!(ids(&ranked), vec!["missing", "low", "first", "second"]);

        let by_time = rank(ranked, RankMetric::PrepTime);
        assert_eq!(ids(&by_time), vec!["missing", "low", "first", "second"]);
    }

    #[test]
    fn test_filter_then_rank_example() {
        let recipes = vec![
            recipe("heavy", Some(800.0), Some(10)),
            recipe("light", Some(200.0), Some(40)),
        ];
        let filtered = filter(&recipes, &DisplayFilter::new(Some(500.0), None).unwrap());
        assert_eq!(ids(&filtered), vec!["light"]);

        let ranked = rank(filtered.clone(), RankMetric::PrepTime);
        assert_eq!(ranked, filtered);
    }
}
