use serde::{Deserialize, Serialize};

/// A search hit from `/recipes/complexSearch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// A full recipe from `/recipes/{id}/information` or `/recipes/random`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub ready_in_minutes: Option<u32>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub extended_ingredients: Vec<ExtendedIngredient>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedIngredient {
    pub name: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    /// The ingredient line as written in the source recipe.
    #[serde(default)]
    pub original: Option<String>,
}

impl RecipeDetail {
    /// Cooking instructions, falling back to the summary. `None` when both are blank.
    pub fn instructions_or_summary(&self) -> Option<&str> {
        non_blank(self.instructions.as_deref()).or_else(|| non_blank(self.summary.as_deref()))
    }
}

impl ExtendedIngredient {
    /// Human-readable quantity: `"{amount} {unit}"` when both are present,
    /// otherwise the original line, otherwise the bare name.
    pub fn amount_text(&self) -> String {
        let amount = self.amount.filter(|a| *a != 0.0 && a.is_finite());
        let unit = non_blank(self.unit.as_deref());
        match (amount, unit) {
            (Some(amount), Some(unit)) => format!("{amount} {unit}"),
            _ => non_blank(self.original.as_deref())
                .unwrap_or(&self.name)
                .to_string(),
        }
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// Envelope of `/recipes/complexSearch`.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchEnvelope {
    #[serde(default)]
    pub results: Vec<RecipeSummary>,
}

/// Envelope of `/recipes/random`.
#[derive(Debug, Deserialize)]
pub(crate) struct RandomEnvelope {
    #[serde(default)]
    pub recipes: Vec<RecipeDetail>,
}

/// Error body returned by the upstream on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct FailureBody {
    pub message: Option<String>,
}
