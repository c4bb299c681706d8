use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};
use std::fmt;

/// Closed food-category vocabulary enforced on extraction rows.
///
/// The labels are the deployment locale's exact strings; they appear verbatim
/// in the extraction prompt and are matched case-sensitively when validating
/// the model's reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Meat,
    Seafood,
    Beverage,
    Fruit,
    Vegetable,
    Dairy,
    Grain,
    Condiment,
    Frozen,
    Snack,
    Bakery,
    BabyFood,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Meat,
        Category::Seafood,
        Category::Beverage,
        Category::Fruit,
        Category::Vegetable,
        Category::Dairy,
        Category::Grain,
        Category::Condiment,
        Category::Frozen,
        Category::Snack,
        Category::Bakery,
        Category::BabyFood,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Meat => "육류",
            Category::Seafood => "해산물",
            Category::Beverage => "음료",
            Category::Fruit => "과일",
            Category::Vegetable => "채소",
            Category::Dairy => "유제품",
            Category::Grain => "곡류/가공식품",
            Category::Condiment => "조미료/소스",
            Category::Frozen => "냉동식품",
            Category::Snack => "간식",
            Category::Bakery => "베이커리",
            Category::BabyFood => "유아식품",
        }
    }

    /// Exact-match lookup against the vocabulary.
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.label() == label)
    }

    /// The vocabulary rendered for prompt interpolation.
    pub fn vocabulary() -> String {
        Category::ALL
            .iter()
            .map(|c| c.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One categorized inventory entry produced by the extraction pipeline.
///
/// Items are created from a single OCR session, never mutated afterwards, and
/// discarded at the end of the request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedItem {
    pub name: String,
    pub quantity: u32,
    pub category: Category,
    /// Request timestamp, `%Y-%m-%d %H:%M:%S`. Computed once per request and
    /// identical on every row of that request.
    pub observed_at: String,
}

impl ExtractedItem {
    /// Wire shape used by the parse-ingredients endpoint.
    pub fn to_row(&self) -> Value {
        json!([self.name, self.quantity, self.category, self.observed_at])
    }
}

/// Opaque quantity attached to a caller-supplied ingredient. It is never
/// parsed, only rendered into the recommendation prompt, so "무제한" is as
/// valid as 3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Count(i64),
    Text(String),
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Count(n) => write!(f, "{n}"),
            Quantity::Text(s) => f.write_str(s),
        }
    }
}

/// Caller-supplied input to the recommendation pipeline. Arrives on the wire
/// as a `[name, quantity]` pair.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "(String, Quantity)")]
pub struct IngredientRef {
    pub name: String,
    pub quantity: Quantity,
}

impl From<(String, Quantity)> for IngredientRef {
    fn from((name, quantity): (String, Quantity)) -> Self {
        IngredientRef { name, quantity }
    }
}

/// One suggested recipe. Produced only by the recommendation pipeline, which
/// rejects any reply containing a partially-specified recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
}
