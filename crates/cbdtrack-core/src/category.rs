//! Rule-based product categorization.
//!
//! Products are classified from free text by an ordered keyword rule table;
//! the first matching rule wins. Matching is case-insensitive, and a few
//! short keywords ("rum", "gin", "caps", "ar") match whole words only so
//! they do not fire inside longer words like "crumble" or "Virginia".

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Product category derived from a record's free-text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductCategory {
    Drink,
    ChewingGum,
    Capsule,
    Oil,
    Edible,
    Isolate,
    /// Nothing matched; a valid terminal category, not a failure.
    Other,
}

impl ProductCategory {
    /// Every category in declaration order.
    pub const ALL: [ProductCategory; 7] = [
        Self::Drink,
        Self::ChewingGum,
        Self::Capsule,
        Self::Oil,
        Self::Edible,
        Self::Isolate,
        Self::Other,
    ];

    /// Human-readable label used on the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Drink => "Drink",
            Self::ChewingGum => "Chewing Gum",
            Self::Capsule => "Capsule",
            Self::Oil => "Oil",
            Self::Edible => "Edible",
            Self::Isolate => "Isolate",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered keyword rules. Order is part of the contract: a product name
/// matching several rules takes the first one.
static RULES: Lazy<Vec<(Regex, ProductCategory)>> = Lazy::new(|| {
    [
        (
            r"drink|water|tea|coffee|wine|vodka|lager|beer|\brum\b|\bgin\b",
            ProductCategory::Drink,
        ),
        (r"chewing", ProductCategory::ChewingGum),
        (
            r"capsule|gels|pill|tabs|\bcaps\b|tablets|caplets",
            ProductCategory::Capsule,
        ),
        (r"oil|ml|spray|drops|tincture|mct", ProductCategory::Oil),
        (
            r"edible|gummy|gummies|chocolate|caramel|sweet|candy|nuts|jam|bars|cream|sherbert|popcorn|jelly|brownies|peanut|\bar\b|bites",
            ProductCategory::Edible,
        ),
        (r"isolate|distillate|crystal", ProductCategory::Isolate),
    ]
    .into_iter()
    .map(|(pattern, category)| {
        let regex = Regex::new(&format!("(?i){pattern}")).expect("keyword patterns are valid");
        (regex, category)
    })
    .collect()
});

/// Classify free text into a product category.
///
/// Empty text matches no rule and returns [`ProductCategory::Other`].
pub fn categorize(text: &str) -> ProductCategory {
    for (pattern, category) in RULES.iter() {
        if pattern.is_match(text) {
            return *category;
        }
    }
    ProductCategory::Other
}

/// Refinement pass for records the first pass could not place.
///
/// Re-runs the classifier against the size/volume/quantity field, but only
/// when the first pass returned `Other`. Any other category is returned
/// unchanged; this is the single point where an assigned category may be
/// revisited.
pub fn refine(category: ProductCategory, size_text: &str) -> ProductCategory {
    if category == ProductCategory::Other {
        categorize(size_text)
    } else {
        category
    }
}
