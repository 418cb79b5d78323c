/// Timestamp layout of the `date` column. Monthly bucketing relies on the
/// first seven characters being `YYYY-MM`.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const MONTH_FORMAT: &str = "%Y-%m";

/// One persisted expense entry. Never mutated after insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: i64,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Per-category spending for a single `YYYY-MM` month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub month: String,
    pub categories: Vec<CategoryTotal>,
}

impl MonthlySummary {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.categories.iter().map(|c| c.amount).sum()
    }

    #[cfg(test)]
    pub fn get(&self, category: &str) -> Option<f64> {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.amount)
    }
}
