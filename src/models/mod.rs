mod expense;

pub use expense::{CategoryTotal, Expense, MonthlySummary, DATE_FORMAT, MONTH_FORMAT};
