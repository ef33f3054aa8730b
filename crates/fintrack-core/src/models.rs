//! Domain models for Fintrack

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// Summary bucket size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Weekly,
    Monthly,
    Yearly,
}

impl Granularity {
    /// Every granularity, in the order mutation handlers invalidate them
    pub const ALL: [Granularity; 3] = [Self::Weekly, Self::Monthly, Self::Yearly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(Error::InvalidGranularity(s.to_string())),
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which aggregates populate a returned summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryView {
    /// Income and expenses combined; the only cached view
    #[default]
    Overall,
    Income,
    Expenses,
    /// Reserved
    Savings,
    /// Reserved
    Debts,
}

impl SummaryView {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overall => "overall",
            Self::Income => "income",
            Self::Expenses => "expenses",
            Self::Savings => "savings",
            Self::Debts => "debts",
        }
    }
}

impl std::str::FromStr for SummaryView {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "overall" => Ok(Self::Overall),
            "income" => Ok(Self::Income),
            "expenses" => Ok(Self::Expenses),
            "savings" => Ok(Self::Savings),
            "debts" => Ok(Self::Debts),
            _ => Err(Error::InvalidView(s.to_string())),
        }
    }
}

impl std::fmt::Display for SummaryView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Income or expense. Both live in tables of identical shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub(crate) fn table(&self) -> &'static str {
        match self {
            Self::Income => "incomes",
            Self::Expense => "expenses",
        }
    }

    /// Label used in reports and log lines
    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An income or expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New income or expense (for insertion)
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: Option<String>,
}

/// Partial update for an income or expense; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionUpdate {
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub note: Option<String>,
}

impl TransactionUpdate {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.category.is_none() && self.date.is_none() && self.note.is_none()
    }
}

/// Debt repayment state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DebtStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
}

impl DebtStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Overdue => "Overdue",
        }
    }
}

impl std::str::FromStr for DebtStatus {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            _ => Err(Error::InvalidData(format!(
                "Unknown debt status: {} (valid: Pending, Paid, Overdue)",
                s
            ))),
        }
    }
}

impl std::fmt::Display for DebtStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A debt owed by or to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: i64,
    pub debtor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub status: DebtStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDebt {
    pub debtor_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub amount: f64,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub status: Option<DebtStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DebtUpdate {
    pub debtor_name: Option<String>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<DebtStatus>,
}

impl DebtUpdate {
    pub fn is_empty(&self) -> bool {
        self.debtor_name.is_none()
            && self.description.is_none()
            && self.amount.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
    }
}

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: i64,
    pub goal_name: String,
    pub goal_amount: f64,
    pub current_amount: f64,
    pub start_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSavingsGoal {
    pub goal_name: String,
    pub goal_amount: f64,
    #[serde(default)]
    pub current_amount: Option<f64>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update for a savings goal.
///
/// The date fields distinguish "absent" (`None`, unchanged) from an explicit
/// JSON `null` (`Some(None)`, cleared).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavingsGoalUpdate {
    pub goal_name: Option<String>,
    pub goal_amount: Option<f64>,
    pub current_amount: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub target_date: Option<Option<NaiveDate>>,
    pub notes: Option<String>,
}

impl SavingsGoalUpdate {
    pub fn is_empty(&self) -> bool {
        self.goal_name.is_none()
            && self.goal_amount.is_none()
            && self.current_amount.is_none()
            && self.start_date.is_none()
            && self.target_date.is_none()
            && self.notes.is_none()
    }
}

fn double_option<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Aggregated totals for one period.
///
/// `id` and `created_at` are present only for persisted (overall) rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub granularity: Granularity,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_balance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Expense total for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryExpenseStat {
    pub category: String,
    pub total_amount: f64,
}

/// Income and expense totals for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrendStat {
    /// YYYY-MM
    pub month: String,
    pub total_income: f64,
    pub total_expenses: f64,
}

/// Findings of one reminder scan
#[derive(Debug, Clone, Serialize)]
pub struct ReminderScan {
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub debts: Vec<Debt>,
    pub savings_goals: Vec<SavingsGoal>,
}

impl ReminderScan {
    pub fn total(&self) -> usize {
        self.debts.len() + self.savings_goals.len()
    }
}
