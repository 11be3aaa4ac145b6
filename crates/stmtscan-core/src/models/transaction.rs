//! Transaction records and the closed spending-category vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One normalized statement row, keyed by lowercased header text.
///
/// Key order follows the source table's header order.
pub type TransactionRecord = Map<String, Value>;

/// Key under which the categorizer stores its result.
pub const CATEGORY_KEY: &str = "category";

/// Spending category assigned to a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Category {
    IncomeSalary,
    RentMortgage,
    Utilities,
    Groceries,
    RestaurantsDiningOut,
    FoodDelivery,
    Transportation,
    Shopping,
    SubscriptionsMemberships,
    Entertainment,
    Travel,
    HealthcareMedical,
    Insurance,
    Education,
    PersonalCare,
    TransfersOut,
    TransfersIn,
    CashWithdrawal,
    BankFees,
    Taxes,
    Investments,
    CharityDonations,
    OtherExpenses,
    Uncategorized,
}

impl Category {
    /// Every category, in prompt order, ending with [`Category::Uncategorized`].
    pub const ALL: [Category; 24] = [
        Category::IncomeSalary,
        Category::RentMortgage,
        Category::Utilities,
        Category::Groceries,
        Category::RestaurantsDiningOut,
        Category::FoodDelivery,
        Category::Transportation,
        Category::Shopping,
        Category::SubscriptionsMemberships,
        Category::Entertainment,
        Category::Travel,
        Category::HealthcareMedical,
        Category::Insurance,
        Category::Education,
        Category::PersonalCare,
        Category::TransfersOut,
        Category::TransfersIn,
        Category::CashWithdrawal,
        Category::BankFees,
        Category::Taxes,
        Category::Investments,
        Category::CharityDonations,
        Category::OtherExpenses,
        Category::Uncategorized,
    ];

    /// Label as it appears in prompts and persisted records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::IncomeSalary => "Income/Salary",
            Category::RentMortgage => "Rent/Mortgage",
            Category::Utilities => "Utilities",
            Category::Groceries => "Groceries",
            Category::RestaurantsDiningOut => "Restaurants/Dining Out",
            Category::FoodDelivery => "Food Delivery",
            Category::Transportation => "Transportation",
            Category::Shopping => "Shopping",
            Category::SubscriptionsMemberships => "Subscriptions/Memberships",
            Category::Entertainment => "Entertainment",
            Category::Travel => "Travel",
            Category::HealthcareMedical => "Healthcare/Medical",
            Category::Insurance => "Insurance",
            Category::Education => "Education",
            Category::PersonalCare => "Personal Care",
            Category::TransfersOut => "Transfers Out",
            Category::TransfersIn => "Transfers In",
            Category::CashWithdrawal => "Cash Withdrawal",
            Category::BankFees => "Bank Fees",
            Category::Taxes => "Taxes",
            Category::Investments => "Investments",
            Category::CharityDonations => "Charity/Donations",
            Category::OtherExpenses => "Other Expenses",
            Category::Uncategorized => "Uncategorized",
        }
    }

    /// Parse a raw model answer. Only an exact match after trimming is accepted.
    pub fn from_model_output(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a label is not part of the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {:?}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl TryFrom<String> for Category {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
