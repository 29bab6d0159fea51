//! Running balances carried from one simulated year to the next

/// State of a loan at a point in time during projection
#[derive(Debug, Clone, Default)]
pub struct ProjectionState {
    /// Outstanding principal plus capitalized interest (unrounded)
    pub debt_balance: f64,

    /// Cumulative repayments
    pub total_paid: f64,

    /// Cumulative interest capitalized, study years included
    pub total_interest: f64,

    /// Age at which the balance first reached zero
    pub cleared_age: Option<u32>,
}

impl ProjectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a study-year disbursement
    pub fn disburse(&mut self, amount: f64) {
        self.debt_balance += amount;
    }

    /// Capitalize a year's interest on the current balance, returning the amount added
    pub fn accrue_interest(&mut self, rate: f64) -> f64 {
        let interest = self.debt_balance * rate;
        self.debt_balance += interest;
        self.total_interest += interest;
        interest
    }

    /// Pay up to `amount`, never more than the balance; returns the amount paid
    pub fn repay(&mut self, amount: f64) -> f64 {
        let payment = amount.min(self.debt_balance).max(0.0);
        self.debt_balance -= payment;
        self.total_paid += payment;
        payment
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared_age.is_some()
    }

    /// Record clearance at `age` if the balance has just reached zero
    ///
    /// Returns true only for the year clearance happens.
    pub fn mark_cleared(&mut self, age: u32) -> bool {
        if self.is_cleared() || self.debt_balance > 0.0 {
            return false;
        }
        self.cleared_age = Some(age);
        self.debt_balance = 0.0;
        true
    }
}
