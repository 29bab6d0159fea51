//! Fixed-rate personal loan equivalent, used to judge whether the student loan was a good deal

/// Annual rate of the comparison personal loan
pub const DEFAULT_PERSONAL_LOAN_RATE: f64 = 0.05;

/// Level monthly payment amortizing `principal` over `months` at `annual_rate`
/// compounded monthly: P * r(1+r)^n / ((1+r)^n - 1) with r = annual_rate / 12
///
/// Zero months means repaying the principal outright; a zero rate spreads the
/// principal evenly.
pub fn monthly_payment(principal: f64, annual_rate: f64, months: u32) -> f64 {
    if months == 0 {
        return principal;
    }

    let monthly_rate = annual_rate / 12.0;
    if monthly_rate.abs() < 1e-12 {
        return principal / months as f64;
    }

    let growth = (1.0 + monthly_rate).powi(months as i32);
    principal * monthly_rate * growth / (growth - 1.0)
}

/// Total repaid on a personal loan of `principal` over `years`
pub fn personal_loan_total(principal: f64, annual_rate: f64, years: u32) -> f64 {
    let months = years * 12;
    if months == 0 {
        return principal;
    }
    monthly_payment(principal, annual_rate, months) * months as f64
}
