//! Human-readable amount formatting

/// Render an integer amount of base units as a decimal string with the
/// given number of fractional digits, e.g. 1_500_000_000 with 9 decimals
/// becomes "1.500000000".
pub fn integer_to_decimal(amount: u64, decimals: u32) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    let scale = 10u64.pow(decimals);
    let whole = amount / scale;
    let frac = amount % scale;
    format!("{whole}.{frac:0width$}", width = decimals as usize)
}
