//! Decimal amount handling shared by the validation and display layers.

pub const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;

const ETH_DECIMALS: u32 = 18;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount `{0}` is not a plain decimal number")]
    Malformed(String),
    #[error("amount `{0}` has more than 18 decimal places")]
    TooPrecise(String),
    #[error("amount `{0}` exceeds the representable range")]
    OutOfRange(String),
    #[error("amount must be above zero")]
    Zero,
}

/// Parses a decimal ETH amount (for example `"0.1"`) into wei.
///
/// Only unsigned decimal notation is accepted: digits with at most one `.`
/// separator and at most 18 fractional digits. Anything else fails without
/// producing a value, so malformed input can never reach the RPC layer.
pub fn parse_eth_amount(input: &str) -> Result<u128, AmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(AmountError::Malformed(trimmed.to_string()));
    }
    if !whole.chars().all(|ch| ch.is_ascii_digit())
        || !fraction.chars().all(|ch| ch.is_ascii_digit())
    {
        return Err(AmountError::Malformed(trimmed.to_string()));
    }
    if fraction.len() > ETH_DECIMALS as usize {
        return Err(AmountError::TooPrecise(trimmed.to_string()));
    }

    let whole_wei = if whole.is_empty() {
        0u128
    } else {
        whole
            .parse::<u128>()
            .ok()
            .and_then(|value| value.checked_mul(WEI_PER_ETH))
            .ok_or_else(|| AmountError::OutOfRange(trimmed.to_string()))?
    };

    let fraction_wei = if fraction.is_empty() {
        0u128
    } else {
        let scale = 10u128.pow(ETH_DECIMALS - fraction.len() as u32);
        let digits = fraction
            .parse::<u128>()
            .map_err(|_| AmountError::OutOfRange(trimmed.to_string()))?;
        digits * scale
    };

    whole_wei
        .checked_add(fraction_wei)
        .ok_or_else(|| AmountError::OutOfRange(trimmed.to_string()))
}

/// Gate for submissions: `"0"` parses cleanly but funds nothing, so the
/// orchestrator rejects it before any call goes out.
pub fn require_positive(wei: u128) -> Result<u128, AmountError> {
    if wei == 0 {
        Err(AmountError::Zero)
    } else {
        Ok(wei)
    }
}

/// Formats a wei quantity as a decimal ETH string rounded half-up to
/// `decimals` fractional places.
pub fn format_wei(wei: u128, decimals: u32) -> String {
    let decimals = decimals.min(ETH_DECIMALS);
    if decimals == 0 {
        let scale = WEI_PER_ETH;
        return (wei.saturating_add(scale / 2) / scale).to_string();
    }

    let scale = 10u128.pow(ETH_DECIMALS - decimals);
    let scaled = wei.saturating_add(scale / 2) / scale;
    let unit = 10u128.pow(decimals);
    format!(
        "{}.{:0width$}",
        scaled / unit,
        scaled % unit,
        width = decimals as usize
    )
}
