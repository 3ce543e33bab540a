//! Field validation rules.
//!
//! Validation failures are always recovered locally (the workflow re-prompts
//! the same step), so these return a message for the prompt rather than a
//! hard error.

/// Wallet and contract length bounds, in characters.
pub const ADDRESS_MIN_CHARS: usize = 26;
/// Upper bound for wallet and contract identifiers.
pub const ADDRESS_MAX_CHARS: usize = 128;
/// Amount length bounds.
pub const AMOUNT_MIN_CHARS: usize = 1;
/// Upper bound for the free-text amount.
pub const AMOUNT_MAX_CHARS: usize = 50;
/// Story length bounds, inclusive.
pub const STORY_MIN_CHARS: usize = 20;
/// Upper bound for the story body, inclusive.
pub const STORY_MAX_CHARS: usize = 750;

fn is_address_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn validate_address(value: &str, what: &str) -> Result<(), String> {
    let len = value.chars().count();
    if !(ADDRESS_MIN_CHARS..=ADDRESS_MAX_CHARS).contains(&len) {
        return Err(format!(
            "Invalid {what}: must be {ADDRESS_MIN_CHARS}-{ADDRESS_MAX_CHARS} characters."
        ));
    }
    if !value.chars().all(is_address_char) {
        return Err(format!(
            "Invalid {what}: letters, digits, '-' and '_' only."
        ));
    }
    Ok(())
}

/// Validates a wallet identifier: 26–128 characters, alphanumeric plus
/// `-`/`_`.
///
/// # Errors
///
/// Returns the re-prompt message on failure.
pub fn validate_wallet(wallet: &str) -> Result<(), String> {
    validate_address(wallet, "wallet address")
}

/// Validates a contract identifier; same shape rule as wallets.
///
/// # Errors
///
/// Returns the re-prompt message on failure.
pub fn validate_contract(contract: &str) -> Result<(), String> {
    validate_address(contract, "contract address")
}

/// Validates the free-text amount: 1–50 characters.
///
/// # Errors
///
/// Returns the re-prompt message on failure.
pub fn validate_amount(amount: &str) -> Result<(), String> {
    let len = amount.chars().count();
    if !(AMOUNT_MIN_CHARS..=AMOUNT_MAX_CHARS).contains(&len) {
        return Err(format!(
            "Amount must be {AMOUNT_MIN_CHARS}-{AMOUNT_MAX_CHARS} characters."
        ));
    }
    Ok(())
}

/// Validates the story body: 20–750 characters inclusive. The message shows
/// the offending length.
///
/// # Errors
///
/// Returns the re-prompt message on failure.
pub fn validate_story(story: &str) -> Result<(), String> {
    let len = story.chars().count();
    if len < STORY_MIN_CHARS {
        return Err(format!(
            "Too short ({len} chars). At least {STORY_MIN_CHARS} characters."
        ));
    }
    if len > STORY_MAX_CHARS {
        return Err(format!(
            "Too long ({len} chars). Max {STORY_MAX_CHARS} characters."
        ));
    }
    Ok(())
}
