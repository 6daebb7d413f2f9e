//! Payment form rules.
//!
//! Mirrors the server-side constraints so obviously bad input never leaves
//! the client. All failing rules are reported, not just the first.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::api::types::PaymentRequest;
use crate::validation::iban::{self, Iban};

pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
/// Minimum amount when the selected currency is unknown (0.01).
pub const DEFAULT_MIN_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);
pub const MIN_RECIPIENT_LENGTH: usize = 2;
pub const MAX_RECIPIENT_LENGTH: usize = 140;

const MAX_DECIMALS: u32 = 28;

/// Form field a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Amount,
    Currency,
    Recipient,
    RecipientAccount,
}

impl Field {
    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::Currency => "currency",
            Self::Recipient => "recipient",
            Self::RecipientAccount => "recipientAccount",
        }
    }
}

/// A failed form rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Amount is required.")]
    AmountRequired,

    #[error("Amount must be at least {min}.")]
    AmountTooSmall { min: Decimal },

    #[error("Amount must not exceed {max}.")]
    AmountTooLarge { max: Decimal },

    #[error("Currency is required.")]
    CurrencyRequired,

    #[error("Recipient is required.")]
    RecipientRequired,

    #[error("Recipient must be at least {min} characters.")]
    RecipientTooShort { min: usize },

    #[error("Recipient must be at most {max} characters.")]
    RecipientTooLong { max: usize },

    #[error("Recipient may contain only Latin letters and spaces.")]
    RecipientPattern,

    #[error("Recipient account is required.")]
    AccountRequired,

    #[error("Recipient account is not a valid IBAN.")]
    AccountInvalid,
}

impl FieldError {
    pub fn field(&self) -> Field {
        match self {
            Self::AmountRequired | Self::AmountTooSmall { .. } | Self::AmountTooLarge { .. } => Field::Amount,
            Self::CurrencyRequired => Field::Currency,
            Self::RecipientRequired
            | Self::RecipientTooShort { .. }
            | Self::RecipientTooLong { .. }
            | Self::RecipientPattern => Field::Recipient,
            Self::AccountRequired | Self::AccountInvalid => Field::RecipientAccount,
        }
    }
}

/// Raw form input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentForm {
    pub amount: Option<Decimal>,
    pub currency: String,
    pub recipient: String,
    pub recipient_account: String,
}

impl PaymentForm {
    /// Check every rule and build the request on success.
    ///
    /// `currency_decimals` is the minor-unit count of the selected currency,
    /// or `None` when the currency is not (yet) known.
    pub fn validate(&self, currency_decimals: Option<u32>) -> Result<PaymentRequest, Vec<FieldError>> {
        let mut errors = Vec::new();

        let min_amount = amount_step(currency_decimals);
        match self.amount {
            None => errors.push(FieldError::AmountRequired),
            Some(amount) if amount < min_amount => errors.push(FieldError::AmountTooSmall { min: min_amount }),
            Some(amount) if amount > MAX_AMOUNT => errors.push(FieldError::AmountTooLarge { max: MAX_AMOUNT }),
            Some(_) => {}
        }

        if self.currency.trim().is_empty() {
            errors.push(FieldError::CurrencyRequired);
        }

        errors.extend(check_recipient(&self.recipient));

        let account = if self.recipient_account.trim().is_empty() {
            errors.push(FieldError::AccountRequired);
            None
        } else {
            match Iban::parse(&self.recipient_account) {
                Ok(iban) => Some(iban),
                Err(e) => {
                    tracing::debug!(reason = %e, "Recipient account rejected");
                    errors.push(FieldError::AccountInvalid);
                    None
                }
            }
        };

        match (self.amount, account) {
            (Some(amount), Some(account)) if errors.is_empty() => Ok(PaymentRequest {
                amount,
                currency: self.currency.trim().to_string(),
                recipient: self.recipient.clone(),
                recipient_account: account.as_str().to_string(),
            }),
            _ => Err(errors),
        }
    }
}

/// Smallest accepted amount for a currency: one minor unit.
pub fn amount_step(currency_decimals: Option<u32>) -> Decimal {
    match currency_decimals {
        None => DEFAULT_MIN_AMOUNT,
        Some(0) => Decimal::ONE,
        Some(d) => Decimal::new(1, d.min(MAX_DECIMALS)),
    }
}

/// Returns `None` for an empty account so a required check can run separately.
pub fn check_account(raw: &str) -> Option<bool> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(iban::validate(raw))
    }
}

fn check_recipient(recipient: &str) -> Vec<FieldError> {
    if recipient.trim().is_empty() {
        return vec![FieldError::RecipientRequired];
    }

    let mut errors = Vec::new();
    let len = recipient.chars().count();
    if len < MIN_RECIPIENT_LENGTH {
        errors.push(FieldError::RecipientTooShort { min: MIN_RECIPIENT_LENGTH });
    }
    if len > MAX_RECIPIENT_LENGTH {
        errors.push(FieldError::RecipientTooLong { max: MAX_RECIPIENT_LENGTH });
    }
    if !recipient.chars().all(|c| c == ' ' || is_latin_letter(c) || is_combining_mark(c)) {
        errors.push(FieldError::RecipientPattern);
    }
    errors
}

fn is_latin_letter(c: char) -> bool {
    matches!(c,
        'A'..='Z' | 'a'..='z'
        | '\u{00AA}' | '\u{00BA}'
        | '\u{00C0}'..='\u{00D6}'
        | '\u{00D8}'..='\u{00F6}'
        | '\u{00F8}'..='\u{02AF}'
        | '\u{1E00}'..='\u{1EFF}'
        | '\u{2C60}'..='\u{2C7F}'
        | '\u{A720}'..='\u{A7FF}'
        | '\u{AB30}'..='\u{AB64}'
        | '\u{FB00}'..='\u{FB06}'
        | '\u{FF21}'..='\u{FF3A}'
        | '\u{FF41}'..='\u{FF5A}'
    ) && c.is_alphabetic()
}

fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}'
        | '\u{1AB0}'..='\u{1AFF}'
        | '\u{1DC0}'..='\u{1DFF}'
        | '\u{20D0}'..='\u{20FF}'
        | '\u{FE20}'..='\u{FE2F}'
    )
}
