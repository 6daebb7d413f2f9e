//! Client-side validation.
//!
//! # Data Flow
//! ```text
//! form input
//!     → payment_form.rs (every rule, all failures collected)
//!         → iban.rs (normalize → structure → registry.rs length → MOD-97-10)
//!     → PaymentRequest | Vec<FieldError>
//! ```
//!
//! Everything here is pure: no I/O, no shared state.

pub mod iban;
pub mod payment_form;
pub mod registry;

pub use iban::{validate as validate_iban, Iban, IbanError};
pub use payment_form::{amount_step, Field, FieldError, PaymentForm};
