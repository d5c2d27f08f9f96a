//! Primitives - The OTP field component.
//!
//! - [`otp_field`] - Segmented digits-only input with a message line
//! - [`MaskingTransform`] - What each slot shows for a digit
//!
//! # Architecture
//!
//! A component is an index into the registry. Mounting:
//! 1. Allocates an index and sets its interaction flags
//! 2. Registers focused-key, paste and focus handlers against that index
//! 3. Returns a handle whose drop removes the handlers and frees the index
//!
//! # Reactivity
//!
//! Props can be static values, signals or getters. Pass the signal itself
//! to keep the field connected:
//!
//! ```ignore
//! // CORRECT - the field reads the signal on every render and edit
//! otp_field(OtpFieldProps::new(code_signal.clone()));
//!
//! // WRONG - freezes the value the field sees
//! otp_field(OtpFieldProps::new(code_signal.get()));
//! ```

mod mask;
mod otp_field;
mod types;

pub use mask::*;
pub use otp_field::*;
pub use types::*;
