//! Role views.
//!
//! Each view owns its form input and a [`FormPhase`]; submitting drives the
//! phase from idle through submitting to success or error, and `render`
//! turns the current state into the text the CLI prints.

pub mod form;
pub mod holder;
pub mod issuer;
pub mod verifier;

pub use form::FormPhase;
pub use holder::{HolderForm, HolderView};
pub use issuer::{IssuerForm, IssuerView};
pub use verifier::{VerifierForm, VerifierView};

#[cfg(test)]
pub(crate) mod testing;
