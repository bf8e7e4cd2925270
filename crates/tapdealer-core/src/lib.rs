//! # tapdealer core
//!
//! Trusted-dealer threshold key generation for Bitcoin Taproot.
//!
//! A dealer splits one secp256k1 secret into `n` shares with Feldman VSS so
//! that any `t` of them determine the key. Shares and the group key carry the
//! BIP341 key-path tweak (empty script tree), so they can be handed straight
//! to a FROST-style threshold signer.
//!
//! ## Flow
//!
//! ```text
//! Dealer                              Participant i            Anyone
//! ─────────────────────────────       ─────────────────        ───────────────────
//! f(X) = a_0 + ... + a_{t-1}X^{t-1}
//! A_j = a_j G                    ───► verify_share(i, d_i, A)  derive_group_key(A)
//! (t, g) = TapTweak(A_0)
//! d_i = g f(i) + t               ───► d_i                      reconstruct_group_key
//! P_i = d_i G                    ───────────────────────────►  (ids, P_i) -> Q
//! ```
//!
//! Every operation is pure and synchronous. The dealer polynomial is wiped
//! when the ceremony returns, whatever the outcome.

pub mod curve;
pub mod dealer;
pub mod encoding;
pub mod error;
pub mod group_key;
pub mod lagrange;
pub mod polynomial;
pub mod random;
pub mod tweak;
pub mod verify;

pub use dealer::{trusted_dealer_keygen, DealerOutput, ParticipantShare, TrustedDealer};
pub use encoding::{PublicPackage, SecretSharePackage};
pub use error::{DealerError, Result};
pub use group_key::{derive_group_key, GroupPublicKey};
pub use lagrange::{lagrange_at_zero, mod_inverse, reconstruct_group_key, reconstruct_group_secret};
pub use polynomial::{eval_point_poly, eval_scalar_poly, SecretPolynomial};
pub use random::{sample_nonzero_scalar, sample_scalar};
pub use tweak::{compute_tweak, tagged_hash, TaprootTweak, TweakSign};
pub use verify::{verify_public_share, verify_share};

/// Re-exported curve types used throughout the API
pub use k256::{ProjectivePoint, Scalar};
