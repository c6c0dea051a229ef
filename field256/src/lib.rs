//! Constant-time arithmetic for 256-bit prime fields.
//!
//! Elements are stored in Montgomery form over four 64-bit limbs and all
//! arithmetic is branch-free with respect to operand values. The modulus and
//! its associated Montgomery/square-root constants are supplied through the
//! [`FieldParams`] trait, so a curve crate can instantiate the same engine
//! for its base field and its scalar field as two distinct types.
//!
//! Fallible operations over secret data ([`MontyFieldElement::invert`],
//! [`MontyFieldElement::sqrt`]) report failure through [`subtle::CtOption`]
//! rather than branching; byte and RNG boundaries return [`Error`].

mod arith;
mod element;
mod error;
mod inv;
mod params;
mod sqrt;

pub use crate::{
    element::MontyFieldElement,
    error::{Error, Result},
    params::FieldParams,
};

/// Width of a serialized field element in bytes.
pub const FIELD_BYTES: usize = 32;

/// Width of the input accepted by wide reduction, sized so that reducing a
/// uniform byte string leaves bias below 2^-128.
pub const WIDE_BYTES: usize = 64;
