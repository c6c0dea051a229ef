//! `expand_message` variants of RFC 9380 §5.3.

use core::marker::PhantomData;

use digest::core_api::BlockSizeUser;
use digest::typenum::Unsigned;
use digest::{Digest, ExtendableOutput, Update, XofReader};

use crate::error::{Error, Result};

/// Prefix for hashing a domain separation tag longer than 255 bytes down
/// to size (RFC 9380 §5.3.3).
const OVERSIZE_DST_SALT: &[u8] = b"H2C-OVERSIZE-DST-";

/// Longest domain separation tag usable without the oversize reduction.
const MAX_DST_LEN: usize = 255;

/// Hard cap on `len_in_bytes` from the two-byte length prefix.
const MAX_LEN_IN_BYTES: usize = u16::MAX as usize;

/// Produces a uniformly random byte string from a message and a domain
/// separation tag.
pub trait ExpandMsg {
    /// Expands `msg` to `len_in_bytes` bytes.
    fn expand_message(msg: &[u8], dst: &[u8], len_in_bytes: usize) -> Result<Vec<u8>>;
}

/// `expand_message_xmd` over a fixed-output hash such as SHA-256.
pub struct ExpandMsgXmd<H>(PhantomData<H>);

/// `expand_message_xof` over an extendable-output function such as
/// SHAKE128.
pub struct ExpandMsgXof<H>(PhantomData<H>);

impl<H> ExpandMsg for ExpandMsgXmd<H>
where
    H: Digest + BlockSizeUser,
{
    fn expand_message(msg: &[u8], dst: &[u8], len_in_bytes: usize) -> Result<Vec<u8>> {
        if dst.is_empty() {
            return Err(Error::EmptyDst);
        }

        let b_in_bytes = <H as Digest>::output_size();
        let ell = len_in_bytes.div_ceil(b_in_bytes);
        if ell > 255 || len_in_bytes > MAX_LEN_IN_BYTES {
            return Err(Error::OversizeOutput);
        }

        let dst_prime = reduce_dst_xmd::<H>(dst);
        let dst_prime = dst_prime.as_slice();

        // b_0 = H(Z_pad || msg || l_i_b_str || 0x00 || DST_prime)
        let b_0 = H::new()
            .chain_update(vec![0u8; <H as BlockSizeUser>::BlockSize::USIZE])
            .chain_update(msg)
            .chain_update((len_in_bytes as u16).to_be_bytes())
            .chain_update([0u8])
            .chain_update(dst_prime)
            .chain_update([dst_prime.len() as u8])
            .finalize();

        let mut b_i = H::new()
            .chain_update(&b_0)
            .chain_update([1u8])
            .chain_update(dst_prime)
            .chain_update([dst_prime.len() as u8])
            .finalize();

        let mut uniform = Vec::with_capacity(ell * b_in_bytes);
        uniform.extend_from_slice(&b_i);

        for i in 2..=ell {
            let mut xored = b_0.clone();
            for (x, b) in xored.iter_mut().zip(b_i.iter()) {
                *x ^= b;
            }
            b_i = H::new()
                .chain_update(xored)
                .chain_update([i as u8])
                .chain_update(dst_prime)
                .chain_update([dst_prime.len() as u8])
                .finalize();
            uniform.extend_from_slice(&b_i);
        }

        uniform.truncate(len_in_bytes);
        Ok(uniform)
    }
}

impl<H> ExpandMsg for ExpandMsgXof<H>
where
    H: Default + ExtendableOutput + Update,
{
    fn expand_message(msg: &[u8], dst: &[u8], len_in_bytes: usize) -> Result<Vec<u8>> {
        if dst.is_empty() {
            return Err(Error::EmptyDst);
        }
        if len_in_bytes > MAX_LEN_IN_BYTES {
            return Err(Error::OversizeOutput);
        }

        let dst_prime = reduce_dst_xof::<H>(dst);
        let dst_prime = dst_prime.as_slice();

        let mut hash = H::default();
        hash.update(msg);
        hash.update(&(len_in_bytes as u16).to_be_bytes());
        hash.update(dst_prime);
        hash.update(&[dst_prime.len() as u8]);

        let mut uniform = vec![0u8; len_in_bytes];
        hash.finalize_xof().read(&mut uniform);
        Ok(uniform)
    }
}

/// `DST_prime` for XMD: the tag itself, or `H(salt || DST)` when over
/// 255 bytes.
fn reduce_dst_xmd<H: Digest>(dst: &[u8]) -> Vec<u8> {
    if dst.len() > MAX_DST_LEN {
        H::new()
            .chain_update(OVERSIZE_DST_SALT)
            .chain_update(dst)
            .finalize()
            .to_vec()
    } else {
        dst.to_vec()
    }
}

/// `DST_prime` for XOF: the tag itself, or 32 XOF bytes of
/// `salt || DST` when over 255 bytes.
fn reduce_dst_xof<H: Default + ExtendableOutput + Update>(dst: &[u8]) -> Vec<u8> {
    if dst.len() > MAX_DST_LEN {
        let mut hash = H::default();
        hash.update(OVERSIZE_DST_SALT);
        hash.update(dst);
        let mut out = vec![0u8; 32];
        hash.finalize_xof().read(&mut out);
        out
    } else {
        dst.to_vec()
    }
}
