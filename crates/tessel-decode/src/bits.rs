//! MSB-first bit packing, matching the packer that writes training files.
//!
//! Each board plane is `L*L` bits stored row-major, most significant bit
//! first, zero-padded up to a whole number of bytes. Bit `i` of a plane
//! lives in byte `i / 8` at bit position `7 - i % 8`.

/// Bytes needed to hold one plane of `cells` bits.
pub fn packed_row_width(cells: usize) -> usize {
    cells.div_ceil(8)
}

/// Bits in one packed plane, padding included (smallest multiple of 8 `>= cells`).
pub fn padded_bits(cells: usize) -> usize {
    packed_row_width(cells) * 8
}

/// Unpack the first `keep` bits of `bytes` into `out` as `0.0`/`1.0`.
///
/// Bits past `keep` (the row padding) are discarded.
///
/// # Panics
///
/// Panics if `bytes` holds fewer than `keep` bits or `out` is shorter
/// than `keep`.
pub fn unpack_bits_msb_into(bytes: &[u8], keep: usize, out: &mut [f32]) {
    assert!(bytes.len() * 8 >= keep, "{} bytes cannot hold {keep} bits", bytes.len());
    assert!(out.len() >= keep, "output holds {} < {keep} values", out.len());
    for (i, slot) in out[..keep].iter_mut().enumerate() {
        let bit = (bytes[i / 8] >> (7 - i % 8)) & 1;
        *slot = bit as f32;
    }
}

/// Allocating form of [`unpack_bits_msb_into`].
///
/// # Examples
///
/// ```
/// use tessel_decode::unpack_bits_msb;
///
/// assert_eq!(unpack_bits_msb(&[0b1011_0000], 5), vec![1.0, 0.0, 1.0, 1.0, 0.0]);
/// ```
pub fn unpack_bits_msb(bytes: &[u8], keep: usize) -> Vec<f32> {
    let mut out = vec![0.0; keep];
    unpack_bits_msb_into(bytes, keep, &mut out);
    out
}

/// Pack truthy values (non-zero) MSB-first, zero-padding the last byte.
pub fn pack_bits_msb(bits: &[f32]) -> Vec<u8> {
    let mut out = vec![0u8; packed_row_width(bits.len())];
    for (i, &b) in bits.iter().enumerate() {
        if b != 0.0 {
            out[i / 8] |= 1 << (7 - i % 8);
        }
    }
    out
}
