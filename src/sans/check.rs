//! Helper for computing frame checksums.
//!
//! Both the basic frame and the pressure extension close with a single byte
//! holding the wrapping sum of the bytes before it.

/// Accumulate a slice of bytes into an additive checksum value.
pub fn compute_checksum(init: u8, r: &[u8]) -> u8 {
    r.iter().fold(init, |acc, b| acc.wrapping_add(*b))
}

/// Check that the last byte of `r` holds the checksum of the bytes before it.
///
/// Returns the found and calculated values on mismatch.
pub fn verify(r: &[u8]) -> Result<(), (u8, u8)> {
    let Some((&found, body)) = r.split_last() else {
        return Err((0, 0));
    };

    let calculated = compute_checksum(0, body);

    if found == calculated {
        Ok(())
    } else {
        Err((found, calculated))
    }
}
