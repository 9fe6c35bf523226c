// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bit packing of coil and discrete input states.

use super::*;
use crate::error::*;

/// Calculate the number of bytes required for a given number of bits.
pub const fn packed_bits_len(bitcount: usize) -> usize {
    (bitcount + 7) / 8
}

/// Pack bit states into a byte array.
///
/// Every non-zero value is treated as `ON`. The first state occupies the
/// LSB of the first byte. Unused high order bits of the last byte are zero.
///
/// It returns the number of bytes used to pack the bits.
pub fn pack_coils(bits: &[Word], bytes: &mut [u8]) -> Result<usize> {
    let packed_size = packed_bits_len(bits.len());
    if bytes.len() < packed_size {
        return Err(Error::BufferSize);
    }
    bytes[..packed_size].fill(0);
    bits.iter().enumerate().for_each(|(i, b)| {
        let v = u8::from(*b != 0);
        bytes[i / 8] |= v << (i % 8);
    });
    Ok(packed_size)
}

/// Encode a single bit response PDU into `buf`.
///
/// Layout: `function code | byte count | packed bits`.
/// It returns the number of bytes written.
pub fn pack_bits_into(function: FunctionCode, data: &[Word], buf: &mut [u8]) -> Result<usize> {
    let byte_count = packed_bits_len(data.len());
    let byte_count_field = u8::try_from(byte_count).map_err(|_| Error::ByteCount(byte_count))?;
    if buf.len() < byte_count + 2 {
        return Err(Error::BufferSize);
    }
    buf[0] = function.value();
    buf[1] = byte_count_field;
    let packed = pack_coils(data, &mut buf[2..])?;
    debug_assert_eq!(packed, byte_count);
    debug!(
        "Packed {} bit(s) into response PDU {:02X?}",
        data.len(),
        &buf[..packed + 2]
    );
    Ok(packed + 2)
}

/// Create a single bit response PDU.
///
/// ```
/// use modbus_functions::{pack_bits, FunctionCode};
///
/// let pdu = pack_bits(FunctionCode::ReadCoils, &[1, 1, 0]).unwrap();
/// assert_eq!(pdu, [0x01, 0x01, 0x03]);
/// ```
pub fn pack_bits(function: FunctionCode, data: &[Word]) -> Result<Vec<u8>> {
    let mut buf = vec![0; packed_bits_len(data.len()) + 2];
    let len = pack_bits_into(function, data, &mut buf)?;
    buf.truncate(len);
    Ok(buf)
}
