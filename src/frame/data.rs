// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::*;
use crate::error::*;
use byteorder::{BigEndian, ByteOrder};

/// Encode a register response PDU into `buf`.
///
/// Layout: `function code | byte count | big-endian words`.
/// It returns the number of bytes written.
pub fn pack_registers_into(function: FunctionCode, data: &[Word], buf: &mut [u8]) -> Result<usize> {
    let byte_count = data.len() * 2;
    let byte_count_field = u8::try_from(byte_count).map_err(|_| Error::ByteCount(byte_count))?;
    if buf.len() < byte_count + 2 {
        return Err(Error::BufferSize);
    }
    buf[0] = function.value();
    buf[1] = byte_count_field;
    for (i, w) in data.iter().enumerate() {
        BigEndian::write_u16(&mut buf[2 + i * 2..], *w);
    }
    debug!(
        "Packed register values {data:?} into response PDU {:02X?}",
        &buf[..byte_count + 2]
    );
    Ok(byte_count + 2)
}

/// Create a register response PDU.
///
/// ```
/// use modbus_functions::{pack_registers, FunctionCode};
///
/// let pdu = pack_registers(FunctionCode::ReadHoldingRegisters, &[0, 1337]).unwrap();
/// assert_eq!(pdu, [0x03, 0x04, 0x00, 0x00, 0x05, 0x39]);
/// ```
pub fn pack_registers(function: FunctionCode, data: &[Word]) -> Result<Vec<u8>> {
    let mut buf = vec![0; data.len() * 2 + 2];
    let len = pack_registers_into(function, data, &mut buf)?;
    buf.truncate(len);
    Ok(buf)
}
