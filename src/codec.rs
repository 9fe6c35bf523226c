// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request PDU unpacking and exception response encoding.

use crate::{error::*, frame::*};
use byteorder::{BigEndian, ByteOrder};

impl From<ExceptionResponse> for [u8; 2] {
    fn from(ex: ExceptionResponse) -> [u8; 2] {
        let data = &mut [0; 2];
        let fn_code: u8 = ex.function.into();
        debug_assert!(fn_code < 0x80);
        data[0] = fn_code + 0x80;
        data[1] = ex.exception as u8;
        *data
    }
}

/// Encode the exception response for a failed request.
///
/// Returns `None` if the error is not reported to the client.
///
/// ```
/// use modbus_functions::{encode_exception, Error};
///
/// let bytes = encode_exception(0x2B, &Error::UnsupportedFunction(0x2B));
/// assert_eq!(bytes, Some([0xAB, 0x01]));
/// ```
pub fn encode_exception(fn_code: u8, err: &Error) -> Option<[u8; 2]> {
    let exception = err.exception()?;
    if fn_code >= 0x80 {
        warn!("Cannot answer function code 0x{fn_code:0>2X} with an exception");
        return None;
    }
    Some(
        ExceptionResponse {
            function: FunctionCode::new(fn_code),
            exception,
        }
        .into(),
    )
}

/// Split a request PDU into its function code and two 16 bit fields.
///
/// Every request handled by this engine has the layout
/// `function code | u16 | u16`.
pub(crate) fn unpack_request(bytes: &[u8], expected: FunctionCode) -> Result<(u16, u16)> {
    if bytes.len() != REQUEST_PDU_LEN {
        return Err(Error::PduLength(bytes.len()));
    }
    let fn_code = bytes[0];
    if FunctionCode::new(fn_code) != expected {
        return Err(Error::UnsupportedFunction(fn_code));
    }
    let first = BigEndian::read_u16(&bytes[1..3]);
    let second = BigEndian::read_u16(&bytes[3..5]);
    Ok((first, second))
}

/// Serialize `function code | u16 | u16`.
pub(crate) fn pack_request(function: FunctionCode, first: u16, second: u16) -> [u8; REQUEST_PDU_LEN] {
    let mut buf = [0; REQUEST_PDU_LEN];
    buf[0] = function.value();
    BigEndian::write_u16(&mut buf[1..3], first);
    BigEndian::write_u16(&mut buf[3..5], second);
    buf
}
