// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;

use crate::frame::Exception;

/// Result type used throughout this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// modbus-functions Error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A request field violates the domain of the function
    IllegalDataValue,
    /// No route exists for a requested address
    IllegalDataAddress,
    /// Function code not implemented by this engine
    UnsupportedFunction(u8),
    /// Invalid request PDU length
    PduLength(usize),
    /// Invalid buffer size
    BufferSize,
    /// Response byte count does not fit into a single byte
    ByteCount(usize),
}

impl Error {
    /// The Modbus exception a server should answer with.
    ///
    /// Returns `None` for failures that are local to the caller,
    /// e.g. a too small output buffer.
    #[must_use]
    pub const fn exception(&self) -> Option<Exception> {
        match self {
            Self::IllegalDataValue | Self::PduLength(_) => Some(Exception::IllegalDataValue),
            Self::IllegalDataAddress => Some(Exception::IllegalDataAddress),
            Self::UnsupportedFunction(_) => Some(Exception::IllegalFunction),
            Self::ByteCount(_) => Some(Exception::ServerDeviceFailure),
            Self::BufferSize => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Error::*;

        match self {
            IllegalDataValue => write!(f, "Illegal data value"),
            IllegalDataAddress => write!(f, "Illegal data address"),
            UnsupportedFunction(fn_code) => {
                write!(f, "Unsupported function code: 0x{fn_code:0>2X}")
            }
            PduLength(len) => write!(f, "Invalid request PDU length: {len}"),
            BufferSize => write!(f, "Invalid buffer size"),
            ByteCount(cnt) => write!(f, "Invalid byte count: {cnt}"),
        }
    }
}

impl std::error::Error for Error {}
