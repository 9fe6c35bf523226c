// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single value write functions (`0x05` and `0x06`).
//!
//! The normal response of both functions is an echo of the request.

use crate::{
    codec::{pack_request, unpack_request},
    error::*,
    frame::*,
    route::Routing,
    util::{validate_coil_value, validate_register_value},
};

/// Write a single output to either `ON` (`0xFF00`) or `OFF` (`0x0000`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSingleCoil {
    address: Address,
    value: Word,
}

impl WriteSingleCoil {
    pub const FUNCTION_CODE: FunctionCode = FunctionCode::WriteSingleCoil;

    /// Create a new request.
    ///
    /// Any value other than `0x0000` and `0xFF00` is rejected
    /// with [`Error::IllegalDataValue`].
    pub fn new<V>(address: Address, value: V) -> Result<Self>
    where
        V: TryInto<Word>,
    {
        let value = validate_coil_value(value)?;
        Ok(Self { address, value })
    }

    /// Decode a request PDU.
    pub fn from_request_pdu(pdu: &[u8]) -> Result<Self> {
        let (address, value) = unpack_request(pdu, Self::FUNCTION_CODE)?;
        Self::new(address, value)
    }

    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub const fn value(&self) -> Word {
        self.value
    }

    /// `true` if the request switches the coil `ON`.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.value == COIL_ON
    }

    /// Replace the value, which is validated like in [`Self::new`].
    ///
    /// The current value is kept if validation fails.
    pub fn set_value<V>(&mut self, value: V) -> Result<()>
    where
        V: TryInto<Word>,
    {
        self.value = validate_coil_value(value)?;
        Ok(())
    }

    /// Pass the value to the endpoint routed for the address.
    pub fn execute<R>(&self, slave_id: SlaveId, routing: &R) -> Result<()>
    where
        R: Routing + ?Sized,
    {
        write_single(
            Self::FUNCTION_CODE,
            self.address,
            self.value,
            slave_id,
            routing,
        )
    }

    /// Encode the response PDU.
    #[must_use]
    pub fn create_response_pdu(&self) -> Vec<u8> {
        pack_request(Self::FUNCTION_CODE, self.address, self.value).to_vec()
    }
}

/// Write a single holding register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSingleRegister {
    address: Address,
    value: Word,
}

impl WriteSingleRegister {
    pub const FUNCTION_CODE: FunctionCode = FunctionCode::WriteSingleRegister;

    /// Create a new request.
    ///
    /// Values outside of `0..=0xFFFF` are rejected with
    /// [`Error::IllegalDataValue`].
    pub fn new<V>(address: Address, value: V) -> Result<Self>
    where
        V: TryInto<Word>,
    {
        let value = validate_register_value(value)?;
        Ok(Self { address, value })
    }

    /// Decode a request PDU.
    pub fn from_request_pdu(pdu: &[u8]) -> Result<Self> {
        let (address, value) = unpack_request(pdu, Self::FUNCTION_CODE)?;
        Self::new(address, value)
    }

    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub const fn value(&self) -> Word {
        self.value
    }

    /// Replace the value, which is validated like in [`Self::new`].
    pub fn set_value<V>(&mut self, value: V) -> Result<()>
    where
        V: TryInto<Word>,
    {
        self.value = validate_register_value(value)?;
        Ok(())
    }

    /// Pass the value to the endpoint routed for the address.
    pub fn execute<R>(&self, slave_id: SlaveId, routing: &R) -> Result<()>
    where
        R: Routing + ?Sized,
    {
        write_single(
            Self::FUNCTION_CODE,
            self.address,
            self.value,
            slave_id,
            routing,
        )
    }

    /// Encode the response PDU.
    #[must_use]
    pub fn create_response_pdu(&self) -> Vec<u8> {
        pack_request(Self::FUNCTION_CODE, self.address, self.value).to_vec()
    }
}

fn write_single<R>(
    function: FunctionCode,
    address: Address,
    value: Word,
    slave_id: SlaveId,
    routing: &R,
) -> Result<()>
where
    R: Routing + ?Sized,
{
    let Some(endpoint) = routing.match_write(slave_id, function, address) else {
        warn!("No route for slave {slave_id}, function {function}, address {address}");
        return Err(Error::IllegalDataAddress);
    };
    endpoint(slave_id, address, value);
    Ok(())
}
