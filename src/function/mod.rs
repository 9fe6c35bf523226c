// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{codec::encode_exception, error::*, frame::*, route::Routing};

mod factory;
mod read;
mod write;

pub use self::{factory::*, read::*, write::*};

/// A decoded request that can be executed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    ReadCoils(ReadCoils),
    ReadDiscreteInputs(ReadDiscreteInputs),
    ReadHoldingRegisters(ReadHoldingRegisters),
    ReadInputRegisters(ReadInputRegisters),
    WriteSingleCoil(WriteSingleCoil),
    WriteSingleRegister(WriteSingleRegister),
}

impl Function {
    /// Decode a request PDU.
    ///
    /// Function codes other than `0x01` - `0x06` are rejected with
    /// [`Error::UnsupportedFunction`].
    pub fn from_request_pdu(pdu: &[u8]) -> Result<Self> {
        let Some(&fn_code) = pdu.first() else {
            return Err(Error::PduLength(0));
        };

        use FunctionCode as f;

        let function: Self = match FunctionCode::new(fn_code) {
            f::ReadCoils => ReadCoils::from_request_pdu(pdu)?.into(),
            f::ReadDiscreteInputs => ReadDiscreteInputs::from_request_pdu(pdu)?.into(),
            f::ReadHoldingRegisters => ReadHoldingRegisters::from_request_pdu(pdu)?.into(),
            f::ReadInputRegisters => ReadInputRegisters::from_request_pdu(pdu)?.into(),
            f::WriteSingleCoil => WriteSingleCoil::from_request_pdu(pdu)?.into(),
            f::WriteSingleRegister => WriteSingleRegister::from_request_pdu(pdu)?.into(),
            f::Custom(code) => return Err(Error::UnsupportedFunction(code)),
        };
        Ok(function)
    }

    #[must_use]
    pub const fn function_code(&self) -> FunctionCode {
        match self {
            Self::ReadCoils(_) => ReadCoils::FUNCTION_CODE,
            Self::ReadDiscreteInputs(_) => ReadDiscreteInputs::FUNCTION_CODE,
            Self::ReadHoldingRegisters(_) => ReadHoldingRegisters::FUNCTION_CODE,
            Self::ReadInputRegisters(_) => ReadInputRegisters::FUNCTION_CODE,
            Self::WriteSingleCoil(_) => WriteSingleCoil::FUNCTION_CODE,
            Self::WriteSingleRegister(_) => WriteSingleRegister::FUNCTION_CODE,
        }
    }

    /// Execute the request against the routed endpoints.
    ///
    /// Read functions return one value per address, write functions
    /// return no values.
    pub fn execute<R>(&self, slave_id: SlaveId, routing: &R) -> Result<Vec<Word>>
    where
        R: Routing + ?Sized,
    {
        match self {
            Self::ReadCoils(f) => f.execute(slave_id, routing),
            Self::ReadDiscreteInputs(f) => f.execute(slave_id, routing),
            Self::ReadHoldingRegisters(f) => f.execute(slave_id, routing),
            Self::ReadInputRegisters(f) => f.execute(slave_id, routing),
            Self::WriteSingleCoil(f) => f.execute(slave_id, routing).map(|()| Vec::new()),
            Self::WriteSingleRegister(f) => f.execute(slave_id, routing).map(|()| Vec::new()),
        }
    }

    /// Encode the response PDU for the values returned by [`Self::execute`].
    ///
    /// Write functions ignore `data` and echo the request.
    pub fn create_response_pdu(&self, data: &[Word]) -> Result<Vec<u8>> {
        match self {
            Self::ReadCoils(f) => f.create_response_pdu(data),
            Self::ReadDiscreteInputs(f) => f.create_response_pdu(data),
            Self::ReadHoldingRegisters(f) => f.create_response_pdu(data),
            Self::ReadInputRegisters(f) => f.create_response_pdu(data),
            Self::WriteSingleCoil(f) => Ok(f.create_response_pdu()),
            Self::WriteSingleRegister(f) => Ok(f.create_response_pdu()),
        }
    }

    /// Execute the request and encode its response PDU.
    pub fn process<R>(&self, slave_id: SlaveId, routing: &R) -> Result<Vec<u8>>
    where
        R: Routing + ?Sized,
    {
        let data = self.execute(slave_id, routing)?;
        self.create_response_pdu(&data)
    }

    /// Like [`Self::process`], but answers protocol faults with
    /// an exception response PDU.
    ///
    /// Only errors without a Modbus exception are returned.
    pub fn process_or_exception<R>(&self, slave_id: SlaveId, routing: &R) -> Result<Vec<u8>>
    where
        R: Routing + ?Sized,
    {
        self.process(slave_id, routing).or_else(|err| {
            encode_exception(self.function_code().value(), &err)
                .map(|bytes| bytes.to_vec())
                .ok_or(err)
        })
    }
}

impl From<ReadCoils> for Function {
    fn from(f: ReadCoils) -> Self {
        Self::ReadCoils(f)
    }
}

impl From<ReadDiscreteInputs> for Function {
    fn from(f: ReadDiscreteInputs) -> Self {
        Self::ReadDiscreteInputs(f)
    }
}

impl From<ReadHoldingRegisters> for Function {
    fn from(f: ReadHoldingRegisters) -> Self {
        Self::ReadHoldingRegisters(f)
    }
}

impl From<ReadInputRegisters> for Function {
    fn from(f: ReadInputRegisters) -> Self {
        Self::ReadInputRegisters(f)
    }
}

impl From<WriteSingleCoil> for Function {
    fn from(f: WriteSingleCoil) -> Self {
        Self::WriteSingleCoil(f)
    }
}

impl From<WriteSingleRegister> for Function {
    fn from(f: WriteSingleRegister) -> Self {
        Self::WriteSingleRegister(f)
    }
}

impl From<Function> for FunctionCode {
    fn from(f: Function) -> Self {
        f.function_code()
    }
}
