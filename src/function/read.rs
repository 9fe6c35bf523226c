// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read functions (`0x01` - `0x04`).

use crate::{codec::unpack_request, error::*, frame::*, route::Routing, util::validate_quantity};

/// Maximum number of coils or discrete inputs per request.
pub const MAX_BIT_QUANTITY: Quantity = 2000;

/// Maximum number of registers per request.
pub const MAX_REGISTER_QUANTITY: Quantity = 125;

macro_rules! read_function {
    (
        $(#[$meta:meta])*
        $name:ident, $function:expr, $max_quantity:expr, $pack:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            starting_address: Address,
            quantity: Quantity,
        }

        impl $name {
            pub const FUNCTION_CODE: FunctionCode = $function;
            pub const MAX_QUANTITY: Quantity = $max_quantity;

            /// Create a new request.
            ///
            /// Fails with [`Error::IllegalDataValue`] if `quantity`
            /// is not within `1..=MAX_QUANTITY`.
            pub fn new(starting_address: Address, quantity: Quantity) -> Result<Self> {
                let quantity = validate_quantity(quantity, Self::MAX_QUANTITY)?;
                Ok(Self {
                    starting_address,
                    quantity,
                })
            }

            /// Decode a request PDU.
            pub fn from_request_pdu(pdu: &[u8]) -> Result<Self> {
                let (starting_address, quantity) = unpack_request(pdu, Self::FUNCTION_CODE)?;
                Self::new(starting_address, quantity)
            }

            #[must_use]
            pub const fn starting_address(&self) -> Address {
                self.starting_address
            }

            #[must_use]
            pub const fn quantity(&self) -> Quantity {
                self.quantity
            }

            /// Read all requested addresses.
            ///
            /// The values are returned in ascending address order.
            pub fn execute<R>(&self, slave_id: SlaveId, routing: &R) -> Result<Vec<Word>>
            where
                R: Routing + ?Sized,
            {
                read_range(
                    Self::FUNCTION_CODE,
                    self.starting_address,
                    self.quantity,
                    slave_id,
                    routing,
                )
            }

            /// Encode the response PDU for the values returned by [`Self::execute`].
            pub fn create_response_pdu(&self, data: &[Word]) -> Result<Vec<u8>> {
                $pack(Self::FUNCTION_CODE, data)
            }
        }
    };
}

read_function!(
    /// Read from 1 to 2000 contiguous coils.
    ///
    /// The response packs one coil per bit, starting at the LSB of the first byte.
    ReadCoils,
    FunctionCode::ReadCoils,
    MAX_BIT_QUANTITY,
    pack_bits
);

read_function!(
    /// Read from 1 to 2000 contiguous discrete inputs.
    ReadDiscreteInputs,
    FunctionCode::ReadDiscreteInputs,
    MAX_BIT_QUANTITY,
    pack_bits
);

read_function!(
    /// Read from 1 to 125 contiguous holding registers.
    ///
    /// The response carries two bytes per register, high order byte first.
    ReadHoldingRegisters,
    FunctionCode::ReadHoldingRegisters,
    MAX_REGISTER_QUANTITY,
    pack_registers
);

read_function!(
    /// Read from 1 to 125 contiguous input registers.
    ReadInputRegisters,
    FunctionCode::ReadInputRegisters,
    MAX_REGISTER_QUANTITY,
    pack_registers
);

/// Resolve every address of the range first, then invoke the endpoints.
///
/// A single unrouted address fails the whole request before any
/// endpoint has been called.
fn read_range<R>(
    function: FunctionCode,
    starting_address: Address,
    quantity: Quantity,
    slave_id: SlaveId,
    routing: &R,
) -> Result<Vec<Word>>
where
    R: Routing + ?Sized,
{
    let first = u32::from(starting_address);
    let end = first + u32::from(quantity);
    let mut endpoints = Vec::with_capacity(usize::from(quantity));
    for address in first..end {
        // Addresses beyond 0xFFFF can't be routed.
        let endpoint = Address::try_from(address).ok().and_then(|address| {
            routing
                .match_read(slave_id, function, address)
                .map(|endpoint| (address, endpoint))
        });
        let Some(endpoint) = endpoint else {
            warn!("No route for slave {slave_id}, function {function}, address {address}");
            return Err(Error::IllegalDataAddress);
        };
        endpoints.push(endpoint);
    }
    Ok(endpoints
        .into_iter()
        .map(|(address, endpoint)| endpoint(slave_id, address))
        .collect())
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::route::RouteMap;

    fn alternating_routes() -> RouteMap {
        let mut routes = RouteMap::new();
        routes.add_read_route(
            [1],
            [FunctionCode::ReadCoils, FunctionCode::ReadDiscreteInputs],
            0..=0xFFFF,
            |_, address| address % 2,
        );
        routes
    }

    #[test]
    fn function_constants() {
        assert_eq!(ReadCoils::FUNCTION_CODE.value(), 1);
        assert_eq!(ReadCoils::MAX_QUANTITY, 2000);
        assert_eq!(ReadDiscreteInputs::FUNCTION_CODE.value(), 2);
        assert_eq!(ReadDiscreteInputs::MAX_QUANTITY, 2000);
        assert_eq!(ReadHoldingRegisters::FUNCTION_CODE.value(), 3);
        assert_eq!(ReadHoldingRegisters::MAX_QUANTITY, 125);
        assert_eq!(ReadInputRegisters::FUNCTION_CODE.value(), 4);
        assert_eq!(ReadInputRegisters::MAX_QUANTITY, 125);
    }

    #[test]
    fn create_from_request_pdu() {
        let bytes: &[u8] = &[0x01, 0x00, 0x64, 0x00, 0x03];
        let function = ReadCoils::from_request_pdu(bytes).unwrap();
        assert_eq!(function.starting_address(), 100);
        assert_eq!(function.quantity(), 3);
    }

    #[test]
    fn create_with_quantity_bounds() {
        assert!(ReadCoils::new(0, 1).is_ok());
        assert!(ReadCoils::new(0, 2000).is_ok());
        assert_eq!(ReadCoils::new(0, 0).err().unwrap(), Error::IllegalDataValue);
        assert_eq!(
            ReadCoils::new(0, 2001).err().unwrap(),
            Error::IllegalDataValue
        );
        assert!(ReadInputRegisters::new(0, 125).is_ok());
        assert_eq!(
            ReadInputRegisters::new(0, 126).err().unwrap(),
            Error::IllegalDataValue
        );
    }

    #[test]
    fn create_from_request_pdu_with_too_many_items() {
        let bytes: &[u8] = &[0x01, 0x00, 0x64, 0x07, 0xD1]; // 2001
        assert_eq!(
            ReadCoils::from_request_pdu(bytes).err().unwrap(),
            Error::IllegalDataValue
        );
        let bytes: &[u8] = &[0x03, 0x00, 0x64, 0x00, 0x7E]; // 126
        assert_eq!(
            ReadHoldingRegisters::from_request_pdu(bytes).err().unwrap(),
            Error::IllegalDataValue
        );
    }

    #[test]
    fn create_from_request_pdu_of_other_function() {
        let bytes: &[u8] = &[0x02, 0x00, 0x64, 0x00, 0x03];
        assert_eq!(
            ReadCoils::from_request_pdu(bytes).err().unwrap(),
            Error::UnsupportedFunction(0x02)
        );
    }

    #[test]
    fn execute() {
        let routes = alternating_routes();
        let function = ReadCoils::new(100, 3).unwrap();
        assert_eq!(function.execute(1, &routes).unwrap(), vec![0, 1, 0]);
    }

    #[test]
    fn execute_without_route() {
        let routes = RouteMap::new();
        let function = ReadCoils::new(100, 3).unwrap();
        assert_eq!(
            function.execute(1, &routes).err().unwrap(),
            Error::IllegalDataAddress
        );
        // Routed for slave 1 only
        let routes = alternating_routes();
        assert_eq!(
            function.execute(2, &routes).err().unwrap(),
            Error::IllegalDataAddress
        );
    }

    #[test]
    fn execute_with_partial_route_calls_no_endpoint() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut routes = RouteMap::new();
        {
            let calls = Arc::clone(&calls);
            routes.add_read_route(
                [1],
                [FunctionCode::ReadHoldingRegisters],
                100..=101,
                move |_, address| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    address
                },
            );
        }
        let function = ReadHoldingRegisters::new(100, 3).unwrap();
        assert_eq!(
            function.execute(1, &routes).err().unwrap(),
            Error::IllegalDataAddress
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let function = ReadHoldingRegisters::new(100, 2).unwrap();
        assert_eq!(function.execute(1, &routes).unwrap(), vec![100, 101]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn execute_beyond_last_address() {
        let mut routes = RouteMap::new();
        routes.add_read_route([1], [FunctionCode::ReadInputRegisters], 0..=0xFFFF, |_, _| 7);
        let function = ReadInputRegisters::new(0xFFFF, 1).unwrap();
        assert_eq!(function.execute(1, &routes).unwrap(), vec![7]);
        let function = ReadInputRegisters::new(0xFFFF, 2).unwrap();
        assert_eq!(
            function.execute(1, &routes).err().unwrap(),
            Error::IllegalDataAddress
        );
    }

    #[test]
    fn routes_are_looked_up_per_function() {
        let routes = alternating_routes();
        let function = ReadHoldingRegisters::new(100, 1).unwrap();
        assert_eq!(
            function.execute(1, &routes).err().unwrap(),
            Error::IllegalDataAddress
        );
    }

    #[test]
    fn create_single_bit_response_pdu() {
        let function = ReadCoils::new(100, 3).unwrap();
        assert_eq!(
            function.create_response_pdu(&[1, 1, 0]).unwrap(),
            &[0x01, 0x01, 0x03]
        );
        assert_eq!(
            function
                .create_response_pdu(&[0, 1, 0, 0, 0, 0, 0, 0, 1])
                .unwrap(),
            &[0x01, 0x02, 0x02, 0x01]
        );
        let function = ReadDiscreteInputs::new(100, 3).unwrap();
        assert_eq!(
            function.create_response_pdu(&[1, 1, 0]).unwrap(),
            &[0x02, 0x01, 0x03]
        );
    }

    #[test]
    fn create_register_response_pdu() {
        let function = ReadHoldingRegisters::new(100, 2).unwrap();
        assert_eq!(
            function.create_response_pdu(&[0, 1337]).unwrap(),
            &[0x03, 0x04, 0x00, 0x00, 0x05, 0x39]
        );
        let function = ReadInputRegisters::new(100, 3).unwrap();
        assert_eq!(
            function.create_response_pdu(&[8, 0, 15]).unwrap(),
            &[0x04, 0x06, 0x00, 0x08, 0x00, 0x00, 0x00, 0x0F]
        );
    }

    #[test]
    fn largest_responses_fit_byte_count() {
        let function = ReadCoils::new(0, MAX_BIT_QUANTITY).unwrap();
        let pdu = function.create_response_pdu(&[1; 2000]).unwrap();
        assert_eq!(pdu.len(), 252);
        assert_eq!(pdu[1], 250);

        let function = ReadHoldingRegisters::new(0, MAX_REGISTER_QUANTITY).unwrap();
        let pdu = function.create_response_pdu(&[0xABCD; 125]).unwrap();
        assert_eq!(pdu.len(), 252);
        assert_eq!(pdu[1], 250);
    }
}
