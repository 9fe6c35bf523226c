// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Modbus server functions.
//!
//! Decodes request PDUs into typed [`Function`] values, executes them
//! against a [`Routing`] implementation and encodes the response PDUs.
//!
//! ```
//! use modbus_functions::{FunctionFactory, RouteMap, FunctionCode};
//!
//! let mut routes = RouteMap::new();
//! routes.add_read_route([1], [FunctionCode::ReadHoldingRegisters], 0..=9, |_, addr| addr * 10);
//!
//! let factory = FunctionFactory::new();
//! let function = factory.function_factory(&[0x03, 0x00, 0x01, 0x00, 0x02]).unwrap();
//! let response = function.process(1, &routes).unwrap();
//! assert_eq!(response, [0x03, 0x04, 0x00, 0x0A, 0x00, 0x14]);
//! ```

#[macro_use]
extern crate log;

mod codec;
mod error;
mod frame;
mod function;
mod route;
mod util;

pub use codec::encode_exception;
pub use error::*;
pub use frame::*;
pub use function::*;
pub use route::*;
pub use util::*;
