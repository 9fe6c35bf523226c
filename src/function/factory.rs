// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use dashmap::DashMap;

use super::Function;
use crate::error::*;

/// Decodes request PDUs and memoizes the results.
///
/// Functions are cached by the exact request bytes, so two PDUs that
/// differ in any byte are always separate entries. Failed decodes are
/// not cached. The factory can be shared between threads.
///
/// Without a capacity limit the cache grows with every distinct
/// request and is never evicted.
#[derive(Debug, Default)]
pub struct FunctionFactory {
    cache: DashMap<Box<[u8]>, Arc<Function>>,
    capacity_limit: Option<usize>,
}

impl FunctionFactory {
    /// Create a factory with an unbounded cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory that caches at most `limit` functions.
    ///
    /// Requests seen after the cache is full are still decoded,
    /// they are just not remembered.
    #[must_use]
    pub fn with_capacity_limit(limit: usize) -> Self {
        Self {
            cache: DashMap::new(),
            capacity_limit: Some(limit),
        }
    }

    /// Return the function for a request PDU.
    ///
    /// Calls with identical bytes return the same instance.
    pub fn function_factory(&self, pdu: &[u8]) -> Result<Arc<Function>> {
        if let Some(function) = self.cache.get(pdu) {
            trace!("Function cache hit for request PDU {pdu:02X?}");
            return Ok(Arc::clone(function.value()));
        }
        trace!("Function cache miss for request PDU {pdu:02X?}");
        let function = Function::from_request_pdu(pdu)
            .map(Arc::new)
            .inspect_err(|err| {
                error!("Failed to decode request PDU {pdu:02X?}: {err}");
            })?;
        if self
            .capacity_limit
            .is_some_and(|limit| self.cache.len() >= limit)
        {
            debug!("Function cache is full, request PDU {pdu:02X?} is not cached");
            return Ok(function);
        }
        // Concurrent decoders of the same bytes agree on the first insert.
        let function = Arc::clone(self.cache.entry(pdu.into()).or_insert(function).value());
        Ok(function)
    }

    /// Number of cached functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    ///  Returns `true` if no function is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drop all cached functions.
    pub fn clear(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::{ReadCoils, WriteSingleCoil, frame::FunctionCode};

    #[test]
    fn create_functions() {
        let factory = FunctionFactory::new();
        let requests: &[(&[u8], FunctionCode)] = &[
            (b"\x01\x00d\x00\x03", FunctionCode::ReadCoils),
            (b"\x02\x00d\x00\x03", FunctionCode::ReadDiscreteInputs),
            (b"\x03\x00d\x00\x03", FunctionCode::ReadHoldingRegisters),
            (b"\x04\x00d\x00\x03", FunctionCode::ReadInputRegisters),
            (b"\x05\x00d\x00\x00", FunctionCode::WriteSingleCoil),
            (b"\x06\x00d\x00\x00", FunctionCode::WriteSingleRegister),
        ];
        for (pdu, expected) in requests {
            assert_eq!(
                factory.function_factory(pdu).unwrap().function_code(),
                *expected
            );
        }
        assert_eq!(factory.len(), 6);
    }

    #[test]
    fn cache_equal_requests() {
        let factory = FunctionFactory::new();
        let pdu: &[u8] = &[0x01, 0x00, 0x64, 0x00, 0x03];

        let function_1 = factory.function_factory(pdu).unwrap();
        let function_2 = factory.function_factory(pdu).unwrap();
        assert!(Arc::ptr_eq(&function_1, &function_2));
        assert_eq!(*function_1, Function::from(ReadCoils::new(100, 3).unwrap()));

        let pdu: &[u8] = &[0x01, 0x00, 0x65, 0x00, 0x03];
        let function_3 = factory.function_factory(pdu).unwrap();
        assert!(!Arc::ptr_eq(&function_1, &function_3));
        assert_ne!(function_1, function_3);
        assert_eq!(factory.len(), 2);
    }

    #[test]
    fn failed_decodes_are_not_cached() {
        let factory = FunctionFactory::new();
        assert_eq!(
            factory.function_factory(&[0x05, 0x00, 0x64, 0x00, 0x05]).err().unwrap(),
            Error::IllegalDataValue
        );
        assert_eq!(
            factory.function_factory(&[0x2B, 0x0E, 0x01, 0x00]).err().unwrap(),
            Error::UnsupportedFunction(0x2B)
        );
        assert_eq!(factory.function_factory(&[]).err().unwrap(), Error::PduLength(0));
        assert!(factory.is_empty());
    }

    #[test]
    fn capacity_limit() {
        let factory = FunctionFactory::with_capacity_limit(1);
        let first = factory.function_factory(&[0x05, 0x00, 0x01, 0xFF, 0x00]).unwrap();
        let second = factory.function_factory(&[0x05, 0x00, 0x02, 0xFF, 0x00]).unwrap();
        assert_eq!(
            *second,
            Function::from(WriteSingleCoil::new(2, 0xFF00).unwrap())
        );
        assert_eq!(factory.len(), 1);

        let again = factory.function_factory(&[0x05, 0x00, 0x01, 0xFF, 0x00]).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        let again = factory.function_factory(&[0x05, 0x00, 0x02, 0xFF, 0x00]).unwrap();
        assert!(!Arc::ptr_eq(&second, &again));
        assert_eq!(second, again);
    }

    #[test]
    fn clear_cache() {
        let factory = FunctionFactory::new();
        factory.function_factory(&[0x03, 0x00, 0x00, 0x00, 0x01]).unwrap();
        assert!(!factory.is_empty());
        factory.clear();
        assert!(factory.is_empty());
    }

    #[test]
    fn share_between_threads() {
        let factory = Arc::new(FunctionFactory::new());
        let handles: Vec<_> = (0..4u8)
            .map(|i| {
                let factory = Arc::clone(&factory);
                thread::spawn(move || {
                    for address in 0..50u8 {
                        let pdu = [0x03, 0x00, address, 0x00, i % 2 + 1];
                        factory.function_factory(&pdu).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(factory.len(), 100);
    }
}
