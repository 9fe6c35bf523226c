// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing of requests to read and write endpoints.

use core::{fmt, ops::RangeInclusive};

use crate::frame::*;

/// Endpoint that reads the value at a single address.
///
/// Bit functions expect `0` or `1`, register functions any 16 bit value.
pub type ReadEndpoint = dyn Fn(SlaveId, Address) -> Word + Send + Sync;

/// Endpoint that writes a value to a single address.
pub type WriteEndpoint = dyn Fn(SlaveId, Address, Word) + Send + Sync;

/// Lookup of endpoints by `(slave_id, function_code, address)`.
///
/// Lookups must be free of side effects; only invoking the
/// returned endpoint may change state.
pub trait Routing {
    /// Find the endpoint that serves a read request for `address`.
    fn match_read(
        &self,
        slave_id: SlaveId,
        function: FunctionCode,
        address: Address,
    ) -> Option<&ReadEndpoint>;

    /// Find the endpoint that serves a write request for `address`.
    fn match_write(
        &self,
        slave_id: SlaveId,
        function: FunctionCode,
        address: Address,
    ) -> Option<&WriteEndpoint>;
}

impl<T: Routing + ?Sized> Routing for &T {
    fn match_read(
        &self,
        slave_id: SlaveId,
        function: FunctionCode,
        address: Address,
    ) -> Option<&ReadEndpoint> {
        (**self).match_read(slave_id, function, address)
    }

    fn match_write(
        &self,
        slave_id: SlaveId,
        function: FunctionCode,
        address: Address,
    ) -> Option<&WriteEndpoint> {
        (**self).match_write(slave_id, function, address)
    }
}

struct Rule<E: ?Sized> {
    slave_ids: Vec<SlaveId>,
    function_codes: Vec<FunctionCode>,
    addresses: RangeInclusive<Address>,
    endpoint: Box<E>,
}

impl<E: ?Sized> Rule<E> {
    fn matches(&self, slave_id: SlaveId, function: FunctionCode, address: Address) -> bool {
        self.slave_ids.contains(&slave_id)
            && self.function_codes.contains(&function)
            && self.addresses.contains(&address)
    }
}

/// In-memory routing table.
///
/// Rules are evaluated in the order they were added, the first
/// matching rule wins.
///
/// ```
/// use modbus_functions::{FunctionCode, RouteMap, Routing};
///
/// let mut routes = RouteMap::new();
/// routes.add_read_route([1, 2], [FunctionCode::ReadCoils], 100..=199, |_, addr| addr % 2);
///
/// assert!(routes.match_read(1, FunctionCode::ReadCoils, 150).is_some());
/// assert!(routes.match_read(3, FunctionCode::ReadCoils, 150).is_none());
/// ```
#[derive(Default)]
pub struct RouteMap {
    read: Vec<Rule<ReadEndpoint>>,
    write: Vec<Rule<WriteEndpoint>>,
}

impl RouteMap {
    /// Create an empty routing table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a read endpoint.
    pub fn add_read_route<S, F, E>(
        &mut self,
        slave_ids: S,
        function_codes: F,
        addresses: RangeInclusive<Address>,
        endpoint: E,
    ) where
        S: IntoIterator<Item = SlaveId>,
        F: IntoIterator<Item = FunctionCode>,
        E: Fn(SlaveId, Address) -> Word + Send + Sync + 'static,
    {
        let rule = Rule {
            slave_ids: slave_ids.into_iter().collect(),
            function_codes: function_codes.into_iter().collect(),
            addresses,
            endpoint: Box::new(endpoint) as Box<ReadEndpoint>,
        };
        debug!(
            "Add read route for slaves {:?}, functions {:?}, addresses {:?}",
            rule.slave_ids, rule.function_codes, rule.addresses
        );
        self.read.push(rule);
    }

    /// Register a write endpoint.
    pub fn add_write_route<S, F, E>(
        &mut self,
        slave_ids: S,
        function_codes: F,
        addresses: RangeInclusive<Address>,
        endpoint: E,
    ) where
        S: IntoIterator<Item = SlaveId>,
        F: IntoIterator<Item = FunctionCode>,
        E: Fn(SlaveId, Address, Word) + Send + Sync + 'static,
    {
        let rule = Rule {
            slave_ids: slave_ids.into_iter().collect(),
            function_codes: function_codes.into_iter().collect(),
            addresses,
            endpoint: Box::new(endpoint) as Box<WriteEndpoint>,
        };
        debug!(
            "Add write route for slaves {:?}, functions {:?}, addresses {:?}",
            rule.slave_ids, rule.function_codes, rule.addresses
        );
        self.write.push(rule);
    }

    /// Total number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read.len() + self.write.len()
    }

    ///  Returns `true` if no rule has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Routing for RouteMap {
    fn match_read(
        &self,
        slave_id: SlaveId,
        function: FunctionCode,
        address: Address,
    ) -> Option<&ReadEndpoint> {
        self.read
            .iter()
            .find(|rule| rule.matches(slave_id, function, address))
            .map(|rule| rule.endpoint.as_ref())
    }

    fn match_write(
        &self,
        slave_id: SlaveId,
        function: FunctionCode,
        address: Address,
    ) -> Option<&WriteEndpoint> {
        self.write
            .iter()
            .find(|rule| rule.matches(slave_id, function, address))
            .map(|rule| rule.endpoint.as_ref())
    }
}

impl fmt::Debug for RouteMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMap")
            .field("read_routes", &self.read.len())
            .field("write_routes", &self.write.len())
            .finish()
    }
}
