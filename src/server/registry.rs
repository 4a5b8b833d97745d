//! Module `registry`
//!
//! Tracks simultaneous connections against the global cap and the
//! per-source-IP cap. Refusal happens at accept time; established
//! connections are never affected.

use std::collections::HashMap;
use std::net::IpAddr;

pub struct ConnectionRegistry {
    max_total: usize,
    max_per_source: usize,
    total: usize,
    per_source: HashMap<IpAddr, usize>,
}

impl ConnectionRegistry {
    pub fn new(max_total: usize, max_per_source: usize) -> Self {
        Self {
            max_total,
            max_per_source,
            total: 0,
            per_source: HashMap::new(),
        }
    }

    /// Registers a connection from `source`, or refuses it if either cap
    /// would be exceeded.
    pub fn try_register(&mut self, source: IpAddr) -> bool {
        if self.total >= self.max_total {
            return false;
        }

        let count = self.per_source.entry(source).or_insert(0);
        if *count >= self.max_per_source {
            return false;
        }

        *count += 1;
        self.total += 1;
        true
    }

    /// Releases a previously registered connection.
    pub fn release(&mut self, source: IpAddr) {
        if let Some(count) = self.per_source.get_mut(&source) {
            *count -= 1;
            if *count == 0 {
                self.per_source.remove(&source);
            }
            self.total -= 1;
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn from_source(&self, source: IpAddr) -> usize {
        self.per_source.get(&source).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([10, 0, 0, last])
    }

    #[test]
    fn per_source_cap_refuses_the_next_connection() {
        let mut registry = ConnectionRegistry::new(256, 2);
        assert!(registry.try_register(ip(1)));
        assert!(registry.try_register(ip(1)));
        assert!(!registry.try_register(ip(1)));

        // Another source is unaffected
        assert!(registry.try_register(ip(2)));
    }

    #[test]
    fn global_cap_refuses_across_sources() {
        let mut registry = ConnectionRegistry::new(2, 10);
        assert!(registry.try_register(ip(1)));
        assert!(registry.try_register(ip(2)));
        assert!(!registry.try_register(ip(3)));
    }

    #[test]
    fn release_frees_a_slot() {
        let mut registry = ConnectionRegistry::new(256, 1);
        assert!(registry.try_register(ip(1)));
        assert!(!registry.try_register(ip(1)));

        registry.release(ip(1));
        assert_eq!(registry.total(), 0);
        assert_eq!(registry.from_source(ip(1)), 0);
        assert!(registry.try_register(ip(1)));
    }

    #[test]
    fn release_of_unknown_source_is_harmless() {
        let mut registry = ConnectionRegistry::new(2, 2);
        registry.release(ip(9));
        assert_eq!(registry.total(), 0);
    }
}
