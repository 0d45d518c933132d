//! Address directory - maps symbolic addresses to mailboxes.
//!
//! Built once at startup through [`DirectoryBuilder`]; the resulting
//! [`Directory`] has no mutating methods, so it is shared behind an `Arc`
//! and read concurrently without locks.

use std::collections::HashMap;

use super::{Address, Mailbox};
use crate::types::{Error, Result};

/// Collects registrations during startup.
#[derive(Debug, Default)]
pub struct DirectoryBuilder {
    entries: HashMap<Address, Mailbox>,
}

impl DirectoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `mailbox` under its own address.
    ///
    /// Each address may be registered once.
    pub fn register(&mut self, mailbox: Mailbox) -> Result<&mut Self> {
        let address = mailbox.address().clone();
        if self.entries.contains_key(&address) {
            return Err(Error::configuration(format!(
                "address already registered: {}",
                address
            )));
        }

        tracing::debug!("Registered mailbox {}", address);
        self.entries.insert(address, mailbox);
        Ok(self)
    }

    pub fn build(self) -> Directory {
        Directory {
            entries: self.entries,
        }
    }
}

/// Immutable registry of mailboxes.
#[derive(Debug, Default)]
pub struct Directory {
    entries: HashMap<Address, Mailbox>,
}

impl Directory {
    /// Exact lookup.
    pub fn get(&self, address: &Address) -> Option<&Mailbox> {
        self.entries.get(address)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.entries.contains_key(address)
    }

    /// Mailbox registered at `address` or at its closest registered ancestor.
    ///
    /// A parent mailbox is responsible for every address below it that has no
    /// mailbox of its own.
    pub fn nearest(&self, address: &Address) -> Option<&Mailbox> {
        let mut current = Some(address.clone());
        while let Some(addr) = current {
            if let Some(mailbox) = self.entries.get(&addr) {
                return Some(mailbox);
            }
            current = addr.parent();
        }
        None
    }

    /// Registered children of `parent`, sorted by address.
    pub fn children(&self, parent: &Address) -> Vec<&Address> {
        let mut children: Vec<&Address> = self
            .entries
            .keys()
            .filter(|addr| addr.parent().as_ref() == Some(parent))
            .collect();
        children.sort();
        children
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
