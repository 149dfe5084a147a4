//! Dependent Selection Resolver
//!
//! Drives the cascading region → province → city → barangay pick lists.
//! Selecting a level clears everything below it and invalidates any fetch
//! still in flight for those levels; a fetch result is only applied if it
//! is still current when it arrives.

use tracing::debug;

use super::{AddressLevel, AddressSelection, RefItem, NCR_CODE};
use crate::api::ReferenceApi;

/// Handle for one candidate-list fetch. Carries the epoch that was current
/// when the fetch was issued; `apply_options` compares it against the
/// level's live epoch before writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub level: AddressLevel,
    pub parent_code: Option<String>,
    epoch: u64,
}

/// Cascade state for one address field.
#[derive(Debug, Clone, Default)]
pub struct SelectionResolver {
    selection: AddressSelection,
    options: [Vec<RefItem>; 4],
    epochs: [u64; 4],
    mirrored: bool,
}

impl SelectionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for the initial region-list fetch.
    pub fn begin(&mut self) -> FetchTicket {
        self.invalidate_from(AddressLevel::Region);
        FetchTicket {
            level: AddressLevel::Region,
            parent_code: None,
            epoch: self.epochs[AddressLevel::Region.index()],
        }
    }

    /// Record a selection at `level`.
    ///
    /// Clears every deeper level (selection and cached options) and
    /// invalidates their pending fetches, then returns the fetch ticket for
    /// the child list, if the level has one. Under the NCR sentinel the
    /// region's child is the city list. No-op while mirrored.
    pub fn select(&mut self, level: AddressLevel, item: RefItem) -> Option<FetchTicket> {
        if self.mirrored {
            return None;
        }

        let child = Self::child_of(level, &item.code);
        let parent_code = item.code.clone();
        self.selection.set(level, Some(item));

        for deeper in AddressLevel::ALL.iter().filter(|l| **l > level) {
            self.selection.set(*deeper, None);
            self.options[deeper.index()].clear();
            self.epochs[deeper.index()] += 1;
        }

        child.map(|child| FetchTicket {
            level: child,
            parent_code: Some(parent_code),
            epoch: self.epochs[child.index()],
        })
    }

    /// Apply a fetched candidate list, unless a later selection has made
    /// the ticket stale. Returns whether the result was accepted.
    pub fn apply_options(&mut self, ticket: &FetchTicket, items: Vec<RefItem>) -> bool {
        if self.mirrored || self.epochs[ticket.level.index()] != ticket.epoch {
            debug!(level = %ticket.level, "discarding stale option fetch");
            return false;
        }
        self.options[ticket.level.index()] = items;
        true
    }

    /// Mirror this address from `source` ("same as above"). The dependent
    /// chain is suspended; pending fetches are invalidated.
    pub fn mirror_from(&mut self, source: &AddressSelection) {
        self.selection = source.clone();
        self.mirrored = true;
        self.invalidate_from(AddressLevel::Region);
        for opts in &mut self.options {
            opts.clear();
        }
    }

    /// Leave mirror mode. The selection reverts to an empty record, not to
    /// the mirrored snapshot.
    pub fn clear_mirror(&mut self) {
        self.selection = AddressSelection::default();
        self.mirrored = false;
        self.invalidate_from(AddressLevel::Region);
    }

    pub fn set_street(&mut self, street: impl Into<String>) {
        if !self.mirrored {
            self.selection.street = street.into();
        }
    }

    pub fn selection(&self) -> &AddressSelection {
        &self.selection
    }

    pub fn options(&self, level: AddressLevel) -> &[RefItem] {
        &self.options[level.index()]
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    fn invalidate_from(&mut self, level: AddressLevel) {
        for l in AddressLevel::ALL.iter().filter(|l| **l >= level) {
            self.epochs[l.index()] += 1;
        }
    }

    fn child_of(level: AddressLevel, code: &str) -> Option<AddressLevel> {
        match level {
            AddressLevel::Region if code == NCR_CODE => Some(AddressLevel::City),
            AddressLevel::Barangay => None,
            _ => AddressLevel::from_index(level.index() + 1),
        }
    }
}

/// Fetch the candidate list for `ticket` and apply it if still current.
pub async fn run_fetch(
    api: &dyn ReferenceApi,
    resolver: &mut SelectionResolver,
    ticket: FetchTicket,
) -> anyhow::Result<bool> {
    let items = api
        .fetch_options(ticket.level, ticket.parent_code.as_deref())
        .await?;
    Ok(resolver.apply_options(&ticket, items))
}
