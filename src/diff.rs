//! Four-way comparison of a proposed env config against the live one.
//!
//! [`diff`] is pure: it never fails and has no side effects, so the update
//! flow can render and act on its result without touching the remote.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A key present on both sides with different values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueChange {
    pub new: String,
    pub old: String,
}

/// Partition of the union of both key sets. The four sets are disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDiff {
    /// Keys only in the proposed config.
    pub added: BTreeSet<String>,
    /// Keys only in the existing config.
    pub removed: BTreeSet<String>,
    /// Keys in both with different values.
    pub modified: BTreeMap<String, ValueChange>,
    /// Keys in both with identical values.
    pub unchanged: BTreeSet<String>,
}

/// Compare `proposed` against `existing`.
pub fn diff(
    proposed: &BTreeMap<String, String>,
    existing: &BTreeMap<String, String>,
) -> ConfigDiff {
    let mut result = ConfigDiff::default();

    for (key, new) in proposed {
        match existing.get(key) {
            None => {
                result.added.insert(key.clone());
            }
            Some(old) if old == new => {
                result.unchanged.insert(key.clone());
            }
            Some(old) => {
                result.modified.insert(
                    key.clone(),
                    ValueChange {
                        new: new.clone(),
                        old: old.clone(),
                    },
                );
            }
        }
    }

    result.removed = existing
        .keys()
        .filter(|key| !proposed.contains_key(*key))
        .cloned()
        .collect();

    result
}

impl ConfigDiff {
    /// Whether anything differs between the two sides, removals included.
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty() || !self.modified.is_empty()
    }

    /// Options to submit: added and modified keys with their proposed values.
    ///
    /// Removed keys are never included; the remote only merges the options it
    /// is given.
    pub fn keys_to_update(&self, proposed: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        let added = self
            .added
            .iter()
            .filter_map(|key| proposed.get(key).map(|value| (key.clone(), value.clone())));
        let modified = self
            .modified
            .iter()
            .map(|(key, change)| (key.clone(), change.new.clone()));
        added.chain(modified).collect()
    }

    /// Human-readable report of the pending changes.
    ///
    /// `existing` supplies the values shown for removed keys.
    pub fn report<'a>(
        &'a self,
        proposed: &'a BTreeMap<String, String>,
        existing: &'a BTreeMap<String, String>,
    ) -> DiffReport<'a> {
        DiffReport {
            diff: self,
            proposed,
            existing,
        }
    }
}

/// Display adapter returned by [`ConfigDiff::report`].
pub struct DiffReport<'a> {
    diff: &'a ConfigDiff,
    proposed: &'a BTreeMap<String, String>,
    existing: &'a BTreeMap<String, String>,
}

impl fmt::Display for DiffReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.diff.added.is_empty() {
            writeln!(f, "Following variables will be ADDED:")?;
            for key in &self.diff.added {
                let value = self.proposed.get(key).map_or("", String::as_str);
                writeln!(f, "\t{key}: {value}")?;
            }
        }
        if !self.diff.removed.is_empty() {
            writeln!(
                f,
                "Following variables will be REMOVED (not applied, removal is not supported):"
            )?;
            for key in &self.diff.removed {
                let value = self.existing.get(key).map_or("", String::as_str);
                writeln!(f, "\t{key}: {value}")?;
            }
        }
        if !self.diff.modified.is_empty() {
            writeln!(f, "Following variables will be UPDATED:")?;
            for (key, change) in &self.diff.modified {
                writeln!(f, "\t{key}: {} -> {}", change.old, change.new)?;
            }
        }
        Ok(())
    }
}
