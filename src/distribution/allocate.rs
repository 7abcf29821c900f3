//! Integer allocation of a total across a distribution.

use super::{Distribution, Slot};
use crate::error::{Error, Result};
use serde::ser::{Serialize, Serializer};
use serde::Deserialize;

/// Limits applied when validating distribution tables.
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    /// Maximum number of fixed slots in one table
    pub fixed_ceiling: usize,
    /// Allowed deviation of the non-fixed share sum from 1.0
    pub share_tolerance: f64,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            fixed_ceiling: 5,
            share_tolerance: 0.05,
        }
    }
}

/// Concrete per-unit-type counts, in distribution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    counts: Vec<(String, usize)>,
}

impl Allocation {
    /// Count for a unit type (zero when absent).
    pub fn get(&self, unit: &str) -> usize {
        self.counts
            .iter()
            .find(|(u, _)| u == unit)
            .map_or(0, |(_, n)| *n)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(u, n)| (u.as_str(), *n))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl Serialize for Allocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.counts.iter().map(|(u, n)| (u, n)))
    }
}

impl FromIterator<(String, usize)> for Allocation {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// Allocate `total` units across `distribution`.
///
/// Fixed slots get exactly one unit each. Every share gets
/// `floor(remaining * share)` of the remaining budget, and the whole
/// rounding leftover goes to the largest positive share (first in table
/// order on ties). If the shares over-commit the budget, the excess is
/// taken back from the largest shares first. The result always sums to
/// `total`.
pub fn allocate(total: usize, distribution: &Distribution) -> Result<Allocation> {
    let fixed = distribution.fixed_count();
    if total < fixed {
        return Err(Error::Allocation(format!(
            "total {} is smaller than the {} fixed slots",
            total, fixed
        )));
    }
    let remaining = total - fixed;

    let mut counts: Vec<(String, usize)> = distribution
        .entries()
        .iter()
        .map(|entry| {
            let n = match entry.slot {
                Slot::Fixed => 1,
                Slot::Share(share) => (remaining as f64 * share + 1e-9).floor().max(0.0) as usize,
            };
            (entry.unit.clone(), n)
        })
        .collect();

    let proportional: usize = counts
        .iter()
        .zip(distribution.entries())
        .filter(|(_, e)| !e.slot.is_fixed())
        .map(|((_, n), _)| n)
        .sum();

    if proportional < remaining {
        let leftover = remaining - proportional;
        let recipient = distribution.largest_share().ok_or_else(|| {
            Error::Allocation(format!(
                "{} leftover units but no positive share to receive them",
                leftover
            ))
        })?;
        if let Some((_, n)) = counts.iter_mut().find(|(u, _)| u == recipient) {
            *n += leftover;
        }
        log::debug!("allocate {}: leftover {} to '{}'", total, leftover, recipient);
    } else if proportional > remaining {
        let mut excess = proportional - remaining;
        let mut order: Vec<usize> = (0..counts.len())
            .filter(|&i| !distribution.entries()[i].slot.is_fixed())
            .collect();
        order.sort_by(|&a, &b| {
            let share = |i: usize| distribution.entries()[i].slot.share().unwrap_or(0.0);
            share(b).total_cmp(&share(a))
        });
        for i in order {
            let take = excess.min(counts[i].1);
            counts[i].1 -= take;
            excess -= take;
            if excess == 0 {
                break;
            }
        }
        log::debug!("allocate {}: trimmed over-committed shares", total);
    }

    Ok(Allocation { counts })
}
