//! Partition IDs per field entry.

use crate::field::WeightedField;
use crate::PartitionError;

/// Partition ID reserved for unfilled background cells.
pub const BACKGROUND: u32 = 0;

/// Mapping from field entry to partition ID.
///
/// IDs of active entries form the dense range `1..=max_id()`. Background
/// entries of a gridded map hold [`BACKGROUND`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionAssignment {
    ids: Vec<u32>,
    max_id: u32,
}

impl PartitionAssignment {
    /// Every active entry of `field` in partition 1.
    pub fn single(field: &impl WeightedField) -> Result<Self, PartitionError> {
        let ids: Vec<u32> = (0..field.len())
            .map(|i| if field.is_active(i) { 1 } else { BACKGROUND })
            .collect();
        if !ids.contains(&1) {
            return Err(PartitionError::EmptyField);
        }
        Ok(Self { ids, max_id: 1 })
    }

    /// Wrap existing IDs, checking them against `field`.
    ///
    /// Background entries must hold [`BACKGROUND`], active ones a nonzero ID,
    /// and every ID in `1..=max` must be used by some entry.
    pub fn from_ids(field: &impl WeightedField, ids: Vec<u32>) -> Result<Self, PartitionError> {
        if ids.len() != field.len() {
            return Err(PartitionError::LengthMismatch {
                weights: field.len(),
                positions: ids.len(),
            });
        }
        for (i, &id) in ids.iter().enumerate() {
            if (id == BACKGROUND) == field.is_active(i) {
                return Err(PartitionError::UnknownPartition(id));
            }
        }
        let max_id = ids.iter().copied().max().unwrap_or(BACKGROUND);
        if max_id == BACKGROUND {
            return Err(PartitionError::EmptyField);
        }
        if let Some(missing) = first_unused_id(&ids, max_id) {
            return Err(PartitionError::UnknownPartition(missing));
        }
        Ok(Self { ids, max_id })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Partition of entry `index`.
    #[inline]
    pub fn get(&self, index: usize) -> u32 {
        self.ids[index]
    }

    /// Largest ID handed out so far.
    #[inline]
    pub fn max_id(&self) -> u32 {
        self.max_id
    }

    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.ids
    }

    #[inline]
    pub fn into_vec(self) -> Vec<u32> {
        self.ids
    }

    /// Entries currently in partition `id`, ascending.
    pub fn members(&self, id: u32) -> Vec<u32> {
        self.ids
            .iter()
            .enumerate()
            .filter(|(_, &p)| p == id)
            .map(|(i, _)| i as u32)
            .collect()
    }

    /// Sorted distinct IDs present, including [`BACKGROUND`] if any entry holds it.
    pub fn partition_ids(&self) -> Vec<u32> {
        let mut present = vec![false; self.max_id as usize + 1];
        for &id in &self.ids {
            present[id as usize] = true;
        }
        present
            .iter()
            .enumerate()
            .filter(|(_, &p)| p)
            .map(|(id, _)| id as u32)
            .collect()
    }

    /// Number of distinct non-background partitions.
    pub fn num_partitions(&self) -> usize {
        self.partition_ids()
            .into_iter()
            .filter(|&id| id != BACKGROUND)
            .count()
    }

    /// Total weight per partition, indexed by ID (entry 0 is background).
    pub fn partition_weights(&self, field: &impl WeightedField) -> Result<Vec<f64>, PartitionError> {
        if field.len() != self.ids.len() {
            return Err(PartitionError::LengthMismatch {
                weights: field.len(),
                positions: self.ids.len(),
            });
        }
        let mut totals = vec![0.0; self.max_id as usize + 1];
        for (i, &id) in self.ids.iter().enumerate() {
            let slot = totals
                .get_mut(id as usize)
                .ok_or(PartitionError::UnknownPartition(id))?;
            *slot += field.weight(i);
        }
        Ok(totals)
    }

    /// Mint the next partition ID.
    #[inline]
    pub(crate) fn next_id(&self) -> Result<u32, PartitionError> {
        self.max_id
            .checked_add(1)
            .ok_or(PartitionError::IdOverflow {
                max_id: self.max_id,
            })
    }

    /// Move `moved` entries into `new_id` in one step.
    ///
    /// `new_id` must be the next unused ID; the whole update is rejected if
    /// any index is out of range.
    pub(crate) fn apply(&mut self, moved: &[u32], new_id: u32) -> Result<(), PartitionError> {
        if new_id != self.next_id()? {
            return Err(PartitionError::UnknownPartition(new_id));
        }
        if let Some(&bad) = moved.iter().find(|&&i| i as usize >= self.ids.len()) {
            return Err(PartitionError::CellOutOfRange {
                cell: bad as usize,
                num_cells: self.ids.len(),
            });
        }
        for &i in moved {
            self.ids[i as usize] = new_id;
        }
        self.max_id = new_id;
        Ok(())
    }
}

/// Smallest ID in `1..=max_id` that no entry holds.
///
/// `n` entries hold at most `n` distinct IDs, so a gap always shows up
/// within `1..=n + 1` and the scan never needs more than `n + 2` flags.
fn first_unused_id(ids: &[u32], max_id: u32) -> Option<u32> {
    let limit = (max_id as usize).min(ids.len() + 1);
    let mut present = vec![false; limit + 1];
    for &id in ids {
        if let Some(slot) = present.get_mut(id as usize) {
            *slot = true;
        }
    }
    (1..=limit).find(|&id| !present[id]).map(|id| id as u32)
}
