//! Error types for spherical partitioning.

use std::fmt;

/// Errors that can occur while building fields or partitioning them.
#[derive(Debug, Clone, PartialEq)]
pub enum PartitionError {
    /// Requested number of partitions must be at least 1.
    InvalidPartitionCount(usize),

    /// Weight and position arrays have different lengths.
    LengthMismatch { weights: usize, positions: usize },

    /// A weight is negative, NaN, or infinite.
    InvalidWeight { index: usize, weight: f64 },

    /// Balance ratio must be finite and positive.
    InvalidRatio(f64),

    /// Cell count does not correspond to any grid resolution.
    InvalidCellCount(usize),

    /// A cell index is outside the grid.
    CellOutOfRange { cell: usize, num_cells: usize },

    /// The field has no entries that can be assigned to a partition.
    EmptyField,

    /// An assignment does not belong to the field it is used with, or a
    /// requested partition ID is not present in it.
    UnknownPartition(u32),

    /// No partition ID is left to hand out.
    IdOverflow { max_id: u32 },

    /// A configuration value is out of its valid range.
    InvalidConfig(String),

    /// A region selected for splitting cannot be split (zero total weight,
    /// too few members, or a cut that would leave one side empty).
    DegenerateRegion { partition: u32, message: String },

    /// The neighbor-boundary extremal search was run on a region that
    /// extends beyond a hemisphere around its barycenter.
    HemisphereExceeded { partition: u32, min_cos: f64 },

    /// The neighbor-boundary extremal search found no boundary cells
    /// (the region covers the whole grid).
    NoBoundary { partition: u32 },

    /// The neighbor-boundary extremal search needs grid adjacency, which
    /// point sets do not have.
    MissingAdjacency,
}

impl fmt::Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionError::InvalidPartitionCount(n) => {
                write!(f, "invalid partition count: need at least 1, got {}", n)
            }
            PartitionError::LengthMismatch { weights, positions } => {
                write!(
                    f,
                    "length mismatch: {} weights for {} positions",
                    weights, positions
                )
            }
            PartitionError::InvalidWeight { index, weight } => {
                write!(f, "invalid weight {} at index {}", weight, index)
            }
            PartitionError::InvalidRatio(ratio) => {
                write!(f, "invalid balance ratio: {}", ratio)
            }
            PartitionError::InvalidCellCount(n) => {
                write!(f, "cell count {} does not match any grid resolution", n)
            }
            PartitionError::CellOutOfRange { cell, num_cells } => {
                write!(f, "cell {} out of range for grid of {} cells", cell, num_cells)
            }
            PartitionError::EmptyField => write!(f, "field has no nonzero-weight entries"),
            PartitionError::UnknownPartition(id) => write!(f, "unknown partition {}", id),
            PartitionError::IdOverflow { max_id } => {
                write!(f, "no partition ID left after {}", max_id)
            }
            PartitionError::InvalidConfig(message) => write!(f, "invalid configuration: {}", message),
            PartitionError::DegenerateRegion { partition, message } => {
                write!(f, "partition {} cannot be split: {}", partition, message)
            }
            PartitionError::HemisphereExceeded { partition, min_cos } => {
                write!(
                    f,
                    "partition {} extends beyond a hemisphere (min cos to barycenter {:.4})",
                    partition, min_cos
                )
            }
            PartitionError::NoBoundary { partition } => {
                write!(f, "partition {} has no boundary cells", partition)
            }
            PartitionError::MissingAdjacency => {
                write!(f, "neighbor-boundary search requires a gridded map")
            }
        }
    }
}

impl std::error::Error for PartitionError {}
