//! Recursive bisection of a weighted field into balanced partitions.
//!
//! Each split finds the two extremal points of one partition, rotates the
//! partition into the frame where those points straddle longitude π on the
//! equator, and cuts at the longitude that balances weight according to
//! the slot counts of the two halves. Members east of the cut move to a
//! freshly minted partition ID.

use crate::assignment::{PartitionAssignment, BACKGROUND};
use crate::balance::LongitudeProfile;
use crate::field::WeightedField;
use crate::rotate::SplitTransform;
use crate::timing::Timed;
use crate::{AngularPoint, PartitionConfig, PartitionError};

/// Result of planning one split; not yet applied.
#[derive(Debug, Clone)]
pub(crate) struct SplitPlan {
    /// Members that move to the new partition, ascending.
    pub moved: Vec<u32>,
    /// Cut longitude in the canonical frame.
    pub split_longitude: f64,
}

fn degenerate(partition: u32, message: &str) -> PartitionError {
    PartitionError::DegenerateRegion {
        partition,
        message: message.to_string(),
    }
}

/// Plan the split of `partition` with target weight ratio (moved : kept).
///
/// Reads the assignment only; the caller applies the plan.
pub(crate) fn plan_split<F: WeightedField>(
    field: &F,
    assignment: &PartitionAssignment,
    partition: u32,
    ratio: f64,
    config: &PartitionConfig,
) -> Result<SplitPlan, PartitionError> {
    let _t = Timed::debug("plan_split");
    let members = assignment.members(partition);
    if members.is_empty() {
        return Err(PartitionError::UnknownPartition(partition));
    }
    if members.len() < 2 {
        return Err(degenerate(partition, "fewer than two members"));
    }
    let total: f64 = members.iter().map(|&i| field.weight(i as usize)).sum();
    if !(total > 0.0) {
        return Err(degenerate(partition, "zero total weight"));
    }

    let (c1, c2) = config.extremal.find(
        field,
        assignment,
        partition,
        &members,
        config.hemisphere_tolerance,
    )?;
    let transform = SplitTransform::canonicalize(c1, c2);

    let positions: Vec<AngularPoint> = members
        .iter()
        .map(|&i| field.position(i as usize))
        .collect();
    let phi: Vec<f64> = transform
        .forward_points(&positions)
        .iter()
        .map(|p| p.phi)
        .collect();
    let weights: Vec<f64> = members.iter().map(|&i| field.weight(i as usize)).collect();

    let profile = LongitudeProfile::new(&phi, &weights);
    let split_longitude = config.balance.search(&profile, ratio);

    let moved: Vec<u32> = members
        .iter()
        .zip(&phi)
        .filter(|(_, &p)| p > split_longitude)
        .map(|(&i, _)| i)
        .collect();
    if moved.is_empty() || moved.len() == members.len() {
        return Err(degenerate(partition, "cut leaves one side empty"));
    }

    let plan = SplitPlan {
        moved,
        split_longitude,
    };
    log::debug!(
        "split partition {}: {} members, ratio {:.3}, cut at {:.6}, moving {}",
        partition,
        members.len(),
        ratio,
        plan.split_longitude,
        plan.moved.len()
    );
    Ok(plan)
}

/// Split one partition in two with the default configuration.
///
/// See [`split_region_in_two_with`].
pub fn split_region_in_two<F: WeightedField>(
    field: &F,
    ratio: f64,
    assignment: Option<&PartitionAssignment>,
    partition: Option<u32>,
) -> Result<PartitionAssignment, PartitionError> {
    split_region_in_two_with(field, ratio, assignment, partition, &PartitionConfig::default())
}

/// Split one partition in two.
///
/// Without an `assignment`, the field starts as a single partition 1.
/// `partition` defaults to 1. The members on the far side of the cut get
/// the ID `max_id + 1`; `ratio` is the target weight of the new partition
/// relative to what stays behind.
pub fn split_region_in_two_with<F: WeightedField>(
    field: &F,
    ratio: f64,
    assignment: Option<&PartitionAssignment>,
    partition: Option<u32>,
    config: &PartitionConfig,
) -> Result<PartitionAssignment, PartitionError> {
    if !(ratio.is_finite() && ratio > 0.0) {
        return Err(PartitionError::InvalidRatio(ratio));
    }
    config.validate()?;
    let mut assignment = match assignment {
        Some(a) if a.len() != field.len() => {
            return Err(PartitionError::LengthMismatch {
                weights: field.len(),
                positions: a.len(),
            })
        }
        Some(a) => a.clone(),
        None => PartitionAssignment::single(field)?,
    };
    let partition = partition.unwrap_or(1);
    if partition == BACKGROUND || partition > assignment.max_id() {
        return Err(PartitionError::UnknownPartition(partition));
    }

    let plan = plan_split(field, &assignment, partition, ratio, config)?;
    let new_id = assignment.next_id()?;
    assignment.apply(&plan.moved, new_id)?;
    Ok(assignment)
}

/// Split a field into `n` weight-balanced partitions with the default
/// configuration.
pub fn split_into_n<F: WeightedField>(
    field: &F,
    n: usize,
) -> Result<PartitionAssignment, PartitionError> {
    split_into_n_with(field, n, &PartitionConfig::default())
}

/// Split a field into `n` weight-balanced partitions.
///
/// Every active entry ends up with an ID in `1..=n`. Each ID carries a
/// slot count, the number of final partitions it still has to become;
/// IDs are swept in ascending order and any ID holding more than one slot
/// is bisected, keeping `floor(slots / 2)` and handing the rest to a new
/// ID. Exactly `n - 1` splits are performed.
pub fn split_into_n_with<F: WeightedField>(
    field: &F,
    n: usize,
    config: &PartitionConfig,
) -> Result<PartitionAssignment, PartitionError> {
    if n == 0 {
        return Err(PartitionError::InvalidPartitionCount(n));
    }
    config.validate()?;
    let _t = Timed::info("split_into_n");

    let mut assignment = PartitionAssignment::single(field)?;
    let mut slots = vec![0usize; n + 1];
    slots[1] = n;

    while (assignment.max_id() as usize) < n {
        for id in 1..=n {
            if slots[id] <= 1 {
                continue;
            }
            let keep = slots[id] / 2;
            let give = slots[id] - keep;
            let ratio = give as f64 / keep as f64;

            let new_id = assignment.next_id()?;
            let plan = plan_split(field, &assignment, id as u32, ratio, config)?;
            assignment.apply(&plan.moved, new_id)?;

            slots[id] = keep;
            slots[new_id as usize] = give;
        }
    }

    log::debug!("split into {} partitions", assignment.max_id());
    Ok(assignment)
}
