//! Energy consumption profiles for edges and paths.
//!
//! A profile describes how traversing a segment interacts with a bounded
//! onboard energy store of a fixed capacity: the minimum charge required on
//! entry so the store never leaves `[0, capacity]`, the maximum charge
//! possible on exit when entering fully charged, and the net energy change.
//! Profiles form a monoid under concatenation (`chain`), with the profile of
//! a zero-consumption segment as the identity.
//!
//! Chaining can leave the feasible window: `min_entry > capacity` or
//! `max_exit < 0` marks a path that cannot be driven with this battery at
//! all. Such profiles are carried through uncanonicalized (`is_feasible`
//! tells them apart), and the monoid laws hold on the feasible domain only.

use super::{Weight, INFINITY};

/// Energy amounts are 32bit signed ints, negative values mean net regeneration.
pub type EnergyUnits = i32;

/// Compact representation of the feasible entry/exit energy window and net
/// energy delta of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumptionProfile {
    /// Minimum energy level required on entry so that the level stays within `[0, capacity]`.
    pub min_entry: EnergyUnits,
    /// Maximum energy level possible on exit when entering at full capacity.
    pub max_exit: EnergyUnits,
    /// Net signed energy change, negative when the segment regenerates more than it consumes.
    pub cost: EnergyUnits,
}

impl ConsumptionProfile {
    /// Profile of a single segment with the given net energy delta.
    ///
    /// Panics when a consuming delta exceeds the capacity - such an edge
    /// could never be traversed and may not enter the graph in the first place.
    pub fn from_energy_delta(capacity: EnergyUnits, delta: EnergyUnits) -> ConsumptionProfile {
        if delta >= 0 {
            assert!(delta <= capacity, "energy delta {} exceeds capacity {}", delta, capacity);
            ConsumptionProfile {
                min_entry: delta,
                max_exit: capacity - delta,
                cost: delta,
            }
        } else {
            ConsumptionProfile {
                min_entry: 0,
                max_exit: capacity,
                cost: delta,
            }
        }
    }

    /// The identity element for `chain`, the profile of a segment which does not touch the energy store.
    pub fn neutral(capacity: EnergyUnits) -> ConsumptionProfile {
        ConsumptionProfile {
            min_entry: 0,
            max_exit: capacity,
            cost: 0,
        }
    }

    /// Profile of traversing `self` and then `second`.
    ///
    /// Associative on the feasible domain, so a path profile can be
    /// accumulated edge by edge during a search and will match combining the
    /// whole path at once. Results may leave `[0, capacity]`, which marks the
    /// concatenation as undrivable, see `is_feasible`.
    pub fn chain(self, second: ConsumptionProfile) -> ConsumptionProfile {
        ConsumptionProfile {
            min_entry: std::cmp::max(self.min_entry, self.cost + second.min_entry),
            max_exit: std::cmp::min(second.max_exit, self.max_exit - second.cost),
            cost: std::cmp::max(self.cost + second.cost, self.min_entry - second.max_exit),
        }
    }

    /// Whether the segment can be driven at all with a battery of the given capacity.
    ///
    /// `min_entry` never drops below zero and `max_exit` never exceeds the
    /// capacity, so these two bounds are the only ones that can break.
    pub fn is_feasible(self, capacity: EnergyUnits) -> bool {
        self.min_entry <= capacity && self.max_exit >= 0
    }
}

/// Cost of a single edge or an accumulated path: travel time plus the energy profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeCost {
    pub time: Weight,
    pub energy: ConsumptionProfile,
}

impl EdgeCost {
    /// Zero travel time and the neutral profile - the cost of the empty path.
    pub fn neutral(capacity: EnergyUnits) -> EdgeCost {
        EdgeCost {
            time: 0,
            energy: ConsumptionProfile::neutral(capacity),
        }
    }

    /// The sentinel cost of an unreachable target.
    pub fn infinity(capacity: EnergyUnits) -> EdgeCost {
        EdgeCost {
            time: INFINITY,
            energy: ConsumptionProfile::neutral(capacity),
        }
    }
}

// Slot placeholder and `io::Load` element default. An unreachable cost, not a usable value.
impl Default for EdgeCost {
    fn default() -> EdgeCost {
        EdgeCost {
            time: INFINITY,
            energy: ConsumptionProfile {
                min_entry: 0,
                max_exit: 0,
                cost: 0,
            },
        }
    }
}

/// Zip per-edge travel times and energy deltas into `EdgeCost`s.
pub fn edge_costs(capacity: EnergyUnits, time: &[Weight], energy: &[EnergyUnits]) -> Vec<EdgeCost> {
    assert_eq!(time.len(), energy.len());
    time.iter()
        .zip(energy)
        .map(|(&time, &delta)| EdgeCost {
            time,
            energy: ConsumptionProfile::from_energy_delta(capacity, delta),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAP: EnergyUnits = 10;

    #[test]
    fn transform_consuming_edge() {
        let profile = ConsumptionProfile::from_energy_delta(CAP, 3);
        assert_eq!(
            profile,
            ConsumptionProfile {
                min_entry: 3,
                max_exit: 7,
                cost: 3
            }
        );
    }

    #[test]
    fn transform_regenerating_edge() {
        let profile = ConsumptionProfile::from_energy_delta(CAP, -4);
        assert_eq!(
            profile,
            ConsumptionProfile {
                min_entry: 0,
                max_exit: 10,
                cost: -4
            }
        );
    }

    #[test]
    #[should_panic]
    fn transform_rejects_delta_beyond_capacity() {
        ConsumptionProfile::from_energy_delta(CAP, 11);
    }

    #[test]
    fn neutral_is_identity() {
        for delta in [-10, -4, 0, 3, 10] {
            let profile = ConsumptionProfile::from_energy_delta(CAP, delta);
            assert_eq!(profile.chain(ConsumptionProfile::neutral(CAP)), profile);
            assert_eq!(ConsumptionProfile::neutral(CAP).chain(profile), profile);
        }
    }

    #[test]
    fn chain_is_associative_on_feasible_profiles() {
        let deltas = [-10, -6, -1, 0, 2, 5, 10];
        let singles: Vec<_> = deltas.iter().map(|&d| ConsumptionProfile::from_energy_delta(CAP, d)).collect();
        // include already-combined profiles as operands
        let mut profiles = singles.clone();
        for &first in &singles {
            for &second in &singles {
                let combined = first.chain(second);
                if combined.is_feasible(CAP) {
                    profiles.push(combined);
                }
            }
        }

        for &a in &profiles {
            for &b in &profiles {
                for &c in &profiles {
                    let left = a.chain(b).chain(c);
                    let right = a.chain(b.chain(c));
                    // outside the feasible window the raw algebra makes no promises
                    if [a.chain(b), b.chain(c), left, right].iter().all(|p| p.is_feasible(CAP)) {
                        assert_eq!(left, right, "{:?} {:?} {:?}", a, b, c);
                    }
                }
            }
        }
    }

    #[test]
    fn chain_marks_undrivable_concatenations() {
        let steep = ConsumptionProfile::from_energy_delta(CAP, 8);
        assert!(steep.is_feasible(CAP));

        // two 8-unit climbs in a row exceed any charge a 10 unit battery can hold
        let undrivable = steep.chain(steep);
        assert!(!undrivable.is_feasible(CAP));
        assert!(undrivable.min_entry > CAP);

        // infeasibility is sticky under further chaining
        let downhill = ConsumptionProfile::from_energy_delta(CAP, -5);
        assert!(!undrivable.chain(downhill).is_feasible(CAP));
    }

    #[test]
    fn chain_tracks_feasibility_window() {
        let uphill = ConsumptionProfile::from_energy_delta(CAP, 8);
        let downhill = ConsumptionProfile::from_energy_delta(CAP, -5);

        let there = uphill.chain(downhill);
        assert_eq!(there.min_entry, 8);
        assert_eq!(there.cost, 3);

        let back = downhill.chain(uphill);
        assert_eq!(back.min_entry, 3);
        assert_eq!(back.max_exit, 2);
    }
}
