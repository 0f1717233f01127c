use super::resource::LocalResource;

/// A complete assignment of the slices of a scheduler: `(host, end)` per c-slice and
/// `(host, start)` per d-slice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchedulerAssignment {
    pub c_slices: Vec<(i32, i32)>,
    pub d_slices: Vec<(i32, i32)>,
}

/// Why a [`SchedulerAssignment`] is rejected by the [`SchedulerChecker`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerViolation {
    /// The usage of `dimension` on `resource` at `time` is above its capacity.
    Overloaded {
        resource: usize,
        dimension: usize,
        time: i32,
        usage: i64,
        capacity: i64,
    },
    /// The d-slice of a VM staying on its node starts before its c-slice ended.
    OverlappingAssociation { c_slice: usize, d_slice: usize },
}

/// Verifies complete assignments from scratch, independently of the incremental bookkeeping of
/// the propagator.
#[derive(Clone, Debug)]
pub struct SchedulerChecker {
    pub(crate) resources: Vec<LocalResource>,
    pub(crate) associations: Vec<(usize, usize)>,
}

impl SchedulerChecker {
    pub fn check(&self, assignment: &SchedulerAssignment) -> Result<(), SchedulerViolation> {
        let mut times = std::iter::once(0)
            .chain(assignment.c_slices.iter().map(|&(_, end)| end))
            .chain(assignment.d_slices.iter().map(|&(_, start)| start))
            .filter(|&time| time >= 0)
            .collect::<Vec<_>>();
        times.sort_unstable();
        times.dedup();

        for (resource_index, resource) in self.resources.iter().enumerate() {
            for (dimension_index, dimension) in resource.dimensions.iter().enumerate() {
                for &time in times.iter() {
                    let consuming = assignment
                        .c_slices
                        .iter()
                        .zip(dimension.c_usages.iter())
                        .filter(|&(&(host, end), _)| resource.is_member(host) && time < end)
                        .map(|(_, usage)| usage)
                        .sum::<i64>();
                    let demanding = assignment
                        .d_slices
                        .iter()
                        .zip(dimension.d_usages.iter())
                        .filter(|&(&(host, start), _)| resource.is_member(host) && start <= time)
                        .map(|(_, usage)| usage)
                        .sum::<i64>();

                    let usage = consuming + demanding;
                    if usage > dimension.capacity {
                        return Err(SchedulerViolation::Overloaded {
                            resource: resource_index,
                            dimension: dimension_index,
                            time,
                            usage,
                            capacity: dimension.capacity,
                        });
                    }
                }
            }
        }

        for &(c_slice, d_slice) in self.associations.iter() {
            let (c_host, end) = assignment.c_slices[c_slice];
            let (d_host, start) = assignment.d_slices[d_slice];
            if c_host == d_host && start < end {
                return Err(SchedulerViolation::OverlappingAssociation { c_slice, d_slice });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagators::scheduler::resource::ResourceDimension;

    fn checker() -> SchedulerChecker {
        SchedulerChecker {
            resources: vec![LocalResource::new(
                [0],
                1,
                vec![ResourceDimension {
                    capacity: 4,
                    c_usages: vec![2].into_boxed_slice(),
                    d_usages: vec![3].into_boxed_slice(),
                }],
            )],
            associations: vec![],
        }
    }

    #[test]
    fn sequential_slices_are_accepted() {
        let assignment = SchedulerAssignment {
            c_slices: vec![(0, 5)],
            d_slices: vec![(0, 5)],
        };
        assert_eq!(checker().check(&assignment), Ok(()));
    }

    #[test]
    fn overlapping_slices_are_rejected() {
        let assignment = SchedulerAssignment {
            c_slices: vec![(0, 5)],
            d_slices: vec![(0, 4)],
        };
        assert_eq!(
            checker().check(&assignment),
            Err(SchedulerViolation::Overloaded {
                resource: 0,
                dimension: 0,
                time: 4,
                usage: 5,
                capacity: 4,
            })
        );
    }

    #[test]
    fn associated_slices_may_not_overlap_on_one_node() {
        let mut checker = checker();
        checker.resources[0].dimensions[0].capacity = 10;
        checker.associations.push((0, 0));

        let assignment = SchedulerAssignment {
            c_slices: vec![(0, 5)],
            d_slices: vec![(0, 3)],
        };
        assert_eq!(
            checker.check(&assignment),
            Err(SchedulerViolation::OverlappingAssociation {
                c_slice: 0,
                d_slice: 0
            })
        );
    }
}
