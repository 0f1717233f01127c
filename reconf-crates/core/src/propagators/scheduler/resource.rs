use crate::engine::variables::DomainId;
use crate::propagation::ReadDomains;

/// The usages and capacity of one dimension of a [`LocalResource`].
#[derive(Clone, Debug)]
pub(crate) struct ResourceDimension {
    pub(crate) capacity: i64,
    /// Indexed by c-slice.
    pub(crate) c_usages: Box<[i64]>,
    /// Indexed by d-slice.
    pub(crate) d_usages: Box<[i64]>,
}

/// A set of nodes sharing the capacities of its dimensions: a single node, or an alias group.
#[derive(Clone, Debug)]
pub(crate) struct LocalResource {
    members: Box<[i32]>,
    is_member: Box<[bool]>,
    pub(crate) dimensions: Vec<ResourceDimension>,
}

/// How the host of a slice relates to the members of a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Membership {
    /// Every value of the host domain is a member.
    Known,
    /// Some, but not all, values of the host domain are members.
    Candidate,
    /// No value of the host domain is a member.
    Outside,
}

impl LocalResource {
    pub(crate) fn new(
        members: impl IntoIterator<Item = i32>,
        nb_nodes: usize,
        dimensions: Vec<ResourceDimension>,
    ) -> LocalResource {
        let mut is_member = vec![false; nb_nodes];
        let mut members = members
            .into_iter()
            .filter(|&node| {
                let fresh = !is_member[node as usize];
                is_member[node as usize] = true;
                fresh
            })
            .collect::<Vec<_>>();
        members.sort_unstable();

        LocalResource {
            members: members.into_boxed_slice(),
            is_member: is_member.into_boxed_slice(),
            dimensions,
        }
    }

    pub(crate) fn members(&self) -> &[i32] {
        &self.members
    }

    pub(crate) fn is_member(&self, node: i32) -> bool {
        usize::try_from(node)
            .ok()
            .and_then(|node| self.is_member.get(node).copied())
            .unwrap_or(false)
    }

    pub(crate) fn membership<Context: ReadDomains>(
        &self,
        context: &Context,
        host: DomainId,
    ) -> Membership {
        if !self.members.iter().any(|&node| context.contains(host, node)) {
            return Membership::Outside;
        }

        let is_subset = self.is_member(context.lower_bound(host))
            && self.is_member(context.upper_bound(host))
            && context.iterate_domain(host).all(|node| self.is_member(node));

        if is_subset {
            Membership::Known
        } else {
            Membership::Candidate
        }
    }
}
