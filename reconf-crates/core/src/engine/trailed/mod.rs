//! Backtrackable integers and bitsets owned by propagators. Every write is recorded on a trail
//! and undone when the state is restored to an earlier checkpoint.
mod trailed_bitset;
mod trailed_change;
mod trailed_integer;
mod trailed_values;

pub(crate) use trailed_bitset::TrailedBitSet;
use trailed_change::TrailedChange;
pub(crate) use trailed_integer::TrailedInteger;
pub(crate) use trailed_values::TrailedValues;
