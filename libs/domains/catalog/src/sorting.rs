use database::{Direction, Sort};
use tracing::warn;

/// Column a result set can be ordered by, parsed from a sort property name.
pub(crate) trait SortKey: Copy {
    /// Key used when no sort (or an unknown one) is requested
    const DEFAULT: Self;

    fn from_property(property: &str) -> Option<Self>;
}

/// Resolves a requested sort against the whitelist of `K`; unknown
/// properties fall back to `K::DEFAULT` ascending.
pub(crate) fn resolve<K: SortKey>(sort: Option<&Sort>, entity: &'static str) -> (K, Direction) {
    let Some(sort) = sort else {
        return (K::DEFAULT, Direction::Asc);
    };

    match K::from_property(&sort.property) {
        Some(key) => (key, sort.direction),
        None => {
            warn!(entity, property = %sort.property, "Unknown sort property, ordering by id");
            (K::DEFAULT, Direction::Asc)
        }
    }
}

/// Applies `direction` to an ascending comparison.
pub(crate) fn directed(ordering: std::cmp::Ordering, direction: Direction) -> std::cmp::Ordering {
    match direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}
