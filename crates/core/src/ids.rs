//! Dense identifier management.
//!
//! Facilities, patients and procedures are numbered `1..=N` in list order. Rather than handing
//! out monotonically increasing ids, every structural change recomputes all of them, so a
//! collection never has gaps. The owning collection is the only writer of these ids.

/// An entity carrying a dense, position-derived identifier.
pub trait DenseId {
    /// Current dense id (0 until the entity has been added to a collection).
    fn dense_id(&self) -> usize;

    /// Overwrites the dense id. Only collection owners call this.
    fn set_dense_id(&mut self, id: usize);
}

/// Reassigns `id = index + 1` across the whole slice.
///
/// Idempotent: running it twice without a structural change in between is a no-op.
pub(crate) fn reassign_ids<T: DenseId>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_dense_id(index + 1);
    }
}

/// Appends `item` and renumbers. Returns the dense id the item received.
pub(crate) fn push_and_reassign<T: DenseId>(items: &mut Vec<T>, item: T) -> usize {
    items.push(item);
    reassign_ids(items);
    items.len()
}

/// Removes every item whose dense id equals `id`, then renumbers.
///
/// Ids are unique, so at most one item matches; that item is returned. An unknown id leaves
/// the collection untouched.
pub(crate) fn remove_and_reassign<T: DenseId>(items: &mut Vec<T>, id: usize) -> Option<T> {
    let position = items.iter().position(|item| item.dense_id() == id)?;
    let removed = items.remove(position);
    items.retain(|item| item.dense_id() != id);
    reassign_ids(items);
    Some(removed)
}

/// Finds the item whose dense id equals `id`.
pub(crate) fn find_by_id<T: DenseId>(items: &[T], id: usize) -> Option<&T> {
    items.iter().find(|item| item.dense_id() == id)
}

/// Mutable counterpart of [`find_by_id`].
pub(crate) fn find_by_id_mut<T: DenseId>(items: &mut [T], id: usize) -> Option<&mut T> {
    items.iter_mut().find(|item| item.dense_id() == id)
}
