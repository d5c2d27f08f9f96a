//! Component Registry - Index allocation and interaction flags.
//!
//! Manages the lifecycle of component indices:
//! - ID ↔ Index bidirectional mapping
//! - Free index pool for O(1) reuse
//! - Per-index interaction flags (focusable, tab index)

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

// =============================================================================
// Registry State
// =============================================================================

/// Interaction flags the focus system reads for each index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interaction {
    pub focusable: bool,
    pub tab_index: i32,
}

thread_local! {
    static ID_TO_INDEX: RefCell<HashMap<String, usize>> = RefCell::new(HashMap::new());
    static INDEX_TO_ID: RefCell<HashMap<usize, String>> = RefCell::new(HashMap::new());

    /// Allocated indices in ascending order (focus order ties break on this).
    static ALLOCATED_INDICES: RefCell<BTreeSet<usize>> = RefCell::new(BTreeSet::new());

    static INTERACTION: RefCell<HashMap<usize, Interaction>> = RefCell::new(HashMap::new());

    static FREE_INDICES: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
    static NEXT_INDEX: RefCell<usize> = const { RefCell::new(0) };
    static ID_COUNTER: RefCell<usize> = const { RefCell::new(0) };
}

// =============================================================================
// Index Allocation
// =============================================================================

/// Allocate an index for a new component.
///
/// An existing ID returns its existing index. Without an ID one is generated.
pub fn allocate_index(id: Option<&str>) -> usize {
    let component_id = match id {
        Some(id) => id.to_string(),
        None => ID_COUNTER.with(|counter| {
            let mut counter = counter.borrow_mut();
            let id = format!("c{}", *counter);
            *counter += 1;
            id
        }),
    };

    if let Some(index) = ID_TO_INDEX.with(|map| map.borrow().get(&component_id).copied()) {
        return index;
    }

    let index = FREE_INDICES.with(|free| free.borrow_mut().pop()).unwrap_or_else(|| {
        NEXT_INDEX.with(|next| {
            let mut next = next.borrow_mut();
            let index = *next;
            *next += 1;
            index
        })
    });

    ID_TO_INDEX.with(|map| map.borrow_mut().insert(component_id.clone(), index));
    INDEX_TO_ID.with(|map| map.borrow_mut().insert(index, component_id));
    ALLOCATED_INDICES.with(|set| set.borrow_mut().insert(index));
    INTERACTION.with(|map| map.borrow_mut().insert(index, Interaction::default()));

    index
}

/// Release an index back to the pool. Unallocated indices are ignored.
pub fn release_index(index: usize) {
    let Some(id) = get_id(index) else { return };

    ID_TO_INDEX.with(|map| map.borrow_mut().remove(&id));
    INDEX_TO_ID.with(|map| map.borrow_mut().remove(&index));
    ALLOCATED_INDICES.with(|set| set.borrow_mut().remove(&index));
    INTERACTION.with(|map| map.borrow_mut().remove(&index));
    FREE_INDICES.with(|free| free.borrow_mut().push(index));

    // All components gone: start numbering from zero again.
    if get_allocated_count() == 0 {
        FREE_INDICES.with(|free| free.borrow_mut().clear());
        NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
    }
}

// =============================================================================
// Interaction Flags
// =============================================================================

fn update_interaction(index: usize, f: impl FnOnce(&mut Interaction)) {
    INTERACTION.with(|map| {
        if let Some(entry) = map.borrow_mut().get_mut(&index) {
            f(entry);
        }
    });
}

fn interaction(index: usize) -> Option<Interaction> {
    INTERACTION.with(|map| map.borrow().get(&index).copied())
}

pub fn set_focusable(index: usize, focusable: bool) {
    update_interaction(index, |i| i.focusable = focusable);
}

/// Unallocated indices are never focusable.
pub fn get_focusable(index: usize) -> bool {
    interaction(index).is_some_and(|i| i.focusable)
}

pub fn set_tab_index(index: usize, tab_index: i32) {
    update_interaction(index, |i| i.tab_index = tab_index);
}

pub fn get_tab_index(index: usize) -> i32 {
    interaction(index).map_or(0, |i| i.tab_index)
}

// =============================================================================
// Lookups
// =============================================================================

pub fn get_index(id: &str) -> Option<usize> {
    ID_TO_INDEX.with(|map| map.borrow().get(id).copied())
}

pub fn get_id(index: usize) -> Option<String> {
    INDEX_TO_ID.with(|map| map.borrow().get(&index).cloned())
}

/// All currently allocated indices, ascending.
pub fn get_allocated_indices() -> Vec<usize> {
    ALLOCATED_INDICES.with(|set| set.borrow().iter().copied().collect())
}

pub fn is_allocated(index: usize) -> bool {
    ALLOCATED_INDICES.with(|set| set.borrow().contains(&index))
}

pub fn get_allocated_count() -> usize {
    ALLOCATED_INDICES.with(|set| set.borrow().len())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset all registry state (for testing).
pub fn reset_registry() {
    ID_TO_INDEX.with(|map| map.borrow_mut().clear());
    INDEX_TO_ID.with(|map| map.borrow_mut().clear());
    ALLOCATED_INDICES.with(|set| set.borrow_mut().clear());
    INTERACTION.with(|map| map.borrow_mut().clear());
    FREE_INDICES.with(|free| free.borrow_mut().clear());
    NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
    ID_COUNTER.with(|counter| *counter.borrow_mut() = 0);
}
