use std::collections::HashSet;

use crate::error::{CategoryError, CategoryResult};
use crate::store::CategoryStore;
use crate::types::Category;

/// Longest ancestor chain walked before giving up, independent of the
/// nesting limit applied to create requests.
pub const MAX_ANCESTOR_CHAIN: usize = 4096;

/// Walks `child_of` upward from `id`, nearest ancestor first.
///
/// A category is expected to have at most one parent; when a store reports
/// more, the first one is followed. Revisiting a category, or climbing past
/// [`MAX_ANCESTOR_CHAIN`] ancestors, is a structural error.
pub fn ancestors<S>(store: &S, id: i64) -> CategoryResult<Vec<Category>>
where
    S: CategoryStore + ?Sized,
{
    walk_up(store, id, MAX_ANCESTOR_CHAIN)
}

fn walk_up<S>(store: &S, id: i64, max_chain: usize) -> CategoryResult<Vec<Category>>
where
    S: CategoryStore + ?Sized,
{
    let mut chain = Vec::new();
    let mut visited = HashSet::from([id]);
    let mut current = id;

    loop {
        let parents = store.parents_of(current)?;
        if parents.len() > 1 {
            tracing::warn!(
                category_id = current,
                parent_count = parents.len(),
                "Category has more than one parent, following the first"
            );
        }
        let Some(parent) = parents.into_iter().next() else {
            break;
        };

        if !visited.insert(parent.id) {
            tracing::error!(
                category_id = id,
                repeated_id = parent.id,
                "Cycle detected while resolving ancestors"
            );
            return Err(CategoryError::Structural(format!(
                "cycle through category {} in ancestors of {id}",
                parent.id
            )));
        }
        if chain.len() >= max_chain {
            return Err(CategoryError::Structural(format!(
                "ancestor chain of {id} is longer than {max_chain} levels"
            )));
        }

        current = parent.id;
        chain.push(parent);
    }

    Ok(chain)
}
