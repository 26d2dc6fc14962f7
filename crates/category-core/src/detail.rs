use crate::ancestors::ancestors;
use crate::error::{CategoryError, CategoryResult};
use crate::store::CategoryStore;
use crate::types::CategoryDetail;

/// Gathers a category with its kids, ancestor chain and siblings.
pub fn assemble<S>(store: &S, id: i64) -> CategoryResult<CategoryDetail>
where
    S: CategoryStore + ?Sized,
{
    let category = store.find_by_id(id)?.ok_or(CategoryError::NotFound(id))?;

    Ok(CategoryDetail {
        id: category.id,
        name: category.name,
        children: store.kids_of(id)?,
        parents: ancestors(store, id)?,
        siblings: store.siblings_of(id)?,
    })
}
