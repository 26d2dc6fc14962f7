use crate::config::BuildLimits;
use crate::error::{CategoryError, CategoryResult};
use crate::store::CategoryStore;
use crate::types::{Category, CategorySpec, MAX_NAME_LEN};

/// Creates the category tree described by `spec` and returns its root.
///
/// Each child subtree is built completely, in input order, before the batch
/// of children is attached to its parent and marked as mutual siblings.
/// Only children created together under one parent become siblings.
pub fn build<S>(store: &S, spec: &CategorySpec, limits: BuildLimits) -> CategoryResult<Category>
where
    S: CategoryStore + ?Sized,
{
    build_node(store, spec, 0, limits)
}

fn build_node<S>(
    store: &S,
    spec: &CategorySpec,
    depth: usize,
    limits: BuildLimits,
) -> CategoryResult<Category>
where
    S: CategoryStore + ?Sized,
{
    if depth >= limits.max_depth {
        return Err(CategoryError::validation(
            "children",
            format!("nesting deeper than {} levels is not allowed.", limits.max_depth),
        ));
    }

    let name = validate_name(spec.name.as_deref())?;
    if store.find_by_name(name)?.is_some() {
        return Err(CategoryError::duplicate_name());
    }
    let parent = store.create_category(name)?;

    let children = spec.children();
    if !children.is_empty() {
        let mut kids = Vec::with_capacity(children.len());
        for child in children {
            kids.push(build_node(store, child, depth + 1, limits)?);
        }

        let kid_ids: Vec<i64> = kids.iter().map(|kid| kid.id).collect();
        store.attach_kids(parent.id, &kid_ids)?;
        set_siblings(store, &kid_ids)?;

        tracing::debug!(
            category_id = parent.id,
            kids = kid_ids.len(),
            "Attached kids to category"
        );
    }

    Ok(parent)
}

fn set_siblings<S>(store: &S, kids: &[i64]) -> CategoryResult<()>
where
    S: CategoryStore + ?Sized,
{
    for (i, kid) in kids.iter().enumerate() {
        for other in &kids[i + 1..] {
            store.add_sibling(*kid, *other)?;
        }
    }
    Ok(())
}

/// Checks a requested name and returns it with surrounding whitespace removed.
pub fn validate_name(name: Option<&str>) -> CategoryResult<&str> {
    let name = name
        .ok_or_else(|| CategoryError::validation("name", "\"name\" field is required."))?
        .trim();
    if name.is_empty() {
        return Err(CategoryError::validation("name", "this field may not be blank."));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CategoryError::validation(
            "name",
            format!("ensure this field has no more than {MAX_NAME_LEN} characters."),
        ));
    }
    Ok(name)
}
