//! Component lists for exclude-some loads and legacy include/exclude lists.

use indexmap::IndexMap;
use rtc_scm_core::{ComponentHandle, ItemId};
use tracing::debug;

use crate::path_spec::ComponentRef;
use crate::scope::ScopeResolver;
use crate::ConfigResult;

/// Resolve a comma-separated list of component names and ids.
///
/// Ids that no longer exist are dropped without error. Names must resolve to
/// exactly one component in the scope. The result is de-duplicated by
/// component id and keeps first-seen order.
pub fn resolve_component_list(
    resolver: &ScopeResolver<'_>,
    list: &str,
) -> ConfigResult<Vec<ComponentHandle>> {
    let mut resolved: IndexMap<ItemId, ComponentHandle> = IndexMap::new();

    for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let component = match ComponentRef::parse(token) {
            ComponentRef::Id(id) => match resolver.find_component_by_id(&id)? {
                Some(component) => component,
                None => {
                    debug!(component_id = %id, "Dropping unknown component id from component list");
                    continue;
                }
            },
            name @ ComponentRef::Name(_) => resolver.resolve_component(&name)?,
        };
        resolved.entry(component.id).or_insert(component);
    }

    Ok(resolved.into_values().collect())
}
