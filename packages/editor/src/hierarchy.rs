//! # Page Hierarchy
//!
//! Structural edits and derived views over a site's flat page list.
//!
//! ## Invariants
//!
//! - `parent_id` links form a forest: no page is its own ancestor.
//! - A page's `children` holds exactly the ids of the pages whose
//!   `parent_id` is that page, sorted by `order`.
//! - `order` is unique within each sibling group (pages sharing a
//!   `parent_id`, including the root group).
//!
//! Every edit returns a new page list and keeps all three invariants in the
//! returned value. Unknown ids and moves that would create a cycle are
//! silent no-ops. [`validate_hierarchy`] checks the invariants on lists that
//! came from outside (storage, the hierarchy editor).

use crate::mutations::MutationError;
use serde::{Deserialize, Serialize};
use sitecraft_model::{
    slugify, unique_slug, validate_slug, DropPosition, IdSource, Page, PagePatch, PageSettings,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// What happens to the children of a deleted page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrphanPolicy {
    /// Children move up to the deleted page's parent, after its existing
    /// children, keeping their relative order
    #[default]
    PromoteToParent,
    /// The whole subtree is deleted
    Cascade,
}

/// Node of the site map / navigation menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItem {
    pub id: String,
    pub title: String,
    pub path: String,
    pub children: Vec<NavigationItem>,
    pub is_published: bool,
}

/// One step of a breadcrumb trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breadcrumb {
    pub id: String,
    pub title: String,
    pub url: String,
    pub is_dummy: bool,
}

fn find_page<'a>(pages: &'a [Page], page_id: &str) -> Option<&'a Page> {
    pages.iter().find(|p| p.id == page_id)
}

fn find_page_mut<'a>(pages: &'a mut [Page], page_id: &str) -> Option<&'a mut Page> {
    pages.iter_mut().find(|p| p.id == page_id)
}

fn siblings<'a>(pages: &'a [Page], parent_id: Option<&'a str>) -> impl Iterator<Item = &'a Page> {
    pages
        .iter()
        .filter(move |p| p.parent_id.as_deref() == parent_id)
}

/// First unused order in a sibling group, ignoring `excluding`
///
/// `None` when a sibling already holds `u32::MAX`.
fn next_order(pages: &[Page], parent_id: Option<&str>, excluding: &str) -> Option<u32> {
    siblings(pages, parent_id)
        .filter(|p| p.id != excluding)
        .map(|p| p.order)
        .max()
        .map_or(Some(0), |max| max.checked_add(1))
}

/// URL segments already used in a sibling group, ignoring `excluding`
fn taken_segments<'a>(
    pages: &'a [Page],
    parent_id: Option<&'a str>,
    excluding: &'a str,
) -> impl Iterator<Item = &'a str> {
    siblings(pages, parent_id)
        .filter(move |p| p.id != excluding)
        .map(Page::path_segment)
}

/// Rebuild a parent's `children` from the `parent_id` links, sorted by order
fn sync_children(pages: &mut [Page], parent_id: Option<&str>) {
    let Some(parent_id) = parent_id else {
        return;
    };

    let mut ordered: Vec<(u32, String)> = siblings(pages, Some(parent_id))
        .map(|p| (p.order, p.id.clone()))
        .collect();
    ordered.sort();

    if let Some(parent) = find_page_mut(pages, parent_id) {
        parent.children = ordered.into_iter().map(|(_, id)| id).collect();
    }
}

/// True when `ancestor_id` appears on the parent chain above `page_id`
pub fn is_ancestor(pages: &[Page], ancestor_id: &str, page_id: &str) -> bool {
    let mut current = find_page(pages, page_id).and_then(|p| p.parent_id.as_deref());
    let mut steps = 0;

    while let Some(id) = current {
        if id == ancestor_id {
            return true;
        }
        steps += 1;
        if steps > pages.len() {
            warn!(page_id = %page_id, "parent chain does not terminate");
            return false;
        }
        current = find_page(pages, id).and_then(|p| p.parent_id.as_deref());
    }

    false
}

fn would_create_cycle(pages: &[Page], page_id: &str, new_parent_id: &str) -> bool {
    page_id == new_parent_id || is_ancestor(pages, page_id, new_parent_id)
}

/// Pages under `parent_id` (`None` for roots), sorted by order
pub fn child_pages<'a>(pages: &'a [Page], parent_id: Option<&str>) -> Vec<&'a Page> {
    let mut children: Vec<&Page> = pages
        .iter()
        .filter(|p| p.parent_id.as_deref() == parent_id)
        .collect();
    children.sort_by_key(|p| p.order);
    children
}

/// First root page in navigation order
pub fn first_page(pages: &[Page]) -> Option<&Page> {
    child_pages(pages, None).into_iter().next()
}

/// Re-parent `page_id` under `new_parent_id` (`None` makes it a root)
///
/// The page is appended to the end of its new sibling group. Old parent,
/// new parent and the page itself change together.
pub fn update_page_hierarchy(pages: &[Page], page_id: &str, new_parent_id: Option<&str>) -> Vec<Page> {
    let Some(page) = find_page(pages, page_id) else {
        debug!(page_id = %page_id, "update_page_hierarchy: page not found");
        return pages.to_vec();
    };
    if page.parent_id.as_deref() == new_parent_id {
        debug!(page_id = %page_id, "update_page_hierarchy: parent unchanged");
        return pages.to_vec();
    }
    if let Some(parent_id) = new_parent_id {
        if find_page(pages, parent_id).is_none() {
            debug!(parent_id = %parent_id, "update_page_hierarchy: parent not found");
            return pages.to_vec();
        }
        if would_create_cycle(pages, page_id, parent_id) {
            debug!(page_id = %page_id, parent_id = %parent_id, "update_page_hierarchy: would create cycle");
            return pages.to_vec();
        }
    }

    let old_parent_id = page.parent_id.clone();
    let Some(order) = next_order(pages, new_parent_id, page_id) else {
        warn!(page_id = %page_id, "update_page_hierarchy: sibling orders exhausted");
        return pages.to_vec();
    };

    let mut updated = pages.to_vec();
    if let Some(page) = find_page_mut(&mut updated, page_id) {
        page.parent_id = new_parent_id.map(str::to_string);
        page.order = order;
        page.touch();
    }
    sync_children(&mut updated, old_parent_id.as_deref());
    sync_children(&mut updated, new_parent_id);
    updated
}

/// Move `source_id` before, after or inside `target_id`
///
/// `Before`/`After` join the target's sibling group: the source takes the
/// target's order (or the one after it) and every other sibling at or past
/// that order shifts up by one. `Inside` appends the source to the
/// target's children. Dropping a page onto the slot it already holds is a
/// no-op, as is any move that would push an order past `u32::MAX`.
pub fn reorder_pages(
    pages: &[Page],
    source_id: &str,
    target_id: &str,
    position: DropPosition,
) -> Vec<Page> {
    if source_id == target_id {
        debug!(page_id = %source_id, "reorder_pages: source and target are the same page");
        return pages.to_vec();
    }
    let (Some(source), Some(target)) = (find_page(pages, source_id), find_page(pages, target_id)) else {
        debug!(source_id = %source_id, target_id = %target_id, "reorder_pages: page not found");
        return pages.to_vec();
    };

    if already_in_place(pages, source, target, position) {
        debug!(source_id = %source_id, target_id = %target_id, "reorder_pages: page already in place");
        return pages.to_vec();
    }

    let (new_parent_id, insertion) = match position {
        DropPosition::Before => (target.parent_id.clone(), Some(target.order)),
        DropPosition::After => (target.parent_id.clone(), target.order.checked_add(1)),
        DropPosition::Inside => (
            Some(target.id.clone()),
            next_order(pages, Some(target_id), source_id),
        ),
    };
    let Some(insertion) = insertion else {
        warn!(source_id = %source_id, target_id = %target_id, "reorder_pages: sibling orders exhausted");
        return pages.to_vec();
    };

    if let Some(parent_id) = new_parent_id.as_deref() {
        if would_create_cycle(pages, source_id, parent_id) {
            debug!(source_id = %source_id, target_id = %target_id, "reorder_pages: would create cycle");
            return pages.to_vec();
        }
    }

    let shifts_past_max = position != DropPosition::Inside
        && pages.iter().any(|p| {
            p.id != source_id && p.parent_id == new_parent_id && p.order == u32::MAX
        });
    if shifts_past_max {
        warn!(source_id = %source_id, target_id = %target_id, "reorder_pages: sibling orders exhausted");
        return pages.to_vec();
    }

    let old_parent_id = source.parent_id.clone();
    let mut updated = pages.to_vec();

    if position != DropPosition::Inside {
        for page in updated.iter_mut() {
            if page.id != source_id
                && page.parent_id == new_parent_id
                && page.order >= insertion
            {
                page.order += 1;
            }
        }
    }

    if let Some(page) = find_page_mut(&mut updated, source_id) {
        page.parent_id = new_parent_id.clone();
        page.order = insertion;
        page.touch();
    }

    sync_children(&mut updated, old_parent_id.as_deref());
    sync_children(&mut updated, new_parent_id.as_deref());
    updated
}

/// True when the drop would leave `source` exactly where it is
fn already_in_place(pages: &[Page], source: &Page, target: &Page, position: DropPosition) -> bool {
    let group = match position {
        DropPosition::Inside if source.parent_id.as_deref() == Some(target.id.as_str()) => {
            return child_pages(pages, Some(target.id.as_str()))
                .last()
                .map_or(false, |last| last.id == source.id);
        }
        DropPosition::Inside => return false,
        _ if source.parent_id != target.parent_id => return false,
        _ => child_pages(pages, target.parent_id.as_deref()),
    };

    let Some(at) = group.iter().position(|p| p.id == target.id) else {
        return false;
    };
    let neighbour = match position {
        DropPosition::Before => at.checked_sub(1).and_then(|i| group.get(i)),
        _ => group.get(at + 1),
    };
    neighbour.map_or(false, |p| p.id == source.id)
}

/// Root-to-leaf chain of pages ending at `page_id`
///
/// A corrupted parent cycle stops the walk; the chain found so far is
/// returned. Unknown ids give an empty chain.
pub fn breadcrumbs<'a>(pages: &'a [Page], page_id: &str) -> Vec<&'a Page> {
    let mut chain = Vec::new();
    let mut visited = HashSet::new();
    let mut current = find_page(pages, page_id);

    while let Some(page) = current {
        if !visited.insert(page.id.as_str()) {
            warn!(page_id = %page_id, "cycle in page parent links");
            break;
        }
        chain.push(page);
        current = page.parent_id.as_deref().and_then(|id| find_page(pages, id));
    }

    chain.reverse();
    chain
}

/// Breadcrumb slugs joined with `/`
pub fn page_path(pages: &[Page], page_id: &str) -> String {
    breadcrumbs(pages, page_id)
        .iter()
        .map(|p| p.slug.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

/// Public URL of a page; dummy pages contribute no segment
pub fn page_url(pages: &[Page], page_id: &str) -> String {
    let segments: Vec<&str> = breadcrumbs(pages, page_id)
        .into_iter()
        .filter(|p| !p.is_dummy)
        .map(Page::path_segment)
        .collect();
    format!("/{}", segments.join("/"))
}

pub fn breadcrumb_trail(pages: &[Page], page_id: &str) -> Vec<Breadcrumb> {
    breadcrumbs(pages, page_id)
        .into_iter()
        .map(|page| Breadcrumb {
            id: page.id.clone(),
            title: page.title.clone(),
            url: page_url(pages, &page.id),
            is_dummy: page.is_dummy,
        })
        .collect()
}

fn navigation_items(pages: &[Page], parent_id: Option<&str>, published_only: bool) -> Vec<NavigationItem> {
    // Every page has one parent, so descending from the roots never revisits a page
    child_pages(pages, parent_id)
        .into_iter()
        .filter(|p| p.show_in_nav && (!published_only || p.is_published))
        .map(|page| NavigationItem {
            id: page.id.clone(),
            title: page.title.clone(),
            path: page_path(pages, &page.id),
            children: navigation_items(pages, Some(page.id.as_str()), published_only),
            is_published: page.is_published,
        })
        .collect()
}

/// Navigation tree of every page visible in navigation
pub fn site_map(pages: &[Page]) -> Vec<NavigationItem> {
    navigation_items(pages, None, false)
}

/// [`site_map`] restricted to published subtrees
pub fn navigation_menu(pages: &[Page]) -> Vec<NavigationItem> {
    navigation_items(pages, None, true)
}

/// Add a page titled `title` at the end of its sibling group
///
/// The slug comes from the title and gets a numeric suffix when a sibling
/// already uses it. Returns the new list and the new page's id.
pub fn create_page(
    pages: &[Page],
    title: &str,
    parent_id: Option<&str>,
    ids: &mut dyn IdSource,
) -> Result<(Vec<Page>, String), MutationError> {
    if let Some(parent_id) = parent_id {
        if find_page(pages, parent_id).is_none() {
            return Err(MutationError::PageNotFound(parent_id.to_string()));
        }
    }

    let id = ids.next_id();
    let order = next_order(pages, parent_id, &id).ok_or_else(|| {
        MutationError::InvariantViolation("no free page order left in sibling group".to_string())
    })?;
    let mut page = Page::new(id.clone(), title).with_order(order);
    page.slug = unique_slug(&page.slug, taken_segments(pages, parent_id, &id));
    page.parent_id = parent_id.map(str::to_string);

    let mut updated = pages.to_vec();
    updated.push(page);
    sync_children(&mut updated, parent_id);
    Ok((updated, id))
}

/// Merge a settings patch into one page
///
/// A new `url_prefix` must be a well-formed slug that no sibling already
/// uses as its URL segment.
pub fn update_page_settings(
    pages: &[Page],
    page_id: &str,
    patch: &PagePatch,
) -> Result<Vec<Page>, MutationError> {
    let Some(page) = find_page(pages, page_id) else {
        debug!(page_id = %page_id, "update_page_settings: page not found");
        return Ok(pages.to_vec());
    };
    if let Some(prefix) = patch.url_prefix.as_deref() {
        validate_slug(prefix, taken_segments(pages, page.parent_id.as_deref(), page_id))?;
    }

    let mut updated = pages.to_vec();
    if let Some(page) = find_page_mut(&mut updated, page_id) {
        patch.apply_to(page);
    }
    Ok(updated)
}

/// Content-free projection of every page
pub fn pages_to_settings(pages: &[Page]) -> Vec<PageSettings> {
    pages.iter().map(PageSettings::from).collect()
}

/// Merge the hierarchy editor's settings list back into full pages
///
/// Existing pages keep their content, publication state and creation time;
/// unknown ids become new empty pages. Pages missing from `settings` are
/// dropped.
pub fn pages_from_settings(settings: Vec<PageSettings>, existing: &[Page]) -> Vec<Page> {
    let by_id: HashMap<&str, &Page> = existing.iter().map(|p| (p.id.as_str(), p)).collect();

    settings
        .into_iter()
        .map(|settings| match by_id.get(settings.id.as_str()) {
            Some(page) => {
                let mut page = (*page).clone();
                page.slug = slugify(&settings.url_prefix);
                page.title = settings.title;
                page.url_prefix = Some(settings.url_prefix);
                page.show_in_nav = settings.show_in_nav;
                page.parent_id = settings.parent_id;
                page.is_dummy = settings.is_dummy;
                page.order = settings.order;
                page.children = settings.children;
                page.header_config = settings.header_config;
                page.footer_config = settings.footer_config;
                page.touch();
                page
            }
            None => Page::from(settings),
        })
        .collect()
}

/// Ids of `page_id` and every page below it
fn subtree_ids(pages: &[Page], page_id: &str) -> HashSet<String> {
    let mut found = HashSet::new();
    let mut pending = vec![page_id.to_string()];

    while let Some(id) = pending.pop() {
        if found.insert(id.clone()) {
            pending.extend(siblings(pages, Some(id.as_str())).map(|p| p.id.clone()));
        }
    }

    found
}

/// Remove a page, handling its children according to `policy`
pub fn delete_page(pages: &[Page], page_id: &str, policy: OrphanPolicy) -> Vec<Page> {
    let Some(page) = find_page(pages, page_id) else {
        debug!(page_id = %page_id, "delete_page: page not found");
        return pages.to_vec();
    };
    let parent_id = page.parent_id.clone();

    let mut updated = match policy {
        OrphanPolicy::Cascade => {
            let doomed = subtree_ids(pages, page_id);
            pages
                .iter()
                .filter(|p| !doomed.contains(&p.id))
                .cloned()
                .collect::<Vec<_>>()
        }
        OrphanPolicy::PromoteToParent => {
            let promoted: Vec<String> = child_pages(pages, Some(page_id))
                .into_iter()
                .map(|p| p.id.clone())
                .collect();
            let fits = next_order(pages, parent_id.as_deref(), page_id).filter(|first| {
                u32::try_from(promoted.len())
                    .ok()
                    .and_then(|n| first.checked_add(n))
                    .is_some()
            });
            let Some(mut next) = fits else {
                warn!(page_id = %page_id, "delete_page: no room to promote children");
                return pages.to_vec();
            };

            let mut remaining: Vec<Page> = pages.iter().filter(|p| p.id != page_id).cloned().collect();
            for child_id in &promoted {
                if let Some(child) = find_page_mut(&mut remaining, child_id) {
                    child.parent_id = parent_id.clone();
                    child.order = next;
                    child.touch();
                    next += 1;
                }
            }
            remaining
        }
    };

    sync_children(&mut updated, parent_id.as_deref());
    updated
}

/// Check the hierarchy invariants on an arbitrary page list
pub fn validate_hierarchy(pages: &[Page]) -> Result<(), MutationError> {
    let violation = |message: String| -> Result<(), MutationError> {
        Err(MutationError::InvariantViolation(message))
    };

    let mut ids = HashSet::new();
    for page in pages {
        if !ids.insert(page.id.as_str()) {
            return violation(format!("duplicate page id {}", page.id));
        }
    }

    let mut orders = HashSet::new();
    let mut claimed = HashSet::new();
    for page in pages {
        if let Some(parent_id) = page.parent_id.as_deref() {
            if !ids.contains(parent_id) {
                return violation(format!("page {} has missing parent {}", page.id, parent_id));
            }
            let reaches_root = breadcrumbs(pages, &page.id)
                .first()
                .map_or(false, |top| top.is_root());
            if !reaches_root {
                return violation(format!("page {} is part of a parent cycle", page.id));
            }
        }
        if !orders.insert((page.parent_id.as_deref(), page.order)) {
            return violation(format!("duplicate order {} under {:?}", page.order, page.parent_id));
        }

        let expected: HashSet<&str> = siblings(pages, Some(page.id.as_str())).map(|p| p.id.as_str()).collect();
        let listed: HashSet<&str> = page.children.iter().map(String::as_str).collect();
        if expected != listed || listed.len() != page.children.len() {
            return violation(format!("children of {} disagree with parent links", page.id));
        }
        for child in &page.children {
            if !claimed.insert(child.as_str()) {
                return violation(format!("page {} listed under several parents", child));
            }
        }
    }

    Ok(())
}
