use super::*;
use crate::{animation::controller::ControllerState, host::page::Page};

fn counter(page: &mut Page, parent: ElementId, text: &str) -> ElementId {
    let el = page.create_element("span");
    page.set_attribute(el, "data-wm-plugin", "countup");
    page.set_text(el, text);
    page.append_child(parent, el);
    el
}

fn page_with_counters(texts: &[&str]) -> (Page, Vec<ElementId>) {
    let mut page = Page::new();
    let root = page.root();
    let ids = texts.iter().map(|t| counter(&mut page, root, t)).collect();
    page.take_mutations();
    (page, ids)
}

#[test]
fn discover_marks_and_registers_counters() {
    let (mut page, ids) = page_with_counters(&["10", "20"]);
    let mut mgr = InstanceLifecycleManager::new();
    let handles = mgr.discover(&mut page);
    assert_eq!(handles.len(), 2);
    assert_eq!(mgr.len(), 2);
    for id in &ids {
        assert!(page.has_class(*id, LOADED_CLASS));
        assert!(mgr.get_instance(*id).is_some());
    }
    // A second pass finds nothing new.
    assert!(mgr.discover(&mut page).is_empty());
    assert_eq!(mgr.len(), 2);
}

#[test]
fn discover_skips_uncountable_text_without_marking() {
    let (mut page, ids) = page_with_counters(&["ten", "10"]);
    let mut mgr = InstanceLifecycleManager::new();
    mgr.discover(&mut page);
    assert_eq!(mgr.len(), 1);
    assert!(!page.has_class(ids[0], LOADED_CLASS));
    assert!(mgr.get_instance(ids[0]).is_none());
}

#[test]
fn discover_normalizes_shorthand_links() {
    let mut page = Page::new();
    let anchor = page.create_element("a");
    page.set_attribute(anchor, "href", "#wm-countup?speed=1200&locale=de-DE");
    page.set_attribute(anchor, "data-start", "3");
    page.set_text(anchor, "1.500");
    let root = page.root();
    page.append_child(root, anchor);
    page.take_mutations();

    let mut mgr = InstanceLifecycleManager::new();
    let handles = mgr.discover(&mut page);
    assert_eq!(handles.len(), 1);

    let span = handles[0].element();
    assert_ne!(span, anchor);
    assert!(!page.is_connected(anchor));
    assert_eq!(page.tag(span), Some("span"));
    assert_eq!(page.attribute(span, "data-speed").as_deref(), Some("1200"));
    assert_eq!(page.attribute(span, "data-start").as_deref(), Some("3"));

    let opts = mgr.get_instance(span).unwrap().options();
    assert_eq!(opts.duration_ms, 1200);
    assert_eq!(opts.starting_number, 3.0);
    assert_eq!(opts.end_number, 1500.0);
}

#[test]
fn recreating_destroys_previous_controller() {
    let (mut page, ids) = page_with_counters(&["10"]);
    let mut mgr = InstanceLifecycleManager::new();
    mgr.create_instance(&mut page, ids[0]).unwrap();
    assert_eq!(page.active_observers(), 1);

    mgr.create_instance(&mut page, ids[0]).unwrap();
    assert_eq!(mgr.len(), 1);
    assert_eq!(page.active_observers(), 1);
    assert_eq!(
        mgr.get_instance(ids[0]).unwrap().state(),
        ControllerState::Armed
    );
}

#[test]
fn handle_controls_delegate_and_destroy_unregisters() {
    let (mut page, ids) = page_with_counters(&["10"]);
    let mut mgr = InstanceLifecycleManager::new();
    let handle = mgr.create_instance(&mut page, ids[0]).unwrap();

    handle.reset(&mut mgr, &mut page).unwrap();
    assert!(mgr.get_instance(ids[0]).unwrap().is_animating());
    handle.stop(&mut mgr, &mut page);
    assert_eq!(
        mgr.get_instance(ids[0]).unwrap().state(),
        ControllerState::Idle
    );

    assert!(handle.destroy(&mut mgr, &mut page));
    assert!(mgr.is_empty());
    assert!(!page.has_class(ids[0], LOADED_CLASS));
    // Stale handle: everything is a no-op.
    assert!(!handle.destroy(&mut mgr, &mut page));
    handle.stop(&mut mgr, &mut page);
    handle.reset(&mut mgr, &mut page).unwrap();
    assert!(mgr.handle(ids[0]).is_none());
}

#[test]
fn removal_mutation_tears_down_nested_counters() {
    let mut page = Page::new();
    let root = page.root();
    let section = page.create_element("section");
    page.append_child(root, section);
    let a = counter(&mut page, section, "1");
    let b = counter(&mut page, root, "2");
    page.take_mutations();

    let mut mgr = InstanceLifecycleManager::new();
    mgr.discover(&mut page);
    page.remove(section);
    for m in page.take_mutations() {
        mgr.on_mutation(&mut page, &m);
    }
    assert!(mgr.get_instance(a).is_none());
    assert!(!page.has_class(a, LOADED_CLASS));
    assert!(mgr.get_instance(b).is_some());
    assert_eq!(page.active_observers(), 1);
}

#[test]
fn removing_the_counter_itself_tears_it_down() {
    let (mut page, ids) = page_with_counters(&["10"]);
    let mut mgr = InstanceLifecycleManager::new();
    mgr.discover(&mut page);
    page.remove(ids[0]);
    for m in page.take_mutations() {
        mgr.on_mutation(&mut page, &m);
    }
    assert!(mgr.is_empty());
}

#[test]
fn addition_mutation_creates_only_unmarked_counters() {
    let (mut page, ids) = page_with_counters(&["10"]);
    let mut mgr = InstanceLifecycleManager::new();
    mgr.discover(&mut page);

    let wrapper = page.create_element("div");
    let fresh = counter(&mut page, wrapper, "5");
    let root = page.root();
    page.append_child(root, wrapper);
    for m in page.take_mutations() {
        mgr.on_mutation(&mut page, &m);
    }
    assert_eq!(mgr.len(), 2);
    assert!(page.has_class(fresh, LOADED_CLASS));

    mgr.on_mutation(&mut page, &MutationRecord::added(ids[0]));
    assert_eq!(mgr.len(), 2);
    assert_eq!(page.active_observers(), 2);
}

#[test]
fn detached_additions_are_ignored() {
    let mut page = Page::new();
    let loose = page.create_element("span");
    page.set_attribute(loose, "data-wm-plugin", "countup");
    page.set_text(loose, "3");
    let mut mgr = InstanceLifecycleManager::new();
    mgr.on_mutation(&mut page, &MutationRecord::added(loose));
    assert!(mgr.is_empty());
}

#[test]
fn selector_controls_resolve_managed_elements() {
    let (mut page, ids) = page_with_counters(&["10", "20"]);
    page.set_attribute(ids[1], "id", "second");
    let mut mgr = InstanceLifecycleManager::new();
    mgr.discover(&mut page);

    assert!(mgr.reset(&mut page, "#second").unwrap());
    assert!(mgr.get_instance(ids[1]).unwrap().is_animating());
    assert!(!mgr.reset(&mut page, "#missing").unwrap());

    assert!(mgr.destroy(&mut page, "#second"));
    assert!(!mgr.destroy(&mut page, "#second"));
    assert_eq!(mgr.len(), 1);
}

#[test]
fn bulk_operations_cover_every_instance() {
    let (mut page, ids) = page_with_counters(&["10", "20", "30"]);
    let mut mgr = InstanceLifecycleManager::new();
    mgr.discover(&mut page);

    mgr.reset_all(&mut page);
    assert!(ids
        .iter()
        .all(|id| mgr.get_instance(*id).unwrap().is_animating()));
    assert_eq!(page.pending_frames(), 3);

    mgr.destroy_all(&mut page);
    assert!(mgr.is_empty());
    assert_eq!(page.pending_frames(), 0);
    assert_eq!(page.active_observers(), 0);
    assert!(ids.iter().all(|id| !page.has_class(*id, LOADED_CLASS)));
}

#[test]
fn anchor_selector_covers_both_fragment_spellings() {
    let mut page = Page::new();
    let root = page.root();
    for href in ["/stats#wm-countup?fps=30", "#wmcountup", "#other"] {
        let a = page.create_element("a");
        page.set_attribute(a, "href", href);
        page.set_text(a, "5");
        page.append_child(root, a);
    }
    assert_eq!(page.query_selector_all(ANCHOR_SELECTOR).len(), 2);
    assert_eq!(page.query_selector_all(COUNTER_SELECTOR).len(), 0);
}
