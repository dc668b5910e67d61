use super::*;

#[test]
fn appending_to_connected_parent_records_addition() {
    let mut page = Page::new();
    let div = page.create_element("div");
    let span = page.create_element("span");
    page.append_child(div, span);
    assert!(page.take_mutations().is_empty());

    let root = page.root();
    page.append_child(root, div);
    assert_eq!(page.take_mutations(), vec![MutationRecord::added(div)]);
    assert!(page.is_connected(span));
}

#[test]
fn removal_detaches_subtree_but_keeps_nodes_addressable() {
    let mut page = Page::new();
    let root = page.root();
    let div = page.create_element("div");
    let span = page.create_element("span");
    page.append_child(root, div);
    page.append_child(div, span);
    page.take_mutations();

    assert!(page.remove(div));
    assert_eq!(page.take_mutations(), vec![MutationRecord::removed(div)]);
    assert!(!page.is_connected(span));
    assert!(page.contains(span));
    assert!(!page.remove(div));
}

#[test]
fn append_refuses_cycles() {
    let mut page = Page::new();
    let a = page.create_element("div");
    let b = page.create_element("div");
    page.append_child(a, b);
    assert!(!page.append_child(b, a));
    assert!(!page.append_child(a, a));
}

#[test]
fn text_content_concatenates_descendants_and_set_text_replaces_them() {
    let mut page = Page::new();
    let root = page.root();
    let p = page.create_element("p");
    let b = page.create_element("b");
    page.append_child(root, p);
    page.set_text(p, "1,");
    page.set_text(b, "000");
    page.append_child(p, b);
    assert_eq!(page.text(p).as_deref(), Some("1,000"));
    page.take_mutations();

    page.set_text(p, "42");
    assert_eq!(page.text(p).as_deref(), Some("42"));
    assert_eq!(page.take_mutations(), vec![MutationRecord::removed(b)]);
}

#[test]
fn observers_report_current_state_then_changes() {
    let mut page = Page::new();
    let root = page.root();
    let el = page.create_element("span");
    page.append_child(root, el);
    page.set_intersecting(el, true);

    let obs = page.observe_visibility(el);
    let notices = page.take_visibility_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].observer, obs);
    assert!(notices[0].intersecting);

    page.set_intersecting(el, false);
    page.disconnect_visibility(obs);
    assert!(page.take_visibility_notices().is_empty());
}

#[test]
fn scheduled_visibility_applies_when_clock_reaches_it() {
    let mut page = Page::new();
    let root = page.root();
    let el = page.create_element("span");
    page.append_child(root, el);
    let obs = page.observe_visibility(el);
    page.schedule_visibility(Timestamp(200.0), el, true);

    page.set_time(Timestamp(100.0));
    assert!(page.take_visibility_notices().is_empty());
    page.set_time(Timestamp(250.0));
    let notices = page.take_visibility_notices();
    assert_eq!(notices[0].observer, obs);
    assert!(!page.has_scheduled_visibility());
}

#[test]
fn clock_never_runs_backwards() {
    let mut page = Page::new();
    page.set_time(Timestamp(50.0));
    page.set_time(Timestamp(10.0));
    assert_eq!(page.now(), Timestamp(50.0));
}

#[test]
fn frames_are_drained_and_cancelled_by_handle() {
    let mut page = Page::new();
    let el = page.create_element("span");
    let a = page.request_frame(el);
    let b = page.request_frame(el);
    assert_ne!(a, b);
    page.cancel_frame(a);
    let due = page.take_frames();
    assert_eq!(due, vec![FrameCallback { handle: b, element: el }]);
    assert_eq!(page.pending_frames(), 0);
}

#[test]
fn queries_follow_document_order_and_skip_detached_nodes() {
    let mut page = Page::new();
    let root = page.root();
    let first = page.create_element("span");
    let second = page.create_element("span");
    let loose = page.create_element("span");
    for el in [first, second, loose] {
        page.add_class(el, "n");
    }
    page.append_child(root, first);
    page.append_child(root, second);

    assert_eq!(page.query_selector_all(".n"), vec![first, second]);
    assert_eq!(page.query_selector(".n"), Some(first));
    assert_eq!(page.select_within(loose, ".n"), vec![loose]);
    assert!(page.query_selector_all("div span").is_empty());
}

#[test]
fn class_attribute_round_trips_through_class_list() {
    let mut page = Page::new();
    let el = page.create_element("span");
    page.set_attribute(el, "class", "a  b");
    page.add_class(el, "loaded");
    page.add_class(el, "loaded");
    assert_eq!(page.attribute(el, "class").as_deref(), Some("a b loaded"));
    page.remove_class(el, "a");
    assert!(!page.has_class(el, "a"));
}

#[test]
fn replace_with_counter_swaps_in_place() {
    let mut page = Page::new();
    let root = page.root();
    let before = page.create_element("i");
    let anchor = page.create_element("a");
    let after = page.create_element("i");
    for el in [before, anchor, after] {
        page.append_child(root, el);
    }
    page.take_mutations();

    let attrs = vec![("data-speed".to_owned(), "900".to_owned())];
    let span = page.replace_with_counter(anchor, &attrs, "12").unwrap();
    assert_eq!(page.children(root), &[before, span, after]);
    assert_eq!(page.attribute(span, "data-wm-plugin").as_deref(), Some("countup"));
    assert_eq!(page.text(span).as_deref(), Some("12"));
    assert_eq!(
        page.take_mutations(),
        vec![MutationRecord {
            added: vec![span],
            removed: vec![anchor],
        }]
    );

    let orphan = page.create_element("a");
    assert!(page.replace_with_counter(orphan, &attrs, "1").is_none());
}

#[test]
fn page_spec_builds_tree_and_schedule() {
    let json = r#"{
        "char_width_px": 8,
        "body": [
            { "tag": "div", "classes": ["sqs-block"], "children": [
                { "tag": "p", "classes": ["sqsrte-scaled-text"], "children": [
                    { "id": "total", "attrs": { "data-wm-plugin": "countup" },
                      "text": "250", "visible_at_ms": 100 }
                ] }
            ] }
        ]
    }"#;
    let page = Page::from_json_str(json).unwrap();
    let total = page.query_selector("#total").unwrap();
    assert_eq!(page.tag(total), Some("span"));
    assert_eq!(page.measure_text(total, "250"), 24.0);
    assert!(page.has_scheduled_visibility());
    let block = page.query_selector(".sqs-block").unwrap();
    assert_eq!(page.scaled_text_container(total), Some(block));
}

#[test]
fn page_spec_rejects_bad_values() {
    assert!(matches!(
        Page::from_json_str(r#"{"char_width_px": 0}"#),
        Err(CountUpError::Config(_))
    ));
    assert!(matches!(
        Page::from_json_str(r#"{"body": [{"tag": " "}]}"#),
        Err(CountUpError::Config(_))
    ));
    assert!(matches!(
        Page::from_json_str("{"),
        Err(CountUpError::Serde(_))
    ));
}

#[test]
fn events_and_rescales_are_recorded() {
    let mut page = Page::new();
    let el = page.create_element("span");
    assert!(page.dispatch(&CountUpEvent::complete(el)));
    page.rescale_text(el);
    assert_eq!(page.events().len(), 1);
    assert_eq!(page.rescale_count(el), 1);
    assert_eq!(page.scaled_text_container(el), None);
}
