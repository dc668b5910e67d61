use super::*;
use std::collections::BTreeMap;

struct El {
    tag: &'static str,
    attrs: BTreeMap<&'static str, &'static str>,
    classes: Vec<&'static str>,
}

impl Matchable for El {
    fn tag(&self) -> &str {
        self.tag
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).copied()
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| *c == class)
    }
}

fn el(tag: &'static str, attrs: &[(&'static str, &'static str)], classes: &[&'static str]) -> El {
    El {
        tag,
        attrs: attrs.iter().copied().collect(),
        classes: classes.to_vec(),
    }
}

#[test]
fn attribute_equality_matches_counter_marker() {
    let sel = Selector::parse(r#"[data-wm-plugin="countup"]"#).unwrap();
    assert!(sel.matches(&el("span", &[("data-wm-plugin", "countup")], &[])));
    assert!(!sel.matches(&el("span", &[("data-wm-plugin", "other")], &[])));
    assert!(!sel.matches(&el("span", &[], &[])));
}

#[test]
fn anchor_list_matches_either_fragment() {
    let sel = Selector::parse(r##"a[href*="#wm-countup"], a[href*="#wmcountup"]"##).unwrap();
    assert!(sel.matches(&el("a", &[("href", "/x#wm-countup?speed=1")], &[])));
    assert!(sel.matches(&el("A", &[("href", "#wmcountup")], &[])));
    assert!(!sel.matches(&el("span", &[("href", "#wmcountup")], &[])));
    assert!(!sel.matches(&el("a", &[("href", "#other")], &[])));
}

#[test]
fn id_class_and_tag_compounds() {
    let sel = Selector::parse("span#total.big").unwrap();
    assert!(sel.matches(&el("span", &[("id", "total")], &["big", "loaded"])));
    assert!(!sel.matches(&el("span", &[("id", "total")], &["loaded"])));
    assert!(!sel.matches(&el("div", &[("id", "total")], &["big"])));
}

#[test]
fn universal_and_existence() {
    assert!(Selector::parse("*").unwrap().matches(&el("p", &[], &[])));
    let sel = Selector::parse("[data-start]").unwrap();
    assert!(sel.matches(&el("p", &[("data-start", "")], &[])));
}

#[test]
fn malformed_selectors_are_config_errors() {
    for bad in ["", " , ", "#", ".", "[unclosed", "div span", "a > b", "[=x]"] {
        assert!(
            matches!(Selector::parse(bad), Err(CountUpError::Config(_))),
            "{bad:?}"
        );
    }
}
