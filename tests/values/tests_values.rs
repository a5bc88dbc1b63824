//! Loading values documents and looking paths up across them.

use crate::helpers::*;
use helm_ls::values::{Segment, ValuePath, ValueKind, lookup_all};
use helm_ls::{Location, Position};
use tokio_util::sync::CancellationToken;

#[test]
fn test_fixture_tree_shape() {
    let file = values_file(VALUES_URI, VALUES);
    let root = file.root();
    assert!(root.is_mapping());
    assert_eq!(root.get("foo").unwrap().value.as_scalar(), Some("bar"));

    let list = &root.get("list").unwrap().value;
    let ValueKind::Sequence(items) = &list.kind else {
        panic!("list should be a sequence");
    };
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].position, Position::new(5, 4));
}

#[test]
fn test_lookup_all_keeps_duplicates() {
    let files = main_and_other_values();
    let path = ValuePath::from_fields(["something", "nested"]);
    let found = lookup_all(&files, &path, &CancellationToken::new()).unwrap();
    assert_eq!(
        found,
        vec![
            Location::point(VALUES_URI, Position::new(3, 2)),
            Location::point(OTHER_VALUES_URI, Position::new(3, 2)),
        ]
    );
}

#[test]
fn test_lookup_all_miss_is_empty() {
    let files = main_and_other_values();
    let path = ValuePath::from_fields(["foo", "bar"]);
    assert!(
        lookup_all(&files, &path, &CancellationToken::new())
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_element_path_into_list_items() {
    let file = values_file(
        VALUES_URI,
        "servers:\n  - name: a\n    port: 80\n  - name: b\n",
    );
    let files = helm_ls::ValuesFiles::new(file);
    let path: ValuePath = [
        Segment::Field("servers".into()),
        Segment::Element,
        Segment::Field("port".into()),
    ]
    .into_iter()
    .collect();
    assert_eq!(
        lookup_all(&files, &path, &CancellationToken::new()).unwrap(),
        vec![Location::point(VALUES_URI, Position::new(2, 4))]
    );
}

#[test]
fn test_aliases_and_anchors() {
    let file = values_file(VALUES_URI, "base: &b\n  x: 1\ncopy: *b\n");
    let root = file.root();
    assert_eq!(root.get("copy").unwrap().key_position, Position::new(2, 0));
    assert_eq!(root.get("copy").unwrap().value.as_scalar(), Some(""));
    assert!(root.get("base").unwrap().value.is_mapping());
}
