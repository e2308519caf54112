/*!
 * Sandbox Tests
 * Containment and stripping properties, configuration wiring
 */

use dav_tree::{InvalidationPolicy, MemoryStore, Sandbox, Tree, TreeConfig, TreeError};
use proptest::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

use crate::support::{seeded, RecordingStore};

fn segments(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,4}", 0..max)
}

fn to_path(segments: &[String]) -> String {
    format!("/{}", segments.join("/"))
}

proptest! {
    #[test]
    fn prop_descendants_are_inside(base in segments(4), rest in segments(4)) {
        let sandbox = Sandbox::new(to_path(&base));
        let mut full = base.clone();
        full.extend(rest.iter().cloned());
        let path = to_path(&full);

        prop_assert!(sandbox.contains(&path));

        let stripped = sandbox.strip(&path);
        if base.is_empty() {
            prop_assert_eq!(stripped, path.as_str());
        } else if rest.is_empty() {
            prop_assert_eq!(stripped, "");
        } else {
            prop_assert_eq!(stripped, to_path(&rest));
        }
    }

    #[test]
    fn prop_inside_iff_component_prefix(base in segments(4), other in segments(5)) {
        let sandbox = Sandbox::new(to_path(&base));
        let expected = other.len() >= base.len() && other[..base.len()] == base[..];
        prop_assert_eq!(sandbox.contains(&to_path(&other)), expected);
    }

    #[test]
    fn prop_parent_traversal_escapes(base in segments(4).prop_filter("non-root", |b| !b.is_empty()), name in "[a-z]{1,4}") {
        let sandbox = Sandbox::new(to_path(&base));
        let ups = vec![".."; base.len()].join("/");
        let escaped = format!("{}/{}/{}", to_path(&base), ups, name);
        // Climbing all the way out only stays inside if we land back on the base
        let expected = base.len() == 1 && base[0] == name;
        prop_assert_eq!(sandbox.contains(&escaped), expected);
    }

    #[test]
    fn prop_unnormalized_prefix_behaves_like_clean_one(
        base in segments(4),
        rest in segments(4),
        relative in any::<bool>(),
        doubled in any::<bool>(),
    ) {
        let separator = if doubled { "//" } else { "/./" };
        let raw = format!("{}{}/", if relative { "" } else { "/" }, base.join(separator));
        let sandbox = Sandbox::new(raw);
        prop_assert_eq!(&sandbox, &Sandbox::new(to_path(&base)));

        let mut full = base.clone();
        full.extend(rest.iter().cloned());
        let path = to_path(&full);
        prop_assert!(sandbox.contains(&path));
        if !base.is_empty() {
            let expected = if rest.is_empty() { String::new() } else { to_path(&rest) };
            prop_assert_eq!(sandbox.strip(&path), expected.as_str());
        }
    }

    #[test]
    fn prop_unsandboxed_tree_is_transparent(path in segments(5)) {
        let tree = Tree::new(Arc::new(MemoryStore::new()));
        let path = to_path(&path);
        prop_assert!(tree.inside_sandbox(&path));
        prop_assert_eq!(tree.strip_sandbox(&path), path.as_str());
    }

    #[test]
    fn prop_outside_destination_never_mutates(dest in segments(4)) {
        let store = seeded();
        let tree = Tree::builder(Arc::new(store.clone())).sandbox("/srv/dav").build();
        let dest = format!("/elsewhere{}", to_path(&dest));

        let result = tokio_test::block_on(tree.copy("/srv/dav/a.txt", &dest));
        prop_assert!(matches!(result, Err(TreeError::Forbidden(_))));
        let result = tokio_test::block_on(tree.move_to("/srv/dav/a.txt", &dest));
        prop_assert!(matches!(result, Err(TreeError::Forbidden(_))));
        prop_assert!(store.ops().is_empty());
    }
}

#[test]
fn test_strip_requires_true_prefix() {
    let tree = Tree::builder(Arc::new(MemoryStore::new()))
        .sandbox("/srv/dav/")
        .build();

    assert_eq!(tree.sandbox().unwrap().prefix(), "/srv/dav");
    assert_eq!(tree.strip_sandbox("/srv/dav/a.txt"), "/a.txt");
    assert_eq!(tree.strip_sandbox("/mirror/srv/dav/a.txt"), "/mirror/srv/dav/a.txt");
    assert_eq!(tree.strip_sandbox("/etc/passwd"), "/etc/passwd");
    assert!(tree.inside_sandbox("/srv/dav"));
    assert!(!tree.inside_sandbox("/srv"));
}

#[test]
fn test_tree_from_config() {
    let config = TreeConfig {
        sandbox: Some(PathBuf::from("/srv/dav/")),
        invalidation: InvalidationPolicy::Strict,
        ..TreeConfig::default()
    };
    let store = RecordingStore::new(MemoryStore::new());
    let tree = Tree::from_config(Arc::new(store), &config);

    assert_eq!(tree.sandbox(), Some(&Sandbox::new("/srv/dav")));
    assert_eq!(tree.invalidation(), InvalidationPolicy::Strict);
    assert!(tree.subscribe().is_none());
    assert!(format!("{tree:?}").contains("recording"));

    let open = Tree::from_config(Arc::new(MemoryStore::new()), &TreeConfig::default());
    assert!(open.sandbox().is_none());
    assert!(open.inside_sandbox("/anywhere"));
}
