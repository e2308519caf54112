/*!
 * Copy Tests
 * Single-node and recursive copies, fail-fast and sandbox rejection
 */

use bytes::Bytes;
use dav_tree::{copy_node, EventBroadcaster, NodeResolver, Tree, TreeError, TreeEvent};
use pretty_assertions::assert_eq;
use std::sync::Arc;

use crate::support::{seeded, Op, RecordingStore};

fn sandboxed(store: &RecordingStore) -> Tree {
    Tree::builder(Arc::new(store.clone()))
        .sandbox("/srv/dav")
        .build()
}

#[tokio::test]
async fn test_copy_file_reproduces_bytes_and_properties() {
    let store = seeded();
    let tree = sandboxed(&store);

    tree.copy("/srv/dav/a.txt", "/srv/dav/b.txt").await.unwrap();

    let memory = store.memory();
    assert_eq!(memory.read_file("/srv/dav/b.txt"), Some(Bytes::from("alpha")));
    assert_eq!(
        memory.properties_of("/srv/dav/b.txt"),
        memory.properties_of("/srv/dav/a.txt")
    );
    // Source untouched
    assert_eq!(memory.read_file("/srv/dav/a.txt"), Some(Bytes::from("alpha")));

    assert_eq!(
        store.ops(),
        vec![
            Op::Resolve("/srv/dav/a.txt".into()),
            Op::Resolve("/srv/dav".into()),
            Op::Read("/srv/dav/a.txt".into()),
            Op::CreateFile("/srv/dav/b.txt".into()),
            Op::Child("/srv/dav/b.txt".into()),
            Op::GetProps("/srv/dav/a.txt".into()),
            Op::UpdateProps("/srv/dav/b.txt".into()),
        ]
    );
}

#[tokio::test]
async fn test_copy_collection_preserves_shape_and_order() {
    let store = seeded();
    let tree = sandboxed(&store);

    tree.copy("/srv/dav/tree", "/srv/dav/dir2/tree2").await.unwrap();

    let memory = store.memory();
    assert_eq!(
        memory.list("/srv/dav/dir2/tree2").unwrap(),
        memory.list("/srv/dav/tree").unwrap()
    );
    assert_eq!(
        memory.read_file("/srv/dav/dir2/tree2/sub/3.txt"),
        Some(Bytes::from("three"))
    );
    assert_eq!(
        memory
            .properties_of("/srv/dav/dir2/tree2/1.txt")
            .unwrap()
            .get("lang"),
        Some(&"en".to_string())
    );
    assert_eq!(
        memory
            .properties_of("/srv/dav/dir2/tree2")
            .unwrap()
            .get("owner"),
        Some(&"root".to_string())
    );

    // Children keep their own names, siblings run strictly in enumeration order,
    // and a collection's properties land after its subtree.
    assert_eq!(
        store.mutations(),
        vec![
            Op::CreateDir("/srv/dav/dir2/tree2".into()),
            Op::CreateFile("/srv/dav/dir2/tree2/1.txt".into()),
            Op::UpdateProps("/srv/dav/dir2/tree2/1.txt".into()),
            Op::CreateFile("/srv/dav/dir2/tree2/2.txt".into()),
            Op::UpdateProps("/srv/dav/dir2/tree2/2.txt".into()),
            Op::CreateDir("/srv/dav/dir2/tree2/sub".into()),
            Op::CreateFile("/srv/dav/dir2/tree2/sub/3.txt".into()),
            Op::UpdateProps("/srv/dav/dir2/tree2/sub/3.txt".into()),
            Op::UpdateProps("/srv/dav/dir2/tree2/sub".into()),
            Op::UpdateProps("/srv/dav/dir2/tree2".into()),
        ]
    );
}

#[tokio::test]
async fn test_copy_fails_fast_without_rollback() {
    let store = seeded();
    store.fail_on(Op::CreateFile("/srv/dav/dir2/tree2/2.txt".into()));
    let tree = sandboxed(&store);

    let err = tree
        .copy("/srv/dav/tree", "/srv/dav/dir2/tree2")
        .await
        .unwrap_err();
    assert!(matches!(err, TreeError::Store(_)));

    let memory = store.memory();
    // Work done before the failure stays, nothing after it runs
    assert!(memory.exists("/srv/dav/dir2/tree2/1.txt"));
    assert!(!memory.exists("/srv/dav/dir2/tree2/2.txt"));
    assert!(!memory.exists("/srv/dav/dir2/tree2/sub"));
    assert!(!store
        .ops()
        .contains(&Op::Read("/srv/dav/tree/sub/3.txt".into())));
}

#[tokio::test]
async fn test_copy_outside_sandbox_is_forbidden() {
    let store = seeded();
    let tree = sandboxed(&store);

    let err = tree.copy("/srv/dav/a.txt", "/etc/passwd").await.unwrap_err();
    match err {
        TreeError::Forbidden(ref msg) => assert!(msg.contains("/etc/passwd")),
        ref e => panic!("unexpected error: {e:?}"),
    }
    assert_eq!(err.status_code(), 403);

    // Rejected before any node was touched
    assert!(store.ops().is_empty());
    assert_eq!(
        store.memory().read_file("/etc/passwd"),
        Some(Bytes::from("root:x:0:0"))
    );
}

#[tokio::test]
async fn test_copy_traversal_out_of_sandbox_is_forbidden() {
    let store = seeded();
    let tree = sandboxed(&store);

    let err = tree
        .copy("/srv/dav/a.txt", "/srv/dav/../../etc/a.txt")
        .await
        .unwrap_err();
    assert!(matches!(err, TreeError::Forbidden(_)));
    assert!(!store.memory().exists("/etc/a.txt"));
}

#[tokio::test]
async fn test_source_outside_sandbox_is_not_checked() {
    let store = seeded();
    let tree = sandboxed(&store);

    tree.copy("/etc/passwd", "/srv/dav/passwd").await.unwrap();
    assert_eq!(
        store.memory().read_file("/srv/dav/passwd"),
        Some(Bytes::from("root:x:0:0"))
    );
}

#[tokio::test]
async fn test_copy_unsupported_node() {
    let store = seeded();
    store.mark_opaque("/srv/dav/a.txt");
    let tree = sandboxed(&store);

    let err = tree.copy("/srv/dav/a.txt", "/srv/dav/b.txt").await.unwrap_err();
    assert!(matches!(err, TreeError::Unsupported(_)));
    assert_eq!(err.status_code(), 501);
    assert!(store.mutations().is_empty());
}

#[tokio::test]
async fn test_unsupported_child_aborts_remaining_siblings() {
    let store = seeded();
    store.mark_opaque("/srv/dav/tree/2.txt");
    let tree = sandboxed(&store);

    let err = tree
        .copy("/srv/dav/tree", "/srv/dav/dir2/tree2")
        .await
        .unwrap_err();
    assert!(matches!(err, TreeError::Unsupported(_)));

    let memory = store.memory();
    assert_eq!(
        memory.list("/srv/dav/dir2/tree2").unwrap(),
        vec!["1.txt".to_string()]
    );
}

#[tokio::test]
async fn test_properties_skipped_when_destination_lacks_them() {
    let store = seeded();
    store.strip_properties("/srv/dav/b.txt");
    let tree = sandboxed(&store);

    tree.copy("/srv/dav/a.txt", "/srv/dav/b.txt").await.unwrap();

    assert!(!store
        .ops()
        .iter()
        .any(|op| matches!(op, Op::GetProps(_) | Op::UpdateProps(_))));
    assert_eq!(
        store.memory().properties_of("/srv/dav/b.txt").unwrap().len(),
        0
    );
}

#[tokio::test]
async fn test_copy_into_own_subtree_is_rejected() {
    let store = seeded();
    let tree = sandboxed(&store);

    let err = tree
        .copy("/srv/dav/tree", "/srv/dav/tree/sub/again")
        .await
        .unwrap_err();
    assert!(matches!(err, TreeError::InvalidDestination(_)));
    assert!(store.ops().is_empty());

    let err = tree.copy("/srv/dav/tree", "/srv/dav/tree/").await.unwrap_err();
    assert!(matches!(err, TreeError::InvalidDestination(_)));
}

#[tokio::test]
async fn test_copy_resolution_failures() {
    let store = seeded();
    let tree = sandboxed(&store);

    let err = tree.copy("/srv/dav/missing", "/srv/dav/x").await.unwrap_err();
    assert!(matches!(err, TreeError::NotFound(_)));

    let err = tree
        .copy("/srv/dav/a.txt", "/srv/dav/nodir/b.txt")
        .await
        .unwrap_err();
    assert!(matches!(err, TreeError::NotFound(_)));

    let err = tree
        .copy("/srv/dav/a.txt", "/srv/dav/dir1/f/b.txt")
        .await
        .unwrap_err();
    assert!(matches!(err, TreeError::NotACollection(_)));

    let err = tree.copy("/srv/dav/a.txt", "/srv/dav/dir1/f").await.unwrap_err();
    assert!(matches!(err, TreeError::AlreadyExists(_)));

    assert!(store.mutations().iter().all(|op| matches!(op, Op::CreateFile(_))));
}

#[tokio::test]
async fn test_copy_to_root_keeps_source_name() {
    let store = seeded();
    let tree = Tree::new(Arc::new(store.clone()));

    tree.copy("/srv/dav/a.txt", "/").await.unwrap();
    assert_eq!(store.memory().read_file("/a.txt"), Some(Bytes::from("alpha")));

    let err = tree.copy("/etc", "/").await.unwrap_err();
    assert!(matches!(err, TreeError::InvalidDestination(_)));
}

#[tokio::test]
async fn test_copy_node_defaults_to_source_name() {
    let store = seeded();

    let source = store.node_for_path("/srv/dav/tree/sub").await.unwrap();
    let parent = store.node_for_path("/srv/dav/dir2").await.unwrap();
    copy_node(source, parent, "").await.unwrap();

    assert_eq!(
        store.memory().read_file("/srv/dav/dir2/sub/3.txt"),
        Some(Bytes::from("three"))
    );
}

#[tokio::test]
async fn test_copy_emits_event() {
    let store = seeded();
    let tree = Tree::builder(Arc::new(store.clone()))
        .sandbox("/srv/dav")
        .events(EventBroadcaster::new(8))
        .build();
    let mut rx = tree.subscribe().unwrap();

    tree.copy("/srv/dav/a.txt", "/srv/dav/b.txt").await.unwrap();
    assert!(tree.copy("/srv/dav/a.txt", "/etc/b.txt").await.is_err());

    assert_eq!(
        rx.try_recv().unwrap(),
        TreeEvent::Copied {
            from: "/srv/dav/a.txt".into(),
            to: "/srv/dav/b.txt".into(),
        }
    );
    // Failed operations emit nothing
    assert!(rx.try_recv().is_err());
}
