//! Folder hierarchy invariants: depth, cycles, ownership, the unsorted
//! singleton, delete reassignment and visit accounting.

mod support;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use paperhub_core::error::ErrorKind;
use support::{counter, env};

#[tokio::test]
async fn test_create_rejects_fourth_level() {
    let env = env();
    let owner = Uuid::new_v4();

    let a = env.service.create(owner, None, "a").await.unwrap();
    let b = env.service.create(owner, Some(a.id), "b").await.unwrap();
    let c = env.service.create(owner, Some(b.id), "c").await.unwrap();

    let err = env.service.create(owner, Some(c.id), "d").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::DepthExceeded);
}

#[tokio::test]
async fn test_create_rejects_duplicate_sibling_names() {
    let env = env();
    let owner = Uuid::new_v4();

    env.service.create(owner, None, "Rechnungen").await.unwrap();
    let err = env
        .service
        .create(owner, None, "Rechnungen")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    // Same name under a different parent is fine.
    let other = env.service.create(owner, None, "Archiv").await.unwrap();
    env.service
        .create(owner, Some(other.id), "Rechnungen")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_ownership_is_enforced() {
    let env = env();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let a = env.service.create(owner, None, "a").await.unwrap();

    let err = env
        .service
        .create(stranger, Some(a.id), "b")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccessDenied);

    let err = env.service.rename(stranger, a.id, "x").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccessDenied);

    let err = env
        .service
        .rename(owner, Uuid::new_v4(), "x")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_move_rejects_cycles() {
    let env = env();
    let owner = Uuid::new_v4();

    let a = env.service.create(owner, None, "a").await.unwrap();
    let b = env.service.create(owner, Some(a.id), "b").await.unwrap();

    let err = env
        .service
        .move_folder(owner, a.id, Some(a.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::CycleDetected);

    let err = env
        .service
        .move_folder(owner, a.id, Some(b.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::CycleDetected);
}

#[tokio::test]
async fn test_move_accounts_for_subtree_height() {
    let env = env();
    let owner = Uuid::new_v4();

    let a = env.service.create(owner, None, "a").await.unwrap();
    let b = env.service.create(owner, Some(a.id), "b").await.unwrap();
    env.service.create(owner, Some(b.id), "c").await.unwrap();
    let d = env.service.create(owner, None, "d").await.unwrap();

    // b carries one level below it: d/b/c stays within the limit.
    env.service.move_folder(owner, b.id, Some(d.id)).await.unwrap();

    // a now has nothing below it and also fits...
    env.service.move_folder(owner, a.id, Some(d.id)).await.unwrap();

    // ...but moving d (which now carries a two-level subtree) under
    // anything would exceed the limit.
    let e = env.service.create(owner, None, "e").await.unwrap();
    let err = env
        .service
        .move_folder(owner, d.id, Some(e.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DepthExceeded);
}

#[tokio::test]
async fn test_unsorted_singleton_is_stable_and_hidden() {
    let env = env();
    let owner = Uuid::new_v4();

    let first = env.service.ensure_unsorted(owner).await.unwrap();
    let second = env.service.ensure_unsorted(owner).await.unwrap();
    assert_eq!(first.id, second.id);
    assert!(first.is_unsorted());

    env.service.create(owner, None, "Rechnungen").await.unwrap();
    let tree = env.service.list_tree(owner).await.unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].name, "Rechnungen");

    let err = env.service.delete(owner, first.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    let err = env.service.rename(owner, first.id, "x").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_delete_reassigns_files_and_unread_to_unsorted() {
    let env = env();
    let owner = Uuid::new_v4();
    let cancel = CancellationToken::new();

    let a = env.service.create(owner, None, "a").await.unwrap();
    let b = env.service.create(owner, Some(a.id), "b").await.unwrap();

    let mut task = env
        .controller
        .admit(owner, "scan.pdf", Some("application/pdf".into()), 5, Some(b.id))
        .unwrap();
    env.controller
        .store(&mut task, Bytes::from_static(b"hello"), &cancel)
        .await
        .unwrap();
    assert_eq!(counter(&env, owner, a.id).await, 1);
    assert_eq!(counter(&env, owner, b.id).await, 1);

    let reassigned = env.service.delete(owner, a.id).await.unwrap();
    assert_eq!(reassigned, 1);

    let unsorted = env.service.ensure_unsorted(owner).await.unwrap();
    let files = env.files.all();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].folder_id, unsorted.id);

    assert_eq!(counter(&env, owner, unsorted.id).await, 1);
    assert_eq!(counter(&env, owner, a.id).await, 0);
    assert_eq!(counter(&env, owner, b.id).await, 0);
    assert!(env.folders.snapshot().iter().all(|f| f.is_unsorted()));
}

#[tokio::test]
async fn test_visit_clears_direct_contribution_only() {
    let env = env();
    let owner = Uuid::new_v4();
    let cancel = CancellationToken::new();

    let a = env.service.create(owner, None, "a").await.unwrap();
    let b = env.service.create(owner, Some(a.id), "b").await.unwrap();

    for folder in [a.id, b.id] {
        let mut task = env
            .controller
            .admit(owner, "scan.pdf", None, 5, Some(folder))
            .unwrap();
        env.controller
            .store(&mut task, Bytes::from_static(b"hello"), &cancel)
            .await
            .unwrap();
    }
    // a holds one file of its own plus b's: cumulative 2.
    assert_eq!(counter(&env, owner, a.id).await, 2);
    assert_eq!(counter(&env, owner, b.id).await, 1);

    let cleared = env.service.visit(owner, a.id).await.unwrap();
    assert_eq!(cleared, 1);
    assert_eq!(counter(&env, owner, a.id).await, 1);
    assert_eq!(counter(&env, owner, b.id).await, 1);

    let cleared = env.service.visit(owner, b.id).await.unwrap();
    assert_eq!(cleared, 1);
    assert_eq!(counter(&env, owner, a.id).await, 0);
    assert_eq!(counter(&env, owner, b.id).await, 0);

    // A second visit has nothing left to clear.
    assert_eq!(env.service.visit(owner, a.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_list_tree_carries_badges() {
    let env = env();
    let owner = Uuid::new_v4();
    let cancel = CancellationToken::new();

    let a = env.service.create(owner, None, "a").await.unwrap();
    let b = env.service.create(owner, Some(a.id), "b").await.unwrap();

    let mut task = env
        .controller
        .admit(owner, "scan.pdf", None, 5, Some(b.id))
        .unwrap();
    env.controller
        .store(&mut task, Bytes::from_static(b"hello"), &cancel)
        .await
        .unwrap();

    let tree = env.service.list_tree(owner).await.unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].id, a.id);
    assert_eq!(tree[0].unread, 1);
    assert_eq!(tree[0].file_count, 0);
    assert_eq!(tree[0].children[0].id, b.id);
    assert_eq!(tree[0].children[0].unread, 1);
    assert_eq!(tree[0].children[0].file_count, 1);
}
