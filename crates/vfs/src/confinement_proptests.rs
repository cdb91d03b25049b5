// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Property-based tests for the path-confinement invariant (§8 "Path
//! confinement"): no logical path resolves outside the configured root.

use proptest::prelude::*;

use super::*;

fn path_segment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-zA-Z0-9_.-]{1,8}",
        1 => Just("..".to_string()),
        1 => Just(".".to_string()),
    ]
}

fn logical_path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(path_segment_strategy(), 0..12)
        .prop_map(|segments| format!("/{}", segments.join("/")))
}

proptest! {
    /// Every resolved path either stays inside the root or `resolve` rejects
    /// it outright; a silently escaping path is never produced.
    #[test]
    fn resolve_never_escapes_root(logical in logical_path_strategy()) {
        let vfs = Vfs::new("/mudlib");
        match vfs.resolve(&logical) {
            Ok(resolved) => prop_assert!(resolved.starts_with(vfs.root())),
            Err(VfsError::PathTraversal(_) | VfsError::NotAbsolute(_)) => {}
            Err(other) => prop_assert!(false, "unexpected error variant: {other:?}"),
        }
    }

    /// A path with no `..` segments beyond what interior `Normal` segments
    /// supply always resolves successfully and lands inside the root.
    #[test]
    fn non_traversing_path_always_resolves(
        segments in prop::collection::vec("[a-zA-Z0-9_]{1,8}", 0..8)
    ) {
        let vfs = Vfs::new("/mudlib");
        let logical = format!("/{}", segments.join("/"));
        let resolved = vfs.resolve(&logical).unwrap();
        prop_assert!(resolved.starts_with(vfs.root()));
    }

    /// A non-absolute logical path is always rejected, never silently
    /// treated as relative to the root.
    #[test]
    fn relative_path_is_always_rejected(segment in "[a-zA-Z0-9_]{1,8}") {
        let vfs = Vfs::new("/mudlib");
        prop_assert!(matches!(vfs.resolve(&segment), Err(VfsError::NotAbsolute(_))));
    }
}
