#![no_main]

use libfuzzer_sys::fuzz_target;
use pullnest_core::testing::ViewTree;
use pullnest_core::{ContainerId, resolve_owner};

fuzz_target!(|data: &[u8]| {
    // Each byte pair describes one node: (parent selector, container flag).
    // Parent links may point anywhere, including forward, so cycles occur.
    let pairs: Vec<(u8, u8)> = data
        .chunks_exact(2)
        .map(|c| (c[0], c[1]))
        .take(512)
        .collect();
    if pairs.is_empty() {
        return;
    }

    let mut tree = ViewTree::new();
    let ids: Vec<_> = pairs
        .iter()
        .enumerate()
        .map(|(i, (_, flag))| {
            if flag % 4 == 0 {
                tree.add_container(None, i as i32)
            } else {
                tree.add_view(None)
            }
        })
        .collect();
    for (i, (selector, _)) in pairs.iter().enumerate() {
        if *selector != u8::MAX {
            tree.attach(ids[i], ids[usize::from(*selector) % ids.len()]);
        }
    }

    for id in &ids {
        let before = tree.clone();
        let owner = resolve_owner(&tree, *id);
        assert!(owner == ContainerId::NOT_FOUND || owner.get() >= 0);
        assert_eq!(tree, before, "resolution mutated the hierarchy");
    }
});
