// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! §8 scenario 4: pager navigation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mf_core::{ConnectionId, FakeClock, ObjectId};
use mf_dispatch::{page, HandlerStacks, PagerExit, PagerOptions};
use mf_efun::EfunBridge;

use super::prelude::Scenario;

struct CountingExit(Arc<AtomicUsize>);

impl PagerExit<FakeClock> for CountingExit {
    fn on_exit(&mut self, _bridge: &mut EfunBridge<FakeClock>, _player: &ObjectId) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn lines(n: usize) -> String {
    (1..=n).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n")
}

#[tokio::test]
async fn pager_navigates_pages_and_fires_on_exit_once() {
    let mut world = Scenario::new();
    let player = ObjectId::blueprint("/std/player#1");
    world.bridge.register_active_player("wanderer", player.clone());
    let connection = ConnectionId::new();
    world.bridge.bind_player_to_connection("wanderer", connection);

    let mut stacks: HandlerStacks<FakeClock> = HandlerStacks::new();
    let exit_count = Arc::new(AtomicUsize::new(0));

    page(
        &mut world.bridge,
        &mut stacks,
        "wanderer",
        &player,
        &lines(50),
        PagerOptions { lines_per_page: 10, ..Default::default() },
        Box::new(CountingExit(exit_count.clone())),
    );

    let first_page = world.sink.terminal_lines(connection).pop().expect("first page sent");
    assert!(first_page.contains("line 1"));
    assert!(first_page.contains("line 10"));
    assert!(!first_page.contains("line 11"));

    assert!(stacks.dispatch(&mut world.bridge, "wanderer", &player, ""));
    let second_page = world.sink.terminal_lines(connection).pop().expect("second page sent");
    assert!(second_page.contains("line 11"));
    assert!(second_page.contains("line 20"));

    assert!(stacks.dispatch(&mut world.bridge, "wanderer", &player, "g"));
    let back_to_top = world.sink.terminal_lines(connection).pop().expect("back to top sent");
    assert!(back_to_top.contains("line 1"));

    assert!(stacks.dispatch(&mut world.bridge, "wanderer", &player, "41"));
    let jumped = world.sink.terminal_lines(connection).pop().expect("jump sent");
    assert!(jumped.contains("line 41"));
    assert!(jumped.contains("line 50"));

    assert!(stacks.dispatch(&mut world.bridge, "wanderer", &player, "q"));
    assert!(stacks.is_empty("wanderer"));
    assert_eq!(exit_count.load(Ordering::SeqCst), 1);
}
