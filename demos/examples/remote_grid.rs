// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Remote-control navigation over a TV-style home screen.
//!
//! The screen has a navigation rail on the left and rows of cards on the right:
//! - the first row vetoes `Up`, so focus cannot leave the content area upwards,
//! - the second row routes every `Down` entry to its first card,
//! - the third row is still loading and is deactivated.
//!
//! The same key sequence is replayed with both ranking policies.
//!
//! Run:
//! - `cargo run -p understory_focus_demos --example remote_grid`
//! - `RUST_LOG=understory_focus_resolver=trace cargo run -p understory_focus_demos --example remote_grid`

use std::env;

use kurbo::Rect;
use tracing::info;
use tracing_subscriber::EnvFilter;
use understory_focus_resolver::{
    BeamBeatsPolicy, FocusDirection, FocusFlags, FocusNode, FocusOverride, FocusPolicy,
    FocusResolver, FocusTree, MoveResult, SnapshotError, TieredPolicy,
};

const SCREEN: u32 = 1;
const RAIL: u32 = 10;
const CONTENT: u32 = 20;
const ROWS: [u32; 3] = [21, 22, 23];

fn group(id: u32, rect: Rect) -> FocusNode<u32> {
    FocusNode::new(id, rect).with_flags(FocusFlags::empty())
}

fn build_screen() -> Result<FocusTree<u32>, SnapshotError<u32>> {
    let mut nodes = vec![
        group(SCREEN, Rect::new(0.0, 0.0, 1280.0, 720.0)),
        group(RAIL, Rect::new(0.0, 0.0, 200.0, 720.0)).with_parent(SCREEN),
        group(CONTENT, Rect::new(240.0, 0.0, 1280.0, 720.0)).with_parent(SCREEN),
    ];

    // Rail items: Home, Search, Library, Settings.
    for i in 0..4_u32 {
        let y = 100.0 + 80.0 * f64::from(i);
        nodes.push(
            FocusNode::new(11 + i, Rect::new(20.0, y, 180.0, y + 60.0)).with_parent(RAIL),
        );
    }

    for (n, row) in (0_u32..).zip(ROWS) {
        let y = 80.0 + 220.0 * f64::from(n);
        let mut row_node =
            group(row, Rect::new(240.0, y, 1280.0, y + 180.0)).with_parent(CONTENT);
        match row {
            21 => row_node.overrides.up = FocusOverride::Cancel,
            22 => row_node
                .overrides
                .enter
                .set(FocusDirection::Down, FocusOverride::Target(201)),
            _ => row_node = row_node.deactivated(),
        }
        nodes.push(row_node);

        let first_card = 100 * (n + 1) + 1;
        for col in 0..4_u32 {
            let x = 240.0 + 250.0 * f64::from(col);
            nodes.push(
                FocusNode::new(first_card + col, Rect::new(x, y, x + 220.0, y + 180.0))
                    .with_parent(row),
            );
        }
    }

    FocusTree::new(nodes)
}

fn replay<P: FocusPolicy<u32>>(name: &str, resolver: &FocusResolver<P>, tree: &FocusTree<u32>) {
    use FocusDirection::{Down, Exit, Left, Next, Previous, Right, Up};
    let keys = [
        Right, Right, Down, Right, Up, Up, Down, Down, Exit, Next, Previous, Left, Left,
    ];

    let mut focused = 11;
    info!(policy = name, focused, "starting on the rail");
    for key in keys {
        match resolver.move_focus(tree, SCREEN, focused, key) {
            MoveResult::Moved(next) => {
                info!(policy = name, ?key, from = focused, to = next, "moved");
                focused = next;
            }
            MoveResult::Failed(reason) => {
                info!(policy = name, ?key, focused, ?reason, "stayed");
            }
        }
    }
}

fn main() -> Result<(), SnapshotError<u32>> {
    let directives =
        env::var("RUST_LOG").unwrap_or_else(|_| "understory_focus_resolver=debug,info".to_owned());
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(EnvFilter::builder().parse_lossy(directives))
        .init();

    let tree = build_screen()?;
    info!(nodes = tree.len(), "snapshot built");

    replay("tiered", &FocusResolver::new(TieredPolicy), &tree);
    replay("beam-beats", &FocusResolver::new(BeamBeatsPolicy), &tree);
    Ok(())
}
