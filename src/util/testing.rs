use std::env;
use std::sync::Once;
use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{NodeId, XmlArena};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "xmlnode=trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Panics unless every element under `root` satisfies the tree invariants:
/// shared root, depth one below the parent, size as one plus the children's
/// sizes, and a path that resolves back to the same element.
pub fn assert_tree_invariants(arena: &XmlArena, root: NodeId) {
    let root_node = arena.node(root).expect("root must resolve");
    assert!(root_node.parent().is_none(), "root has a parent");
    assert_eq!(root_node.root_id(), root, "root is not its own root");
    assert_eq!(root_node.depth(), 0);

    for node in root_node.descendants() {
        let children_size: usize = node.children().map(|c| c.size()).sum();
        assert_eq!(node.size(), 1 + children_size, "size of {}", node.tag());
        assert_eq!(
            arena.get_from_path(root, &node.path()),
            Ok(node.id()),
            "path of {} does not resolve",
            node.tag()
        );

        if let Some(parent) = node.parent() {
            assert_eq!(node.root_id(), parent.root_id(), "root of {}", node.tag());
            assert_ne!(node.root_id(), node.id());
            assert!(!node.is_root());
            assert_eq!(node.depth(), parent.depth() + 1);
        }
    }
}
