//! Test support: logging setup, fixtures and deterministic identifiers.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{AvailablePage, IdGenerator, MenuItemType, MenuNode, MenuTree, PageKind};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    // property tests run thousands of moves; keep per-call tree spans out
    let noisy_modules = ["navtree::domain::mutator", "navtree::domain::arena"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
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

/// Deterministic ids: `<prefix>-1`, `<prefix>-2`, ...
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicUsize,
}

impl SequentialIds {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: AtomicUsize::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn new_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", self.prefix, n)
    }
}

/// Home, Products (New Arrivals, Best Sellers), About.
pub fn sample_menu() -> MenuTree {
    MenuTree::new(vec![
        MenuNode::new("1", "Home", MenuItemType::Link).with_url("/"),
        MenuNode::new("2", "Products", MenuItemType::Dropdown)
            .with_url("/products")
            .with_children(vec![
                MenuNode::new("21", "New Arrivals", MenuItemType::Link).with_url("/products/new"),
                MenuNode::new("22", "Best Sellers", MenuItemType::Link).with_url("/products/best"),
            ]),
        MenuNode::new("3", "About", MenuItemType::Link).with_url("/about"),
    ])
}

pub fn sample_pages() -> Vec<AvailablePage> {
    [
        ("p1", "Home", "/", PageKind::Page),
        ("p2", "About Us", "/about", PageKind::Page),
        ("p3", "Services", "/services", PageKind::Page),
        ("p4", "Contact", "/contact", PageKind::Page),
        ("p5", "Blog", "/blog", PageKind::Page),
        ("p6", "Products", "/products", PageKind::Collection),
        ("p7", "Careers", "/careers", PageKind::Page),
    ]
    .into_iter()
    .map(|(id, title, path, kind)| AvailablePage {
        id: id.into(),
        title: title.into(),
        path: path.into(),
        kind,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
    }

    #[test]
    fn given_sequential_ids_when_called_then_counts_up() {
        let ids = SequentialIds::new("t");
        assert_eq!(ids.new_id(), "t-1");
        assert_eq!(ids.new_id(), "t-2");
    }
}
