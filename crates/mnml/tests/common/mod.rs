//! Shared fixtures for mnml integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use mnml::{Page, PageConfig};
use tracing_subscriber::EnvFilter;

/// Route `tracing` output through the test harness; `RUST_LOG` selects levels
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub const FIXTURE: &str = r#"<!DOCTYPE html>
<html>
  <head><title>Fixture</title></head>
  <body class="page">
    <nav class="menu">
      <ul id="list" class="menu">
        <li class="item" id="first"><a class="link" href="/one"><span id="label">One</span></a></li>
        <li class="item" id="second"><a class="link" href="/two">Two</a></li>
      </ul>
    </nav>
    <div class="box" id="outer"><div class="box" id="inner"><button id="go">Go</button></div></div>
  </body>
</html>"#;

/// Page over [`FIXTURE`]
pub fn fixture() -> Page {
    init_tracing();
    match Page::from_html(FIXTURE, PageConfig::default()) {
        Ok(page) => page,
        Err(err) => panic!("fixture failed to parse: {err}"),
    }
}

/// Element with `id` in the fixture
pub fn by_id(page: &Page, id: &str) -> mnml::NodeId {
    match page.document().get_element_by_id(id) {
        Some(node) => node,
        None => panic!("no element #{id}"),
    }
}

/// Shared log that callbacks append to
#[derive(Clone, Default)]
pub struct Log(Rc<RefCell<Vec<String>>>);

impl Log {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}
