//! Element, query and utility helpers

mod common;

use std::collections::HashSet;
use std::rc::Rc;

use anyhow::Result;
use common::{by_id, fixture};
use mnml::{all, any, uuid, MnmlError, Page, PageConfig, ParamValue};

#[test]
fn test_create_element_gives_fresh_detached_nodes() -> Result<()> {
    let page = fixture();
    let a = page.create_element("section")?;
    let b = page.create_element("section")?;
    assert_ne!(a, b);

    let document = page.document();
    assert_eq!(document.tree().tag_name(a), Some("section"));
    assert_eq!(document.tree().parent(a), None);
    Ok(())
}

#[test]
fn test_created_element_can_be_attached_and_found() -> Result<()> {
    let page = fixture();
    let note = page.create_element("aside")?;
    {
        let mut document = page.document_mut();
        let body = document.body();
        document.tree_mut().set_attribute(note, "id", "note")?;
        document.tree_mut().append_child(body, note)?;
    }
    assert_eq!(page.find(None, "body > aside#note")?, Some(note));
    Ok(())
}

#[test]
fn test_create_html() -> Result<()> {
    let page = fixture();
    let card = page.create_html("\n  <article class=\"card\"><h2>Title</h2><p>Body</p></article>\n")?;

    let document = page.document();
    assert_eq!(document.tree().tag_name(card), Some("article"));
    assert_eq!(document.tree().element_children(card).count(), 2);
    assert_eq!(document.tree().text_content(card), "TitleBody");
    Ok(())
}

#[test]
fn test_create_html_table_row() -> Result<()> {
    let page = Page::default();
    let row = page.create_html("<tr><td>1</td><td>2</td></tr>")?;
    let document = page.document();
    assert_eq!(document.tree().tag_name(row), Some("tr"));
    assert_eq!(document.tree().text_content(row), "12");

    drop(document);
    let option = page.create_html("<option value=\"a\">A</option>")?;
    assert_eq!(page.document().tree().tag_name(option), Some("option"));
    Ok(())
}

#[test]
fn test_create_html_keeps_inner_whitespace() -> Result<()> {
    let page = Page::default();
    let para = page.create_html("<p><b>a</b> <i>b</i></p>")?;
    assert_eq!(page.document().tree().text_content(para), "a b");
    Ok(())
}

#[test]
fn test_create_html_requires_element() {
    let page = fixture();
    let err = page.create_html("plain <p>x</p>").unwrap_err();
    assert!(matches!(
        err,
        MnmlError::UnexpectedNodeKind {
            expected: "element",
            found: "text"
        }
    ));
}

#[test]
fn test_find_defaults_to_document_element() -> Result<()> {
    let page = fixture();
    assert_eq!(page.find(None, "li")?, Some(by_id(&page, "first")));
    assert_eq!(page.find(None, "table")?, None);
    // The root itself is not a candidate
    assert_eq!(page.find(None, "html")?, None);
    Ok(())
}

#[test]
fn test_find_all_in_document_order() -> Result<()> {
    let page = fixture();
    let links = page.find_all(None, "a.link")?;
    assert_eq!(links.len(), 2);

    let boxes = page.find_all(None, ".box")?;
    assert_eq!(boxes, vec![by_id(&page, "outer"), by_id(&page, "inner")]);
    Ok(())
}

#[test]
fn test_find_within_root() -> Result<()> {
    let page = fixture();
    let second = by_id(&page, "second");
    let link = page.find(Some(second), "a")?;
    assert!(link.is_some());
    assert!(page.find_all(Some(second), "span")?.is_empty());

    let outer = by_id(&page, "outer");
    assert_eq!(page.find_all(Some(outer), ".box")?, vec![by_id(&page, "inner")]);
    Ok(())
}

#[test]
fn test_find_rejects_bad_selector() {
    let page = fixture();
    assert!(matches!(page.find(None, "a[href"), Err(MnmlError::Selector(_))));
    assert!(page.find_all(None, "").is_err());
}

#[test]
fn test_find_parent() -> Result<()> {
    let page = fixture();
    let label = by_id(&page, "label");

    assert_eq!(page.find_parent(label, "li")?, Some(by_id(&page, "first")));
    assert_eq!(page.find_parent(label, "#label")?, None);
    assert_eq!(page.find_parent(label, "table")?, None);
    Ok(())
}

#[test]
fn test_find_parents_innermost_first() -> Result<()> {
    let page = fixture();
    let label = by_id(&page, "label");
    let menus = page.find_parents(label, ".menu")?;
    let nav = page.find(None, "nav")?;
    assert_eq!(menus, vec![by_id(&page, "list")].into_iter().chain(nav).collect::<Vec<_>>());

    let all = page.find_parents(label, "*")?;
    assert_eq!(all.len(), 6);
    assert_eq!(all.last().copied(), Some(page.document().document_element()));
    Ok(())
}

#[test]
fn test_matches() -> Result<()> {
    let page = fixture();
    let go = by_id(&page, "go");
    assert!(page.matches(go, "div > button#go")?);
    assert!(!page.matches(go, "a")?);
    Ok(())
}

#[test]
fn test_params_coalesce_repeated_keys() -> Result<()> {
    let page = fixture();
    let params = page.params(Some("a=1&a=2&b=3"))?;
    assert_eq!(params.get("a"), Some(&ParamValue::from(["1", "2"])));
    assert_eq!(params.get("b"), Some(&ParamValue::from("3")));
    assert_eq!(serde_json::to_string(&*params)?, r#"{"a":["1","2"],"b":"3"}"#);
    Ok(())
}

#[test]
fn test_params_empty_and_cached() -> Result<()> {
    let page = fixture();
    assert!(page.params(Some(""))?.is_empty());
    assert!(page.params(Some("?"))?.is_empty());

    let first = page.params(Some("?x=1&y=2"))?;
    let second = page.params(Some("x=1&y=2"))?;
    assert!(Rc::ptr_eq(&first, &second));
    Ok(())
}

#[test]
fn test_params_from_document_url() -> Result<()> {
    common::init_tracing();
    let config = PageConfig::default().with_url("https://example.com/search?q=rust+lang&tag=a&tag=b");
    let page = Page::new(config);

    let params = page.params(None)?;
    assert_eq!(params.get("q").map(ParamValue::first), Some("rust lang"));
    assert_eq!(params.get("tag").map(ParamValue::values), Some(vec!["a", "b"]));

    assert!(Page::default().params(None)?.is_empty());
    Ok(())
}

#[test]
fn test_page_from_json_config() -> Result<()> {
    common::init_tracing();
    let config: PageConfig = serde_json::from_str(
        r#"{ "url": "https://example.com/?page=2", "skeleton": false, "params_cache_limit": 4 }"#,
    )?;
    let page = Page::new(config);

    assert!(!page.document().document_element().is_valid());
    assert_eq!(page.params(None)?.get("page").map(ParamValue::first), Some("2"));
    assert_eq!(page.config().params_cache_limit, Some(4));
    Ok(())
}

#[test]
fn test_uuid_form_and_uniqueness() {
    let ids: HashSet<String> = (0..500).map(|_| uuid()).collect();
    assert_eq!(ids.len(), 500);
    for id in &ids {
        assert_eq!(id.len(), 36);
        assert_eq!(&id[14..15], "4");
        assert!(matches!(&id[19..20], "8" | "9" | "a" | "b"));
        assert!(id.chars().all(|c| c == '-' || c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}

#[test]
fn test_any_all() {
    assert!(any([None, Some("x")]));
    assert!(!any([None::<&str>, Some("")]));
    assert!(all(["a", "b"]));
    assert!(!all([1.0, 0.0]));
    assert!(all(Vec::<u8>::new()));
    assert!(!any(Vec::<u8>::new()));
}
