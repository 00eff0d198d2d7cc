//! Comprehensive tests for mnml-html

use mnml_dom::DomTree;
use mnml_html::{parse, parse_fragment};

#[test]
fn test_document_structure_is_located() {
    let doc = parse("<!DOCTYPE html><p id='x'>hi</p>").unwrap();

    assert!(doc.document_element().is_valid());
    assert!(doc.head().is_valid());
    assert!(doc.body().is_valid());
    let p = doc.get_element_by_id("x").unwrap();
    assert_eq!(doc.tree().parent(p), Some(doc.body()));
}

#[test]
fn test_fragment_attributes_are_kept() {
    let mut tree = DomTree::new();
    let nodes = parse_fragment(r#"<a href="/x" CLASS="btn primary">go</a>"#, &mut tree).unwrap();

    let a = nodes[0];
    assert_eq!(tree.attribute(a, "href"), Some("/x"));
    assert_eq!(tree.attribute(a, "class"), Some("btn primary"));
    assert_eq!(tree.element(a).unwrap().classes.len(), 2);
}

#[test]
fn test_fragment_with_several_top_level_nodes() {
    let mut tree = DomTree::new();
    let nodes = parse_fragment("<li>one</li><li>two</li>", &mut tree).unwrap();

    assert_eq!(nodes.len(), 2);
    assert_eq!(tree.text_content(nodes[1]), "two");
}

#[test]
fn test_text_only_fragment() {
    let mut tree = DomTree::new();
    let nodes = parse_fragment("just text", &mut tree).unwrap();

    assert_eq!(nodes.len(), 1);
    assert!(tree.get(nodes[0]).unwrap().is_text());
}

#[test]
fn test_empty_fragment() {
    let mut tree = DomTree::new();
    assert!(parse_fragment("", &mut tree).unwrap().is_empty());
}

#[test]
fn test_nested_structure() {
    let mut tree = DomTree::new();
    let nodes = parse_fragment("<ul><li><b>x</b></li></ul>", &mut tree).unwrap();

    let ul = nodes[0];
    let li = tree.element_children(ul).next().unwrap();
    let b = tree.element_children(li).next().unwrap();
    assert_eq!(tree.tag_name(b), Some("b"));
}

#[test]
fn test_table_parts_parse_outside_a_table() {
    let mut tree = DomTree::new();
    let rows = parse_fragment("<tr><td>1</td><td>2</td></tr>", &mut tree).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(tree.tag_name(rows[0]), Some("tr"));
    assert_eq!(tree.element_children(rows[0]).count(), 2);

    let cells = parse_fragment("<td>a</td>", &mut tree).unwrap();
    assert_eq!(tree.tag_name(cells[0]), Some("td"));
    assert_eq!(tree.text_content(cells[0]), "a");
}

#[test]
fn test_option_parses_standalone() {
    let mut tree = DomTree::new();
    let nodes = parse_fragment(r#"<option value="x">X</option><option>Y</option>"#, &mut tree).unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(tree.tag_name(nodes[0]), Some("option"));
    assert_eq!(tree.attribute(nodes[0], "value"), Some("x"));
}

#[test]
fn test_inner_whitespace_is_kept() {
    let mut tree = DomTree::new();
    let nodes = parse_fragment("<p><b>a</b> <i>b</i></p>", &mut tree).unwrap();
    assert_eq!(tree.text_content(nodes[0]), "a b");

    let pre = parse_fragment("<pre>  </pre>", &mut tree).unwrap();
    assert_eq!(tree.text_content(pre[0]), "  ");
}

#[test]
fn test_whitespace_between_top_level_nodes_is_dropped() {
    let mut tree = DomTree::new();
    let nodes = parse_fragment("<li>one</li>\n  <li>two</li>", &mut tree).unwrap();
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|&node| tree.is_element(node)));
}

#[test]
fn test_leading_comment_is_first_node() {
    let mut tree = DomTree::new();
    let nodes = parse_fragment("<!-- note --><p>x</p>", &mut tree).unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(tree.get(nodes[0]).unwrap().kind(), "comment");
}
