use super::*;
use crate::ParseErrorKind;
use facet_testhelpers::test;
use proptest::prelude::*;

fn events(source: &str) -> Vec<Event> {
    Parser::new(source)
        .parse_to_vec()
        .unwrap_or_else(|e| panic!("parse failed: {e}"))
}

fn parse_err(source: &str) -> (ParseError, Vec<Event>) {
    let mut events = Vec::new();
    let err = parse(source, &mut events).expect_err("parse should fail");
    (err, events)
}

#[test]
fn test_empty_document() {
    assert_eq!(events(""), vec![Event::EndElement]);
    assert_eq!(events("  \n\t\n"), vec![Event::EndElement]);
}

#[test]
fn test_key_values_at_root() {
    assert_eq!(
        events("name: demo\nport: 8080\n"),
        vec![
            Event::pair("name", "demo"),
            Event::pair("port", "8080"),
            Event::EndElement,
        ]
    );
}

#[test]
fn test_nested_blocks_in_document_order() {
    let source = r#"
        server web1 {
            port: 80
            location {
                root: "/srv/www"
            }
        }
        server web2 {
            port: 81
        }
    "#;
    assert_eq!(
        events(source),
        vec![
            Event::start("server", "web1"),
            Event::pair("port", "80"),
            Event::start("location", ""),
            Event::pair("root", "/srv/www"),
            Event::EndElement,
            Event::EndElement,
            Event::start("server", "web2"),
            Event::pair("port", "81"),
            Event::EndElement,
            Event::EndElement,
        ]
    );
}

#[test]
fn test_single_line_block() {
    insta::assert_debug_snapshot!(events(r#"server "web1" { port: 80 }"#), @r#"
    [
        StartElement {
            class: "server",
            word: "web1",
        },
        KeyValuePair {
            key: "port",
            value: "80",
        },
        EndElement,
        EndElement,
    ]
    "#);
}

#[test]
fn test_comments_are_stripped_once() {
    let source = "motd: \"# not a comment\" # a comment\n# whole line\nx: 1";
    assert_eq!(
        events(source),
        vec![
            Event::pair("motd", "# not a comment"),
            Event::pair("x", "1"),
            Event::EndElement,
        ]
    );
}

#[test]
fn test_quoted_values_are_unescaped() {
    assert_eq!(
        events(r#"a: "tab\there" b: 'it\'s' c: raw\n"#),
        vec![
            Event::pair("a", "tab\there"),
            Event::pair("b", "it's"),
            Event::pair("c", r"raw\n"),
            Event::EndElement,
        ]
    );
}

#[test]
fn test_unmatched_close() {
    let (err, events) = parse_err("a: 1\n}\nb: 2\n");
    assert_eq!(err.kind, ParseErrorKind::UnexpectedClose);
    assert_eq!(err.location, Location { line: 2, column: 1 });
    assert!(err.to_string().starts_with("unexpected '}'"));
    // nothing after the stray brace is delivered
    assert_eq!(events, vec![Event::pair("a", "1")]);
}

#[test]
fn test_extra_close_after_block() {
    let (err, events) = parse_err("a {\n}\n  }");
    assert_eq!(err.kind, ParseErrorKind::UnexpectedClose);
    assert_eq!(err.location, Location { line: 3, column: 3 });
    assert_eq!(events, vec![Event::start("a", ""), Event::EndElement]);
}

#[test]
fn test_unclosed_block() {
    let (err, events) = parse_err("outer {\n  inner x {\n    k: v\n  }\n");
    assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
    assert!(err.to_string().starts_with("unexpected EOF"));
    assert_eq!(
        events,
        vec![
            Event::start("outer", ""),
            Event::start("inner", "x"),
            Event::pair("k", "v"),
            Event::EndElement,
        ]
    );
}

#[test]
fn test_garbage_inside_block_is_eof() {
    let (err, _) = parse_err("a {\n  ???\n}");
    assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
    assert_eq!(err.location, Location { line: 2, column: 3 });
}

#[test]
fn test_trailing_garbage_at_root_ends_parse() {
    assert_eq!(
        events("a: 1\n???\nb: 2"),
        vec![Event::pair("a", "1"), Event::EndElement]
    );
}

#[test]
fn test_max_depth() {
    let source = "a { b { c { } } }";
    let mut events = Vec::new();
    let err = Parser::new(source)
        .max_depth(Some(2))
        .parse(&mut events)
        .expect_err("too deep");
    assert_eq!(err.kind, ParseErrorKind::TooDeep { limit: 2 });
    assert_eq!(err.location, Location { line: 1, column: 9 });

    let mut events = Vec::new();
    Parser::new(source)
        .max_depth(Some(3))
        .parse(&mut events)
        .expect("within limit");
    assert_eq!(events.len(), 7);
}

#[test]
fn test_deep_nesting_is_capped_by_default() {
    let deep = format!("{}{}", "a { ".repeat(5000), "} ".repeat(5000));
    let mut events = Vec::new();
    let err = parse(&deep, &mut events).expect_err("nesting limit");
    assert_eq!(
        err.kind,
        ParseErrorKind::TooDeep {
            limit: DEFAULT_MAX_DEPTH
        }
    );
    assert_eq!(
        err.location,
        Location {
            line: 1,
            column: 4 * DEFAULT_MAX_DEPTH as u32 + 1
        }
    );

    let fits = format!(
        "{}{}",
        "a { ".repeat(DEFAULT_MAX_DEPTH),
        "} ".repeat(DEFAULT_MAX_DEPTH)
    );
    let mut events = Vec::new();
    parse(&fits, &mut events).expect("at the limit");
    assert_eq!(events.len(), 2 * DEFAULT_MAX_DEPTH + 1);
}

#[test]
fn test_invalid_utf8() {
    let mut events = Vec::new();
    let err = parse_bytes(b"a: 1\nb: \xff", &mut events).expect_err("invalid utf-8");
    assert_eq!(err.kind, ParseErrorKind::InvalidUtf8 { valid_up_to: 8 });
    assert_eq!(err.location, Location { line: 2, column: 4 });
    assert!(events.is_empty());
}

#[test]
fn test_parse_bytes_valid() {
    let mut events = Vec::new();
    parse_bytes(b"k: v", &mut events).expect("valid input");
    assert_eq!(events, vec![Event::pair("k", "v"), Event::EndElement]);
}

/// A handler that only cares about `keep` blocks.
#[derive(Default)]
struct OnlyKeep {
    seen: Vec<String>,
}

impl ContentHandler for OnlyKeep {
    fn start_element<'s>(
        &'s mut self,
        class: &str,
        _word: &str,
    ) -> Option<Box<dyn ContentHandler + 's>> {
        if class == "keep" {
            Some(Box::new(&mut *self))
        } else {
            None
        }
    }

    fn key_value_pair(&mut self, key: &str, value: &str) {
        self.seen.push(format!("{key}={value}"));
    }
}

#[test]
fn test_none_skips_whole_block() {
    let source = "a: 1\nskip { b: 2 keep { c: 3 } }\nkeep { d: 4 }\n";
    let mut handler = OnlyKeep::default();
    parse(source, &mut handler).expect("valid input");
    assert_eq!(handler.seen, vec!["a=1", "d=4"]);
}

#[test]
fn test_render_points_at_original_source() {
    let source = "a { # opened here\n}\n} # one too many\n";
    let mut events = Vec::new();
    let err = parse(source, &mut events).expect_err("stray brace");
    let rendered = strip_ansi_escapes::strip_str(err.render("test.inn", source));
    assert!(rendered.contains("unexpected '}'"), "{rendered}");
    assert!(rendered.contains("test.inn:3:1"), "{rendered}");
    assert!(rendered.contains("no open block to close"), "{rendered}");
}

fn balanced_document() -> impl Strategy<Value = (String, usize)> {
    let leaf = "[a-z]{1,6}".prop_map(|k| (format!("{k}: v\n"), 1usize));
    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            "[a-z]{1,6}",
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(class, children)| {
                let mut text = format!("{class} {{\n");
                let mut count = 2;
                for (child, n) in children {
                    text.push_str(&child);
                    count += n;
                }
                text.push_str("}\n");
                (text, count)
            })
    })
}

proptest! {
    #[test]
    fn prop_balanced_documents_parse((source, callbacks) in balanced_document()) {
        let events = Parser::new(&source).parse_to_vec();
        prop_assert!(events.is_ok());
        // one callback per pair, two per block, plus the final end
        prop_assert_eq!(events.unwrap().len(), callbacks + 1);
    }

    #[test]
    fn prop_unclosed_documents_fail((source, _) in balanced_document()) {
        let source = format!("wrap {{\n{source}");
        let err = Parser::new(&source).parse_to_vec().unwrap_err();
        prop_assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
    }

    #[test]
    fn prop_extra_close_fails((source, _) in balanced_document()) {
        let source = format!("{source}}}\n");
        let err = Parser::new(&source).parse_to_vec().unwrap_err();
        prop_assert_eq!(err.kind, ParseErrorKind::UnexpectedClose);
    }
}
