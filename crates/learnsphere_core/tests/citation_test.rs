use learnsphere_core::{Citation, GenerateResponse, citation_section, decorate_with_citations};

fn cite(title: Option<&str>, uri: &str) -> Citation {
    Citation::new(title.map(str::to_string), uri)
}

#[test]
fn text_without_citations_is_unchanged() {
    assert_eq!(decorate_with_citations("Plain answer.", &[]), "Plain answer.");
}

#[test]
fn duplicate_uris_keep_first_title() {
    let citations = vec![
        cite(Some("A"), "u1"),
        cite(Some("B"), "u1"),
        cite(None, "u2"),
    ];

    assert_eq!(
        decorate_with_citations("Answer", &citations),
        "Answer\n\n**Sources:**\n* [A](u1)\n* [u2](u2)"
    );
}

#[test]
fn each_uri_appears_once_in_link_targets() {
    let citations = vec![
        cite(Some("x"), "https://one.example"),
        cite(Some("y"), "https://two.example"),
        cite(Some("z"), "https://one.example"),
        cite(None, "https://two.example"),
    ];

    let section = citation_section(&citations);
    assert_eq!(section.matches("(https://one.example)").count(), 1);
    assert_eq!(section.matches("(https://two.example)").count(), 1);
    assert!(section.find("one.example").unwrap() < section.find("two.example").unwrap());
}

#[test]
fn blank_title_falls_back_to_uri() {
    let citations = vec![cite(Some("   "), "https://blank.example")];
    assert_eq!(
        citation_section(&citations),
        "\n\n**Sources:**\n* [https://blank.example](https://blank.example)"
    );
}

#[test]
fn empty_uri_is_dropped() {
    let citations = vec![cite(Some("nowhere"), "")];
    assert_eq!(decorate_with_citations("Text", &citations), "Text");
}

#[test]
fn response_decorated_text_matches_free_function() {
    let response = GenerateResponse {
        text: "Fleming, 1928.".to_string(),
        citations: vec![cite(Some("History"), "https://history.example")],
    };

    assert_eq!(
        response.decorated_text(),
        decorate_with_citations(&response.text, &response.citations)
    );
}
