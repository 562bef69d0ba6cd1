use super::*;

#[test]
fn plain_text_is_wrapped_in_one_paragraph() {
    assert_eq!(format_answer("plain text").as_str(), "<p>plain text</p>");
}

#[test]
fn empty_answer_is_an_empty_paragraph() {
    assert_eq!(format_answer("").as_str(), "<p></p>");
}

#[test]
fn heading_then_paragraph_with_bold() {
    assert_eq!(
        format_answer("## Heading\n\nBody **bold** text").as_str(),
        "<p><h2>Heading</h2></p><p>Body <strong>bold</strong> text</p>"
    );
}

#[test]
fn single_newline_becomes_line_break() {
    assert_eq!(
        format_answer("## Remedies\nSee **Section 498**.").as_str(),
        "<p><h2>Remedies</h2><br/>See <strong>Section 498</strong>.</p>"
    );
}

#[test]
fn heading_marker_only_counts_at_line_start() {
    assert_eq!(
        format_answer("see ## not a heading").as_str(),
        "<p>see ## not a heading</p>"
    );
    assert_eq!(format_answer("##missing space").as_str(), "<p>##missing space</p>");
}

#[test]
fn headings_may_contain_bold() {
    assert_eq!(
        format_answer("## **Penal** Code").as_str(),
        "<p><h2><strong>Penal</strong> Code</h2></p>"
    );
}

#[test]
fn unbalanced_bold_marker_is_left_literal() {
    assert_eq!(
        format_answer("**one** and **two").as_str(),
        "<p><strong>one</strong> and **two</p>"
    );
}

#[test]
fn bold_does_not_span_lines() {
    assert_eq!(
        format_answer("**start\nend**").as_str(),
        "<p>**start<br/>end**</p>"
    );
}

#[test]
fn triple_newline_is_paragraph_then_break() {
    assert_eq!(format_answer("a\n\n\nb").as_str(), "<p>a</p><p><br/>b</p>");
}

#[test]
fn backend_markup_is_escaped() {
    let markup = format_answer("<script>alert('x')</script> & **<b>bold</b>**");
    assert_eq!(
        markup.as_str(),
        "<p>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; \
         <strong>&lt;b&gt;bold&lt;/b&gt;</strong></p>"
    );
    assert!(!markup.as_str().contains("<script"));
}

#[test]
fn escaped_heading_text_stays_escaped() {
    assert_eq!(
        format_answer("## <img src=x onerror=\"y\">").as_str(),
        "<p><h2>&lt;img src=x onerror=&quot;y&quot;&gt;</h2></p>"
    );
}

#[test]
fn plain_text_underlines_headings_and_strips_bold() {
    assert_eq!(
        plain_text("## Remedies\nSee **Section 498**."),
        "Remedies\n--------\nSee Section 498."
    );
}

#[test]
fn safe_markup_displays_its_html() {
    let markup = format_answer("x");
    assert_eq!(markup.to_string(), "<p>x</p>");
    assert_eq!(markup.into_string(), "<p>x</p>");
}

#[test]
fn crlf_line_endings_format_like_lf() {
    assert_eq!(
        format_answer("## Remedies\r\n\r\nBody").as_str(),
        "<p><h2>Remedies</h2></p><p>Body</p>"
    );
    assert_eq!(
        format_answer("one\r\ntwo").as_str(),
        "<p>one<br/>two</p>"
    );
    assert_eq!(plain_text("## Remedies\r\nBody"), "Remedies\n--------\nBody");
}
