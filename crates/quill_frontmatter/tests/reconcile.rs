use pretty_assertions::assert_eq;
use quill_domain::Document;
use quill_frontmatter::{DocumentExt, Metadata, combine, merge, parse, split};
use quill_test_kit::fixture;

#[tokio::test]
async fn test_saving_unedited_document_is_stable() {
    let fixture = fixture!("src/fixtures/post.md").await;

    let (document, metadata) = Document::from_content("posts/streaming.md", None, &fixture);
    let first = document.to_content(&metadata);
    let (document, metadata) = Document::from_content("posts/streaming.md", None, &first);
    let second = document.to_content(&metadata);

    assert_eq!(second, first);
}

#[tokio::test]
async fn test_edit_preserves_everything_not_edited() {
    let fixture = fixture!("src/fixtures/post.md").await;
    let (document, metadata) = Document::from_content("posts/streaming.md", None, &fixture);

    let edited = metadata.title("Streaming Markdown Into Rich Text").date("2024-02-01");
    let saved = document.to_content(&edited);

    let actual = split(&saved);
    insta::assert_snapshot!(actual.frontmatter.unwrap_or_default(), @r#"
    title: "Streaming Markdown Into Rich Text"
    id: 42
    slug: streaming-markdown
    description: How partial markdown becomes rich text
    date: 2024-02-01T14:30:00Z
    canonical_url: https://example.com/streaming-markdown
    reading_time: 6
    image: /images/streaming.png
    tags: [Rust, Editors]
    faqs:
      - question: Are code blocks split?
        answer: Never.
    draft: false
    layout:
      template: post
      sidebar: true
    head:
      meta:
        - name: author
          content: Quill Team
        - property: twitter:title
          content: Streaming Markdown Into Rich Text
        - property: twitter:image
          content: /images/streaming.png
        - property: twitter:description
          content: How partial markdown becomes rich text
        - property: keywords
          content: rust, editors
    "#);
    assert_eq!(actual.body, "Markdown arrives in chunks.\n\n```rust\nfn main() {}\n```\n");
}

#[tokio::test]
async fn test_variant_keys_and_string_types_survive() {
    let fixture = fixture!("src/fixtures/variants.md").await;
    let (document, metadata) = Document::from_content("posts/variants.md", None, &fixture);

    let edited = metadata
        .canonical_url("https://example.com/b")
        .reading_time("4")
        .hero_image("/b.png");
    let actual = document.to_content(&edited);

    let expected = "---\ntitle: Variants\ncanonicalUrl: https://example.com/b\nreadingTime: \"4\"\nheroImage: /b.png\n---\n\nBody\n";
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_malformed_frontmatter_regenerates_on_save() {
    let fixture = fixture!("src/fixtures/malformed.md").await;
    let (document, metadata) = Document::from_content("posts/malformed.md", None, &fixture);

    assert_eq!(metadata, Metadata::default());

    let actual = document.to_content(&metadata.title("Recovered"));

    let expected = "---\ntitle: Recovered\ndraft: false\nhead:\n  meta:\n    - property: twitter:title\n      content: Recovered\n---\n\nBody survives.\n";
    assert_eq!(actual, expected);
}

#[test]
fn test_flow_tags_scenario_changes_only_title() {
    let fixture = "---\ntitle: Old\ntags: [a, b]\n---\n\nBody.";
    let parsed = parse(fixture);

    let edited = parsed.metadata.title("New").with_tags(["a", "b", "c"]);
    let actual = combine(&edited, &parsed.body, &parsed.raw_frontmatter);

    assert_eq!(actual, "---\ntitle: New\ntags: [a, b, c]\n---\n\nBody.");
}

#[test]
fn test_unknown_field_survives_every_edit() {
    let fixture = "id: 42\ntitle: Old\ndescription: Text";
    let edits = [
        Metadata::default(),
        Metadata::default().title("New"),
        Metadata::default().with_tags(["x"]).draft(true),
        Metadata::default().date("2024-01-15").slug("s"),
    ];

    for edit in edits {
        let actual = merge(fixture, &edit);
        assert!(actual.starts_with("id: 42"), "lost id in {actual:?}");
    }
}

#[test]
fn test_tag_normalization_from_both_forms() {
    let list = parse("---\ntags: [\"Foo\", \" bar \", \"BAZ\"]\n---\n").metadata.tags;
    let text = parse("---\ntags: \"Foo, bar,BAZ\"\n---\n").metadata.tags;

    let expected = vec!["foo", "bar", "baz"];
    assert_eq!(list, expected);
    assert_eq!(text, expected);
}

#[test]
fn test_tagged_values_survive_edits() {
    let fixture = "id: 42\nlayout: post\nextra: !custom value\ntitle: !plain Old";

    let actual = merge(fixture, &Metadata::default().title("Old").slug("new"));

    let expected = "id: 42\nlayout: post\nextra: !custom value\ntitle: !plain Old\nslug: new";
    assert_eq!(actual, expected);
}

#[test]
fn test_tagged_values_kept_when_title_changes() {
    let fixture = "id: 42\nlayout: post\nextra: !custom value\ntitle: Old";

    let actual = merge(fixture, &Metadata::default().title("New"));

    let expected = "id: 42\nlayout: post\nextra: !custom value\ntitle: New";
    assert_eq!(actual, expected);
}

#[test]
fn test_folded_description_round_trips() {
    let fixture = "---\ntitle: Hello\ndescription: >\n  A long folded\n  description\n---\n\nBody.";
    let parsed = parse(fixture);

    let actual = combine(&parsed.metadata, &parsed.body, &parsed.raw_frontmatter);

    assert_eq!(parsed.metadata.description, "A long folded description");
    assert_eq!(actual, fixture);
}
