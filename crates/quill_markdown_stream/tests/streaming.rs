use futures::stream;
use pretty_assertions::assert_eq;
use quill_markdown_stream::{
    InsertMode, Node, NodeDocument, RichDocument, StreamEvent, StreamSession, StreamStatus, chunk_text,
    decode_events, drive,
};
use quill_test_kit::{fixture, json_fixture};

fn code_blocks(nodes: &[Node]) -> Vec<&str> {
    nodes
        .iter()
        .filter_map(|node| match node {
            Node::CodeBlock { code, .. } => Some(code.as_str()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_chunk_size_does_not_change_the_result() {
    let fixture = fixture!("src/fixtures/answer.md").await;

    let mut whole = StreamSession::new(NodeDocument::new(), InsertMode::ReplaceAll);
    whole.process_chunk(&fixture).unwrap();
    whole.flush().unwrap();
    let expected = whole.document().to_html();

    for size in [1, 3, 7, 64] {
        let mut session = StreamSession::new(NodeDocument::new(), InsertMode::ReplaceAll);
        for chunk in chunk_text(&fixture, size) {
            session.process_chunk(&chunk).unwrap();
        }
        session.flush().unwrap();

        let actual = session.document().to_html();
        assert_eq!(actual, expected, "chunk size {size}");
        assert_eq!(session.cursor(), session.document().current_size());
    }
}

#[tokio::test]
async fn test_code_block_arrives_whole() {
    let fixture = fixture!("src/fixtures/answer.md").await;
    let mut session = StreamSession::new(NodeDocument::new(), InsertMode::ReplaceAll);

    for chunk in chunk_text(&fixture, 5) {
        session.process_chunk(&chunk).unwrap();
    }
    session.flush().unwrap();

    let actual = code_blocks(session.document().nodes());
    let expected = vec![
        "fn main() {\n\n    println!(\"blank lines inside code stay inside code\");\n}",
    ];
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_drive_sse_transcript() {
    let fixture = fixture!("src/fixtures/answer.sse").await;
    let pieces = stream::iter(chunk_text(&fixture, 11));
    let mut session = StreamSession::new(NodeDocument::new(), InsertMode::ReplaceAll);

    let actual = drive(&mut session, decode_events(pieces)).await.unwrap();

    assert_eq!(actual, StreamStatus::Completed);
    let expected = concat!(
        "<h2>Streaming answer</h2>",
        "<p>Markdown arrives in small pieces.</p>",
        "<pre><code class=\"language-python\">print(&#39;a&#39;)\n\n\nprint(&#39;b&#39;)</code></pre>",
        "<p>Done.</p>",
    );
    assert_eq!(session.document().to_html(), expected);
}

#[tokio::test]
async fn test_append_mode_keeps_existing_document() {
    let existing = NodeDocument::with_nodes(vec![Node::HorizontalRule]);
    let mut session = StreamSession::new(existing, InsertMode::Append);
    let events = stream::iter(vec![StreamEvent::chunk("Appended."), StreamEvent::Done]);

    drive(&mut session, events).await.unwrap();

    assert_eq!(session.document().to_html(), "<hr><p>Appended.</p>");
    assert_eq!(session.insertions()[0].position, 1);
}

#[tokio::test]
async fn test_error_event_keeps_received_content() {
    let events: Vec<StreamEvent> = json_fixture!("src/fixtures/events.json").await;
    let mut session = StreamSession::new(NodeDocument::new(), InsertMode::ReplaceAll);

    let actual = drive(&mut session, stream::iter(events)).await.unwrap();

    assert_eq!(actual, StreamStatus::Errored);
    assert_eq!(session.error(), Some("connection reset"));
    let expected = concat!(
        "<p>Intro:</p>",
        "<pre><code class=\"language-sh\">cargo run</code></pre>",
        "<p>A closing sentence that is long enough to be cut at a sentence end once the buffer grows.</p>",
        "<p>It keeps going well past the threshold of one hundred and fifty characters</p>",
    );
    assert_eq!(session.document().to_html(), expected);
}
