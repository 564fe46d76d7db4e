use std::time::Duration;

use futures::executor::block_on;
use sugi_api::{Backend, EssayForm, ANSWER_COUNT};
use sugi_client::{DisplayEngine, Viewport};
use sugi_mock_server::MockServer;

fn form(answers: &[&str]) -> EssayForm {
    let mut all = [""; ANSWER_COUNT].map(String::from);
    for (i, a) in answers.iter().enumerate() {
        all[i] = a.to_string();
    }
    EssayForm {
        nickname: None,
        answers: all,
    }
}

fn seeded_server() -> MockServer {
    let server = MockServer::new();
    let long = "word ".repeat(500);
    for essay in [
        form(&["short"]),
        form(&[&long, "and a second answer"]),
        form(&["one", "two", "three"]),
    ] {
        block_on(server.create_essay(essay)).unwrap();
    }
    server
}

#[test]
fn slideshow_walks_every_page_and_wraps() {
    let server = seeded_server();
    let essays = block_on(server.list_essays(None)).unwrap();
    let mut engine = DisplayEngine::from_essays(essays.iter(), Viewport::Standard);

    let total: usize = engine
        .essays()
        .iter()
        .map(|e| if e.should_split() { 2 } else { 1 })
        .sum();
    // exactly one of the seeded essays is long enough to split
    assert_eq!(total, 4);

    let start = engine.current();
    for _ in 0..total {
        assert!(engine.current_duration().unwrap() >= Duration::from_secs(10));
        engine.advance().expect("idle engine refused to advance");
        engine.commit().unwrap();
    }
    assert_eq!(engine.current(), start);
}

#[test]
fn compact_viewport_walks_every_answer() {
    let server = seeded_server();
    let essays = block_on(server.list_essays(None)).unwrap();
    let mut engine = DisplayEngine::from_essays(essays.iter(), Viewport::Compact);

    let total: usize = engine.essays().iter().map(|e| e.questions.len()).sum();
    assert_eq!(total, 6);

    let start = engine.current();
    for _ in 0..total {
        engine.advance().expect("idle engine refused to advance");
        engine.commit().unwrap();
    }
    assert_eq!(engine.current(), start);

    // and the whole loop again, backwards
    for _ in 0..total {
        engine.retreat().expect("idle engine refused to retreat");
        engine.commit().unwrap();
    }
    assert_eq!(engine.current(), start);
}
