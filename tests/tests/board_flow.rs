use futures::executor::block_on;
use sugi_api::{Backend, EssayForm, EssayId, NewComment, ANSWER_COUNT};
use sugi_client::{BoardState, MemoryStore};
use sugi_mock_server::MockServer;

fn form(first_answer: &str) -> EssayForm {
    let mut answers = [""; ANSWER_COUNT].map(String::from);
    answers[0] = first_answer.to_string();
    EssayForm {
        nickname: None,
        answers,
    }
}

fn seed(server: &MockServer, n: usize) -> Vec<EssayId> {
    (0..n)
        .map(|i| {
            block_on(server.create_essay(form(&format!("answer {i}"))))
                .unwrap()
                .id
        })
        .collect()
}

#[test]
fn board_survives_a_partially_failed_bulk_delete() {
    let server = MockServer::new();
    let ids = seed(&server, 3);

    let mut board = BoardState::load(MemoryStore::new());
    board.reconcile(block_on(server.list_essays(None)).unwrap());
    assert_eq!(board.essays().len(), 3);

    server.test_fail_deletes_of(ids[1]);
    let res = block_on(board.request_bulk_delete(&server, &ids));
    assert!(res.is_err());
    let visible: Vec<_> = board.essays().iter().map(|e| e.id).collect();
    assert_eq!(visible, vec![ids[1]]);

    // refetch: only the failed essay is still server-side
    board.reconcile(block_on(server.list_essays(None)).unwrap());
    let visible: Vec<_> = board.essays().iter().map(|e| e.id).collect();
    assert_eq!(visible, vec![ids[1]]);

    // heal and retry; everything converges
    server.test_heal_deletes();
    block_on(board.request_bulk_delete(&server, &[ids[1]])).unwrap();
    board.reconcile(block_on(server.list_essays(None)).unwrap());
    assert!(board.essays().is_empty());
    assert_eq!(server.test_num_essays(), 0);
}

#[test]
fn deleting_twice_is_harmless() {
    let server = MockServer::new();
    let ids = seed(&server, 1);

    let mut board = BoardState::load(MemoryStore::new());
    board.reconcile(block_on(server.list_essays(None)).unwrap());

    block_on(board.request_delete(&server, ids[0])).unwrap();
    block_on(board.request_delete(&server, ids[0])).unwrap();
    assert!(board.essays().is_empty());
    assert_eq!(server.test_num_essays(), 0);
}

#[test]
fn likes_never_go_below_zero() {
    let server = MockServer::new();
    let id = seed(&server, 1)[0];

    assert_eq!(block_on(server.unlike_essay(id)).unwrap(), 0);
    assert_eq!(block_on(server.like_essay(id)).unwrap(), 1);
    assert_eq!(block_on(server.like_essay(id)).unwrap(), 2);
    assert_eq!(block_on(server.unlike_essay(id)).unwrap(), 1);
    assert_eq!(block_on(server.unlike_essay(id)).unwrap(), 0);
    assert_eq!(block_on(server.unlike_essay(id)).unwrap(), 0);
}

#[test]
fn listing_annotates_comment_counts() {
    let server = MockServer::new();
    let ids = seed(&server, 2);

    for content in ["first!", "second!"] {
        block_on(server.create_comment(
            ids[0],
            NewComment {
                nickname: None,
                content: content.to_string(),
            },
        ))
        .unwrap();
    }

    let essays = block_on(server.list_essays(None)).unwrap();
    let counts: Vec<_> = essays
        .iter()
        .map(|e| (e.id, e.comments_count))
        .collect();
    assert!(counts.contains(&(ids[0], 2)));
    assert!(counts.contains(&(ids[1], 0)));
}
