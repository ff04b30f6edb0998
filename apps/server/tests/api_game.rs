//! Game API tests.

mod common;

use axum::http::StatusCode;
use serde_json::Value;
use tokio::sync::broadcast::error::TryRecvError;

use common::fixtures;
use common::{matching_pairs, wait_for_resolution, TestContext};

/// Test a fresh server has no game running.
#[tokio::test]
async fn test_initial_state_not_started() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/api/game").await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["status"], "not_started");
    assert_eq!(body["cards"].as_array().unwrap().len(), 0);
    assert_eq!(body["moveCount"], 0);
}

/// Test difficulty table is exposed in order.
#[tokio::test]
async fn test_list_difficulties() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body: Value = server.get("/api/difficulties").await.json();
    let levels = body.as_array().unwrap();

    assert_eq!(levels.len(), 3);
    assert_eq!(levels[0]["difficulty"], "easy");
    assert_eq!(levels[0]["pairs"], 6);
    assert_eq!(levels[2]["difficulty"], "hard");
    assert_eq!(levels[2]["description"], "10 paires - Difficile");
}

/// Test starting a game deals the deck.
#[tokio::test]
async fn test_start_game() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/game/start")
        .json(&fixtures::start_request("medium"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["status"], "playing");
    assert_eq!(body["difficulty"], "medium");
    assert_eq!(body["totalPairs"], 8);
    assert_eq!(body["cards"].as_array().unwrap().len(), 16);
    assert_eq!(matching_pairs(&body).len(), 8);
}

/// Test an unknown difficulty is a bad request.
#[tokio::test]
async fn test_start_unknown_difficulty() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/game/start")
        .json(&fixtures::start_request("nightmare"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "bad_request");

    let state: Value = server.get("/api/game").await.json();
    assert_eq!(state["status"], "not_started");
}

/// Test a matching pair is locked in after the reveal delay.
#[tokio::test]
async fn test_select_matching_pair() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let view: Value = server
        .post("/api/game/start")
        .json(&fixtures::start_request("easy"))
        .await
        .json();
    let (term, definition) = matching_pairs(&view)[0];

    server
        .post("/api/game/select")
        .json(&fixtures::select_request(term))
        .await
        .assert_status_ok();
    let pending: Value = server
        .post("/api/game/select")
        .json(&fixtures::select_request(definition))
        .await
        .json();
    assert_eq!(pending["moveCount"], 0);

    wait_for_resolution().await;

    let body: Value = server.get("/api/game").await.json();
    assert_eq!(body["moveCount"], 1);
    assert_eq!(body["matchedPairCount"], 1);
    let matched = body["cards"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["matched"] == true)
        .count();
    assert_eq!(matched, 2);
}

/// Test clicks on unknown cards are absorbed.
#[tokio::test]
async fn test_select_unknown_card_is_noop() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let before: Value = server
        .post("/api/game/start")
        .json(&fixtures::start_request("easy"))
        .await
        .json();

    let response = server
        .post("/api/game/select")
        .json(&fixtures::select_request(4242))
        .await;
    response.assert_status_ok();
    let after: Value = response.json();
    assert_eq!(after["cards"], before["cards"]);
}

/// Test reset is refused while a game is running.
#[tokio::test]
async fn test_reset_while_playing_conflict() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server
        .post("/api/game/start")
        .json(&fixtures::start_request("easy"))
        .await
        .assert_status_ok();

    let response = server.post("/api/game/reset").await;
    response.assert_status(StatusCode::CONFLICT);

    let state: Value = server.get("/api/game").await.json();
    assert_eq!(state["status"], "playing");
}

/// Test no completion event is available before a game ends.
#[tokio::test]
async fn test_completion_not_found_before_end() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server
        .get("/api/game/completion")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// Test a full easy game reports completion once to both contexts.
#[tokio::test]
async fn test_full_game_completion() {
    let mut ctx = TestContext::new();
    let server = ctx.server();

    let view: Value = server
        .post("/api/game/start")
        .json(&fixtures::start_request("easy"))
        .await
        .json();

    for (term, definition) in matching_pairs(&view) {
        server
            .post("/api/game/select")
            .json(&fixtures::select_request(term))
            .await;
        server
            .post("/api/game/select")
            .json(&fixtures::select_request(definition))
            .await;
        wait_for_resolution().await;
    }

    let state: Value = server.get("/api/game").await.json();
    assert_eq!(state["status"], "completed");
    assert_eq!(state["moveCount"], 6);

    let response = server.get("/api/game/completion").await;
    response.assert_status_ok();
    let event: Value = response.json();
    assert_eq!(event["type"], "BLOCK_COMPLETION");
    assert_eq!(event["blockId"], "memory-iso13485");
    assert_eq!(event["completed"], true);
    assert_eq!(event["maxScore"], 1000);
    assert_eq!(event["data"]["moves"], 6);
    assert_eq!(event["data"]["difficulty"], "easy");
    let time_spent = event["timeSpent"].as_u64().unwrap();
    assert_eq!(event["score"].as_u64().unwrap(), 1000 - 60 - time_spent);

    let parent = ctx.parent_rx.try_recv().unwrap();
    assert_eq!(serde_json::to_value(&parent).unwrap(), event);
    assert!(matches!(ctx.parent_rx.try_recv(), Err(TryRecvError::Empty)));

    // Play again
    let response = server.post("/api/game/reset").await;
    response.assert_status_ok();
    let fresh: Value = response.json();
    assert_eq!(fresh["status"], "not_started");
    assert_eq!(fresh["cards"].as_array().unwrap().len(), 0);
    assert_eq!(fresh["moveCount"], 0);
    assert_eq!(fresh["difficulty"], "easy");
    assert!(matches!(ctx.parent_rx.try_recv(), Err(TryRecvError::Empty)));
}
