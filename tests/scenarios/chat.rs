//! Chat scenario tests
//!
//! Table talk and dice-roll messages against a live room.

use crate::common::VttTest;

async fn setup() -> VttTest {
    let vtt = VttTest::start().await.expect("Failed to start server");
    let (gm_id, _) = vtt.register("gm").await.unwrap();
    vtt.create_campaign("night-below", "Night Below", &gm_id)
        .await
        .unwrap();
    vtt.create_open_room("table-one", "night-below", "Table One")
        .await
        .unwrap();
    vtt
}

#[tokio::test]
async fn test_say_and_read_back() {
    let vtt = setup().await;

    let resp = vtt
        .post(
            "/room/table-one/chat",
            &serde_json::json!({ "author": "alice", "body": "roll for initiative" }),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let resp = vtt
        .post(
            "/room/table-one/chat",
            &serde_json::json!({ "author": "bob", "body": "oh no" }),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let resp = vtt.get("/room/table-one/chat").await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    let messages = body.as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["author"], "alice");
    assert_eq!(messages[0]["kind"], "say");
    assert_eq!(messages[1]["body"], "oh no");
}

#[tokio::test]
async fn test_dice_roll_in_chat() {
    let vtt = setup().await;

    let resp = vtt
        .post(
            "/room/table-one/roll",
            &serde_json::json!({ "author": "alice", "notation": "2d6+3" }),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = resp.json().await.unwrap();

    let total = body["total"].as_i64().unwrap();
    assert!((5..=15).contains(&total));
    assert_eq!(body["rolls"].as_array().unwrap().len(), 2);
    assert_eq!(body["message"]["kind"], "roll");
    assert!(body["message"]["body"]
        .as_str()
        .unwrap()
        .starts_with("2d6+3 = "));

    // The roll landed in the room log
    let resp = vtt.get("/room/table-one/chat").await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_notation_rejected() {
    let vtt = setup().await;

    let resp = vtt
        .post(
            "/room/table-one/roll",
            &serde_json::json!({ "author": "alice", "notation": "banana" }),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Nothing was appended
    let resp = vtt.get("/room/table-one/chat").await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_requires_open_room() {
    let vtt = VttTest::start().await.expect("Failed to start server");

    let resp = vtt
        .post(
            "/room/nowhere/chat",
            &serde_json::json!({ "author": "alice", "body": "hello?" }),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}
