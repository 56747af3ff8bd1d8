//! Campaign scenario tests
//!
//! Campaign creation, slug validation, membership, and room listings.

use crate::common::VttTest;

#[tokio::test]
async fn test_campaign_create_and_list() {
    let vtt = VttTest::start().await.expect("Failed to start server");
    let (owner_id, _) = vtt.register("gm").await.unwrap();

    vtt.create_campaign("night-below", "Night Below", &owner_id)
        .await
        .unwrap();

    let resp = vtt.get("/campaign/list").await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], "night-below");
}

#[tokio::test]
async fn test_campaign_invalid_slug() {
    let vtt = VttTest::start().await.expect("Failed to start server");
    let (owner_id, _) = vtt.register("gm").await.unwrap();

    let resp = vtt
        .post(
            "/campaign/create",
            &serde_json::json!({ "id": "Bad--Slug", "name": "Bad", "owner_id": owner_id }),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_campaign_duplicate() {
    let vtt = VttTest::start().await.expect("Failed to start server");
    let (owner_id, _) = vtt.register("gm").await.unwrap();

    vtt.create_campaign("night-below", "Night Below", &owner_id)
        .await
        .unwrap();

    let resp = vtt
        .post(
            "/campaign/create",
            &serde_json::json!({ "id": "night-below", "name": "Again", "owner_id": owner_id }),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn test_membership_flow() {
    let vtt = VttTest::start().await.expect("Failed to start server");
    let (gm_id, _) = vtt.register("gm").await.unwrap();
    let (player_id, _) = vtt.register("player1").await.unwrap();

    vtt.create_campaign("night-below", "Night Below", &gm_id)
        .await
        .unwrap();

    // Owner is a gm member from creation
    let resp = vtt.get("/campaign/night-below").await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["members"].as_array().unwrap().len(), 1);
    assert_eq!(body["members"][0]["role"], "gm");

    // Player joins
    let resp = vtt
        .post(
            "/campaign/night-below/join",
            &serde_json::json!({ "account_id": player_id }),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    let resp = vtt.get("/campaign/night-below").await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["members"].as_array().unwrap().len(), 2);

    // Player leaves
    let resp = vtt
        .post(
            "/campaign/night-below/leave",
            &serde_json::json!({ "account_id": player_id }),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    // Leaving again is a 404
    let resp = vtt
        .post(
            "/campaign/night-below/leave",
            &serde_json::json!({ "account_id": player_id }),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_join_missing_campaign() {
    let vtt = VttTest::start().await.expect("Failed to start server");
    let (player_id, _) = vtt.register("player1").await.unwrap();

    let resp = vtt
        .post(
            "/campaign/nowhere/join",
            &serde_json::json!({ "account_id": player_id }),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_room_listing() {
    let vtt = VttTest::start().await.expect("Failed to start server");
    let (gm_id, _) = vtt.register("gm").await.unwrap();
    vtt.create_campaign("night-below", "Night Below", &gm_id)
        .await
        .unwrap();

    vtt.post(
        "/room/create",
        &serde_json::json!({ "id": "table-one", "campaign_id": "night-below", "name": "Table One" }),
    )
    .await
    .unwrap();
    vtt.post(
        "/room/create",
        &serde_json::json!({ "id": "table-two", "campaign_id": "night-below", "name": "Table Two" }),
    )
    .await
    .unwrap();

    let resp = vtt.get("/campaign/night-below/rooms").await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    let rooms = body.as_array().unwrap();
    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0]["id"], "table-one");
}
