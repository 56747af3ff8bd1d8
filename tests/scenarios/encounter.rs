//! Encounter scenario tests
//!
//! Tokens, HP arithmetic, conditions, initiative cycling, linked
//! character mirroring, and scene persistence through the HTTP API.

use crate::common::VttTest;

/// Boot a server with an open room, returning the harness
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

/// Add an unlinked token with HP tracking, returning its id
async fn add_hp_token(vtt: &VttTest, name: &str, current: i32, max: i32) -> String {
    let resp = vtt
        .post(
            "/room/table-one/token/add",
            &serde_json::json!({
                "name": name, "x": 50.0, "y": 50.0,
                "current_hp": current, "max_hp": max
            }),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = resp.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_token_add_move_remove() {
    let vtt = setup().await;

    let id = add_hp_token(&vtt, "orc", 10, 10).await;

    // Move clamps to the map bounds
    let resp = vtt
        .post(
            &format!("/room/table-one/token/{}/move", id),
            &serde_json::json!({ "x": 120.0, "y": -10.0 }),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["x"], 100.0);
    assert_eq!(body["y"], 0.0);

    let resp = vtt
        .post_empty(&format!("/room/table-one/token/{}/remove", id))
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    let resp = vtt
        .post_empty(&format!("/room/table-one/token/{}/remove", id))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_damage_heal_scenario() {
    let vtt = setup().await;

    // 8 current / 10 max, with 2 temp HP
    let id = add_hp_token(&vtt, "fighter", 8, 10).await;
    let resp = vtt
        .post(
            &format!("/room/table-one/token/{}/temp_hp", id),
            &serde_json::json!({ "value": 2 }),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Take 5 damage: temp absorbs 2, current drops to 5
    let resp = vtt
        .post(
            &format!("/room/table-one/token/{}/damage", id),
            &serde_json::json!({ "amount": 5 }),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["token"]["current_hp"], 5);
    assert_eq!(body["token"]["temp_hp"], 0);
    assert_eq!(body["outcome"]["absorbed"], 2);
    assert_eq!(body["outcome"]["taken"], 3);
    // Unlinked tokens report no sync state
    assert!(body.get("character_synced").is_none());

    // Heal 10: capped at max
    let resp = vtt
        .post(
            &format!("/room/table-one/token/{}/heal", id),
            &serde_json::json!({ "amount": 10 }),
        )
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["token"]["current_hp"], 10);
}

#[tokio::test]
async fn test_damage_floors_at_zero() {
    let vtt = setup().await;
    let id = add_hp_token(&vtt, "kobold", 3, 5).await;

    let resp = vtt
        .post(
            &format!("/room/table-one/token/{}/damage", id),
            &serde_json::json!({ "amount": 50 }),
        )
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["token"]["current_hp"], 0);
}

#[tokio::test]
async fn test_quick_adjust_clamps() {
    let vtt = setup().await;
    let id = add_hp_token(&vtt, "fighter", 9, 10).await;

    let resp = vtt
        .post(
            &format!("/room/table-one/token/{}/adjust", id),
            &serde_json::json!({ "delta": 5 }),
        )
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["token"]["current_hp"], 10);

    let resp = vtt
        .post(
            &format!("/room/table-one/token/{}/adjust", id),
            &serde_json::json!({ "delta": -99 }),
        )
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["token"]["current_hp"], 0);
}

#[tokio::test]
async fn test_linked_token_mirrors_hp() {
    let vtt = setup().await;
    let (owner_id, _) = vtt.register("alice").await.unwrap();

    // Level 1, d8, con 14 => 10 max HP
    let resp = vtt
        .post(
            "/character/create",
            &serde_json::json!({
                "owner_id": owner_id,
                "name": "Mirela",
                "abilities": {
                    "strength": 10, "dexterity": 16, "constitution": 14,
                    "intelligence": 10, "wisdom": 12, "charisma": 8
                },
                "hit_die": 8
            }),
        )
        .await
        .unwrap();
    let character: serde_json::Value = resp.json().await.unwrap();
    let character_id = character["id"].as_str().unwrap().to_string();

    // Linked token starts from the character's HP
    let resp = vtt
        .post(
            "/room/table-one/token/add",
            &serde_json::json!({
                "name": "Mirela", "x": 10.0, "y": 10.0,
                "character_id": character_id
            }),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let token: serde_json::Value = resp.json().await.unwrap();
    let token_id = token["id"].as_str().unwrap().to_string();
    assert_eq!(token["current_hp"], 10);

    // Damage mirrors to the character record
    let resp = vtt
        .post(
            &format!("/room/table-one/token/{}/damage", token_id),
            &serde_json::json!({ "amount": 3 }),
        )
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["token"]["current_hp"], 7);
    assert_eq!(body["character_synced"], true);

    let resp = vtt.get(&format!("/character/{}", character_id)).await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["current_hp"], 7);

    // Healing is capped by the character's max HP
    let resp = vtt
        .post(
            &format!("/room/table-one/token/{}/heal", token_id),
            &serde_json::json!({ "amount": 50 }),
        )
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["token"]["current_hp"], 10);
    assert_eq!(body["character_synced"], true);

    // Max HP writes are rejected for linked tokens
    let resp = vtt
        .post(
            &format!("/room/table-one/token/{}/max_hp", token_id),
            &serde_json::json!({ "value": 99 }),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_mirror_failure_is_reported() {
    let vtt = setup().await;
    let (owner_id, _) = vtt.register("alice").await.unwrap();

    let resp = vtt
        .post(
            "/character/create",
            &serde_json::json!({ "owner_id": owner_id, "name": "Doomed", "hit_die": 8 }),
        )
        .await
        .unwrap();
    let character: serde_json::Value = resp.json().await.unwrap();
    let character_id = character["id"].as_str().unwrap().to_string();

    let resp = vtt
        .post(
            "/room/table-one/token/add",
            &serde_json::json!({
                "name": "Doomed", "x": 10.0, "y": 10.0,
                "character_id": character_id
            }),
        )
        .await
        .unwrap();
    let token: serde_json::Value = resp.json().await.unwrap();
    let token_id = token["id"].as_str().unwrap().to_string();

    // Delete the character out from under the token
    let resp = vtt
        .post_empty(&format!("/character/{}/delete", character_id))
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    // The token-local change still applies; the failed mirror is visible
    let resp = vtt
        .post(
            &format!("/room/table-one/token/{}/damage", token_id),
            &serde_json::json!({ "amount": 2 }),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["character_synced"], false);
    assert!(body["token"]["current_hp"].as_i64().is_some());
}

#[tokio::test]
async fn test_condition_toggle() {
    let vtt = setup().await;
    let id = add_hp_token(&vtt, "fighter", 10, 10).await;

    let resp = vtt
        .post(
            &format!("/room/table-one/token/{}/condition", id),
            &serde_json::json!({ "condition_id": "poisoned" }),
        )
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["active"], true);
    assert_eq!(body["token"]["conditions"][0], "poisoned");

    // Toggling again removes it
    let resp = vtt
        .post(
            &format!("/room/table-one/token/{}/condition", id),
            &serde_json::json!({ "condition_id": "poisoned" }),
        )
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["active"], false);
    assert!(body["token"]["conditions"].as_array().unwrap().is_empty());

    // Unknown ids are rejected, not stored
    let resp = vtt
        .post(
            &format!("/room/table-one/token/{}/condition", id),
            &serde_json::json!({ "condition_id": "on-fire" }),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_initiative_cycle() {
    let vtt = setup().await;
    let fast = add_hp_token(&vtt, "rogue", 10, 10).await;
    let slow = add_hp_token(&vtt, "zombie", 10, 10).await;
    let _bystander = add_hp_token(&vtt, "barrel", 1, 1).await;

    for (id, value) in [(&fast, 21), (&slow, 4)] {
        let resp = vtt
            .post(
                &format!("/room/table-one/token/{}/initiative", id),
                &serde_json::json!({ "value": value }),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    // First advance: highest initiative, round 1 begins
    let resp = vtt.post_empty("/room/table-one/next_turn").await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["token_id"], fast.as_str());
    assert_eq!(body["round_complete"], false);
    assert_eq!(body["round"], 1);

    // Second advance: the slower token
    let resp = vtt.post_empty("/room/table-one/next_turn").await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["token_id"], slow.as_str());
    assert_eq!(body["round_complete"], false);

    // Third advance wraps: back to the top, round 2
    let resp = vtt.post_empty("/room/table-one/next_turn").await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["token_id"], fast.as_str());
    assert_eq!(body["round_complete"], true);
    assert_eq!(body["round"], 2);
}

#[tokio::test]
async fn test_removing_current_token_restarts_order() {
    let vtt = setup().await;
    let fast = add_hp_token(&vtt, "rogue", 10, 10).await;
    let slow = add_hp_token(&vtt, "zombie", 10, 10).await;

    for (id, value) in [(&fast, 21), (&slow, 4)] {
        vtt.post(
            &format!("/room/table-one/token/{}/initiative", id),
            &serde_json::json!({ "value": value }),
        )
        .await
        .unwrap();
    }

    // Start the encounter; the rogue is up
    let resp = vtt.post_empty("/room/table-one/next_turn").await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["token_id"], fast.as_str());

    // Remove the current-turn token
    vtt.post_empty(&format!("/room/table-one/token/{}/remove", fast))
        .await
        .unwrap();

    // The pointer was cleared: restart at the top of the remaining
    // order without completing a round
    let resp = vtt.post_empty("/room/table-one/next_turn").await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["token_id"], slow.as_str());
    assert_eq!(body["round_complete"], false);
    assert_eq!(body["round"], 1);
}

#[tokio::test]
async fn test_initiative_roll_and_clear() {
    let vtt = setup().await;
    let id = add_hp_token(&vtt, "rogue", 10, 10).await;

    // Rolled initiative for an unlinked token: plain 1d20
    let resp = vtt
        .post(
            &format!("/room/table-one/token/{}/initiative", id),
            &serde_json::json!({}),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    let rolled = body["initiative"].as_i64().unwrap();
    assert!((1..=20).contains(&rolled));

    // Ending the encounter unsets everything
    let resp = vtt
        .post_empty("/room/table-one/clear_initiative")
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["scene"]["round"], 0);
    assert!(body["scene"]["tokens"][0].get("initiative").is_none());

    // With no initiative-bearing tokens there is no encounter
    let resp = vtt.post_empty("/room/table-one/next_turn").await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["token_id"].is_null());
    assert_eq!(body["round"], 0);
}

#[tokio::test]
async fn test_save_and_reopen_room() {
    let vtt = setup().await;
    let id = add_hp_token(&vtt, "orc", 10, 10).await;

    // Save, close (dropping live state), reopen
    let resp = vtt.post_empty("/room/table-one/save").await.unwrap();
    assert_eq!(resp.status(), 204);

    let resp = vtt.post_empty("/room/table-one/close").await.unwrap();
    assert_eq!(resp.status(), 204);

    let resp = vtt.get("/room/table-one/state").await.unwrap();
    assert_eq!(resp.status(), 409);

    let resp = vtt.post_empty("/room/table-one/open").await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["scene"]["tokens"][0]["id"], id.as_str());
}

#[tokio::test]
async fn test_unsaved_changes_lost_on_close() {
    let vtt = setup().await;

    // Token added but never saved
    add_hp_token(&vtt, "ephemeral", 5, 5).await;

    vtt.post_empty("/room/table-one/close").await.unwrap();
    vtt.post_empty("/room/table-one/open").await.unwrap();

    let resp = vtt.get("/room/table-one/state").await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["scene"]["tokens"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_operations_on_unopened_room() {
    let vtt = VttTest::start().await.expect("Failed to start server");

    let resp = vtt.get("/room/nowhere/state").await.unwrap();
    assert_eq!(resp.status(), 409);

    let resp = vtt.post_empty("/room/nowhere/next_turn").await.unwrap();
    assert_eq!(resp.status(), 409);

    // Opening a room that was never created is a 404
    let resp = vtt.post_empty("/room/nowhere/open").await.unwrap();
    assert_eq!(resp.status(), 404);
}
