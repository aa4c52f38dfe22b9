mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

async fn success_of(api: &common::Api, habit: &str) -> Result<bool> {
    let (status, body) = api.get(&format!("/habits/{}", habit)).await?;
    anyhow::ensure!(status == StatusCode::OK, "get habit failed: {} {}", status, body);
    Ok(body["data"]["success"].as_bool().unwrap_or_default())
}

#[tokio::test]
async fn success_follows_record_lifecycle() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let api = common::user(&server).await?;
    let habit = api.create_habit("Exercise", 5).await?;

    let record = api.create_record(&habit, "2024-01-01", 3).await?;
    assert!(!success_of(&api, &habit).await?);

    let path = format!("/daily-records/{}", record);
    let (status, _) = api.patch(&path, json!({ "amount_achieved": 6 })).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(success_of(&api, &habit).await?);

    let (status, _) = api.delete(&path).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(!success_of(&api, &habit).await?);
    Ok(())
}

#[tokio::test]
async fn exact_target_counts_as_success() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let api = common::user(&server).await?;
    let habit = api.create_habit("Exercise", 5).await?;

    api.create_record(&habit, "2024-01-01", 5).await?;
    assert!(success_of(&api, &habit).await?);
    Ok(())
}

#[tokio::test]
async fn one_successful_record_is_enough() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let api = common::user(&server).await?;
    let habit = api.create_habit("Exercise", 5).await?;

    let hit = api.create_record(&habit, "2024-01-01", 8).await?;
    let miss = api.create_record(&habit, "2024-01-02", 1).await?;
    assert!(success_of(&api, &habit).await?);

    api.delete(&format!("/daily-records/{}", miss)).await?;
    assert!(success_of(&api, &habit).await?);

    api.delete(&format!("/daily-records/{}", hit)).await?;
    assert!(!success_of(&api, &habit).await?);
    Ok(())
}

#[tokio::test]
async fn changing_target_recomputes_success() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let api = common::user(&server).await?;
    let habit = api.create_habit("Exercise", 5).await?;
    api.create_record(&habit, "2024-01-01", 4).await?;
    assert!(!success_of(&api, &habit).await?);

    let (status, body) = api.patch(&format!("/habits/{}", habit), json!({ "target": 4 })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["success"], true);

    api.patch(&format!("/habits/{}", habit), json!({ "target": 10 })).await?;
    assert!(!success_of(&api, &habit).await?);
    Ok(())
}

#[tokio::test]
async fn moving_a_record_updates_both_habits() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let api = common::user(&server).await?;
    let from = api.create_habit("Reading", 2).await?;
    let to = api.create_habit("Writing", 2).await?;
    let record = api.create_record(&from, "2024-01-01", 3).await?;
    assert!(success_of(&api, &from).await?);

    let (status, body) = api
        .patch(&format!("/daily-records/{}", record), json!({ "habit": to }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["habit"], to.as_str());

    assert!(!success_of(&api, &from).await?);
    assert!(success_of(&api, &to).await?);
    Ok(())
}

#[tokio::test]
async fn success_cannot_be_written_directly() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let api = common::user(&server).await?;
    let habit = api.create_habit("Exercise", 5).await?;

    let (status, body) = api
        .patch(&format!("/habits/{}", habit), json!({ "success": true }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["success"], false);
    Ok(())
}

#[tokio::test]
async fn success_flips_with_a_second_record() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let api = common::user(&server).await?;
    let habit = api.create_habit("Exercise", 5).await?;

    api.create_record(&habit, "2024-01-01", 3).await?;
    assert!(!success_of(&api, &habit).await?);

    let day2 = api.create_record(&habit, "2024-01-02", 6).await?;
    assert!(success_of(&api, &habit).await?);

    let (status, _) = api.delete(&format!("/daily-records/{}", day2)).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(!success_of(&api, &habit).await?);
    Ok(())
}
