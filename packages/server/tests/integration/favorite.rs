use recipe_server::entity::saved_recipe;
use recipe_server::error::AppError;
use recipe_server::utils::recipe::recipe_reference_error;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;

use crate::common::{StubRecipeSource, TestApp, routes};

#[tokio::test]
async fn saved_recipe_appears_in_favorites() {
    let app = TestApp::spawn().await;
    let alice = app
        .create_authenticated_user("alice@example.com", "securepass")
        .await;
    let id = app.create_recipe(&alice, "Bread").await;

    let res = app
        .post_with_session(&routes::favorites(alice.id), &json!({"recipe_id": id}), &alice.session)
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["recipe"]["id"], id);
    assert!(res.body["saved_at"].is_string());

    let list = app
        .get_with_session(&routes::favorites(alice.id), &alice.session)
        .await;
    assert_eq!(list.status, 200);
    assert_eq!(list.body.as_array().unwrap().len(), 1);
    assert_eq!(list.body[0]["recipe"]["title"], "Bread");
}

#[tokio::test]
async fn saving_the_same_recipe_twice_conflicts() {
    let app = TestApp::spawn().await;
    let alice = app
        .create_authenticated_user("alice@example.com", "securepass")
        .await;
    let id = app.create_recipe(&alice, "Bread").await;
    let path = routes::favorites(alice.id);

    let first = app
        .post_with_session(&path, &json!({"recipe_id": id}), &alice.session)
        .await;
    assert_eq!(first.status, 201);

    let second = app
        .post_with_session(&path, &json!({"recipe_id": id}), &alice.session)
        .await;
    assert_eq!(second.status, 409);
    assert_eq!(second.body["code"], "CONFLICT");
}

#[tokio::test]
async fn saving_a_missing_recipe_is_not_found() {
    let app = TestApp::spawn().await;
    let alice = app
        .create_authenticated_user("alice@example.com", "securepass")
        .await;

    let res = app
        .post_with_session(
            &routes::favorites(alice.id),
            &json!({"recipe_id": 99999}),
            &alice.session,
        )
        .await;

    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn exactly_one_target_is_required() {
    let app = TestApp::spawn().await;
    let alice = app
        .create_authenticated_user("alice@example.com", "securepass")
        .await;
    let path = routes::favorites(alice.id);

    let neither = app.post_with_session(&path, &json!({}), &alice.session).await;
    assert_eq!(neither.status, 400);

    let both = app
        .post_with_session(
            &path,
            &json!({"recipe_id": 1, "external_id": 101}),
            &alice.session,
        )
        .await;
    assert_eq!(both.status, 400);
}

#[tokio::test]
async fn saving_an_external_recipe_imports_it_once() {
    let app = TestApp::spawn().await;
    let alice = app
        .create_authenticated_user("alice@example.com", "securepass")
        .await;
    let bob = app
        .create_authenticated_user("bob@example.com", "securepass")
        .await;

    let by_alice = app
        .post_with_session(
            &routes::favorites(alice.id),
            &json!({"external_id": 104}),
            &alice.session,
        )
        .await;
    assert_eq!(by_alice.status, 201, "{}", by_alice.text);
    assert_eq!(by_alice.body["recipe"]["external_id"], 104);
    assert_eq!(by_alice.body["recipe"]["title"], "Pad Thai");

    let by_bob = app
        .post_with_session(
            &routes::favorites(bob.id),
            &json!({"external_id": 104}),
            &bob.session,
        )
        .await;
    assert_eq!(by_bob.status, 201);
    assert_eq!(by_bob.body["recipe"]["id"], by_alice.body["recipe"]["id"]);

    let list = app.get_without_session(routes::RECIPES).await;
    assert_eq!(list.body["pagination"]["total"], 1);

    let imported = app
        .get_without_session(&routes::recipe(by_alice.body["recipe"]["id"].as_i64().unwrap() as i32))
        .await;
    assert_eq!(imported.body["ingredients"][0]["amount"], "250 g");
}

#[tokio::test]
async fn saving_an_unknown_external_recipe_is_not_found() {
    let app = TestApp::spawn().await;
    let alice = app
        .create_authenticated_user("alice@example.com", "securepass")
        .await;

    let res = app
        .post_with_session(
            &routes::favorites(alice.id),
            &json!({"external_id": 424242}),
            &alice.session,
        )
        .await;

    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn provider_failure_while_importing_is_a_bad_gateway() {
    let app = TestApp::spawn_with_source(StubRecipeSource::failing()).await;
    let alice = app
        .create_authenticated_user("alice@example.com", "securepass")
        .await;

    let res = app
        .post_with_session(
            &routes::favorites(alice.id),
            &json!({"external_id": 101}),
            &alice.session,
        )
        .await;

    assert_eq!(res.status, 502);
}

#[tokio::test]
async fn removed_favorite_is_gone_but_the_recipe_stays() {
    let app = TestApp::spawn().await;
    let alice = app
        .create_authenticated_user("alice@example.com", "securepass")
        .await;
    let id = app.create_recipe(&alice, "Bread").await;
    app.post_with_session(&routes::favorites(alice.id), &json!({"recipe_id": id}), &alice.session)
        .await;

    let res = app
        .delete_with_session(&routes::favorite(alice.id, id), &alice.session)
        .await;
    assert_eq!(res.status, 204);

    let list = app
        .get_with_session(&routes::favorites(alice.id), &alice.session)
        .await;
    assert_eq!(list.body, json!([]));
    assert_eq!(app.get_without_session(&routes::recipe(id)).await.status, 200);

    let again = app
        .delete_with_session(&routes::favorite(alice.id, id), &alice.session)
        .await;
    assert_eq!(again.status, 404);
}

#[tokio::test]
async fn cannot_touch_someone_elses_favorites() {
    let app = TestApp::spawn().await;
    let alice = app
        .create_authenticated_user("alice@example.com", "securepass")
        .await;
    let bob = app
        .create_authenticated_user("bob@example.com", "securepass")
        .await;

    let read = app
        .get_with_session(&routes::favorites(bob.id), &alice.session)
        .await;
    assert_eq!(read.status, 403);

    let write = app
        .post_with_session(&routes::favorites(bob.id), &json!({"recipe_id": 1}), &alice.session)
        .await;
    assert_eq!(write.status, 403);
}

#[tokio::test]
async fn favorite_of_a_vanished_recipe_maps_to_not_found() {
    let app = TestApp::spawn().await;
    let alice = app
        .create_authenticated_user("alice@example.com", "securepass")
        .await;

    let err = saved_recipe::ActiveModel {
        user_id: Set(alice.id),
        recipe_id: Set(424242),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(&app.db)
    .await
    .unwrap_err();

    assert!(matches!(
        recipe_reference_error(err),
        AppError::NotFound(msg) if msg == "Recipe not found"
    ));
}
