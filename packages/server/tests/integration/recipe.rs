use serde_json::json;

use crate::common::{StubRecipeSource, TestApp, routes};

mod user_recipes {
    use super::*;

    #[tokio::test]
    async fn created_recipe_can_be_read_back() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;

        let created = app
            .post_with_session(
                &routes::user_recipes(alice.id),
                &json!({
                    "title": "  Pancakes ",
                    "instructions": "Whisk and fry.",
                    "image": "",
                    "ingredients": [
                        {"name": "flour", "amount": "1 cup"},
                        {"name": "milk", "amount": "  "},
                        {"name": "egg"},
                    ],
                }),
                &alice.session,
            )
            .await;
        assert_eq!(created.status, 201, "{}", created.text);
        assert_eq!(created.body["title"], "Pancakes");
        assert_eq!(created.body["creator_id"], alice.id);
        assert!(created.body["image"].is_null());
        assert!(created.body["external_id"].is_null());

        let res = app.get_without_session(&routes::recipe(created.id())).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "Pancakes");
        assert_eq!(res.body["instructions"], "Whisk and fry.");
        let ingredients = res.body["ingredients"].as_array().unwrap();
        let names: Vec<&str> = ingredients
            .iter()
            .map(|i| i["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["flour", "milk", "egg"]);
        assert_eq!(ingredients[0]["amount"], "1 cup");
        assert!(ingredients[1]["amount"].is_null());
    }

    #[tokio::test]
    async fn list_returns_the_users_recipes_newest_first() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        let bob = app
            .create_authenticated_user("bob@example.com", "securepass")
            .await;
        let first = app.create_recipe(&alice, "First").await;
        let second = app.create_recipe(&alice, "Second").await;
        app.create_recipe(&bob, "Bob's").await;

        let res = app
            .get_with_session(&routes::user_recipes(alice.id), &alice.session)
            .await;

        assert_eq!(res.status, 200);
        let ids: Vec<i64> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, [second as i64, first as i64]);
        assert_eq!(res.body[0]["ingredients"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn title_is_required() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;

        let res = app
            .post_with_session(
                &routes::user_recipes(alice.id),
                &json!({"title": "   "}),
                &alice.session,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_create_recipes_for_someone_else() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        let bob = app
            .create_authenticated_user("bob@example.com", "securepass")
            .await;

        let res = app
            .post_with_session(
                &routes::user_recipes(bob.id),
                &json!({"title": "Sneaky"}),
                &alice.session,
            )
            .await;

        assert_eq!(res.status, 403);
    }

    #[tokio::test]
    async fn patch_updates_fields_and_replaces_ingredients() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        let id = app.create_recipe(&alice, "Bread").await;

        let res = app
            .patch_with_session(
                &routes::user_recipe(alice.id, id),
                &json!({
                    "title": "Sourdough",
                    "instructions": null,
                    "ingredients": [{"name": "starter", "amount": "100 g"}],
                }),
                &alice.session,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["title"], "Sourdough");
        assert!(res.body["instructions"].is_null());
        assert_eq!(res.body["ingredients"].as_array().unwrap().len(), 1);
        assert_eq!(res.body["ingredients"][0]["name"], "starter");

        let read = app.get_without_session(&routes::recipe(id)).await;
        assert_eq!(read.body["ingredients"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn patch_without_ingredients_keeps_them() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        let id = app.create_recipe(&alice, "Bread").await;

        let res = app
            .patch_with_session(
                &routes::user_recipe(alice.id, id),
                &json!({"image": "https://img.example.com/bread.jpg"}),
                &alice.session,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "Bread");
        assert_eq!(res.body["image"], "https://img.example.com/bread.jpg");
        assert_eq!(res.body["ingredients"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn cannot_patch_a_recipe_owned_by_someone_else() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        let bob = app
            .create_authenticated_user("bob@example.com", "securepass")
            .await;
        let bobs = app.create_recipe(&bob, "Bob's").await;

        // Alice addresses Bob's recipe through her own path.
        let res = app
            .patch_with_session(
                &routes::user_recipe(alice.id, bobs),
                &json!({"title": "Mine now"}),
                &alice.session,
            )
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn deleted_recipe_is_gone_with_its_reviews_and_favorites() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        let bob = app
            .create_authenticated_user("bob@example.com", "securepass")
            .await;
        let id = app.create_recipe(&alice, "Bread").await;
        app.create_review(&bob, id, 5).await;
        app.post_with_session(&routes::favorites(bob.id), &json!({"recipe_id": id}), &bob.session)
            .await;

        let res = app
            .delete_with_session(&routes::user_recipe(alice.id, id), &alice.session)
            .await;
        assert_eq!(res.status, 204);

        assert_eq!(app.get_without_session(&routes::recipe(id)).await.status, 404);
        let favorites = app
            .get_with_session(&routes::favorites(bob.id), &bob.session)
            .await;
        assert_eq!(favorites.body, json!([]));
        let reviews = app
            .get_with_session(&routes::user_reviews(bob.id), &bob.session)
            .await;
        assert_eq!(reviews.body, json!([]));

        let again = app
            .delete_with_session(&routes::user_recipe(alice.id, id), &alice.session)
            .await;
        assert_eq!(again.status, 404);
    }
}

mod browsing {
    use super::*;

    #[tokio::test]
    async fn list_is_public_and_searchable() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        app.create_recipe(&alice, "Lemon Tart").await;
        app.create_recipe(&alice, "Apple Pie").await;
        app.create_recipe(&alice, "100% Rye").await;

        let all = app.get_without_session(routes::RECIPES).await;
        assert_eq!(all.status, 200);
        assert_eq!(all.body["pagination"]["total"], 3);
        assert!(all.body["data"][0].get("ingredients").is_none());

        let found = app
            .get_without_session(&format!("{}?search=lemon", routes::RECIPES))
            .await;
        assert_eq!(found.body["pagination"]["total"], 1);
        assert_eq!(found.body["data"][0]["title"], "Lemon Tart");

        // `%` is matched literally.
        let literal = app
            .get_without_session(&format!("{}?search=%25", routes::RECIPES))
            .await;
        assert_eq!(literal.body["pagination"]["total"], 1);
        assert_eq!(literal.body["data"][0]["title"], "100% Rye");
    }

    #[tokio::test]
    async fn list_can_sort_by_title() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        app.create_recipe(&alice, "Banana Bread").await;
        app.create_recipe(&alice, "Apple Pie").await;
        app.create_recipe(&alice, "Cherry Clafoutis").await;

        let res = app
            .get_without_session(&format!("{}?sort_by=title&sort_order=asc", routes::RECIPES))
            .await;

        assert_eq!(res.status, 200);
        let titles: Vec<&str> = res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["Apple Pie", "Banana Bread", "Cherry Clafoutis"]);
    }

    #[tokio::test]
    async fn page_far_past_the_end_is_empty() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        app.create_recipe(&alice, "Lemon Tart").await;

        let res = app
            .get_without_session(&format!(
                "{}?page=9223372036854775807&per_page=100",
                routes::RECIPES
            ))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 1);
        assert!(res.body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_sort_column_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_session(&format!("{}?sort_by=rating", routes::RECIPES))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn missing_recipe_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_without_session(&routes::recipe(99999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn creator_can_delete_their_recipe() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        let id = app.create_recipe(&alice, "Bread").await;

        let res = app
            .delete_with_session(&routes::recipe(id), &alice.session)
            .await;

        assert_eq!(res.status, 204);
        assert_eq!(app.get_without_session(&routes::recipe(id)).await.status, 404);
    }

    #[tokio::test]
    async fn other_users_cannot_delete_it() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        let bob = app
            .create_authenticated_user("bob@example.com", "securepass")
            .await;
        let id = app.create_recipe(&alice, "Bread").await;

        let res = app.delete_with_session(&routes::recipe(id), &bob.session).await;

        assert_eq!(res.status, 403);
        assert_eq!(app.get_without_session(&routes::recipe(id)).await.status, 200);
    }

    #[tokio::test]
    async fn admin_can_delete_any_recipe() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@example.com", "adminpass").await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        let id = app.create_recipe(&alice, "Bread").await;

        let res = app
            .delete_with_session(&routes::recipe(id), &admin.session)
            .await;

        assert_eq!(res.status, 204);
    }

    #[tokio::test]
    async fn anonymous_delete_is_unauthorized() {
        let app = TestApp::spawn().await;

        let res = app.delete_without_session(&routes::recipe(1)).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "SESSION_MISSING");
    }
}

mod seeding {
    use super::*;

    #[tokio::test]
    async fn seeding_imports_complete_recipes_with_ingredients() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@example.com", "adminpass").await;

        let res = app
            .post_with_session(routes::SEED, &json!({"count": 4}), &admin.session)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["requested"], 4);
        assert_eq!(res.body["fetched"], 4);
        assert_eq!(res.body["created"], 3);
        assert_eq!(res.body["skipped_existing"], 0);
        assert_eq!(res.body["skipped_incomplete"], 1);

        let external_ids: Vec<i64> = res.body["recipes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["external_id"].as_i64().unwrap())
            .collect();
        assert_eq!(external_ids, [101, 102, 104]);

        let carbonara_id = res.body["recipes"][0]["id"].as_i64().unwrap() as i32;
        let carbonara = app.get_without_session(&routes::recipe(carbonara_id)).await;
        assert!(carbonara.body["creator_id"].is_null());
        assert_eq!(
            carbonara.body["instructions"],
            "Boil pasta. Mix eggs and cheese. Combine."
        );
        let amounts: Vec<&str> = carbonara.body["ingredients"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["amount"].as_str().unwrap())
            .collect();
        assert_eq!(amounts, ["200 g", "2 large eggs", "pecorino to taste"]);

        // Soup has no instructions; the summary stands in.
        let soup_id = res.body["recipes"][1]["id"].as_i64().unwrap() as i32;
        let soup = app.get_without_session(&routes::recipe(soup_id)).await;
        assert_eq!(soup.body["instructions"], "Simmer tomatoes with stock and blend.");
    }

    #[tokio::test]
    async fn seeding_twice_creates_nothing_new() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@example.com", "adminpass").await;

        let first = app
            .post_with_session(routes::SEED, &json!({"count": 4}), &admin.session)
            .await;
        assert_eq!(first.body["created"], 3);

        let second = app
            .post_with_session(routes::SEED, &json!({"count": 4}), &admin.session)
            .await;

        assert_eq!(second.status, 201);
        assert_eq!(second.body["created"], 0);
        assert_eq!(second.body["skipped_existing"], 3);
        assert_eq!(second.body["skipped_incomplete"], 1);
        assert_eq!(second.body["recipes"], json!([]));

        let list = app.get_without_session(routes::RECIPES).await;
        assert_eq!(list.body["pagination"]["total"], 3);
    }

    #[tokio::test]
    async fn regular_users_cannot_seed() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;

        let res = app
            .post_with_session(routes::SEED, &json!({"count": 2}), &alice.session)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn count_must_be_within_bounds() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@example.com", "adminpass").await;

        for count in [0, 101] {
            let res = app
                .post_with_session(routes::SEED, &json!({"count": count}), &admin.session)
                .await;
            assert_eq!(res.status, 400, "count {count}");
        }
    }

    #[tokio::test]
    async fn provider_failure_is_a_bad_gateway() {
        let app = TestApp::spawn_with_source(StubRecipeSource::failing()).await;
        let admin = app.create_admin("admin@example.com", "adminpass").await;

        let res = app
            .post_with_session(routes::SEED, &json!({"count": 2}), &admin.session)
            .await;

        assert_eq!(res.status, 502);
        assert_eq!(res.body["code"], "UPSTREAM_ERROR");
    }
}
