use serde_json::json;

use crate::common::{TestApp, routes};

mod listing {
    use super::*;

    #[tokio::test]
    async fn admin_can_list_and_search_users() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@example.com", "adminpass").await;
        app.create_authenticated_user("alice@example.com", "securepass")
            .await;
        app.create_authenticated_user("bob@example.com", "securepass")
            .await;

        let all = app.get_with_session(routes::USERS, &admin.session).await;
        assert_eq!(all.status, 200);
        assert_eq!(all.body["pagination"]["total"], 3);
        assert_eq!(all.body["data"].as_array().unwrap().len(), 3);
        assert!(all.body["data"][0].get("password").is_none());

        let found = app
            .get_with_session(&format!("{}?search=ALI", routes::USERS), &admin.session)
            .await;
        assert_eq!(found.status, 200);
        assert_eq!(found.body["pagination"]["total"], 1);
        assert_eq!(found.body["data"][0]["email"], "alice@example.com");
    }

    #[tokio::test]
    async fn listing_is_paginated() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@example.com", "adminpass").await;
        for i in 0..3 {
            app.create_authenticated_user(&format!("user{i}@example.com"), "securepass")
                .await;
        }

        let res = app
            .get_with_session(
                &format!("{}?page=2&per_page=3", routes::USERS),
                &admin.session,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 4);
        assert_eq!(res.body["pagination"]["total_pages"], 2);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn page_far_past_the_end_is_empty() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@example.com", "adminpass").await;

        let res = app
            .get_with_session(
                &format!("{}?page=18446744073709551615", routes::USERS),
                &admin.session,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 1);
        assert!(res.body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn regular_users_cannot_list_users() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;

        let res = app.get_with_session(routes::USERS, &alice.session).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}

mod detail {
    use super::*;

    #[tokio::test]
    async fn user_can_read_their_own_detail() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        let recipe_id = app.create_recipe(&alice, "Focaccia").await;
        app.create_review(&alice, recipe_id, 4).await;

        let res = app
            .get_with_session(&routes::user(alice.id), &alice.session)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["email"], "alice@example.com");
        assert_eq!(res.body["recipes"][0]["id"], recipe_id);
        assert_eq!(res.body["reviews"][0]["rating"], 4);
        assert_eq!(res.body["reviews"][0]["recipe"]["title"], "Focaccia");
        assert_eq!(res.body["favorites"], json!([]));
    }

    #[tokio::test]
    async fn users_cannot_read_someone_else() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        let bob = app
            .create_authenticated_user("bob@example.com", "securepass")
            .await;

        let res = app
            .get_with_session(&routes::user(bob.id), &alice.session)
            .await;

        assert_eq!(res.status, 403);
    }

    #[tokio::test]
    async fn admin_gets_404_for_a_missing_user() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@example.com", "adminpass").await;

        let res = app
            .get_with_session(&routes::user(99999), &admin.session)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn user_can_rename_and_clear_their_name() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;

        let renamed = app
            .patch_with_session(
                &routes::user(alice.id),
                &json!({"name": "Alice"}),
                &alice.session,
            )
            .await;
        assert_eq!(renamed.status, 200);
        assert_eq!(renamed.body["name"], "Alice");

        let cleared = app
            .patch_with_session(&routes::user(alice.id), &json!({"name": null}), &alice.session)
            .await;
        assert_eq!(cleared.status, 200);
        assert!(cleared.body["name"].is_null());
    }

    #[tokio::test]
    async fn user_cannot_promote_themselves() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;

        let res = app
            .patch_with_session(
                &routes::user(alice.id),
                &json!({"role": "ADMIN"}),
                &alice.session,
            )
            .await;

        assert_eq!(res.status, 403);
    }

    #[tokio::test]
    async fn admin_can_promote_another_user_and_it_applies_immediately() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@example.com", "adminpass").await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;

        let res = app
            .patch_with_session(
                &routes::user(alice.id),
                &json!({"role": "admin"}),
                &admin.session,
            )
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["role"], "ADMIN");

        // Same session, new role.
        let list = app.get_with_session(routes::USERS, &alice.session).await;
        assert_eq!(list.status, 200);
    }

    #[tokio::test]
    async fn admin_cannot_change_their_own_role() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@example.com", "adminpass").await;

        let res = app
            .patch_with_session(
                &routes::user(admin.id),
                &json!({"role": "USER"}),
                &admin.session,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_roles_are_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@example.com", "adminpass").await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;

        let res = app
            .patch_with_session(
                &routes::user(alice.id),
                &json!({"role": "CHEF"}),
                &admin.session,
            )
            .await;

        assert_eq!(res.status, 400);
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn deleting_a_user_removes_their_recipes_favorites_and_reviews() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@example.com", "adminpass").await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        let bob = app
            .create_authenticated_user("bob@example.com", "securepass")
            .await;

        let alices_recipe = app.create_recipe(&alice, "Alice's Pie").await;
        let bobs_recipe = app.create_recipe(&bob, "Bob's Stew").await;
        app.create_review(&alice, bobs_recipe, 5).await;
        app.create_review(&bob, alices_recipe, 3).await;
        let fav = app
            .post_with_session(
                &routes::favorites(bob.id),
                &json!({"recipe_id": alices_recipe}),
                &bob.session,
            )
            .await;
        assert_eq!(fav.status, 201);

        let res = app
            .delete_with_session(&routes::user(alice.id), &admin.session)
            .await;
        assert_eq!(res.status, 204);

        let gone = app
            .get_with_session(&routes::user(alice.id), &admin.session)
            .await;
        assert_eq!(gone.status, 404);

        let recipe = app.get_without_session(&routes::recipe(alices_recipe)).await;
        assert_eq!(recipe.status, 404);

        let bobs = app.get_with_session(&routes::user(bob.id), &bob.session).await;
        assert_eq!(bobs.body["favorites"], json!([]));
        assert_eq!(bobs.body["reviews"], json!([]));

        let reviews = app
            .get_without_session(&routes::recipe_reviews(bobs_recipe))
            .await;
        assert_eq!(reviews.body["reviews"], json!([]));
        assert!(reviews.body["average_rating"].is_null());
    }

    #[tokio::test]
    async fn admin_cannot_delete_themselves() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@example.com", "adminpass").await;

        let res = app
            .delete_with_session(&routes::user(admin.id), &admin.session)
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn regular_users_cannot_delete_users() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;

        let res = app
            .delete_with_session(&routes::user(alice.id), &alice.session)
            .await;

        assert_eq!(res.status, 403);
    }

    #[tokio::test]
    async fn deleting_a_missing_user_is_not_found() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("admin@example.com", "adminpass").await;

        let res = app
            .delete_with_session(&routes::user(99999), &admin.session)
            .await;

        assert_eq!(res.status, 404);
    }
}
