use crate::helper::{seed_products, spawn_app};
use serde_json::Value;

#[tokio::test]
async fn products_are_publicly_readable() {
    let app = spawn_app().await;
    let product_ids = seed_products(&app.db_pool);

    let listing = app
        .api_client
        .get(&format!("{}/products", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(listing.status().as_u16(), 200);
    let body: Value = listing.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), product_ids.len());

    let single = app
        .api_client
        .get(&format!("{}/products/{}", &app.address, product_ids[0]))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(single.status().as_u16(), 200);
    let product: Value = single.json().await.unwrap();
    assert_eq!(product["product_name"], "Laptop");

    let missing = app
        .api_client
        .get(&format!("{}/products/99999", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(missing.status().as_u16(), 400);
    app.drop_database();
}

#[tokio::test]
async fn product_pagination_returns_five_per_page() {
    let app = spawn_app().await;
    let _ = seed_products(&app.db_pool);
    let _ = seed_products(&app.db_pool);

    let first_page = app
        .api_client
        .get(&format!("{}/products/paginate/1", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(first_page.status().as_u16(), 200);
    let body: Value = first_page.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 5);

    let third_page = app
        .api_client
        .get(&format!("{}/products/paginate/3", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(third_page.status().as_u16(), 200);
    let body: Value = third_page.json().await.unwrap();
    assert!(body.as_array().unwrap().is_empty());

    let bad_page = app
        .api_client
        .get(&format!("{}/products/paginate/0", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(bad_page.status().as_u16(), 400);
    app.drop_database();
}

#[tokio::test]
async fn product_creation_is_admin_only() {
    let app = spawn_app().await;
    let user_token = app
        .login(&app.test_user.email, &app.test_user.password)
        .await;
    let admin_token = app
        .login(&app.test_admin.email, &app.test_admin.password)
        .await;
    let body = serde_json::json!({
        "product_name": "Keyboard",
        "price": 79.5
    });

    let denied = app
        .api_client
        .post(&format!("{}/products", &app.address))
        .bearer_auth(&user_token)
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(denied.status().as_u16(), 401);

    let created = app
        .api_client
        .post(&format!("{}/products", &app.address))
        .bearer_auth(&admin_token)
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(created.status().as_u16(), 201);
    let created_body: Value = created.json().await.unwrap();
    assert_eq!(created_body["product_name"], "Keyboard");
    app.drop_database();
}

#[tokio::test]
async fn product_creation_rejects_empty_values() {
    let app = spawn_app().await;
    let admin_token = app
        .login(&app.test_admin.email, &app.test_admin.password)
        .await;

    for body in [
        serde_json::json!({ "product_name": " ", "price": 10.0 }),
        serde_json::json!({ "product_name": "Keyboard", "price": 0.0 }),
    ] {
        let response = app
            .api_client
            .post(&format!("{}/products", &app.address))
            .bearer_auth(&admin_token)
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(response.status().as_u16(), 400);
    }
    app.drop_database();
}

#[tokio::test]
async fn product_update_applies_price_and_keeps_name_when_absent() {
    let app = spawn_app().await;
    let admin_token = app
        .login(&app.test_admin.email, &app.test_admin.password)
        .await;
    let product_ids = seed_products(&app.db_pool);

    let response = app
        .api_client
        .put(&format!("{}/products/{}", &app.address, product_ids[0]))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({ "price": 42.5 }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["product_name"], "Laptop");
    assert_eq!(body["price"], 42.5);
    app.drop_database();
}

#[tokio::test]
async fn product_deletion_is_admin_only_and_removes_the_record() {
    let app = spawn_app().await;
    let user_token = app
        .login(&app.test_user.email, &app.test_user.password)
        .await;
    let admin_token = app
        .login(&app.test_admin.email, &app.test_admin.password)
        .await;
    let product_ids = seed_products(&app.db_pool);

    let denied = app
        .api_client
        .delete(&format!("{}/products/{}", &app.address, product_ids[0]))
        .bearer_auth(&user_token)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(denied.status().as_u16(), 401);

    let deleted = app
        .api_client
        .delete(&format!("{}/products/{}", &app.address, product_ids[0]))
        .bearer_auth(&admin_token)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(deleted.status().as_u16(), 200);

    let missing = app
        .api_client
        .get(&format!("{}/products/{}", &app.address, product_ids[0]))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(missing.status().as_u16(), 400);
    app.drop_database();
}
