use std::sync::Arc;

use futures::executor::block_on;

use super::*;
use crate::net::testing::{ScriptedTransport, ok};
use crate::net::transport::Body;

fn client(transport: &Arc<ScriptedTransport>) -> ApiClient {
    ApiClient::new("https://api.example.org", transport.clone()).with_token_source(|| Some("tok".to_owned()))
}

#[test]
fn item_path_encodes_ids() {
    assert_eq!(item_path::<Category>("c-1"), "/categories/c-1");
    assert_eq!(item_path::<Location>("a/b"), "/locations/a%2Fb");
}

#[test]
fn enrollment_paths() {
    assert_eq!(enroll_path("a-1"), "/activities/a-1/enroll");
    assert_eq!(activity_enrollments_path("a-1"), "/activities/a-1/enrollments");
}

#[test]
fn list_categories_decodes_rows() {
    let transport = ScriptedTransport::replying(vec![ok(200, r#"[{"_id":"c-1","name":"Hikes"},{"id":2,"name":"Camps"}]"#)]);
    let rows: Vec<Category> = block_on(list(&client(&transport))).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].id, "2");
    assert_eq!(transport.requests()[0].url, "https://api.example.org/categories");
}

#[test]
fn create_location_posts_draft() {
    let transport = ScriptedTransport::replying(vec![ok(201, r#"{"id":"l-1","name":"Ken","city":"Haifa"}"#)]);
    let draft = serde_json::json!({ "name": "Ken", "city": "Haifa" });
    let row: Location = block_on(create(&client(&transport), &draft)).unwrap();
    assert_eq!(row.city.as_deref(), Some("Haifa"));

    let req = &transport.requests()[0];
    assert_eq!(req.method, Method::Post);
    assert_eq!(req.url, "https://api.example.org/locations");
    assert_eq!(req.body, Some(Body::Json(draft.to_string())));
}

#[test]
fn update_and_remove_address_single_items() {
    let transport = ScriptedTransport::replying(vec![ok(200, r#"{"id":"n-1","title":"Updated"}"#), ok(204, "")]);
    let api = client(&transport);
    let item: NewsItem = block_on(update(&api, "n-1", &serde_json::json!({ "title": "Updated" }))).unwrap();
    assert_eq!(item.title, "Updated");
    block_on(remove::<NewsItem>(&api, "n-1")).unwrap();

    let reqs = transport.requests();
    assert_eq!((reqs[0].method, reqs[0].url.as_str()), (Method::Put, "https://api.example.org/news/n-1"));
    assert_eq!((reqs[1].method, reqs[1].url.as_str()), (Method::Delete, "https://api.example.org/news/n-1"));
}

#[test]
fn login_posts_credentials_and_parses_session() {
    let transport = ScriptedTransport::replying(vec![ok(
        200,
        r#"{"token":"new-tok","user":{"id":"u-1","email":"a@b.com","permissions":["enroll"]}}"#,
    )]);
    let credentials = LoginRequest { email: "a@b.com".to_owned(), password: "secret1".to_owned() };
    let resp = block_on(login(&client(&transport), &credentials)).unwrap();
    assert_eq!(resp.token, "new-tok");
    assert!(resp.user.has_permission("enroll"));
    assert_eq!(transport.requests()[0].url, "https://api.example.org/auth/login");
}

#[test]
fn login_failure_keeps_backend_message() {
    let transport = ScriptedTransport::replying(vec![ok(401, r#"{"message":"Invalid credentials"}"#)]);
    let credentials = LoginRequest { email: "a@b.com".to_owned(), password: "wrong".to_owned() };
    let err = block_on(login(&client(&transport), &credentials)).unwrap_err();
    assert_eq!(err.status, 401);
    assert_eq!(err.message, "Invalid credentials");
}

#[test]
fn enroll_then_cancel() {
    let transport = ScriptedTransport::replying(vec![
        ok(201, r#"{"id":"e-1","activityId":"a-1","userId":"u-1"}"#),
        ok(204, ""),
    ]);
    let api = client(&transport);
    let enrollment = block_on(enroll(&api, "a-1")).unwrap();
    assert_eq!(enrollment.activity_id, "a-1");
    block_on(cancel_enrollment(&api, "a-1")).unwrap();

    let reqs = transport.requests();
    assert_eq!(reqs[0].method, Method::Post);
    assert_eq!(reqs[1].method, Method::Delete);
    assert_eq!(reqs[1].url, "https://api.example.org/activities/a-1/enroll");
}

#[test]
fn profile_update_uses_patch() {
    let transport = ScriptedTransport::replying(vec![ok(200, r#"{"id":"u-1","email":"a@b.com","firstName":"Dana"}"#)]);
    let update = ProfileUpdate { first_name: Some("Dana".to_owned()), ..ProfileUpdate::default() };
    let user = block_on(update_profile(&client(&transport), &update)).unwrap();
    assert_eq!(user.first_name, "Dana");
    assert_eq!(transport.requests()[0].method, Method::Patch);
}
