use futures::executor::block_on;

use super::*;
use crate::net::testing::{ScriptedTransport, ok};

const ENDPOINT: &str = "https://storage.example.org/v0";

fn storage(transport: &Arc<ScriptedTransport>) -> ImageStorage {
    ImageStorage::with_endpoint(ENDPOINT, "portal.appspot.com", transport.clone())
}

#[test]
fn object_path_prefixes_folder_and_sanitizes_name() {
    let path = object_path("/activities/", "camp photo (1).JPG");
    assert!(path.starts_with("activities/"));
    assert!(path.ends_with("_camp_photo__1_.JPG"));
    assert!(!path.contains(' '));
}

#[test]
fn object_path_is_unique_per_call() {
    assert_ne!(object_path("news", "a.png"), object_path("news", "a.png"));
}

#[test]
fn path_from_url_decodes_object_name() {
    let url = "https://storage.example.org/v0/b/portal.appspot.com/o/activities%2Fabc_a.png?alt=media&token=t";
    assert_eq!(path_from_url(url).as_deref(), Some("activities/abc_a.png"));
}

#[test]
fn path_from_url_rejects_foreign_urls() {
    assert_eq!(path_from_url("https://cdn.example.org/a.png"), None);
    assert_eq!(path_from_url("https://storage.example.org/v0/b/x/o/?alt=media"), None);
}

#[test]
fn download_url_round_trips_through_path_from_url() {
    let transport = ScriptedTransport::replying(vec![]);
    let url = storage(&transport).download_url("news/x y.png", Some("tok"));
    assert_eq!(path_from_url(&url).as_deref(), Some("news/x y.png"));
    assert!(url.ends_with("?alt=media&token=tok"));
}

#[test]
fn upload_posts_bytes_and_builds_public_url() {
    let transport = ScriptedTransport::replying(vec![ok(
        200,
        r#"{"name":"news/a.png","bucket":"portal.appspot.com","downloadTokens":"t1,t2"}"#,
    )]);
    let url = block_on(storage(&transport).upload("news/a.png", vec![1, 2, 3], "image/png")).unwrap();
    assert_eq!(
        url,
        "https://storage.example.org/v0/b/portal.appspot.com/o/news%2Fa.png?alt=media&token=t1"
    );

    let req = &transport.requests()[0];
    assert_eq!(req.method, Method::Post);
    assert_eq!(req.url, "https://storage.example.org/v0/b/portal.appspot.com/o?name=news%2Fa.png");
    assert_eq!(
        req.body,
        Some(Body::Bytes { content_type: "image/png".to_owned(), bytes: vec![1, 2, 3] })
    );
}

#[test]
fn upload_rejection_is_an_api_error() {
    let transport = ScriptedTransport::replying(vec![ok(403, r#"{"error":{"code":403,"message":"denied"}}"#)]);
    let err = block_on(storage(&transport).upload("a.png", vec![], "image/png")).unwrap_err();
    assert_eq!(err.status, 403);
    assert_eq!(err.data["error"]["message"], "denied");
}

#[test]
fn delete_treats_missing_object_as_success() {
    let transport = ScriptedTransport::replying(vec![ok(204, ""), ok(404, "{}"), ok(500, "{}")]);
    let images = storage(&transport);
    assert_eq!(block_on(images.delete("a.png")), Ok(()));
    assert_eq!(block_on(images.delete("a.png")), Ok(()));
    assert_eq!(block_on(images.delete("a.png")).unwrap_err().status, 500);
    assert_eq!(transport.requests()[0].method, Method::Delete);
}

#[test]
fn replace_uploads_then_deletes_old_object() {
    let transport = ScriptedTransport::replying(vec![
        ok(200, r#"{"name":"activities/new.png","downloadTokens":"t"}"#),
        ok(204, ""),
    ]);
    let old = "https://storage.example.org/v0/b/portal.appspot.com/o/activities%2Fold.png?alt=media&token=x";
    let url = block_on(storage(&transport).replace(Some(old), "activities", "new.png", vec![9], "image/png")).unwrap();
    assert!(url.contains("activities%2Fnew.png"));

    let reqs = transport.requests();
    assert_eq!(reqs.len(), 2);
    assert_eq!(reqs[0].method, Method::Post);
    assert_eq!(reqs[1].method, Method::Delete);
    assert_eq!(reqs[1].url, "https://storage.example.org/v0/b/portal.appspot.com/o/activities%2Fold.png");
}

#[test]
fn replace_keeps_new_url_when_old_delete_fails() {
    let transport = ScriptedTransport::replying(vec![
        ok(200, r#"{"name":"activities/new.png","downloadTokens":"t"}"#),
        ok(500, "{}"),
    ]);
    let old = "https://storage.example.org/v0/b/portal.appspot.com/o/activities%2Fold.png";
    let result = block_on(storage(&transport).replace(Some(old), "activities", "new.png", vec![], "image/png"));
    assert!(result.is_ok());
}

#[test]
fn replace_leaves_old_object_when_upload_fails() {
    let transport = ScriptedTransport::replying(vec![ok(400, "{}")]);
    let old = "https://storage.example.org/v0/b/portal.appspot.com/o/activities%2Fold.png";
    let result = block_on(storage(&transport).replace(Some(old), "activities", "new.png", vec![], "image/png"));
    assert!(result.is_err());
    assert_eq!(transport.requests().len(), 1);
}
