//! # Controls Service Module
//!
//! Routes under `/api/controls`. Bodies are the shared types from
//! `common::model` and `common::requests`, so the browser client and the
//! handlers agree on the wire format by construction.
//!
//! ## Registered Routes:
//!
//! *   **`GET /`** (`list::process`): all controls sorted by `order`.
//! *   **`POST /`** (`create::process`): validates a `ControlDraft`, assigns a
//!     uuid and returns the stored control.
//! *   **`POST /update`** (`update::process`): merges `{id, ...fields}` into an
//!     existing control. 404 when the id is unknown.
//! *   **`POST /delete`** (`delete::process`): removes `{id}`.
//! *   **`POST /update-order`** (`reorder::process`): applies a batch of
//!     `{id, order}` pairs in a single transaction.
//! *   **`GET /extract`** (`extract::process`): downloadable HTML report.

mod create;
mod delete;
mod extract;
mod list;
mod reorder;
mod update;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/controls";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("/update", post().to(update::process))
        .route("/delete", post().to(delete::process))
        .route("/update-order", post().to(reorder::process))
        .route("/extract", get().to(extract::process))
}

#[cfg(test)]
mod tests {
    use crate::services::test_support::{error_message, temp_store, wired};
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, App};
    use common::model::{Control, ControlStatus};
    use common::ErrorBody;
    use serde_json::json;

    #[actix_web::test]
    async fn create_list_update_reorder_delete() {
        let (_dir, store) = temp_store();
        let app = test::init_service(App::new().configure(wired(store))).await;

        let mut ids = Vec::new();
        for (i, title) in ["Access review", "Backups", "Key rotation"].iter().enumerate() {
            let req = test::TestRequest::post()
                .uri("/api/controls")
                .set_json(json!({ "dcfId": format!("DCF-{i}"), "title": title, "order": i }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
            let created: Control = test::read_body_json(resp).await;
            assert!(!created.id.is_empty());
            assert!(created.last_updated.is_some());
            ids.push(created.id);
        }

        let req = test::TestRequest::post()
            .uri("/api/controls/update")
            .set_json(json!({ "id": ids[0], "status": "Complete", "estimatedCompletionDate": "2025-09-30" }))
            .to_request();
        let updated: Control = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.status, ControlStatus::Complete);
        assert_eq!(updated.title, "Access review");
        assert_eq!(
            updated.estimated_completion_date.map(|d| d.to_rfc3339()),
            Some("2025-09-30T00:00:00+00:00".to_string())
        );

        let req = test::TestRequest::post()
            .uri("/api/controls/update-order")
            .set_json(json!({ "updates": [
                { "id": ids[2], "order": 0 },
                { "id": ids[0], "order": 1 },
                { "id": ids[1], "order": 2 },
            ]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/controls").to_request();
        let listed: Vec<Control> = test::call_and_read_body_json(&app, req).await;
        let listed_ids: Vec<&str> = listed.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(listed_ids, [ids[2].as_str(), ids[0].as_str(), ids[1].as_str()]);

        let req = test::TestRequest::post()
            .uri("/api/controls/delete")
            .set_json(json!({ "id": ids[1] }))
            .to_request();
        let body: ErrorBody = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.message, "Control deleted successfully");

        let req = test::TestRequest::get().uri("/api/controls").to_request();
        let listed: Vec<Control> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed.len(), 2);
    }

    #[actix_web::test]
    async fn invalid_drafts_and_patches_are_rejected() {
        let (_dir, store) = temp_store();
        let app = test::init_service(App::new().configure(wired(store))).await;

        let req = test::TestRequest::post()
            .uri("/api/controls")
            .set_json(json!({ "dcfId": "  ", "title": "No id" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_message(resp).await, "DCF ID and Title are required.");

        let req = test::TestRequest::post()
            .uri("/api/controls")
            .set_json(json!({ "dcfId": "DCF-1", "title": "Dated" }))
            .to_request();
        let created: Control = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/api/controls/update")
            .set_json(json!({ "id": created.id, "estimatedCompletionDate": "next tuesday" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_message(resp).await,
            "Invalid date format. Please use YYYY-MM-DD format."
        );

        let req = test::TestRequest::post()
            .uri("/api/controls")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(!error_message(resp).await.is_empty());
    }

    #[actix_web::test]
    async fn unknown_ids_answer_404_with_message() {
        let (_dir, store) = temp_store();
        let app = test::init_service(App::new().configure(wired(store))).await;

        let req = test::TestRequest::post()
            .uri("/api/controls/update")
            .set_json(json!({ "id": "ghost", "title": "x" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_message(resp).await, "Control ghost not found");

        let req = test::TestRequest::post()
            .uri("/api/controls/delete")
            .set_json(json!({ "id": "ghost" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri("/api/controls/update-order")
            .set_json(json!({ "updates": [{ "id": "ghost", "order": 0 }] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn extract_is_an_html_attachment() {
        let (_dir, store) = temp_store();
        let app = test::init_service(App::new().configure(wired(store))).await;

        let req = test::TestRequest::post()
            .uri("/api/controls")
            .set_json(json!({ "dcfId": "DCF-7", "title": "<Encrypt> laptops" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let req = test::TestRequest::get().uri("/api/controls/extract").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert_eq!(disposition, r#"attachment; filename="controls-export.html""#);

        let body = test::read_body(resp).await;
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("&lt;Encrypt&gt; laptops"));
        assert!(html.contains("Total Controls: 1"));
    }
}
