mod common;

use axum::http::StatusCode;
use common::{hr, requestor, spawn_app, MultipartBody};

const JANE_CSV: &str = "Candidate Name,Role Interviewed For,Candidate Email,Nationality,Gov ID / Iqama / Passport #,Requestor Username\n\
Jane Doe,Driver,jane@example.com,Filipino,123456789.0,req1\n";

#[tokio::test]
async fn import_creates_screening_and_candidate() {
    let app = spawn_app().await;
    let form = MultipartBody::new().file("import_file", "jane.csv", "text/csv", JANE_CSV.as_bytes());
    let reply = app.multipart("/api/screening/import", &hr(), form).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.text());

    let saved = reply.json();
    let id = saved["candidate_id"].as_str().unwrap().to_string();
    assert!(id.starts_with("CAND-"));
    assert_eq!(saved["screening"]["Candidate Name"], "Jane Doe");
    assert_eq!(saved["screening"]["CV File Path"], "");
    assert!(app.candidates_dir().join(saved["folder"].as_str().unwrap()).is_dir());

    let list = app.get("/api/candidates", &hr()).await.json();
    let rows = list.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Candidate ID"], id.as_str());
    assert_eq!(rows[0]["Status"], "Screening");
    assert_eq!(rows[0]["Requestor Assessment"], "Pending");
    assert_eq!(rows[0]["Next Action"], "Review screening details");

    // A second import of the same file is a new candidate.
    let form = MultipartBody::new().file("import_file", "jane.csv", "text/csv", JANE_CSV.as_bytes());
    let again = app.multipart("/api/screening/import", &hr(), form).await.json();
    assert_ne!(again["candidate_id"], id.as_str());
}

#[tokio::test]
async fn import_reports_missing_required_column() {
    let app = spawn_app().await;
    let csv = "Candidate Name,Candidate Email\nJane Doe,jane@example.com\n";
    let form = MultipartBody::new().file("import_file", "jane.csv", "text/csv", csv.as_bytes());
    let reply = app.multipart("/api/screening/import", &hr(), form).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["error"], "Missing \"Role Interviewed For\" in first row.");

    let form = MultipartBody::new().file("import_file", "jane.txt", "text/plain", b"hello");
    let reply = app.multipart("/api/screening/import", &hr(), form).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["error"], "Use .xlsx or .csv.");

    assert!(app.get("/api/candidates", &hr()).await.json().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn template_lists_import_columns() {
    let app = spawn_app().await;
    let reply = app.get("/api/screening/template", &hr()).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.header("content-type").starts_with("text/csv"));
    let text = reply.text();
    let header = text.lines().next().unwrap();
    assert!(header.starts_with("Candidate Name,Role Interviewed For"));
    assert!(header.ends_with("Requestor Username"));
    assert!(text.contains("Jane Doe"));
}

#[tokio::test]
async fn save_normalises_fields_and_keeps_candidate_notes() {
    let app = spawn_app().await;
    let form = MultipartBody::new()
        .text("Candidate Name", "  Omar Ali ")
        .text("Role Interviewed For", "Site Engineer")
        .text("Highest Education", "bachelor's degree")
        .text("Marital Status", "MARRIED")
        .text("Notice Period", "1m")
        .text("Ever Interviewed by the client before? (Yes/No)", "y")
        .text("DOB", "01/02/1990")
        .text("Gov ID / Iqama / Passport #", "2345678901.0")
        .text("nationality_select", "Other")
        .text("nationality_other", "Kenyan")
        .text("Recorded By", "hr")
        .file("cv_file", "Omar CV.pdf", "application/pdf", b"%PDF-1.4 test");
    let reply = app.multipart("/api/screening", &hr(), form).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.text());
    let saved = reply.json();
    let id = saved["candidate_id"].as_str().unwrap().to_string();

    let screening = app.get(&format!("/api/screening/{}", id), &hr()).await.json();
    assert_eq!(screening["Candidate Name"], "Omar Ali");
    assert_eq!(screening["Highest Education"], "Bachelor's Degree");
    assert_eq!(screening["Marital Status"], "Married");
    assert_eq!(screening["Notice Period"], "1 month");
    assert_eq!(screening["Ever Interviewed by the client before? (Yes/No)"], "Yes");
    assert_eq!(screening["DOB"], "");
    assert_eq!(screening["Gov ID / Iqama / Passport #"], "2345678901");
    assert_eq!(screening["Nationality"], "Kenyan");
    let cv = screening["CV File Path"].as_str().unwrap();
    assert!(cv.ends_with("Omar_CV.pdf"), "{}", cv);
    assert!(std::path::Path::new(cv).is_file());

    let reply = app
        .json(
            "PATCH",
            &format!("/api/candidates/{}/meta", id),
            &hr(),
            serde_json::json!({"status": "On Hold", "next_action": "Call back", "notes": "Strong"}),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);

    // Re-saving the screening keeps HR notes and the stored CV.
    let form = MultipartBody::new()
        .text("Candidate ID", &id)
        .text("Candidate Name", "Omar Ali")
        .text("Role Interviewed For", "Senior Site Engineer")
        .text("cv_existing", cv);
    let reply = app.multipart("/api/screening", &hr(), form).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.text());
    assert_eq!(reply.json()["candidate_id"], id.as_str());

    let detail = app.get(&format!("/api/candidates/{}", id), &hr()).await.json();
    assert_eq!(detail["candidate"]["Role"], "Senior Site Engineer");
    assert_eq!(detail["candidate"]["Notes"], "Strong");
    assert_eq!(detail["candidate"]["Status"], "Screening");
    let resolved = std::path::Path::new(detail["cv_path"].as_str().unwrap());
    assert_eq!(
        resolved.canonicalize().unwrap(),
        std::path::Path::new(cv).canonicalize().unwrap()
    );
}

#[tokio::test]
async fn save_requires_name_and_role() {
    let app = spawn_app().await;
    let form = MultipartBody::new().text("Candidate Name", "Nobody");
    let reply = app.multipart("/api/screening", &hr(), form).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(app.get("/api/screening", &hr()).await.json().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn requestors_only_see_their_own_screenings() {
    let app = spawn_app().await;
    let mine = app.screen("Jane Doe", "Driver", "req1", "").await;
    let theirs = app.screen("John Roe", "Welder", "req2", "").await;

    let picker = app.get("/api/screening", &requestor("req1")).await.json();
    let picker = picker.as_array().unwrap();
    assert_eq!(picker.len(), 1);
    assert_eq!(picker[0]["label"], format!("Jane Doe [{}]", mine));

    let everyone = app.get("/api/screening", &hr()).await.json();
    assert_eq!(everyone.as_array().unwrap().len(), 2);

    let reply = app.get(&format!("/api/screening/{}", theirs), &requestor("req1")).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    let reply = app.get(&format!("/api/screening/{}", mine), &requestor("req1")).await;
    assert_eq!(reply.status, StatusCode::OK);

    let form = MultipartBody::new()
        .text("Candidate Name", "Sneaky")
        .text("Role Interviewed For", "Driver");
    let reply = app.multipart("/api/screening", &requestor("req1"), form).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = app.get("/api/screening/CAND-00000000-000000", &hr()).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_rows_and_folder() {
    let app = spawn_app().await;
    let id = app.screen("Jane Doe", "Driver", "req1", "").await;
    let folder = app
        .candidates_dir()
        .join(recruitment_tracker::utils::naming::folder_name("Jane Doe", &id));
    assert!(folder.is_dir());

    let reply = app.delete(&format!("/api/screening/{}", id), &hr()).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);
    assert!(!folder.exists());
    assert_eq!(
        app.get(&format!("/api/screening/{}", id), &hr()).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.delete(&format!("/api/screening/{}", id), &hr()).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn requests_without_a_token_are_rejected() {
    let app = spawn_app().await;
    let req = axum::http::Request::builder()
        .uri("/api/screening")
        .body(axum::body::Body::empty())
        .unwrap();
    assert_eq!(app.send(req).await.status, StatusCode::UNAUTHORIZED);
}
