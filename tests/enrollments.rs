//! 选课管理：CSV 导入、状态变更与删除后的课程名单
//!
//! 严格状态迁移是进程级设置，单独放在这个测试二进制里。

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

use campus_admin::models::enrollments::entities::{EnrollOptions, EnrollOutcome, Enrollment};
use campus_admin::services::system::DynamicConfig;
use campus_admin::storage::Storage;
use common::{admin, bearer, course, current_session, memory_storage, student};

const BOUNDARY: &str = "campus-boundary";

fn multipart_csv(csv: &str) -> (String, String) {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"enrollments.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {csv}\r\n\
         --{BOUNDARY}--\r\n"
    );
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

async fn enrolled(
    storage: &std::sync::Arc<dyn Storage>,
    student_id: i64,
    course_id: i64,
    session_id: i64,
) -> Enrollment {
    match storage
        .enroll_student(student_id, course_id, session_id, EnrollOptions::default())
        .await
        .unwrap()
    {
        EnrollOutcome::Created(enrollment) => enrollment,
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[actix_web::test]
async fn test_csv_import_reports_failures_by_line() {
    let storage = memory_storage().await;
    let admin = admin(&storage).await;
    student(&storage, "CSC/2021/001").await;
    current_session(&storage).await;
    let c = course(&storage, "CSC301", 40).await;
    let app = test_app!(storage);

    let csv = "matric_number,course_code\n\
               CSC/2021/001,CSC301\n\
               \n\
               CSC/2021/999,CSC301\n\
               CSC/2021/001,csc301\n";
    let (content_type, body) = multipart_csv(csv);
    let req = test::TestRequest::post()
        .uri("/api/admin/enrollments/import")
        .insert_header(bearer(&admin))
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["successful"].as_array().map(Vec::len), Some(1));
    let failed_lines: Vec<i64> = body["data"]["failed"]
        .as_array()
        .map(|items| items.iter().filter_map(|f| f["item"].as_i64()).collect())
        .unwrap_or_default();
    assert_eq!(failed_lines, vec![4, 5]);
    assert_eq!(storage.list_course_students(c.id).await.unwrap().len(), 1);
}

#[actix_web::test]
async fn test_csv_import_requires_identifier_columns() {
    let storage = memory_storage().await;
    let admin = admin(&storage).await;
    let app = test_app!(storage);

    let (content_type, body) = multipart_csv("name,course_code\nAda,CSC301\n");
    let req = test::TestRequest::post()
        .uri("/api/admin/enrollments/import")
        .insert_header(bearer(&admin))
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "ImportFileMissingColumn");
}

#[actix_web::test]
async fn test_status_update_and_strict_transitions() {
    let storage = memory_storage().await;
    let admin = admin(&storage).await;
    let (_, alice) = student(&storage, "CSC/2021/001").await;
    let session = current_session(&storage).await;
    let c = course(&storage, "CSC301", 40).await;
    let enrollment = enrolled(&storage, alice.id, c.id, session.id).await;
    let app = test_app!(storage);

    let uri = format!("/api/admin/enrollments/{}", enrollment.id);
    let update = |payload: Value| {
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&admin))
            .set_json(payload)
            .to_request()
    };

    let resp = test::call_service(&app, update(json!({ "status": "completed", "grade": " A " }))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["grade"], "A");

    // 非严格模式下任意迁移都允许
    let resp = test::call_service(&app, update(json!({ "status": "dropped" }))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, update(json!({}))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    DynamicConfig::init(Vec::new()).await;
    let req = test::TestRequest::put()
        .uri("/api/admin/settings/enrollment.strict_status_transitions")
        .insert_header(bearer(&admin))
        .set_json(json!({ "value": true }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert!(DynamicConfig::strict_status_transitions().await);

    let resp = test::call_service(&app, update(json!({ "status": "active" }))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = test::call_service(&app, update(json!({ "status": "completed" }))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, update(json!({ "status": "dropped" }))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "InvalidStatusTransition");

    let stored = storage.get_enrollment_by_id(enrollment.id).await.unwrap().unwrap();
    assert_eq!(stored.status.as_str(), "completed");
}

#[actix_web::test]
async fn test_deleting_enrollment_removes_student_from_roster() {
    let storage = memory_storage().await;
    let admin = admin(&storage).await;
    let (_, alice) = student(&storage, "CSC/2021/001").await;
    let (_, bob) = student(&storage, "CSC/2021/002").await;
    let session = current_session(&storage).await;
    let c = course(&storage, "CSC301", 40).await;
    let enrollment = enrolled(&storage, alice.id, c.id, session.id).await;
    enrolled(&storage, bob.id, c.id, session.id).await;
    assert_eq!(storage.list_course_students(c.id).await.unwrap().len(), 2);
    let app = test_app!(storage);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/enrollments/{}", enrollment.id))
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let roster = storage.list_course_students(c.id).await.unwrap();
    assert_eq!(roster.len(), 1);
    assert!(storage.get_enrollment_by_id(enrollment.id).await.unwrap().is_none());

    // 不在名单中的学生不能被任命为课代表
    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/courses/{}/reps", c.id))
        .insert_header(bearer(&admin))
        .set_json(json!({ "student_id": alice.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/enrollments/{}", enrollment.id))
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}
