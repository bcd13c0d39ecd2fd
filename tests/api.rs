//! HTTP 层集成测试：认证、角色与主要业务规则

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

use campus_admin::models::schedules::entities::NewSchedule;
use common::{
    admin, admin_with_password, bearer, course, current_session, lecturer, memory_storage,
    student,
};

async fn body_json(resp: actix_web::dev::ServiceResponse) -> Value {
    test::read_body_json(resp).await
}

#[actix_web::test]
async fn test_missing_token_is_unauthorized() {
    let storage = memory_storage().await;
    let app = test_app!(storage);

    let req = test::TestRequest::get().uri("/api/admin/courses").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_student_cannot_reach_admin_routes() {
    let storage = memory_storage().await;
    let (user, _) = student(&storage, "CSC/2021/001").await;
    let app = test_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/admin/courses")
        .insert_header(bearer(&user))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_system_info_is_public() {
    let storage = memory_storage().await;
    let app = test_app!(storage);

    let req = test::TestRequest::get().uri("/api/system/info").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_anonymous_login_is_counted_by_client_ip() {
    let storage = memory_storage().await;
    admin_with_password(&storage, "registrar@campus.test", "Secret#2026").await;
    let app = test_app!(storage);

    let login = |password: &str| {
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "Registrar@campus.test", "password": password }))
            .to_request()
    };

    let resp = test::call_service(&app, login("wrong-password")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers().get("x-ratelimit-remaining").unwrap(), "4");
    assert_eq!(body_json(resp).await["error"], "AuthFailed");

    let resp = test::call_service(&app, login("Secret#2026")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("x-ratelimit-remaining").unwrap(), "3");
    let body = body_json(resp).await;
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_eq!(body["data"]["account"]["email"], "registrar@campus.test");
    assert!(body["data"]["access_token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[actix_web::test]
async fn test_duplicate_course_code_is_rejected() {
    let storage = memory_storage().await;
    let admin = admin(&storage).await;
    let app = test_app!(storage);

    let payload = json!({
        "code": "CSC301",
        "title": "Operating Systems",
        "department": "Computer Science",
        "college": "Science"
    });

    let req = test::TestRequest::post()
        .uri("/api/admin/courses")
        .insert_header(bearer(&admin))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // 大小写不同也视为同一课程代码
    let mut again = payload.clone();
    again["code"] = json!("csc301");
    let req = test::TestRequest::post()
        .uri("/api/admin/courses")
        .insert_header(bearer(&admin))
        .set_json(&again)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "CourseAlreadyExists");
}

#[actix_web::test]
async fn test_invalid_path_id_returns_envelope() {
    let storage = memory_storage().await;
    let admin = admin(&storage).await;
    let app = test_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/admin/courses/abc")
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "BadRequest");
}

#[actix_web::test]
async fn test_enrollment_rules() {
    let storage = memory_storage().await;
    let admin = admin(&storage).await;
    let (_, alice) = student(&storage, "CSC/2021/001").await;
    let (_, bob) = student(&storage, "CSC/2021/002").await;
    current_session(&storage).await;
    let small = course(&storage, "CSC201", 1).await;
    let app = test_app!(storage);

    let enroll = |student_id: i64| {
        test::TestRequest::post()
            .uri("/api/admin/enrollments")
            .insert_header(bearer(&admin))
            .set_json(json!({ "student_id": student_id, "course_code": "csc201" }))
            .to_request()
    };

    let resp = test::call_service(&app, enroll(alice.id)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["course_id"], small.id);

    let resp = test::call_service(&app, enroll(alice.id)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "EnrollmentAlreadyExists");

    // 重复选课不新增记录，课程名单不变
    let req = test::TestRequest::get()
        .uri(&format!("/api/admin/enrollments?student_id={}", alice.id))
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(body_json(test::call_service(&app, req).await).await["count"], 1);
    let roster = storage.list_course_students(small.id).await.unwrap();
    assert_eq!(roster.len(), 1);

    let resp = test::call_service(&app, enroll(bob.id)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "CourseFull");

    // 强制选课跳过容量检查
    let req = test::TestRequest::post()
        .uri("/api/admin/enrollments/force")
        .insert_header(bearer(&admin))
        .set_json(json!({ "student_id": bob.id, "course_id": small.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // 有在读学生的课程不能删除
    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/courses/{}", small.id))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "CourseDeleteBlocked");
}

#[actix_web::test]
async fn test_batch_enrollment_reports_each_item() {
    let storage = memory_storage().await;
    let admin = admin(&storage).await;
    let (_, alice) = student(&storage, "CSC/2021/001").await;
    current_session(&storage).await;
    course(&storage, "CSC101", 50).await;
    course(&storage, "MTH101", 50).await;
    let app = test_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/admin/enrollments/batch")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "enrollments": [
                { "matric_number": "CSC/2021/001", "course_code": "CSC101" },
                { "student_id": alice.id, "course_code": "MTH101" },
                { "student_id": alice.id, "course_code": "PHY999" },
                { "matric_number": "CSC/2021/999", "course_code": "CSC101" }
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["data"]["successful"].as_array().map(Vec::len), Some(2));
    let failed = body["data"]["failed"].as_array().cloned().unwrap_or_default();
    assert_eq!(failed.len(), 2);
    assert_eq!(failed[0]["item"]["course_code"], "PHY999");
    assert_eq!(failed[1]["item"]["matric_number"], "CSC/2021/999");
}

#[actix_web::test]
async fn test_assigning_lecturer_twice_is_rejected() {
    let storage = memory_storage().await;
    let admin = admin(&storage).await;
    let (lect_user, lect) = lecturer(&storage, "STF001").await;
    let c = course(&storage, "CSC301", 40).await;
    let app = test_app!(storage);

    let assign = || {
        test::TestRequest::post()
            .uri(&format!("/api/admin/courses/{}/lecturers", c.id))
            .insert_header(bearer(&admin))
            .set_json(json!({ "lecturer_ids": [lect.id] }))
            .to_request()
    };

    let resp = test::call_service(&app, assign()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, assign()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "LecturerAlreadyAssigned");

    // 课程与讲师两侧都只有一条任课关系
    assert_eq!(storage.list_course_lecturer_ids(c.id).await.unwrap(), vec![lect.id]);
    let req = test::TestRequest::get()
        .uri("/api/lecturer/courses")
        .insert_header(bearer(&lect_user))
        .to_request();
    assert_eq!(body_json(test::call_service(&app, req).await).await["count"], 1);
}

#[actix_web::test]
async fn test_lecturer_sync_reports_added_and_removed() {
    let storage = memory_storage().await;
    let admin = admin(&storage).await;
    let (_, keep) = lecturer(&storage, "STF001").await;
    let (_, leave) = lecturer(&storage, "STF002").await;
    let (_, join) = lecturer(&storage, "STF003").await;
    let c = course(&storage, "CSC301", 40).await;
    storage.assign_lecturer(c.id, keep.id).await.unwrap();
    storage.assign_lecturer(c.id, leave.id).await.unwrap();
    let schedule = storage
        .create_schedule(NewSchedule {
            course_id: c.id,
            lecturer_id: leave.id,
            academic_session_id: None,
            date: "2026-02-02".to_string(),
            start_time: "08:00".to_string(),
            end_time: "10:00".to_string(),
            venue: "LT1".to_string(),
        })
        .await
        .unwrap();
    let app = test_app!(storage);

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/courses/{}/lecturers", c.id))
        .insert_header(bearer(&admin))
        .set_json(json!({ "lecturer_ids": [keep.id, join.id, 9999] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;

    let added = &body["data"]["added"];
    assert_eq!(added["successful"], json!([join.id]));
    assert_eq!(added["failed"].as_array().map(Vec::len), Some(1));
    assert_eq!(added["failed"][0]["item"], 9999);
    assert_eq!(body["data"]["removed"]["successful"], json!([leave.id]));

    let mut current = storage.list_course_lecturer_ids(c.id).await.unwrap();
    current.sort_unstable();
    let mut expected = vec![keep.id, join.id];
    expected.sort_unstable();
    assert_eq!(current, expected);
    assert!(storage.get_schedule_by_id(schedule.id).await.unwrap().is_none());
}

#[actix_web::test]
async fn test_bulk_course_creation() {
    let storage = memory_storage().await;
    let admin = admin(&storage).await;
    course(&storage, "CSC101", 40).await;
    let app = test_app!(storage);

    let bulk = |courses: Value| {
        test::TestRequest::post()
            .uri("/api/admin/courses/bulk")
            .insert_header(bearer(&admin))
            .set_json(json!({
                "department": "Computer Science",
                "college": "Science",
                "courses": courses
            }))
            .to_request()
    };

    // 请求内重复
    let resp = test::call_service(
        &app,
        bulk(json!([
            { "code": "CSC201", "title": "Data Structures" },
            { "code": "csc201", "title": "Data Structures II" }
        ])),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "CourseAlreadyExists");

    // 与已有课程冲突
    let resp = test::call_service(
        &app,
        bulk(json!([
            { "code": "CSC202", "title": "Discrete Maths" },
            { "code": "CSC101", "title": "Intro" }
        ])),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "CourseAlreadyExists");
    assert!(storage.find_existing_course_codes(&["CSC202".to_string()]).await.unwrap().is_empty());

    let resp = test::call_service(
        &app,
        bulk(json!([
            { "code": "CSC202", "title": "Discrete Maths" },
            { "code": "CSC203", "title": "Logic", "capacity": 0 },
            { "code": "CSC204", "title": "Automata", "credits": 4 }
        ])),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let created: Vec<&str> = body["data"]["successful"]
        .as_array()
        .map(|items| items.iter().filter_map(|c| c["code"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(created, vec!["CSC202", "CSC204"]);
    assert_eq!(body["data"]["failed"][0]["item"]["code"], "CSC203");
}

#[actix_web::test]
async fn test_lecturer_only_sees_assigned_course_roster() {
    let storage = memory_storage().await;
    let (lect_user, lect) = lecturer(&storage, "STF001").await;
    let mine = course(&storage, "CSC301", 40).await;
    let other = course(&storage, "CSC302", 40).await;
    storage.assign_lecturer(mine.id, lect.id).await.unwrap();
    let app = test_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/lecturer/courses")
        .insert_header(bearer(&lect_user))
        .to_request();
    let body = body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["code"], "CSC301");

    let req = test::TestRequest::get()
        .uri(&format!("/api/lecturer/courses/{}/students", other.id))
        .insert_header(bearer(&lect_user))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_published_timetable_rejects_session_changes() {
    let storage = memory_storage().await;
    let admin = admin(&storage).await;
    let session = current_session(&storage).await;
    let c = course(&storage, "CSC301", 40).await;
    let app = test_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/admin/timetables")
        .insert_header(bearer(&admin))
        .set_json(json!({ "academic_session_id": session.id, "title": "First Semester Exams" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let timetable_id = body_json(resp).await["data"]["id"].as_i64().unwrap();

    let exam = json!({
        "course_id": c.id,
        "exam_date": "2026-01-12",
        "start_time": "09:00",
        "end_time": "12:00",
        "venue": "Main Hall"
    });
    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/timetables/{timetable_id}/sessions"))
        .insert_header(bearer(&admin))
        .set_json(&exam)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let exam_id = body_json(resp).await["data"]["id"].as_i64().unwrap();
    let exam_uri = format!("/api/admin/timetables/{timetable_id}/sessions/{exam_id}");

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/timetables/{timetable_id}/publish"))
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/timetables/{timetable_id}/sessions"))
        .insert_header(bearer(&admin))
        .set_json(&exam)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "TimetablePublished");

    let move_venue = || {
        test::TestRequest::put()
            .uri(&exam_uri)
            .insert_header(bearer(&admin))
            .set_json(json!({ "venue": "Sports Hall" }))
            .to_request()
    };
    let resp = test::call_service(&app, move_venue()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "TimetablePublished");

    let req = test::TestRequest::delete()
        .uri(&exam_uri)
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "TimetablePublished");

    // 取消发布后可以再次编辑
    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/timetables/{timetable_id}/unpublish"))
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let resp = test::call_service(&app, move_venue()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["venue"], "Sports Hall");
}

#[actix_web::test]
async fn test_chat_is_limited_to_course_staff_and_reps() {
    let storage = memory_storage().await;
    let admin = admin(&storage).await;
    let (rep_user, rep) = student(&storage, "CSC/2021/001").await;
    let (other_user, other) = student(&storage, "CSC/2021/002").await;
    current_session(&storage).await;
    let c = course(&storage, "CSC301", 40).await;
    let app = test_app!(storage);

    for s in [rep.id, other.id] {
        let req = test::TestRequest::post()
            .uri("/api/admin/enrollments")
            .insert_header(bearer(&admin))
            .set_json(json!({ "student_id": s, "course_id": c.id }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/courses/{}/reps", c.id))
        .insert_header(bearer(&admin))
        .set_json(json!({ "student_id": rep.id }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let uri = format!("/api/chat/courses/{}/messages", c.id);
    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(&rep_user))
        .set_json(json!({ "content": "Class moved to LT2" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&other_user))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(resp).await["error"], "ChatPermissionDenied");
}
