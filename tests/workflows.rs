//! 跨模块流程：作业提交、考试安排可见性、公告受众与级联删除

mod common;

use actix_web::{http::StatusCode, test};
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use campus_admin::models::announcements::entities::{Audience, NewAnnouncement};
use campus_admin::models::assignments::entities::NewAssignment;
use campus_admin::models::enrollments::entities::{
    EnrollOptions, EnrollOutcome, EnrollmentStatus, EnrollmentStatusUpdate,
};
use campus_admin::models::schedules::entities::NewSchedule;
use campus_admin::models::timetables::entities::{
    ExamSessionMutation, NewExamSession, NewExamTimetable,
};
use common::{admin, bearer, course, current_session, lecturer, memory_storage, student};

fn exam(course_id: i64, date: &str) -> NewExamSession {
    NewExamSession {
        course_id,
        exam_date: date.to_string(),
        start_time: "09:00".to_string(),
        end_time: "12:00".to_string(),
        venue: "Main Hall".to_string(),
        invigilator_ids: Vec::new(),
    }
}

#[actix_web::test]
async fn test_submission_deadline_handling() {
    let storage = memory_storage().await;
    let (_, lect) = lecturer(&storage, "STF001").await;
    let (student_user, alice) = student(&storage, "CSC/2021/001").await;
    let session = current_session(&storage).await;
    let c = course(&storage, "CSC301", 40).await;
    storage.assign_lecturer(c.id, lect.id).await.unwrap();
    let outcome = storage
        .enroll_student(alice.id, c.id, session.id, EnrollOptions::default())
        .await
        .unwrap();
    assert!(matches!(outcome, EnrollOutcome::Created(_)));

    let past = (Utc::now() - Duration::days(1)).timestamp();
    let closed = storage
        .create_assignment(NewAssignment {
            course_id: c.id,
            lecturer_id: lect.id,
            title: "Closed".to_string(),
            description: None,
            due_date: past,
            total_marks: 20.0,
            allow_late_submission: false,
        })
        .await
        .unwrap();
    let lenient = storage
        .create_assignment(NewAssignment {
            course_id: c.id,
            lecturer_id: lect.id,
            title: "Lenient".to_string(),
            description: None,
            due_date: past,
            total_marks: 20.0,
            allow_late_submission: true,
        })
        .await
        .unwrap();
    let app = test_app!(storage);

    let submit = |id: i64| {
        test::TestRequest::post()
            .uri(&format!("/api/student/assignments/{id}/submit"))
            .insert_header(bearer(&student_user))
            .set_json(json!({ "content": "my answer" }))
            .to_request()
    };

    let resp = test::call_service(&app, submit(closed.id)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "SubmissionDeadlinePassed");

    let resp = test::call_service(&app, submit(lenient.id)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "late");

    let resp = test::call_service(&app, submit(lenient.id)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "SubmissionAlreadyExists");
}

#[actix_web::test]
async fn test_dropped_student_loses_assignment_access() {
    let storage = memory_storage().await;
    let (_, lect) = lecturer(&storage, "STF001").await;
    let (student_user, alice) = student(&storage, "CSC/2021/001").await;
    let session = current_session(&storage).await;
    let c = course(&storage, "CSC301", 40).await;
    storage.assign_lecturer(c.id, lect.id).await.unwrap();
    let EnrollOutcome::Created(enrollment) = storage
        .enroll_student(alice.id, c.id, session.id, EnrollOptions::default())
        .await
        .unwrap()
    else {
        panic!("enrollment was not created");
    };
    storage
        .update_enrollment(
            enrollment.id,
            EnrollmentStatusUpdate {
                status: Some(EnrollmentStatus::Dropped),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let assignment = storage
        .create_assignment(NewAssignment {
            course_id: c.id,
            lecturer_id: lect.id,
            title: "Essay".to_string(),
            description: None,
            due_date: (Utc::now() + Duration::days(7)).timestamp(),
            total_marks: 20.0,
            allow_late_submission: false,
        })
        .await
        .unwrap();
    let app = test_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/student/assignments")
        .insert_header(bearer(&student_user))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["count"], 0);

    let req = test::TestRequest::get()
        .uri(&format!("/api/student/assignments/{}", assignment.id))
        .insert_header(bearer(&student_user))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri(&format!("/api/student/assignments/{}/submit", assignment.id))
        .insert_header(bearer(&student_user))
        .set_json(json!({ "content": "my answer" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/student/assignments/{}/submission", assignment.id))
        .insert_header(bearer(&student_user))
        .set_json(json!({ "content": "revised" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_grading_clamps_score_to_total_marks() {
    let storage = memory_storage().await;
    let (lect_user, lect) = lecturer(&storage, "STF001").await;
    let (student_user, alice) = student(&storage, "CSC/2021/001").await;
    let session = current_session(&storage).await;
    let c = course(&storage, "CSC301", 40).await;
    storage.assign_lecturer(c.id, lect.id).await.unwrap();
    storage
        .enroll_student(alice.id, c.id, session.id, EnrollOptions::default())
        .await
        .unwrap();
    let assignment = storage
        .create_assignment(NewAssignment {
            course_id: c.id,
            lecturer_id: lect.id,
            title: "Essay".to_string(),
            description: None,
            due_date: (Utc::now() + Duration::days(7)).timestamp(),
            total_marks: 20.0,
            allow_late_submission: false,
        })
        .await
        .unwrap();
    let app = test_app!(storage);

    let req = test::TestRequest::post()
        .uri(&format!("/api/student/assignments/{}/submit", assignment.id))
        .insert_header(bearer(&student_user))
        .set_json(json!({ "files": ["essay.pdf"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "submitted");
    let submission_id = body["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/lecturer/submissions/{submission_id}/grade"))
        .insert_header(bearer(&lect_user))
        .set_json(json!({ "score": 35.0, "feedback": "Excellent" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "graded");
    assert_eq!(body["data"]["score"], 20.0);

    // 已评分的提交不能再修改
    let req = test::TestRequest::put()
        .uri(&format!("/api/student/assignments/{}/submission", assignment.id))
        .insert_header(bearer(&student_user))
        .set_json(json!({ "content": "revised" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_timetable_visibility_by_role() {
    let storage = memory_storage().await;
    let admin = admin(&storage).await;
    let (student_user, alice) = student(&storage, "CSC/2021/001").await;
    let session = current_session(&storage).await;
    let taken = course(&storage, "CSC301", 40).await;
    let untaken = course(&storage, "MTH301", 40).await;
    storage
        .enroll_student(alice.id, taken.id, session.id, EnrollOptions::default())
        .await
        .unwrap();

    let timetable = storage
        .create_timetable(NewExamTimetable {
            academic_session_id: session.id,
            title: "First Semester Exams".to_string(),
            description: None,
            created_by: admin.id,
        })
        .await
        .unwrap();
    for (course_id, date) in [(taken.id, "2026-01-12"), (untaken.id, "2026-01-13")] {
        let added = storage
            .add_exam_session(timetable.id, exam(course_id, date))
            .await
            .unwrap();
        assert!(matches!(added, ExamSessionMutation::Done(_)));
    }
    let app = test_app!(storage);

    let uri = format!("/api/student/timetables/{}", timetable.id);

    // 未发布的草稿对学生不可见
    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&student_user))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    storage
        .set_timetable_published(timetable.id, true)
        .await
        .unwrap();

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&student_user))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let sessions = body["data"]["sessions"].as_array().cloned().unwrap_or_default();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["course_id"], taken.id);

    let req = test::TestRequest::get()
        .uri(&format!("/api/timetables/{}", timetable.id))
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["sessions"].as_array().map(Vec::len), Some(2));
}

#[actix_web::test]
async fn test_announcements_follow_audience_and_course() {
    let storage = memory_storage().await;
    let admin = admin(&storage).await;
    let (student_user, alice) = student(&storage, "CSC/2021/001").await;
    let (lect_user, _) = lecturer(&storage, "STF001").await;
    let session = current_session(&storage).await;
    let taken = course(&storage, "CSC301", 40).await;
    let untaken = course(&storage, "MTH301", 40).await;
    storage
        .enroll_student(alice.id, taken.id, session.id, EnrollOptions::default())
        .await
        .unwrap();

    let post = |title: &str, audience: Audience, course_id: Option<i64>| NewAnnouncement {
        title: title.to_string(),
        content: "details".to_string(),
        audience,
        course_id,
        created_by: admin.id,
        is_pinned: false,
    };
    for announcement in [
        post("Everyone", Audience::All, None),
        post("Staff meeting", Audience::Lecturers, None),
        post("CSC301 venue", Audience::Students, Some(taken.id)),
        post("MTH301 venue", Audience::Students, Some(untaken.id)),
    ] {
        storage.create_announcement(announcement).await.unwrap();
    }
    let app = test_app!(storage);

    let titles = |body: &Value| -> Vec<String> {
        let mut titles: Vec<String> = body["data"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|a| a["title"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        titles.sort();
        titles
    };

    let req = test::TestRequest::get()
        .uri("/api/announcements")
        .insert_header(bearer(&student_user))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(titles(&body), vec!["CSC301 venue", "Everyone"]);

    let req = test::TestRequest::get()
        .uri("/api/announcements")
        .insert_header(bearer(&lect_user))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(titles(&body), vec!["Everyone", "Staff meeting"]);
}

#[actix_web::test]
async fn test_unassigning_lecturer_removes_their_schedules() {
    let storage = memory_storage().await;
    let (_, lect) = lecturer(&storage, "STF001").await;
    let c = course(&storage, "CSC301", 40).await;
    storage.assign_lecturer(c.id, lect.id).await.unwrap();

    let schedule = storage
        .create_schedule(NewSchedule {
            course_id: c.id,
            lecturer_id: lect.id,
            academic_session_id: None,
            date: "2026-02-02".to_string(),
            start_time: "08:00".to_string(),
            end_time: "10:00".to_string(),
            venue: "LT1".to_string(),
        })
        .await
        .unwrap();

    assert!(storage.unassign_lecturer(c.id, lect.id).await.unwrap());
    assert!(!storage.is_lecturer_assigned(c.id, lect.id).await.unwrap());
    assert!(storage.get_schedule_by_id(schedule.id).await.unwrap().is_none());
}

#[actix_web::test]
async fn test_referenced_session_cannot_be_deleted() {
    let storage = memory_storage().await;
    let admin = admin(&storage).await;
    let (_, alice) = student(&storage, "CSC/2021/001").await;
    let session = current_session(&storage).await;
    let c = course(&storage, "CSC301", 40).await;
    storage
        .enroll_student(alice.id, c.id, session.id, EnrollOptions::default())
        .await
        .unwrap();
    assert_eq!(storage.count_session_references(session.id).await.unwrap(), 1);
    let app = test_app!(storage);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/sessions/{}", session.id))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(storage.get_session_by_id(session.id).await.unwrap().is_some());
}
