use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::{AdmissionStatus, CourseStatus, EnrollmentStatus};
use crate::repositories;
use crate::repositories::enrollments::RequestOutcome;
use crate::test_support;

async fn assert_counter_consistent(ctx: &test_support::TestContext, course_id: &str) {
    let course = repositories::courses::fetch_one_by_id(ctx.state.db(), course_id)
        .await
        .expect("fetch course");
    let live = repositories::enrollments::seat_holding_count(ctx.state.db(), course_id)
        .await
        .expect("seat holding count");
    assert_eq!(
        i64::from(course.current_enrollment),
        live,
        "current_enrollment must match the live count of pending/enrolled rows"
    );
}

#[tokio::test]
async fn capacity_walkthrough_with_admin_review() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();

    let admin = test_support::insert_admin(db, "admin@school.test", "Admin", "Admin-pass1!").await;
    let course = test_support::insert_course(db, "CS101", "Intro to CS", 2, &admin.id).await;

    let a = test_support::insert_approved_student(db, "a@school.test", "Ada", "A", "Pass-word1!")
        .await;
    let b = test_support::insert_approved_student(db, "b@school.test", "Ben", "B", "Pass-word1!")
        .await;
    let c = test_support::insert_approved_student(db, "c@school.test", "Cy", "C", "Pass-word1!")
        .await;

    let a_session = test_support::student_session(&a.id, ctx.state.settings());
    let b_session = test_support::student_session(&b.id, ctx.state.settings());
    let c_session = test_support::student_session(&c.id, ctx.state.settings());
    let admin_session = test_support::staff_session(&admin.id, ctx.state.settings());

    // A requests a seat: pending, counter 1.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments",
            Some(&a_session),
            Some(json!({ "course_id": course.id })),
        ))
        .await
        .expect("request enrollment");
    let status = response.status();
    let a_enrollment = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {a_enrollment}");
    assert_eq!(a_enrollment["status"], "pending");
    let a_enrollment_id = a_enrollment["id"].as_str().expect("enrollment id").to_string();

    let refreshed = repositories::courses::fetch_one_by_id(db, &course.id).await.expect("course");
    assert_eq!(refreshed.current_enrollment, 1);
    assert_eq!(refreshed.status, CourseStatus::Active);
    assert_counter_consistent(&ctx, &course.id).await;

    // B takes the last seat: counter 2, course goes full.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments",
            Some(&b_session),
            Some(json!({ "course_id": course.id })),
        ))
        .await
        .expect("request enrollment");
    let status = response.status();
    let b_enrollment = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {b_enrollment}");
    let b_enrollment_id = b_enrollment["id"].as_str().expect("enrollment id").to_string();

    let refreshed = repositories::courses::fetch_one_by_id(db, &course.id).await.expect("course");
    assert_eq!(refreshed.current_enrollment, 2);
    assert_eq!(refreshed.status, CourseStatus::Full);

    // C is turned away.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments",
            Some(&c_session),
            Some(json!({ "course_id": course.id })),
        ))
        .await
        .expect("request enrollment");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Approving A leaves the counter alone: the seat was claimed at request
    // time.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/enrollments/{a_enrollment_id}/review"),
            Some(&admin_session),
            Some(json!({ "action": "approve" })),
        ))
        .await
        .expect("approve enrollment");
    let status = response.status();
    let approved = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {approved}");
    assert_eq!(approved["status"], "enrolled");
    assert_eq!(approved["approved_by"], admin.id.as_str());

    let refreshed = repositories::courses::fetch_one_by_id(db, &course.id).await.expect("course");
    assert_eq!(refreshed.current_enrollment, 2);
    assert_eq!(refreshed.status, CourseStatus::Full);

    // Rejecting B frees the seat and reopens the course.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/enrollments/{b_enrollment_id}/review"),
            Some(&admin_session),
            Some(json!({ "action": "reject" })),
        ))
        .await
        .expect("reject enrollment");
    let status = response.status();
    let rejected = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {rejected}");
    assert_eq!(rejected["status"], "dropped");

    let refreshed = repositories::courses::fetch_one_by_id(db, &course.id).await.expect("course");
    assert_eq!(refreshed.current_enrollment, 1);
    assert_eq!(refreshed.status, CourseStatus::Active);
    assert_counter_consistent(&ctx, &course.id).await;

    // C can now get the freed seat.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments",
            Some(&c_session),
            Some(json!({ "course_id": course.id })),
        ))
        .await
        .expect("request enrollment");
    assert_eq!(response.status(), StatusCode::CREATED);

    let refreshed = repositories::courses::fetch_one_by_id(db, &course.id).await.expect("course");
    assert_eq!(refreshed.current_enrollment, 2);
    assert_eq!(refreshed.status, CourseStatus::Full);
    assert_counter_consistent(&ctx, &course.id).await;
}

#[tokio::test]
async fn duplicate_request_increments_counter_once() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();

    let admin = test_support::insert_admin(db, "admin@school.test", "Admin", "Admin-pass1!").await;
    let course = test_support::insert_course(db, "MATH201", "Linear Algebra", 30, &admin.id).await;
    let student =
        test_support::insert_approved_student(db, "dup@school.test", "Dee", "Dup", "Pass-word1!")
            .await;
    let session = test_support::student_session(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments",
            Some(&session),
            Some(json!({ "course_id": course.id })),
        ))
        .await
        .expect("first request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments",
            Some(&session),
            Some(json!({ "course_id": course.id })),
        ))
        .await
        .expect("second request");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CONFLICT, "response: {body}");

    let refreshed = repositories::courses::fetch_one_by_id(db, &course.id).await.expect("course");
    assert_eq!(refreshed.current_enrollment, 1);
    assert_counter_consistent(&ctx, &course.id).await;
}

#[tokio::test]
async fn admission_gate_blocks_unapproved_students() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();

    let admin = test_support::insert_admin(db, "admin@school.test", "Admin", "Admin-pass1!").await;
    let course = test_support::insert_course(db, "BIO150", "Biology", 30, &admin.id).await;

    for (email, admission) in [
        ("pending@school.test", AdmissionStatus::Pending),
        ("rejected@school.test", AdmissionStatus::Rejected),
    ] {
        let student =
            test_support::insert_student(db, email, "Nova", "N", "Pass-word1!", admission).await;
        let session = test_support::student_session(&student.id, ctx.state.settings());

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/enrollments",
                Some(&session),
                Some(json!({ "course_id": course.id })),
            ))
            .await
            .expect("request enrollment");
        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::CONFLICT, "response: {body}");
    }

    let refreshed = repositories::courses::fetch_one_by_id(db, &course.id).await.expect("course");
    assert_eq!(refreshed.current_enrollment, 0);
    let live = repositories::enrollments::seat_holding_count(db, &course.id)
        .await
        .expect("seat holding count");
    assert_eq!(live, 0);
}

#[tokio::test]
async fn concurrent_requests_for_last_seat_admit_exactly_one() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();

    let admin = test_support::insert_admin(db, "admin@school.test", "Admin", "Admin-pass1!").await;
    let course = test_support::insert_course(db, "PHYS300", "Mechanics", 1, &admin.id).await;
    let first =
        test_support::insert_approved_student(db, "one@school.test", "One", "S", "Pass-word1!")
            .await;
    let second =
        test_support::insert_approved_student(db, "two@school.test", "Two", "S", "Pass-word1!")
            .await;

    let now = crate::core::time::primitive_now_utc();
    let (left, right) = tokio::join!(
        repositories::enrollments::request_enrollment(db, &first.id, &course.id, now),
        repositories::enrollments::request_enrollment(db, &second.id, &course.id, now),
    );
    let left = left.expect("first request");
    let right = right.expect("second request");

    let admitted = [&left, &right]
        .iter()
        .filter(|outcome| matches!(outcome, RequestOutcome::Requested(_)))
        .count();
    let turned_away = [&left, &right]
        .iter()
        .filter(|outcome| matches!(outcome, RequestOutcome::CourseFull))
        .count();
    assert_eq!(admitted, 1, "exactly one request wins the last seat");
    assert_eq!(turned_away, 1, "the loser sees a full course");

    let refreshed = repositories::courses::fetch_one_by_id(db, &course.id).await.expect("course");
    assert_eq!(refreshed.current_enrollment, 1);
    assert_eq!(refreshed.status, CourseStatus::Full);
    assert_counter_consistent(&ctx, &course.id).await;
}

#[tokio::test]
async fn approve_requires_pending_status() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();

    let admin = test_support::insert_admin(db, "admin@school.test", "Admin", "Admin-pass1!").await;
    let course = test_support::insert_course(db, "CHEM110", "Chemistry", 5, &admin.id).await;
    let student =
        test_support::insert_approved_student(db, "appr@school.test", "Al", "A", "Pass-word1!")
            .await;
    let session = test_support::student_session(&student.id, ctx.state.settings());
    let admin_session = test_support::staff_session(&admin.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments",
            Some(&session),
            Some(json!({ "course_id": course.id })),
        ))
        .await
        .expect("request enrollment");
    let enrollment = test_support::read_json(response).await;
    let enrollment_id = enrollment["id"].as_str().expect("enrollment id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/enrollments/{enrollment_id}/review"),
            Some(&admin_session),
            Some(json!({ "action": "approve" })),
        ))
        .await
        .expect("approve");
    assert_eq!(response.status(), StatusCode::OK);

    // Second approval finds the row enrolled and refuses without touching it.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/enrollments/{enrollment_id}/review"),
            Some(&admin_session),
            Some(json!({ "action": "approve" })),
        ))
        .await
        .expect("approve again");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let row = repositories::enrollments::find_by_id(db, &enrollment_id)
        .await
        .expect("find enrollment")
        .expect("enrollment exists");
    assert_eq!(row.status, EnrollmentStatus::Enrolled);
    let refreshed = repositories::courses::fetch_one_by_id(db, &course.id).await.expect("course");
    assert_eq!(refreshed.current_enrollment, 1);

    // Rejecting an enrolled row is also refused; the admin drop action is the
    // valid transition from enrolled.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/enrollments/{enrollment_id}/review"),
            Some(&admin_session),
            Some(json!({ "action": "reject" })),
        ))
        .await
        .expect("reject");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn self_drop_requires_enrolled_and_keeps_full_status() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();

    let admin = test_support::insert_admin(db, "admin@school.test", "Admin", "Admin-pass1!").await;
    let course = test_support::insert_course(db, "ART100", "Drawing", 1, &admin.id).await;
    let student =
        test_support::insert_approved_student(db, "drop@school.test", "Di", "D", "Pass-word1!")
            .await;
    let session = test_support::student_session(&student.id, ctx.state.settings());
    let admin_session = test_support::staff_session(&admin.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments",
            Some(&session),
            Some(json!({ "course_id": course.id })),
        ))
        .await
        .expect("request enrollment");
    let enrollment = test_support::read_json(response).await;
    let enrollment_id = enrollment["id"].as_str().expect("enrollment id").to_string();

    // Pending requests are cancelled by the admin reject path, not self-drop.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/enrollments/{enrollment_id}/drop"),
            Some(&session),
            None,
        ))
        .await
        .expect("drop pending");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/enrollments/{enrollment_id}/review"),
            Some(&admin_session),
            Some(json!({ "action": "approve" })),
        ))
        .await
        .expect("approve");
    assert_eq!(response.status(), StatusCode::OK);

    let before = repositories::courses::fetch_one_by_id(db, &course.id).await.expect("course");
    assert_eq!(before.status, CourseStatus::Full);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/enrollments/{enrollment_id}/drop"),
            Some(&session),
            None,
        ))
        .await
        .expect("drop enrolled");
    let status = response.status();
    let dropped = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {dropped}");
    assert_eq!(dropped["status"], "dropped");

    // Seat freed, but self-drop leaves a full course marked full; only the
    // admin release path reopens it.
    let refreshed = repositories::courses::fetch_one_by_id(db, &course.id).await.expect("course");
    assert_eq!(refreshed.current_enrollment, 0);
    assert_eq!(refreshed.status, CourseStatus::Full);
}

#[tokio::test]
async fn dropped_pair_reuses_the_same_row() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();

    let admin = test_support::insert_admin(db, "admin@school.test", "Admin", "Admin-pass1!").await;
    let course = test_support::insert_course(db, "HIST210", "History", 10, &admin.id).await;
    let student =
        test_support::insert_approved_student(db, "redo@school.test", "Re", "Do", "Pass-word1!")
            .await;
    let session = test_support::student_session(&student.id, ctx.state.settings());
    let admin_session = test_support::staff_session(&admin.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments",
            Some(&session),
            Some(json!({ "course_id": course.id })),
        ))
        .await
        .expect("request enrollment");
    let enrollment = test_support::read_json(response).await;
    let enrollment_id = enrollment["id"].as_str().expect("enrollment id").to_string();

    // Approve, grade, then drop the enrollment so the row carries remnants.
    for (method, path, body) in [
        (Method::POST, format!("/api/v1/enrollments/{enrollment_id}/review"), json!({ "action": "approve" })),
        (Method::PATCH, format!("/api/v1/enrollments/{enrollment_id}/grade"), json!({ "grade": 72.5 })),
        (Method::POST, format!("/api/v1/enrollments/{enrollment_id}/review"), json!({ "action": "drop" })),
    ] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(method, &path, Some(&admin_session), Some(body)))
            .await
            .expect("admin action");
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Re-requesting revives the same row as a clean pending request.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments",
            Some(&session),
            Some(json!({ "course_id": course.id })),
        ))
        .await
        .expect("re-request enrollment");
    let status = response.status();
    let revived = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {revived}");
    assert_eq!(revived["id"], enrollment_id.as_str());
    assert_eq!(revived["status"], "pending");
    assert!(revived["grade"].is_null());
    assert!(revived["approved_by"].is_null());

    assert_counter_consistent(&ctx, &course.id).await;
}

#[tokio::test]
async fn grade_bounds_are_enforced() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();

    let admin = test_support::insert_admin(db, "admin@school.test", "Admin", "Admin-pass1!").await;
    let course = test_support::insert_course(db, "ENG220", "Writing", 10, &admin.id).await;
    let student =
        test_support::insert_approved_student(db, "grade@school.test", "Gr", "A", "Pass-word1!")
            .await;
    let session = test_support::student_session(&student.id, ctx.state.settings());
    let admin_session = test_support::staff_session(&admin.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments",
            Some(&session),
            Some(json!({ "course_id": course.id })),
        ))
        .await
        .expect("request enrollment");
    let enrollment = test_support::read_json(response).await;
    let enrollment_id = enrollment["id"].as_str().expect("enrollment id").to_string();

    for bad_grade in [json!(101), json!(-1)] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::PATCH,
                &format!("/api/v1/enrollments/{enrollment_id}/grade"),
                Some(&admin_session),
                Some(json!({ "grade": bad_grade })),
            ))
            .await
            .expect("set grade");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &format!("/api/v1/enrollments/{enrollment_id}/grade"),
            Some(&admin_session),
            Some(json!({ "grade": 85.5 })),
        ))
        .await
        .expect("set grade");
    let status = response.status();
    let graded = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {graded}");
    assert_eq!(graded["grade"], json!(85.5));
}

#[tokio::test]
async fn inactive_course_rejects_requests() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();

    let admin = test_support::insert_admin(db, "admin@school.test", "Admin", "Admin-pass1!").await;
    let course = test_support::insert_course(db, "GEO101", "Geology", 10, &admin.id).await;
    repositories::courses::deactivate(db, &course.id, crate::core::time::primitive_now_utc())
        .await
        .expect("deactivate");

    let student =
        test_support::insert_approved_student(db, "geo@school.test", "Gee", "O", "Pass-word1!")
            .await;
    let session = test_support::student_session(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments",
            Some(&session),
            Some(json!({ "course_id": course.id })),
        ))
        .await
        .expect("request enrollment");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn review_endpoints_require_admin_and_csrf() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();

    let admin = test_support::insert_admin(db, "admin@school.test", "Admin", "Admin-pass1!").await;
    let registrar = test_support::insert_staff(
        db,
        "registrar@school.test",
        "Registrar",
        "Registrar-pass1!",
        crate::db::types::StaffRole::Registrar,
    )
    .await;
    let course = test_support::insert_course(db, "MUS105", "Music", 10, &admin.id).await;
    let student =
        test_support::insert_approved_student(db, "mus@school.test", "Mu", "S", "Pass-word1!")
            .await;
    let session = test_support::student_session(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments",
            Some(&session),
            Some(json!({ "course_id": course.id })),
        ))
        .await
        .expect("request enrollment");
    let enrollment = test_support::read_json(response).await;
    let enrollment_id = enrollment["id"].as_str().expect("enrollment id").to_string();

    // Registrars can read the queue but not decide it.
    let registrar_session = test_support::staff_session(&registrar.id, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/enrollments/{enrollment_id}/review"),
            Some(&registrar_session),
            Some(json!({ "action": "approve" })),
        ))
        .await
        .expect("registrar review");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/enrollments?status=pending",
            Some(&registrar_session),
            None,
        ))
        .await
        .expect("registrar list");
    assert_eq!(response.status(), StatusCode::OK);

    // A valid bearer token without the CSRF header is refused.
    let admin_session = test_support::staff_session(&admin.id, ctx.state.settings());
    let mut request = test_support::json_request(
        Method::POST,
        &format!("/api/v1/enrollments/{enrollment_id}/review"),
        Some(&admin_session),
        Some(json!({ "action": "approve" })),
    );
    request.headers_mut().remove(crate::api::guards::CSRF_HEADER);
    let response = ctx.app.clone().oneshot(request).await.expect("review without csrf");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let row = repositories::enrollments::find_by_id(db, &enrollment_id)
        .await
        .expect("find enrollment")
        .expect("enrollment exists");
    assert_eq!(row.status, EnrollmentStatus::Pending);
}

#[tokio::test]
async fn student_listing_and_stats_reflect_ledger() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();

    let admin = test_support::insert_admin(db, "admin@school.test", "Admin", "Admin-pass1!").await;
    let course = test_support::insert_course(db, "LANG140", "Latin", 10, &admin.id).await;
    let student =
        test_support::insert_approved_student(db, "list@school.test", "Li", "St", "Pass-word1!")
            .await;
    let session = test_support::student_session(&student.id, ctx.state.settings());
    let admin_session = test_support::staff_session(&admin.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments",
            Some(&session),
            Some(json!({ "course_id": course.id })),
        ))
        .await
        .expect("request enrollment");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/enrollments/mine",
            Some(&session),
            None,
        ))
        .await
        .expect("my enrollments");
    let status = response.status();
    let mine = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {mine}");
    assert_eq!(mine.as_array().expect("array").len(), 1);
    assert_eq!(mine[0]["course_code"], "LANG140");
    assert_eq!(mine[0]["status"], "pending");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/enrollments/stats",
            Some(&admin_session),
            None,
        ))
        .await
        .expect("stats");
    let status = response.status();
    let stats = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {stats}");
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["pending"], 1);
    assert_eq!(stats["enrolled"], 0);
}
