use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::{CourseStatus, StaffRole};
use crate::repositories;
use crate::test_support;

#[tokio::test]
async fn admin_creates_course_with_validated_code() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();

    let admin = test_support::insert_admin(db, "admin@school.test", "Admin", "Admin-pass1!").await;
    let admin_session = test_support::staff_session(&admin.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/courses",
            Some(&admin_session),
            Some(json!({
                "course_code": "cs101",
                "course_name": "Intro to Computer Science",
                "credits": 4,
                "max_capacity": 25,
                "semester": "Fall",
                "academic_year": "2025-2026"
            })),
        ))
        .await
        .expect("create course");
    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["course_code"], "CS101");
    assert_eq!(created["current_enrollment"], 0);
    assert_eq!(created["status"], "active");

    // Same code again is a conflict.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/courses",
            Some(&admin_session),
            Some(json!({
                "course_code": "CS101",
                "course_name": "Duplicate",
                "semester": "Fall",
                "academic_year": "2025-2026"
            })),
        ))
        .await
        .expect("create duplicate course");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Malformed code never reaches the catalog.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/courses",
            Some(&admin_session),
            Some(json!({
                "course_code": "COMPUTERSCI1",
                "course_name": "Bad Code",
                "semester": "Fall",
                "academic_year": "2025-2026"
            })),
        ))
        .await
        .expect("create bad course");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn registrar_cannot_mutate_catalog() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();

    let registrar = test_support::insert_staff(
        db,
        "registrar@school.test",
        "Registrar",
        "Registrar-pass1!",
        StaffRole::Registrar,
    )
    .await;
    let session = test_support::staff_session(&registrar.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/courses",
            Some(&session),
            Some(json!({
                "course_code": "CS102",
                "course_name": "Nope",
                "semester": "Fall",
                "academic_year": "2025-2026"
            })),
        ))
        .await
        .expect("create course as registrar");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn catalog_edit_never_touches_engine_fields() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();

    let admin = test_support::insert_admin(db, "admin@school.test", "Admin", "Admin-pass1!").await;
    let course = test_support::insert_course(db, "CS201", "Algorithms", 1, &admin.id).await;
    let admin_session = test_support::staff_session(&admin.id, ctx.state.settings());

    // Fill the course so the engine marks it full.
    let student =
        test_support::insert_approved_student(db, "algo@school.test", "Al", "Go", "Pass-word1!")
            .await;
    let student_session = test_support::student_session(&student.id, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments",
            Some(&student_session),
            Some(json!({ "course_id": course.id })),
        ))
        .await
        .expect("request enrollment");
    assert_eq!(response.status(), StatusCode::CREATED);

    let full = repositories::courses::fetch_one_by_id(db, &course.id).await.expect("course");
    assert_eq!(full.status, CourseStatus::Full);

    // Raising the capacity through the catalog edit leaves the status alone;
    // only engine mutations recompute it.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &format!("/api/v1/courses/{}", course.id),
            Some(&admin_session),
            Some(json!({ "max_capacity": 10 })),
        ))
        .await
        .expect("raise capacity");
    assert_eq!(response.status(), StatusCode::OK);

    let edited = repositories::courses::fetch_one_by_id(db, &course.id).await.expect("course");
    assert_eq!(edited.max_capacity, 10);
    assert_eq!(edited.current_enrollment, 1);
    assert_eq!(edited.status, CourseStatus::Full);
}

#[tokio::test]
async fn deactivation_is_sticky_and_hidden_from_students() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();

    let admin = test_support::insert_admin(db, "admin@school.test", "Admin", "Admin-pass1!").await;
    let visible = test_support::insert_course(db, "CS301", "Compilers", 10, &admin.id).await;
    let hidden = test_support::insert_course(db, "CS302", "Retired", 10, &admin.id).await;
    let admin_session = test_support::staff_session(&admin.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/courses/{}", hidden.id),
            Some(&admin_session),
            None,
        ))
        .await
        .expect("deactivate course");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let student = test_support::insert_approved_student(
        db,
        "browse@school.test",
        "Bro",
        "Wse",
        "Pass-word1!",
    )
    .await;
    let student_session = test_support::student_session(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/courses",
            Some(&student_session),
            None,
        ))
        .await
        .expect("list courses");
    let status = response.status();
    let listing = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {listing}");
    assert_eq!(listing["total_count"], 1);
    assert_eq!(listing["items"][0]["course_code"], visible.course_code.as_str());

    // Detail view of an inactive course 404s for students, but staff can
    // still filter for it.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/courses/{}", hidden.id),
            Some(&student_session),
            None,
        ))
        .await
        .expect("inactive detail");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/courses?status=inactive",
            Some(&admin_session),
            None,
        ))
        .await
        .expect("staff inactive listing");
    let status = response.status();
    let staff_listing = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {staff_listing}");
    assert_eq!(staff_listing["total_count"], 1);
    assert_eq!(staff_listing["items"][0]["status"], "inactive");
}

#[tokio::test]
async fn course_details_expose_live_seat_count() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();

    let admin = test_support::insert_admin(db, "admin@school.test", "Admin", "Admin-pass1!").await;
    let course = test_support::insert_course(db, "CS401", "Databases", 10, &admin.id).await;
    let student =
        test_support::insert_approved_student(db, "db@school.test", "Da", "Ta", "Pass-word1!")
            .await;
    let student_session = test_support::student_session(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/enrollments",
            Some(&student_session),
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
            &format!("/api/v1/courses/{}", course.id),
            Some(&student_session),
            None,
        ))
        .await
        .expect("course details");
    let status = response.status();
    let details = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {details}");
    assert_eq!(details["current_enrollment"], 1);
    assert_eq!(details["enrolled_count"], 1);
}
