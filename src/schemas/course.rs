use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Course;
use crate::db::types::CourseStatus;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseCreate {
    #[serde(alias = "courseCode")]
    pub(crate) course_code: String,
    #[serde(alias = "courseName")]
    #[validate(length(min = 1, max = 200, message = "course_name must be 1..200 characters"))]
    pub(crate) course_name: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default = "default_credits")]
    #[validate(range(min = 1, max = 10, message = "credits must be in range 1..10"))]
    pub(crate) credits: i32,
    #[serde(default = "default_max_capacity")]
    #[serde(alias = "maxCapacity")]
    #[validate(range(min = 1, max = 1000, message = "max_capacity must be in range 1..1000"))]
    pub(crate) max_capacity: i32,
    #[serde(default)]
    pub(crate) instructor: Option<String>,
    #[serde(default)]
    pub(crate) schedule: Option<String>,
    pub(crate) semester: String,
    #[serde(alias = "academicYear")]
    pub(crate) academic_year: String,
    #[serde(default)]
    pub(crate) department: Option<String>,
    #[serde(default)]
    pub(crate) prerequisites: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseUpdate {
    #[serde(default)]
    #[serde(alias = "courseName")]
    #[validate(length(min = 1, max = 200, message = "course_name must be 1..200 characters"))]
    pub(crate) course_name: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1, max = 10, message = "credits must be in range 1..10"))]
    pub(crate) credits: Option<i32>,
    #[serde(default)]
    #[serde(alias = "maxCapacity")]
    #[validate(range(min = 1, max = 1000, message = "max_capacity must be in range 1..1000"))]
    pub(crate) max_capacity: Option<i32>,
    #[serde(default)]
    pub(crate) instructor: Option<String>,
    #[serde(default)]
    pub(crate) schedule: Option<String>,
    #[serde(default)]
    pub(crate) semester: Option<String>,
    #[serde(default)]
    #[serde(alias = "academicYear")]
    pub(crate) academic_year: Option<String>,
    #[serde(default)]
    pub(crate) department: Option<String>,
    #[serde(default)]
    pub(crate) prerequisites: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseResponse {
    pub(crate) id: String,
    pub(crate) course_code: String,
    pub(crate) course_name: String,
    pub(crate) description: Option<String>,
    pub(crate) credits: i32,
    pub(crate) max_capacity: i32,
    pub(crate) current_enrollment: i32,
    pub(crate) instructor: Option<String>,
    pub(crate) schedule: Option<String>,
    pub(crate) semester: String,
    pub(crate) academic_year: String,
    pub(crate) department: Option<String>,
    pub(crate) prerequisites: Option<String>,
    pub(crate) status: CourseStatus,
    pub(crate) created_at: String,
}

impl CourseResponse {
    pub(crate) fn from_db(course: Course) -> Self {
        Self {
            id: course.id,
            course_code: course.course_code,
            course_name: course.course_name,
            description: course.description,
            credits: course.credits,
            max_capacity: course.max_capacity,
            current_enrollment: course.current_enrollment,
            instructor: course.instructor,
            schedule: course.schedule,
            semester: course.semester,
            academic_year: course.academic_year,
            department: course.department,
            prerequisites: course.prerequisites,
            status: course.status,
            created_at: format_primitive(course.created_at),
        }
    }
}

/// Catalog detail view: the live count of seat-holding enrollment rows is
/// reported next to the denormalized counter.
#[derive(Debug, Serialize)]
pub(crate) struct CourseDetailResponse {
    #[serde(flatten)]
    pub(crate) course: CourseResponse,
    pub(crate) enrolled_count: i64,
}

fn default_credits() -> i32 {
    3
}

fn default_max_capacity() -> i32 {
    30
}
