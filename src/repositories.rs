pub(crate) mod courses;
pub(crate) mod enrollments;
pub(crate) mod staff;
pub(crate) mod students;
