use shared::{TeacherProfile, UpsertTeacherRequest};

use crate::domain::models::{Teacher, TeacherId, WeeklyLoad};

pub struct TeacherMapper;

impl TeacherMapper {
    pub fn to_dto(teacher: &Teacher) -> TeacherProfile {
        TeacherProfile {
            id: teacher.id,
            name: teacher.name.clone(),
            weekly_hours: teacher.weekly_load.hours,
            weekly_minutes: teacher.weekly_load.minutes,
            required_weekly_hours: teacher.weekly_load.as_decimal_hours(),
        }
    }

    /// Validate an upsert request and build the domain teacher
    pub fn to_domain(
        teacher_id: TeacherId,
        request: UpsertTeacherRequest,
    ) -> Result<Teacher, String> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err("Teacher name cannot be empty".to_string());
        }
        if request.weekly_minutes >= 60 {
            return Err(format!("Weekly minutes must be below 60, got {}", request.weekly_minutes));
        }

        Ok(Teacher {
            id: teacher_id,
            name: name.to_string(),
            weekly_load: WeeklyLoad::new(request.weekly_hours, request.weekly_minutes),
        })
    }
}
