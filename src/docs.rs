use utoipa::OpenApi;

use campanile_core::{ActionReceipt, PaginationMeta};
use campanile_models::status::{
    ClassSectionStatus, CourseOfferingStatus, CurriculumStatus, EnrollmentStatus, SemesterPeriod,
    TermStatus, UserRole, UserStatus,
};

use crate::modules::curricula::controller as curricula;
use crate::modules::curricula::model as curricula_model;
use crate::modules::enrollments::controller as enrollments;
use crate::modules::enrollments::model as enrollments_model;
use crate::modules::offerings::controller as offerings;
use crate::modules::offerings::model as offerings_model;
use crate::modules::schedules::controller as schedules;
use crate::modules::schedules::model as schedules_model;
use crate::modules::terms::controller as terms;
use crate::modules::terms::model as terms_model;
use crate::modules::users::controller as users;
use crate::modules::users::model as users_model;

#[derive(OpenApi)]
#[openapi(
    paths(
        users::create_user,
        users::get_user,
        users::get_active_professors,
        users::update_user_status,
        terms::register_terms,
        terms::get_term,
        terms::get_active_year_terms,
        terms::get_open_enrollment_terms,
        terms::update_term_status,
        curricula::register_programs,
        curricula::register_courses,
        curricula::register_curriculum,
        curricula::get_curriculum,
        curricula::register_curriculum_courses,
        curricula::get_curriculum_courses,
        curricula::update_curriculum_status,
        offerings::register_offerings,
        offerings::get_offering,
        offerings::update_offering_status,
        offerings::register_sections,
        offerings::get_offering_sections,
        offerings::get_section,
        offerings::update_section_status,
        schedules::assign_schedule,
        schedules::get_section_schedules,
        schedules::assign_professor,
        enrollments::enroll_student,
        enrollments::update_enrollment_status,
        enrollments::get_enrollments,
        enrollments::get_student_allowed_sections,
    ),
    components(schemas(
        ActionReceipt,
        PaginationMeta,
        UserRole,
        UserStatus,
        SemesterPeriod,
        TermStatus,
        CurriculumStatus,
        CourseOfferingStatus,
        ClassSectionStatus,
        EnrollmentStatus,
        users_model::User,
        users_model::RoleProfile,
        users_model::CreateUserDto,
        users_model::UpdateUserStatusDto,
        terms_model::Term,
        terms_model::RegisterTermDto,
        terms_model::RegisterTermsDto,
        terms_model::UpdateTermStatusDto,
        curricula_model::Program,
        curricula_model::Course,
        curricula_model::Curriculum,
        curricula_model::CurriculumCourse,
        curricula_model::RegisterProgramDto,
        curricula_model::RegisterProgramsDto,
        curricula_model::RegisterCourseDto,
        curricula_model::RegisterCoursesDto,
        curricula_model::RegisterCurriculumDto,
        curricula_model::RegisterCurriculumCourseDto,
        curricula_model::RegisterCurriculumCoursesDto,
        curricula_model::UpdateCurriculumStatusDto,
        offerings_model::CourseOffering,
        offerings_model::ClassSection,
        offerings_model::RegisterOfferingsDto,
        offerings_model::UpdateOfferingStatusDto,
        offerings_model::RegisterSectionDto,
        offerings_model::RegisterSectionsDto,
        offerings_model::UpdateSectionStatusDto,
        schedules_model::ClassSchedule,
        schedules_model::ProfessorAssignment,
        schedules_model::AssignScheduleDto,
        schedules_model::AssignProfessorDto,
        enrollments_model::Enrollment,
        enrollments_model::EnrollDto,
        enrollments_model::UpdateEnrollmentStatusDto,
        enrollments_model::PaginatedEnrollmentsResponse,
    )),
    tags(
        (name = "Users", description = "User accounts and role profiles"),
        (name = "Terms", description = "Academic terms and their lifecycle"),
        (name = "Curricula", description = "Programs, courses, and curricula"),
        (name = "Offerings", description = "Course offerings and class sections"),
        (name = "Schedules", description = "Meeting slots, room bookings, and professor assignments"),
        (name = "Enrollments", description = "Admission, seat ledger, and enrollment decisions"),
    ),
    info(
        title = "Campanile API",
        description = "Academic scheduling and enrollment backend",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
