pub mod curricula;
pub mod enrollments;
pub mod offerings;
pub mod schedules;
pub mod terms;
pub mod users;

#[cfg(test)]
pub mod testkit;
