// Repository traits (ports) for the persistence layer
// Implementations live in the infrastructure layer

pub mod feedback_repository;
pub mod history_repository;
pub mod plan_repository;
pub mod template_repository;
pub mod user_repository;

pub use feedback_repository::FeedbackRepository;
pub use history_repository::{HistoryEntry, HistoryRepository};
pub use plan_repository::PlanRepository;
pub use template_repository::{
    TemplateFragment, TemplateRepository, FEEDBACK_TRIGGER_INDEX, ROTATION_MODULUS,
};
pub use user_repository::{User, UserRepository, UserUpdate};
