/// Business logic layer - one workflow service per content concern
pub mod posts;
pub mod saves;
pub mod users;

pub use posts::PostService;
pub use saves::SaveService;
pub use users::UserService;
