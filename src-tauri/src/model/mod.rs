pub mod artifact;
pub mod loader;

pub use artifact::CalorieModel;
pub use loader::{load_model, model_path};
