pub mod climate_data;
pub mod sqlite;
pub mod window;

pub use climate_data::*;
pub use sqlite::ClimateAccess;
pub use window::DateWindow;
