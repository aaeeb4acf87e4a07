pub mod assemble;
pub mod embedded;
pub mod normalize;
pub mod payload;
pub mod recovery;
pub mod repair;
pub mod scanner;
pub mod textparse;

pub use assemble::extract_products;
pub use embedded::extract_embedded_object;
pub use normalize::normalize_text;
pub use payload::{FieldValue, TaskPayload};
pub use recovery::recover_from_logs;
pub use repair::repair_json;
pub use scanner::scan_structured_fields;
pub use textparse::parse_text_result;
