pub mod request;

pub use request::{generate_equipment_request, generate_request, generate_risk_table_request};
