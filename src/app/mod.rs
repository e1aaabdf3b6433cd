pub mod ports;
pub mod report;
pub mod seed_use_case;
pub mod wait_use_case;
