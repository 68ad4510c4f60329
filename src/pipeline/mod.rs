// Pipeline orchestration.

pub mod scan;
