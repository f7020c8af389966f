#[path = "integration/common/mod.rs"]
mod common;

#[path = "integration/split_basic.rs"]
mod split_basic;

#[path = "integration/dry_run.rs"]
mod dry_run;

#[path = "integration/error_cases.rs"]
mod error_cases;
