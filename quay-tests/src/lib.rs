mod counters;
mod ledger;
mod locking;

use crate::{counters::counters, ledger::ledger, locking::locking};
use log::LevelFilter;
use quay::{ConnectionConfig, Driver, StatementPerformer};
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Run the whole suite against a live server, `config` must select a database the user can write.
pub async fn execute_tests<D: Driver>(driver: D, config: ConnectionConfig) {
    let mut performer = StatementPerformer::new(driver, config);
    counters(&mut performer).await;
    ledger(&mut performer).await;
    locking(&mut performer).await;
    assert_eq!(performer.nesting(), 0);
    assert!(!performer.is_connected());
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
