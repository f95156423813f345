mod customer;
mod registry;
mod widget;

use log::LevelFilter;
use quickread::{Executor, SchemaIntrospector};
use std::env;

pub use customer::Customer;
pub use registry::Unmapped;
pub use widget::Widget;

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

/// Runs every scenario against `connection`.
///
/// The tables of [`Widget`] and [`Customer`] must exist, the one of
/// [`Unmapped`] must not.
pub async fn execute_tests<C: Executor + SchemaIntrospector>(mut connection: C) {
    widget::widget(&mut connection).await;
    widget::widget_reload(&mut connection).await;
    customer::customer(&mut connection).await;
    customer::customer_reload_all(&mut connection).await;
    registry::registry(&mut connection).await;
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
