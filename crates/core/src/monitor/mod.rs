pub mod monitor_loop;
pub mod monitor_report;
