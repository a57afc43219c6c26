//! Reusable UI component configuration.

pub mod data_table;

pub use data_table::{DataTableConfig, orders_table_config};
