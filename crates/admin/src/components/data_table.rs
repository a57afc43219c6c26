//! Data table component types.
//!
//! These types define the columns and filters of the order tables in the admin
//! panel.

use serde::Serialize;

use quickbite_core::{OrderStatus, OrderType};

use crate::models::{OrderFilter, Restaurant};

/// Column definition for a data table.
#[derive(Debug, Clone, Serialize)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Whether the column is visible by default.
    pub default_visible: bool,
}

impl TableColumn {
    /// Create a new column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            default_visible: true,
        }
    }

    /// Set whether the column is visible by default.
    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.default_visible = visible;
        self
    }
}

/// Filter type for data tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Text input filter.
    Text,
    /// Single-select dropdown.
    Select,
}

/// Filter definition for a data table.
#[derive(Debug, Clone, Serialize)]
pub struct TableFilter {
    /// Query parameter key.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Filter type.
    pub filter_type: FilterType,
    /// Placeholder text (for text inputs).
    pub placeholder: Option<String>,
    /// Available options (for selects). The first option clears the filter.
    pub options: Vec<FilterOption>,
    /// Currently applied value, empty when unset.
    pub value: String,
}

/// Option for select filters.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOption {
    /// Option value.
    pub value: String,
    /// Display label.
    pub label: String,
}

impl FilterOption {
    /// Create a new filter option.
    #[must_use]
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

impl TableFilter {
    /// Create a text filter.
    #[must_use]
    pub fn text(key: &str, label: &str, placeholder: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            filter_type: FilterType::Text,
            placeholder: Some(placeholder.to_string()),
            options: vec![],
            value: String::new(),
        }
    }

    /// Create a select filter.
    #[must_use]
    pub fn select(key: &str, label: &str, options: Vec<FilterOption>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            filter_type: FilterType::Select,
            placeholder: None,
            options,
            value: String::new(),
        }
    }

    /// Set the applied value.
    #[must_use]
    pub fn with_value(mut self, value: Option<&str>) -> Self {
        self.value = value.map(str::trim).unwrap_or_default().to_string();
        self
    }

    /// Whether this filter is a text input (for templates).
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.filter_type == FilterType::Text
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone, Serialize)]
pub struct DataTableConfig {
    /// Unique table identifier.
    pub table_id: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Filter definitions.
    pub filters: Vec<TableFilter>,
    /// Icon for empty state.
    pub empty_icon: String,
    /// Title for empty state.
    pub empty_title: String,
    /// Description for empty state.
    pub empty_description: Option<String>,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            columns: vec![],
            filters: vec![],
            empty_icon: "📋".to_string(),
            empty_title: "No items found".to_string(),
            empty_description: None,
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a filter.
    #[must_use]
    pub fn filter(mut self, filter: TableFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set empty state configuration.
    #[must_use]
    pub fn empty_state(mut self, icon: &str, title: &str, description: Option<&str>) -> Self {
        self.empty_icon = icon.to_string();
        self.empty_title = title.to_string();
        self.empty_description = description.map(ToString::to_string);
        self
    }

    /// Get default visible columns.
    #[must_use]
    pub fn default_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.default_visible)
            .map(|c| c.key.clone())
            .collect()
    }
}

/// Status options for one order type, preceded by "All Status".
fn status_options(order_type: OrderType) -> Vec<FilterOption> {
    std::iter::once(FilterOption::new("all", "All Status"))
        .chain(
            order_type
                .allowed_statuses()
                .iter()
                .map(|s: &OrderStatus| FilterOption::new(s.as_str(), s.label())),
        )
        .collect()
}

/// Build the order table configuration for one order type.
///
/// Food tables get a restaurant filter built from `restaurants`.
#[must_use]
pub fn orders_table_config(
    order_type: OrderType,
    restaurants: &[Restaurant],
    applied: &OrderFilter,
) -> DataTableConfig {
    let mut config = DataTableConfig::new(&format!("{}-orders", order_type.as_str()))
        .column(TableColumn::new("id", "Order ID"))
        .column(TableColumn::new("customer", "Customer"));
    if order_type == OrderType::Food {
        config = config.column(TableColumn::new("restaurant", "Restaurant"));
    }
    config = config
        .column(TableColumn::new("items", "Items"))
        .column(TableColumn::new("total", "Total"))
        .column(TableColumn::new("payment", "Payment").visible(false))
        .column(TableColumn::new("status", "Status"))
        .column(TableColumn::new("updated", "Last Update"))
        .filter(
            TableFilter::text("search", "Search", "Search by order ID, customer name or phone")
                .with_value(applied.search.as_deref()),
        )
        .filter(
            TableFilter::select("status", "Status", status_options(order_type))
                .with_value(applied.status.as_deref()),
        );

    if order_type == OrderType::Food {
        let options = std::iter::once(FilterOption::new("all", "All Restaurants"))
            .chain(
                restaurants
                    .iter()
                    .map(|r| FilterOption::new(r.id.as_str(), &r.name)),
            )
            .collect();
        config = config.filter(
            TableFilter::select("restaurant", "Restaurant", options)
                .with_value(applied.restaurant.as_deref()),
        );
    }

    let title = format!("No {} orders found", order_type.as_str());
    config.empty_state(
        if order_type == OrderType::Food { "🍽️" } else { "🛒" },
        &title,
        Some("Try adjusting your search or filters"),
    )
}
