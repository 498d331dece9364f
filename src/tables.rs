use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::summary::{DailyBreakdown, MonthlyBillingSummary},
    quantity::cost::Kroner,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

pub fn build_summary_table(summary: &MonthlyBillingSummary) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new(format!("{} {}", summary.month, summary.year)).add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
    ]);

    let mut add_row = |title: &str, value: String, note: String| {
        table.add_row(vec![
            Cell::new(title),
            Cell::new(value).set_alignment(CellAlignment::Right),
            Cell::new(note).add_attribute(Attribute::Dim),
        ]);
    };

    add_row(
        "Data until",
        summary.data_until.format("%d.%m %H:%M").to_string(),
        format!("{} hours in {} days", summary.n_measurements, summary.days_counted),
    );
    add_row("Consumption", summary.consumption.to_string(), String::new());
    add_row(
        "Spot price",
        summary.spot_price.with_vat.to_string(),
        format!("{} without VAT", summary.spot_price.without_vat),
    );
    add_row(
        "Used price",
        summary.used_price.with_vat.to_string(),
        format!("{} without VAT", summary.used_price.without_vat),
    );
    add_row("Energy", summary.cost.to_string(), "supplier".to_owned());
    add_row(
        "Subsidy",
        format!("−{}", summary.subsidy),
        format!(
            "{:.0}% over {}",
            summary.subsidy_config.percentage * 100.0,
            summary.subsidy_config.threshold,
        ),
    );
    add_row("Energy after subsidy", summary.actual_energy_cost.to_string(), String::new());
    add_row(
        "Grid fixed fee",
        summary.grid.fixed_cost.to_string(),
        format!("{}, peak {}", summary.grid.fixed_tier.name, summary.grid.peak_usage),
    );
    add_row(
        "Grid day energy",
        summary.grid.day.cost.to_string(),
        summary.grid.day.consumption.to_string(),
    );
    add_row(
        "Grid night energy",
        summary.grid.night.cost.to_string(),
        summary.grid.night.consumption.to_string(),
    );
    add_row("Grid total", summary.grid.total.to_string(), String::new());
    add_row("Supplier fee", summary.supplier_fee.to_string(), String::new());
    add_row(
        "Total",
        summary.grand_total.to_string(),
        format!("{} per day", summary.average_daily_cost),
    );
    table
}

pub fn build_daily_table(days: &[DailyBreakdown]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Date", "Consumption", "Cost", "Price", "Allowance", "Net"]);
    for day in days {
        table.add_row(vec![
            Cell::new(day.date.format("%a %d.%m")).add_attribute(Attribute::Dim),
            Cell::new(&day.consumption).set_alignment(CellAlignment::Right),
            Cell::new(&day.cost).set_alignment(CellAlignment::Right),
            Cell::new(day.average_price.as_ref().map_or_else(String::new, ToString::to_string))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            Cell::new(&day.estimated_allowance).set_alignment(CellAlignment::Right),
            Cell::new(&day.net_cost)
                .set_alignment(CellAlignment::Right)
                .fg(if day.net_cost.raw > Kroner::ZERO { Color::Red } else { Color::Green }),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        calendar::Month,
        measurement::{MonthContext, fixtures},
        summary::build_summary,
    };

    #[test]
    fn test_build_tables() {
        let context = MonthContext::builder()
            .month(Month::Februar)
            .year(2023)
            .measurements(fixtures::hourly((2023, 2, 1), 48, |_| 1.0))
            .build();
        let summary = build_summary(&context).unwrap();

        let table = build_summary_table(&summary);
        assert_eq!(table.row_count(), 13);
        assert!(table.to_string().contains("Trinn 1"));

        let table = build_daily_table(&summary.days);
        assert_eq!(table.row_count(), 2);
    }
}
