//! PNG rendering of the selected chart view with plotters.

use std::ops::Range;
use std::path::Path;

use pairlens_core::{ChartView, CorrelationMatrix, PriceChart, ReturnScatter};
use plotters::prelude::*;

use crate::error::CliError;

const SIZE: (u32, u32) = (1200, 700);
const MATRIX_SIZE: (u32, u32) = (700, 700);
const SERIES_COLORS: [RGBColor; 2] = [RGBColor(31, 119, 180), RGBColor(214, 39, 40)];

pub fn render(view: ChartView<'_>, path: &Path) -> Result<(), CliError> {
    match view {
        ChartView::PriceEvolution(prices) => draw_prices(prices, path),
        ChartView::ReturnRelationship(scatter) => draw_scatter(scatter, path),
        ChartView::CorrelationMatrix(matrix) => draw_matrix(matrix, path),
    }
}

fn chart_error(error: impl std::fmt::Display) -> CliError {
    CliError::Chart(error.to_string())
}

fn draw_prices(prices: &PriceChart, path: &Path) -> Result<(), CliError> {
    if prices.dates.len() < 2 {
        return Err(CliError::Chart(String::from(
            "price chart needs at least two dates",
        )));
    }

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let x_max = (prices.dates.len() - 1) as f64;
    let y_range = padded_range(prices.prices.iter().flatten().copied());

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Price evolution: {} vs {}",
                prices.symbols[0], prices.symbols[1]
            ),
            ("sans-serif", 32).into_font(),
        )
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..x_max, y_range)
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&|x| {
            prices
                .dates
                .get(x.round().max(0.0) as usize)
                .map(ToString::to_string)
                .unwrap_or_default()
        })
        .x_desc("Date")
        .y_desc("Adjusted close")
        .draw()
        .map_err(chart_error)?;

    for (index, color) in SERIES_COLORS.into_iter().enumerate() {
        chart
            .draw_series(LineSeries::new(
                prices.prices[index]
                    .iter()
                    .enumerate()
                    .map(|(i, price)| (i as f64, *price)),
                color,
            ))
            .map_err(chart_error)?
            .label(prices.symbols[index].as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_error)?;

    root.present().map_err(chart_error)
}

fn draw_scatter(scatter: &ReturnScatter, path: &Path) -> Result<(), CliError> {
    if scatter.points.is_empty() {
        return Err(CliError::Chart(String::from("scatter needs at least one point")));
    }

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let x_range = padded_range(scatter.points.iter().map(|(x, _)| *x));
    let y_range = padded_range(scatter.points.iter().map(|(_, y)| *y));

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Daily returns: {} vs {}",
                scatter.x_symbol, scatter.y_symbol
            ),
            ("sans-serif", 32).into_font(),
        )
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .x_desc(format!("{} daily return", scatter.x_symbol))
        .y_desc(format!("{} daily return", scatter.y_symbol))
        .x_label_formatter(&|x| format!("{:.1}%", x * 100.0))
        .y_label_formatter(&|y| format!("{:.1}%", y * 100.0))
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(
            scatter
                .points
                .iter()
                .map(|(x, y)| Circle::new((*x, *y), 3, SERIES_COLORS[0].mix(0.5).filled())),
        )
        .map_err(chart_error)?;

    root.present().map_err(chart_error)
}

fn draw_matrix(matrix: &CorrelationMatrix, path: &Path) -> Result<(), CliError> {
    let root = BitMapBackend::new(path, MATRIX_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation matrix", ("sans-serif", 32).into_font())
        .margin(20)
        .build_cartesian_2d(0.0..2.0, 0.0..2.0)
        .map_err(chart_error)?;

    let cells: Vec<(usize, usize, f64)> = (0..2)
        .flat_map(|row| (0..2).map(move |col| (row, col)))
        .map(|(row, col)| (row, col, matrix.values[row][col]))
        .collect();

    chart
        .draw_series(cells.iter().map(|&(row, col, value)| {
            let (x, y) = (col as f64, (1 - row) as f64);
            Rectangle::new(
                [(x, y), (x + 1.0, y + 1.0)],
                correlation_color(value).filled(),
            )
        }))
        .map_err(chart_error)?;

    chart
        .draw_series(cells.iter().map(|&(row, col, value)| {
            let (x, y) = (col as f64 + 0.5, (1 - row) as f64 + 0.5);
            Text::new(
                format!(
                    "{}/{}  {value:.4}",
                    matrix.labels[row], matrix.labels[col]
                ),
                (x - 0.3, y),
                ("sans-serif", 24).into_font(),
            )
        }))
        .map_err(chart_error)?;

    root.present().map_err(chart_error)
}

/// Axis range covering `values` with 10% headroom on both sides.
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let padding = (max - min).max(1e-8) * 0.1;
    (min - padding)..(max + padding)
}

/// Diverging colour: blue for -1, white for 0, red for +1.
fn correlation_color(value: f64) -> RGBColor {
    let t = value.clamp(-1.0, 1.0);
    let fade = |full: u8| -> u8 { (255.0 - (255.0 - f64::from(full)) * t.abs()).round() as u8 };
    if t >= 0.0 {
        RGBColor(255, fade(60), fade(60))
    } else {
        RGBColor(fade(60), fade(60), 255)
    }
}
