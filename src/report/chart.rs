use super::summary::day_label;
use super::types::ReportSummary;

/// Rendered when there are no reports to plot
pub const NO_DATA_PLACEHOLDER: &str = "<p>No data available for chart.</p>";

const CHART_WIDTH: f64 = 900.0;
const CHART_HEIGHT: f64 = 400.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 80.0;
const MARGIN_LEFT: f64 = 60.0;

const PASSED_FILL: &str = "rgba(75, 192, 75, 0.85)";
const FAILED_FILL: &str = "rgba(255, 99, 132, 0.85)";

/// Render the pass/fail history as a stacked bar chart. One band per
/// report in input order; all geometry is precomputed server-side so the
/// output embeds without any client-side layout.
pub fn render_bar_chart(reports: &[ReportSummary]) -> String {
    if reports.is_empty() {
        return NO_DATA_PLACEHOLDER.to_string();
    }

    let width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

    // Floor of 1 so a run of all-zero reports still yields a valid scale
    let max_count = reports.iter().map(|r| r.total_chats).max().unwrap_or(0).max(1) as f64;
    let tick_count = (max_count.ceil() as usize).min(5);

    let band_width = width / reports.len() as f64;
    let bar_width = band_width * 0.8;
    let bar_padding = band_width * 0.2;

    let mut y_axis = String::new();
    for tick in tick_values(max_count, tick_count) {
        y_axis.push_str(&format!(
            r##"
        <g transform="translate(0, {y})">
            <line x2="{width}" stroke="#e0e0e0" stroke-width="0.5" />
            <text x="-10" y="5" text-anchor="end" font-size="12" fill="#5f6368">{label}</text>
        </g>
    "##,
            y = y_scale(tick, max_count, height),
            width = width,
            label = tick_label(tick),
        ));
    }

    let mut bars = String::new();
    for (i, report) in reports.iter().enumerate() {
        let passed = report.total_passed as f64;
        let failed = report.total_failed as f64;
        let x = i as f64 * band_width + bar_padding / 2.0;

        bars.push_str(&format!(
            r##"
            <g transform="translate({x}, 0)">
                <rect y="{passed_y}" width="{bar_width}" height="{passed_h}" fill="{passed_fill}" />
                <rect y="{failed_y}" width="{bar_width}" height="{failed_h}" fill="{failed_fill}" />
                <text x="{label_x}" y="{label_y}" transform="rotate(45, {label_x}, {label_y})" text-anchor="start" font-size="10" fill="#5f6368">{label}</text>
            </g>
        "##,
            x = x,
            bar_width = bar_width,
            passed_y = y_scale(passed, max_count, height),
            passed_h = (passed / max_count) * height,
            passed_fill = PASSED_FILL,
            failed_y = y_scale(passed + failed, max_count, height),
            failed_h = (failed / max_count) * height,
            failed_fill = FAILED_FILL,
            label_x = bar_width / 2.0,
            label_y = height + 20.0,
            label = day_label(report.timestamp_started.as_deref()),
        ));
    }

    format!(
        r##"
        <svg width="{chart_width}" height="{chart_height}" font-family="Arial, sans-serif" style="background-color: transparent;">
            <text x="{title_x}" y="25" text-anchor="middle" font-size="16" fill="#202124">Report Passed / Failed Counts</text>
            <g transform="translate({margin_left}, {margin_top})">
                <line x1="0" y1="0" x2="0" y2="{height}" stroke="#5f6368" />
                <line x1="0" y1="{height}" x2="{width}" y2="{height}" stroke="#5f6368" />
                <text transform="rotate(-90)" y="-45" x="{axis_label_x}" text-anchor="middle" fill="#202124" font-size="14">Number of tests</text>
                {y_axis}
                {bars}
            </g>
            <g transform="translate({legend_x}, {legend_y})">
                <rect x="0" y="0" width="12" height="12" fill="{passed_fill}" />
                <text x="18" y="11" font-size="12" fill="#5f6368">Passed</text>
                <rect x="80" y="0" width="12" height="12" fill="{failed_fill}" />
                <text x="98" y="11" font-size="12" fill="#5f6368">Failed</text>
            </g>
        </svg>
    "##,
        chart_width = CHART_WIDTH,
        chart_height = CHART_HEIGHT,
        title_x = CHART_WIDTH / 2.0,
        margin_left = MARGIN_LEFT,
        margin_top = MARGIN_TOP,
        width = width,
        height = height,
        axis_label_x = -height / 2.0,
        y_axis = y_axis,
        bars = bars,
        legend_x = CHART_WIDTH / 2.0 - 60.0,
        legend_y = CHART_HEIGHT - 15.0,
        passed_fill = PASSED_FILL,
        failed_fill = FAILED_FILL,
    )
}

/// Linear scale, origin at the plot baseline
fn y_scale(value: f64, max_count: f64, height: f64) -> f64 {
    height - (value / max_count) * height
}

/// Evenly spaced tick values from 0 to `max_count` inclusive
fn tick_values(max_count: f64, tick_count: usize) -> Vec<f64> {
    (0..=tick_count)
        .map(|i| (max_count / tick_count as f64) * i as f64)
        .collect()
}

/// Whole ticks label as integers, fractional ones with one decimal
fn tick_label(tick: f64) -> String {
    if tick.fract() == 0.0 {
        format!("{}", tick as u64)
    } else {
        format!("{:.1}", tick)
    }
}
