use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use trijet_mass::histogram::Histogram;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Mass histogram (central panel)
// ---------------------------------------------------------------------------

/// Bars for one histogram: regular bins at their centres, plus one bar each
/// side for underflow and overflow when requested.
fn histogram_bars(hist: &Histogram, with_flow: bool) -> Vec<Bar> {
    let mut bars: Vec<Bar> = hist
        .bins()
        .map(|(lo, hi, count)| Bar::new((lo + hi) / 2.0, count as f64).width(hi - lo))
        .collect();

    if with_flow {
        let edges = hist.edges();
        let width = edges[1] - edges[0];
        let first = edges[0];
        let last = edges[edges.len() - 1];
        bars.insert(
            0,
            Bar::new(first - width / 2.0, hist.underflow() as f64)
                .width(width)
                .name("underflow"),
        );
        bars.push(
            Bar::new(last + width / 2.0, hist.overflow() as f64)
                .width(width)
                .name("overflow"),
        );
    }
    bars
}

/// Render the stacked mass histogram of all visible datasets.
pub fn mass_histogram(ui: &mut Ui, state: &AppState) {
    if state.visible.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No dataset selected");
        });
        return;
    }

    let mut charts: Vec<BarChart> = Vec::with_capacity(state.visible.len());
    for &idx in &state.visible {
        let dataset = &state.datasets[idx];
        let chart = BarChart::new(histogram_bars(&dataset.histogram, state.show_flow_bins))
            .name(&dataset.name)
            .color(state.colors.color_for(idx));
        let chart = {
            let below: Vec<&BarChart> = charts.iter().collect();
            chart.stack_on(&below)
        };
        charts.push(chart);
    }

    Plot::new("mass_histogram")
        .legend(Legend::default())
        .x_axis_label("Trijet mass [GeV]")
        .y_axis_label("Events")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_bars_sit_outside_the_edges() {
        let hist = Histogram::from_values(&[-3.0, 120.0, 900.0]);
        assert_eq!(histogram_bars(&hist, false).len(), 10);

        let bars = histogram_bars(&hist, true);
        assert_eq!(bars.len(), 12);
        assert_eq!(bars[0].argument, -25.0);
        assert_eq!(bars[0].value, 1.0);
        assert_eq!(bars[3].argument, 125.0);
        assert_eq!(bars[3].value, 1.0);
        assert_eq!(bars[11].argument, 525.0);
        assert_eq!(bars[11].value, 1.0);
    }
}
