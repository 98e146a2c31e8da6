//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements, drawn back-to-front so later layers win a cell:
//! - fitted curve: `-`
//! - prediction line: `*`
//! - observed log-OD points: `o`
//! - the selected peak: `X`
//!
//! The core hands over renderable data ([`WellFit`]); nothing here feeds
//! back into estimation.

use crate::domain::{TimeUnit, WellFit, WellId};
use crate::io::curve::WellCurveFile;

/// Render one well's diagnostic plot from an in-memory fit.
pub fn render_well_plot(
    well: &WellId,
    fit: &WellFit,
    time_unit: TimeUnit,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (t_min, t_max) = time_range(fit).unwrap_or((0.0, 1.0));
    let (v_min, v_max) = value_range(fit).unwrap_or((0.0, 1.0));
    let (v_min, v_max) = pad_range(v_min, v_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    for w in fit.fitted.windows(2) {
        draw_segment(&mut grid, w[0], w[1], t_min, t_max, v_min, v_max, '-');
    }
    let line = &fit.prediction;
    for i in 1..line.time.len() {
        draw_segment(
            &mut grid,
            (line.time[i - 1], line.value[i - 1]),
            (line.time[i], line.value[i]),
            t_min,
            t_max,
            v_min,
            v_max,
            '*',
        );
    }
    for &(t, v) in &fit.log_points {
        plot_cell(&mut grid, t, v, t_min, t_max, v_min, v_max, 'o');
    }

    let e = &fit.estimate;
    // Anchor of the prediction line = the peak on the log scale.
    let mid = line.time.len() / 2;
    if let (Some(&t), Some(&v)) = (line.time.get(mid), line.value.get(mid)) {
        plot_cell(&mut grid, t, v, t_min, t_max, v_min, v_max, 'X');
    }

    let unit = time_unit.label();
    let mut out = String::new();
    out.push_str(&format!(
        "{well}: rate={:.5}/{unit} doubling={:.1}{unit} t_max={:.1}{unit}\n",
        e.rate, e.doubling_time, e.max_time
    ));
    out.push_str(&format!(
        "t=[{t_min:.1}, {t_max:.1}]{unit} | ln(OD)=[{v_min:.2}, {v_max:.2}]\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

/// Render a plot from a saved curve JSON file.
pub fn render_well_plot_from_curve_file(
    curve: &WellCurveFile,
    width: usize,
    height: usize,
) -> String {
    render_well_plot(&curve.well, &curve.fit, curve.time_unit, width, height)
}

fn time_range(fit: &WellFit) -> Option<(f64, f64)> {
    let mut min_t = f64::INFINITY;
    let mut max_t = f64::NEG_INFINITY;
    for &(t, _) in fit.log_points.iter().chain(fit.fitted.iter()) {
        min_t = min_t.min(t);
        max_t = max_t.max(t);
    }
    for &t in &fit.prediction.time {
        min_t = min_t.min(t);
        max_t = max_t.max(t);
    }
    (min_t.is_finite() && max_t.is_finite() && max_t > min_t).then_some((min_t, max_t))
}

fn value_range(fit: &WellFit) -> Option<(f64, f64)> {
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;
    for &(_, v) in fit.log_points.iter().chain(fit.fitted.iter()) {
        min_v = min_v.min(v);
        max_v = max_v.max(v);
    }
    // The prediction line is clipped to the observed value range rather than
    // allowed to stretch the axes.
    (min_v.is_finite() && max_v.is_finite() && max_v > min_v).then_some((min_v, max_v))
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).max(1e-12);
    (min - span * frac, max + span * frac)
}

#[allow(clippy::too_many_arguments)]
fn draw_segment(
    grid: &mut [Vec<char>],
    a: (f64, f64),
    b: (f64, f64),
    t_min: f64,
    t_max: f64,
    v_min: f64,
    v_max: f64,
    ch: char,
) {
    // Sample the segment densely enough to cover every column it crosses.
    let width = grid[0].len();
    let steps = width.max(2);
    for i in 0..=steps {
        let u = i as f64 / steps as f64;
        let t = a.0 + u * (b.0 - a.0);
        let v = a.1 + u * (b.1 - a.1);
        plot_cell(grid, t, v, t_min, t_max, v_min, v_max, ch);
    }
}

#[allow(clippy::too_many_arguments)]
fn plot_cell(
    grid: &mut [Vec<char>],
    t: f64,
    v: f64,
    t_min: f64,
    t_max: f64,
    v_min: f64,
    v_max: f64,
    ch: char,
) {
    let height = grid.len();
    let width = grid[0].len();

    if !(t.is_finite() && v.is_finite()) {
        return;
    }
    let x = ((t - t_min) / (t_max - t_min) * (width as f64 - 1.0)).round();
    let y = ((v - v_min) / (v_max - v_min) * (height as f64 - 1.0)).round();
    if x < 0.0 || y < 0.0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= width || y >= height {
        return;
    }
    // Flip so larger values render higher on screen.
    grid[height - 1 - y][x] = ch;
}
