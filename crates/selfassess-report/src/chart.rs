//! SVG charts.
//!
//! Produces self-contained SVG documents: a trend grid with one panel per
//! question, and per-session bar charts of answers and category totals.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use selfassess_core::config::Theme;
use selfassess_core::model::{
    Answer, Catalog, QuestionId, ScoredSession, LOW_SCORE_THRESHOLD, MAX_ANSWER,
};

const PANEL_COLUMNS: usize = 3;
const TREND_Y_RANGE: (f64, f64) = (-1.0, 6.0);
const ANSWER_Y_RANGE: (f64, f64) = (0.0, 6.0);

const FONT: &str = "font-family=\"sans-serif\" fill=\"#262626\"";

/// Escape a string for safe SVG text insertion.
fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn svg_open(width: f64, height: f64) -> String {
    format!(
        "<svg width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\" xmlns=\"http://www.w3.org/2000/svg\">\n  <rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n"
    )
}

fn text(x: f64, y: f64, size: u32, anchor: &str, content: &str) -> String {
    format!(
        "  <text x=\"{x:.1}\" y=\"{y:.1}\" font-size=\"{size}\" {FONT} text-anchor=\"{anchor}\">{}</text>\n",
        xml_escape(content)
    )
}

/// Map `value` in `range` onto a vertical pixel span starting at `top`.
fn scale_y(value: f64, range: (f64, f64), top: f64, height: f64) -> f64 {
    let clamped = value.clamp(range.0, range.1);
    top + height * (range.1 - clamped) / (range.1 - range.0)
}

/// Answers per question across sessions, in session order.
pub fn trend_series(sessions: &[ScoredSession]) -> BTreeMap<QuestionId, Vec<(NaiveDateTime, Answer)>> {
    let mut series: BTreeMap<QuestionId, Vec<(NaiveDateTime, Answer)>> = BTreeMap::new();
    for scored in sessions {
        for (&id, &answer) in &scored.session.answers {
            series
                .entry(id)
                .or_default()
                .push((scored.session.timestamp, answer));
        }
    }
    series
}

/// A grid of small panels, one per question, plotting answers against time.
///
/// Panels in the first row are titled with their question's category.
pub fn trend_chart(sessions: &[ScoredSession], catalog: &Catalog, theme: &Theme) -> String {
    let panel_w = 240.0;
    let panel_h = 70.0;
    let gap_x = 24.0;
    let gap_y = 14.0;
    let left = 36.0;
    let top = 36.0;
    let bottom = 34.0;

    let panels = catalog.len().max(1);
    let rows = panels.div_ceil(PANEL_COLUMNS);
    let width = left + PANEL_COLUMNS as f64 * (panel_w + gap_x);
    let height = top + rows as f64 * (panel_h + gap_y) + bottom;

    let series = trend_series(sessions);
    let first = sessions.iter().map(|s| s.session.timestamp).min();
    let last = sessions.iter().map(|s| s.session.timestamp).max();
    let span_ms = match (first, last) {
        (Some(a), Some(b)) => (b - a).num_milliseconds() as f64,
        _ => 0.0,
    };

    let mut svg = svg_open(width, height);

    for question in catalog.questions() {
        let row = question.id / PANEL_COLUMNS;
        let col = question.id % PANEL_COLUMNS;
        let x0 = left + col as f64 * (panel_w + gap_x);
        let y0 = top + row as f64 * (panel_h + gap_y);
        let color = theme.color(&question.category);

        svg.push_str(&format!(
            "  <rect x=\"{x0:.1}\" y=\"{y0:.1}\" width=\"{panel_w:.1}\" height=\"{panel_h:.1}\" fill=\"none\" stroke=\"#cccccc\"/>\n"
        ));
        if row == 0 {
            svg.push_str(&text(
                x0 + panel_w / 2.0,
                y0 - 8.0,
                13,
                "middle",
                theme.display_name(&question.category),
            ));
        }
        if col == 0 {
            for tick in [0.0, 5.0] {
                let y = scale_y(tick, TREND_Y_RANGE, y0, panel_h);
                svg.push_str(&text(x0 - 6.0, y + 4.0, 10, "end", &format!("{tick:.0}")));
            }
        }

        let points: Vec<(f64, f64)> = series
            .get(&question.id)
            .map(|values| {
                values
                    .iter()
                    .map(|(time, answer)| {
                        let fraction = match first {
                            Some(start) if span_ms > 0.0 => {
                                (*time - start).num_milliseconds() as f64 / span_ms
                            }
                            _ => 0.5,
                        };
                        let x = x0 + 8.0 + fraction * (panel_w - 16.0);
                        let y = scale_y(f64::from(*answer), TREND_Y_RANGE, y0, panel_h);
                        (x, y)
                    })
                    .collect()
            })
            .unwrap_or_default();

        if points.len() > 1 {
            let path: Vec<String> = points.iter().map(|(x, y)| format!("{x:.1},{y:.1}")).collect();
            svg.push_str(&format!(
                "  <polyline points=\"{}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"1.5\"/>\n",
                path.join(" ")
            ));
        }
        for (x, y) in &points {
            svg.push_str(&format!(
                "  <circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"3\" fill=\"{color}\"/>\n"
            ));
        }
    }

    // Date labels under the bottom row.
    if let (Some(first), Some(last)) = (first, last) {
        let y = top + rows as f64 * (panel_h + gap_y) + 10.0;
        for col in 0..PANEL_COLUMNS {
            let x0 = left + col as f64 * (panel_w + gap_x);
            svg.push_str(&text(x0 + 8.0, y, 10, "start", &first.format("%d.%m.%Y").to_string()));
            if last != first {
                svg.push_str(&text(
                    x0 + panel_w - 8.0,
                    y,
                    10,
                    "end",
                    &last.format("%d.%m.%Y").to_string(),
                ));
            }
        }
    }

    svg.push_str("</svg>\n");
    svg
}

/// Bar per question colored by category, with a dotted reference line at 3.
pub fn question_chart(scored: &ScoredSession, catalog: &Catalog, theme: &Theme) -> Result<String> {
    let bar_w = 22.0;
    let plot_h = 260.0;
    let left = 44.0;
    let top = 44.0;
    let legend_w = 190.0;

    let session = &scored.session;
    let slots = session.answers.keys().next_back().map_or(1, |&id| id + 1);
    let plot_w = slots as f64 * bar_w;
    let width = left + plot_w + 20.0 + legend_w;
    let height = top + plot_h + 40.0;

    let mut svg = svg_open(width, height);
    svg.push_str(&text(
        width / 2.0,
        24.0,
        15,
        "middle",
        &format!("Results for questions on {}", session.display_time()),
    ));
    push_y_axis(&mut svg, left, top, plot_w, plot_h, ANSWER_Y_RANGE, 1.0);

    let mut legend: Vec<&str> = Vec::new();
    for (&id, &answer) in &session.answers {
        let category = catalog.category_of(id)?;
        if !legend.contains(&category) {
            legend.push(category);
        }
        let x = left + id as f64 * bar_w;
        let y = scale_y(f64::from(answer), ANSWER_Y_RANGE, top, plot_h);
        let base = scale_y(0.0, ANSWER_Y_RANGE, top, plot_h);
        svg.push_str(&format!(
            "  <rect x=\"{:.1}\" y=\"{y:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\" stroke=\"#ffffff\"/>\n",
            x,
            bar_w,
            base - y,
            theme.color(category)
        ));
        svg.push_str(&text(x + bar_w / 2.0, base + 14.0, 9, "middle", &id.to_string()));
    }

    let reference = scale_y(f64::from(LOW_SCORE_THRESHOLD), ANSWER_Y_RANGE, top, plot_h);
    svg.push_str(&format!(
        "  <line x1=\"{left:.1}\" y1=\"{reference:.1}\" x2=\"{:.1}\" y2=\"{reference:.1}\" stroke=\"#262626\" stroke-width=\"2\" stroke-dasharray=\"2,4\" opacity=\"0.6\"/>\n",
        left + plot_w
    ));

    push_legend(&mut svg, left + plot_w + 20.0, top, &legend, theme);
    svg.push_str("</svg>\n");
    Ok(svg)
}

/// One bar per category (sorted by tag) with that category's total.
pub fn category_chart(scored: &ScoredSession, catalog: &Catalog, theme: &Theme) -> String {
    let bar_w = 80.0;
    let plot_h = 260.0;
    let left = 44.0;
    let top = 44.0;
    let legend_w = 190.0;

    let largest = catalog.category_sizes().values().copied().max().unwrap_or(1).max(1);
    let y_max = (largest as i64 * i64::from(MAX_ANSWER))
        .max(scored.category_totals.values().copied().max().unwrap_or(0));
    let range = (0.0, y_max as f64);

    let slots = scored.category_totals.len().max(1);
    let plot_w = slots as f64 * bar_w;
    let width = left + plot_w + 20.0 + legend_w;
    let height = top + plot_h + 40.0;

    let mut svg = svg_open(width, height);
    svg.push_str(&text(
        width / 2.0,
        24.0,
        15,
        "middle",
        &format!("Results for categories on {}", scored.session.display_time()),
    ));
    let step = (y_max as f64 / 6.0).ceil().max(1.0);
    push_y_axis(&mut svg, left, top, plot_w, plot_h, range, step);

    let base = scale_y(0.0, range, top, plot_h);
    let mut legend = Vec::new();
    for (i, (category, &total)) in scored.category_totals.iter().enumerate() {
        legend.push(category.as_str());
        let x = left + i as f64 * bar_w;
        let y = scale_y(total as f64, range, top, plot_h);
        svg.push_str(&format!(
            "  <rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"{bar_w:.1}\" height=\"{:.1}\" fill=\"{}\" stroke=\"#ffffff\"/>\n",
            base - y,
            theme.color(category)
        ));
        svg.push_str(&text(x + bar_w / 2.0, y - 4.0, 11, "middle", &total.to_string()));
    }

    push_legend(&mut svg, left + plot_w + 20.0, top, &legend, theme);
    svg.push_str("</svg>\n");
    svg
}

fn push_y_axis(
    svg: &mut String,
    left: f64,
    top: f64,
    plot_w: f64,
    plot_h: f64,
    range: (f64, f64),
    step: f64,
) {
    let mut tick = range.0;
    while tick <= range.1 {
        let y = scale_y(tick, range, top, plot_h);
        svg.push_str(&format!(
            "  <line x1=\"{left:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#eeeeee\"/>\n",
            left + plot_w
        ));
        svg.push_str(&text(left - 6.0, y + 4.0, 10, "end", &format!("{tick:.0}")));
        tick += step;
    }
    svg.push_str(&format!(
        "  <line x1=\"{left:.1}\" y1=\"{top:.1}\" x2=\"{left:.1}\" y2=\"{:.1}\" stroke=\"#262626\"/>\n",
        top + plot_h
    ));
}

fn push_legend(svg: &mut String, x: f64, top: f64, categories: &[&str], theme: &Theme) {
    for (i, category) in categories.iter().enumerate() {
        let y = top + i as f64 * 20.0;
        svg.push_str(&format!(
            "  <rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"12\" height=\"12\" fill=\"{}\"/>\n",
            theme.color(category)
        ));
        svg.push_str(&text(x + 18.0, y + 10.0, 12, "start", theme.display_name(category)));
    }
}

/// Write the trend chart and both per-session charts into `dir`.
///
/// Returns the paths written, trend chart first.
pub fn write_charts(
    sessions: &[ScoredSession],
    catalog: &Catalog,
    theme: &Theme,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create chart directory {}", dir.display()))?;

    let mut written = Vec::new();
    let mut write = |name: String, svg: String| -> Result<()> {
        let path = dir.join(name);
        std::fs::write(&path, svg)
            .with_context(|| format!("failed to write chart {}", path.display()))?;
        tracing::info!("wrote {}", path.display());
        written.push(path);
        Ok(())
    };

    write("all-questions.svg".into(), trend_chart(sessions, catalog, theme))?;
    for scored in sessions {
        let stamp = scored.session.file_stamp();
        write(
            format!("results-q-{stamp}.svg"),
            question_chart(scored, catalog, theme)?,
        )?;
        write(
            format!("results-c-{stamp}.svg"),
            category_chart(scored, catalog, theme),
        )?;
    }

    Ok(written)
}
