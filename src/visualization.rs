//! Visualization module: the dashboard page.
//!
//! Produces a self-contained HTML string that loads plotly.js and draws:
//! - Partner locations map, coloured by specialization
//! - Disease occurrence density map weighted by cases
//! - Partners per country, specialization donut, cases over time,
//!   and stacked partner involvement charts
//! - The partner details table
//!
//! This module turns the typed summaries into plotly figure JSON and emits
//! the HTML shell around them.
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::RenderConfig;
use crate::error::DashboardError;
use crate::model::{DashboardView, Summaries};
use crate::selection::FilterSelection;
use crate::tables::Partner;

/// plotly's sequential RdBu palette, used for the specialization donut.
const RDBU: [&str; 11] = [
    "rgb(103,0,31)",
    "rgb(178,24,43)",
    "rgb(214,96,77)",
    "rgb(244,165,130)",
    "rgb(253,219,199)",
    "rgb(247,247,247)",
    "rgb(209,229,240)",
    "rgb(146,197,222)",
    "rgb(67,147,195)",
    "rgb(33,102,172)",
    "rgb(5,48,97)",
];

const EMPTY_PLACEHOLDER: &str = "No data for the current selection.";

// ── Intermediate data structures ────────────────────────────────────────────

struct ChartSection {
    id: &'static str,
    title: &'static str,
    figure: Option<Value>,
}

// ── Figure builders ─────────────────────────────────────────────────────────

fn figure(data: Vec<Value>, layout: Value) -> Value {
    json!({ "data": data, "layout": layout })
}

/// Group items by a key, keeping first-seen key order.
fn grouped<'a, T, K: PartialEq>(
    items: &'a [T],
    key: impl Fn(&'a T) -> K,
) -> Vec<(K, Vec<&'a T>)> {
    let mut groups: Vec<(K, Vec<&'a T>)> = Vec::new();
    for item in items {
        let k = key(item);
        match groups.iter_mut().find(|(g, _)| *g == k) {
            Some((_, members)) => members.push(item),
            None => groups.push((k, vec![item])),
        }
    }
    groups
}

fn partners_map(partners: &[Partner], config: &RenderConfig) -> Option<Value> {
    if partners.is_empty() {
        return None;
    }

    let n = partners.len() as f64;
    let center_lat = partners.iter().map(|p| p.latitude).sum::<f64>() / n;
    let center_lon = partners.iter().map(|p| p.longitude).sum::<f64>() / n;

    let traces = grouped(partners, |p| p.specialization.as_str())
        .into_iter()
        .map(|(spec, members)| {
            json!({
                "type": "scattermapbox",
                "mode": "markers",
                "name": spec,
                "lat": members.iter().map(|p| p.latitude).collect::<Vec<_>>(),
                "lon": members.iter().map(|p| p.longitude).collect::<Vec<_>>(),
                "text": members.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
                "customdata": members
                    .iter()
                    .map(|p| [p.specialization.as_str(), p.country.as_str(), p.city.as_str()])
                    .collect::<Vec<_>>(),
                "hovertemplate": "<b>%{text}</b><br>Specialization: %{customdata[0]}\
                                  <br>Country: %{customdata[1]}<br>City: %{customdata[2]}\
                                  <extra></extra>",
                "marker": { "size": 10 },
            })
        })
        .collect();

    Some(figure(
        traces,
        json!({
            "mapbox": {
                "style": config.map_style,
                "zoom": config.map_zoom,
                "center": { "lat": center_lat, "lon": center_lon },
            },
            "margin": { "r": 0, "t": 0, "l": 0, "b": 0 },
            "height": config.map_height,
        }),
    ))
}

fn disease_density_map(summaries: &Summaries, config: &RenderConfig) -> Option<Value> {
    let rows = &summaries.disease_locations;
    if rows.is_empty() {
        return None;
    }

    let trace = json!({
        "type": "densitymapbox",
        "lat": rows.iter().map(|r| r.latitude).collect::<Vec<_>>(),
        "lon": rows.iter().map(|r| r.longitude).collect::<Vec<_>>(),
        "z": rows.iter().map(|r| r.cases).collect::<Vec<_>>(),
        "text": rows.iter().map(|r| r.disease.as_str()).collect::<Vec<_>>(),
        "radius": config.density_radius,
    });

    Some(figure(
        vec![trace],
        json!({
            "mapbox": {
                "style": config.map_style,
                "zoom": config.map_zoom,
                "center": {
                    "lat": config.density_center[0],
                    "lon": config.density_center[1],
                },
            },
            "margin": { "r": 0, "t": 0, "l": 0, "b": 0 },
            "height": config.map_height,
        }),
    ))
}

fn partners_per_country_bar(summaries: &Summaries) -> Option<Value> {
    let rows = &summaries.partners_per_country;
    if rows.is_empty() {
        return None;
    }

    let traces = rows
        .iter()
        .map(|r| {
            json!({
                "type": "bar",
                "name": r.country,
                "x": [r.country],
                "y": [r.partners],
                "text": [r.partners],
                "textposition": "auto",
            })
        })
        .collect();

    Some(figure(
        traces,
        json!({
            "xaxis": { "title": { "text": "Country" } },
            "yaxis": { "title": { "text": "Number of Partners" } },
            "showlegend": false,
        }),
    ))
}

fn specialization_donut(summaries: &Summaries) -> Option<Value> {
    let rows = &summaries.specialization_distribution;
    if rows.is_empty() {
        return None;
    }

    let colors: Vec<&str> = (0..rows.len()).map(|i| RDBU[i % RDBU.len()]).collect();
    let trace = json!({
        "type": "pie",
        "labels": rows.iter().map(|r| r.specialization.as_str()).collect::<Vec<_>>(),
        "values": rows.iter().map(|r| r.count).collect::<Vec<_>>(),
        "hole": 0.4,
        "sort": false,
        "textposition": "inside",
        "textinfo": "percent+label",
        "marker": { "colors": colors },
    });

    Some(figure(vec![trace], json!({})))
}

fn cases_over_time_line(summaries: &Summaries) -> Option<Value> {
    let rows = &summaries.cases_over_time;
    if rows.is_empty() {
        return None;
    }

    let traces = grouped(rows, |r| r.disease.as_str())
        .into_iter()
        .map(|(disease, members)| {
            json!({
                "type": "scatter",
                "mode": "lines+markers",
                "name": disease,
                "x": members.iter().map(|r| r.year).collect::<Vec<_>>(),
                "y": members.iter().map(|r| r.cases).collect::<Vec<_>>(),
            })
        })
        .collect();

    Some(figure(
        traces,
        json!({
            "xaxis": { "title": { "text": "Year" }, "dtick": 1 },
            "yaxis": { "title": { "text": "Number of Cases" } },
        }),
    ))
}

fn involvement_stacked_bar(summaries: &Summaries) -> Option<Value> {
    let rows = &summaries.partner_involvement;
    if rows.is_empty() {
        return None;
    }

    let traces = grouped(rows, |r| r.specialization.as_str())
        .into_iter()
        .map(|(spec, members)| {
            json!({
                "type": "bar",
                "name": spec,
                "x": members.iter().map(|r| r.country.as_str()).collect::<Vec<_>>(),
                "y": members.iter().map(|r| r.count).collect::<Vec<_>>(),
                "text": members.iter().map(|r| r.count).collect::<Vec<_>>(),
                "textposition": "inside",
            })
        })
        .collect();

    Some(figure(
        traces,
        json!({
            "barmode": "stack",
            "xaxis": { "title": { "text": "Country" } },
            "yaxis": { "title": { "text": "Number of Partners" } },
        }),
    ))
}

// ── HTML generation ─────────────────────────────────────────────────────────

/// Main entry point: generates a self-contained HTML page for one view.
pub fn generate_dashboard_html(
    view: &DashboardView,
    config: &RenderConfig,
) -> Result<String, DashboardError> {
    let partners = view.partners.records()?;
    let summaries = &view.summaries;

    let sections = [
        ChartSection {
            id: "partners-map",
            title: "Healthcare Partners Map",
            figure: partners_map(&partners, config),
        },
        ChartSection {
            id: "disease-map",
            title: "Disease Occurrence Map",
            figure: disease_density_map(summaries, config),
        },
        ChartSection {
            id: "partners-per-country",
            title: "Number of Partners per Country",
            figure: partners_per_country_bar(summaries),
        },
        ChartSection {
            id: "specializations",
            title: "Partner Specializations Distribution",
            figure: specialization_donut(summaries),
        },
        ChartSection {
            id: "cases-over-time",
            title: "NTD Cases Over Time",
            figure: cases_over_time_line(summaries),
        },
        ChartSection {
            id: "partner-involvement",
            title: "Partner Involvement by Specialization",
            figure: involvement_stacked_bar(summaries),
        },
    ];

    let mut charts = String::new();
    let mut plots = String::new();
    for (i, section) in sections.iter().enumerate() {
        // The two maps share the first row, 2:1.
        let class = match i {
            0 => "panel wide",
            1 => "panel narrow",
            _ => "panel full",
        };
        charts.push_str(&format!(
            r#"<section class="{class}"><h2>{title}</h2>"#,
            class = class,
            title = escape_html(section.title),
        ));
        match &section.figure {
            Some(fig) => {
                charts.push_str(&format!(
                    r#"<div id="{}" class="chart"></div>"#,
                    section.id
                ));
                plots.push_str(&format!(
                    "Plotly.newPlot(\"{id}\", {data}, {layout}, {{responsive: true}});\n",
                    id = section.id,
                    data = script_json(&fig["data"])?,
                    layout = script_json(&fig["layout"])?,
                ));
            }
            None => {
                charts.push_str(&format!(r#"<p class="empty">{}</p>"#, EMPTY_PLACEHOLDER));
            }
        }
        charts.push_str("</section>\n");
    }

    let html = format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{plotly_src}"></script>
<style>
  body {{ margin:0; font-family:sans-serif; color:#212529; display:flex; }}
  aside {{ width:260px; padding:16px; background:#f8f9fa; border-right:1px solid #dee2e6; min-height:100vh; }}
  aside h2 {{ font-size:16px; }}
  aside dt {{ font-weight:600; margin-top:8px; }}
  main {{ flex:1; padding:16px; display:flex; flex-wrap:wrap; gap:16px; }}
  main h1 {{ width:100%; font-size:24px; margin:0; }}
  .panel {{ box-sizing:border-box; border:1px solid #dee2e6; border-radius:4px; padding:8px; }}
  .panel h2 {{ font-size:16px; margin:4px 0 8px; }}
  .wide {{ flex:2 1 0; }}
  .narrow {{ flex:1 1 0; }}
  .full {{ width:100%; }}
  .empty {{ color:#868e96; font-style:italic; }}
  table {{ border-collapse:collapse; width:100%; font-size:13px; }}
  th, td {{ border:1px solid #dee2e6; padding:4px 8px; text-align:left; }}
  th {{ background:#f1f3f5; }}
  footer {{ width:100%; font-size:11px; color:#868e96; }}
</style>
</head>
<body>
<aside>
<h2>Filters</h2>
{filters}
</aside>
<main>
<h1>{title}</h1>
{charts}<section class="panel full"><h2>Partner Details</h2>
{table}
</section>
<footer>Generated {generated}</footer>
</main>
<script>
{plots}</script>
</body>
</html>
"##,
        title = escape_html(&config.title),
        plotly_src = escape_html(&config.plotly_src),
        filters = filters_html(&view.selection),
        charts = charts,
        table = partner_table_html(summaries),
        generated = Utc::now().format("%Y-%m-%d %H:%M UTC"),
        plots = plots,
    );

    Ok(html)
}

fn filters_html(selection: &FilterSelection) -> String {
    let list = |items: &std::collections::BTreeSet<String>| {
        if items.is_empty() {
            "<em>none</em>".to_string()
        } else {
            items
                .iter()
                .map(|s| escape_html(s))
                .collect::<Vec<_>>()
                .join(", ")
        }
    };
    format!(
        "<dl><dt>Countries</dt><dd>{}</dd><dt>Diseases</dt><dd>{}</dd><dt>Years</dt><dd>{}</dd></dl>",
        list(&selection.countries),
        list(&selection.diseases),
        selection.years,
    )
}

fn partner_table_html(summaries: &Summaries) -> String {
    let rows = &summaries.partner_details;
    if rows.is_empty() {
        return format!(r#"<p class="empty">{}</p>"#, EMPTY_PLACEHOLDER);
    }

    let mut s = String::from(
        "<table><thead><tr><th>Partner ID</th><th>Name</th><th>Country</th>\
         <th>City</th><th>Specialization</th></tr></thead><tbody>\n",
    );
    for r in rows {
        s.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&r.partner_id),
            escape_html(&r.name),
            escape_html(&r.country),
            escape_html(&r.city),
            escape_html(&r.specialization),
        ));
    }
    s.push_str("</tbody></table>");
    s
}

// ── JSON output ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    selection: &'a FilterSelection,
    partner_rows: usize,
    disease_rows: usize,
    summaries: &'a Summaries,
}

/// Pretty-printed JSON with the selection and every summary.
pub fn generate_dashboard_json(view: &DashboardView) -> Result<String, DashboardError> {
    let report = JsonReport {
        generated_at: Utc::now().to_rfc3339(),
        selection: &view.selection,
        partner_rows: view.partners.height(),
        disease_rows: view.diseases.height(),
        summaries: &view.summaries,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

// ── Escaping helpers ────────────────────────────────────────────────────────

/// JSON that is safe to inline in a `<script>` block.
fn script_json(value: &Value) -> Result<String, DashboardError> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
