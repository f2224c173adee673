//! Console summary and Markdown/HTML result sheets.

use std::path::{Path, PathBuf};

use fg_controls::StrategyKind;
use fg_core::{EPSILON, cfm_hours_to_m3};
use fg_project::schema::Project;
use fg_sim::AggregateMetrics;

use crate::error::{AppError, AppResult};

pub const MARKDOWN_FILE: &str = "result_sheet.md";
pub const HTML_FILE: &str = "result_sheet.html";

const TITLE: &str = "Fan Speed Strategies: Result Sheet";
const HEADERS: [&str; 8] = [
    "Strategy",
    "Energy (Wh)",
    "SFP (W/CFM)",
    "Compliance",
    "Delivered (CFM·h)",
    "Shortfall (CFM·h)",
    "Oversupply (CFM·h)",
    "Savings vs Fixed",
];

/// Energy saved relative to the fixed-speed run, in percent.
pub fn savings_vs_fixed(fixed_wh: f64, wh: f64) -> f64 {
    100.0 * (fixed_wh - wh) / fixed_wh.max(EPSILON)
}

fn find(metrics: &[AggregateMetrics], kind: StrategyKind) -> AppResult<&AggregateMetrics> {
    metrics
        .iter()
        .find(|m| m.strategy == kind)
        .ok_or_else(|| AppError::InvalidInput(format!("metrics missing for {kind}")))
}

fn fixed_wh(metrics: &[AggregateMetrics]) -> AppResult<f64> {
    Ok(find(metrics, StrategyKind::Fixed)?.energy_wh)
}

/// One line per strategy with energy, SFP, compliance and savings.
pub fn console_summary(metrics: &[AggregateMetrics], horizon_label: &str) -> AppResult<String> {
    let whf = fixed_wh(metrics)?;
    let mut lines = vec![format!("=== SUMMARY: {horizon_label} ===")];
    for kind in StrategyKind::ALL {
        let m = find(metrics, kind)?;
        let mut line = format!(
            "{:<11} : {:>7.1} Wh | SFP={:.3} | Comp={:.0}%",
            kind.label(),
            m.energy_wh,
            m.sfp,
            m.compliance_pct
        );
        if kind != StrategyKind::Fixed {
            line.push_str(&format!(
                " | Savings vs fixed={:.0}%",
                savings_vs_fixed(whf, m.energy_wh)
            ));
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

/// Formatted key-results table rows, in [`HEADERS`] order.
pub fn table_rows(metrics: &[AggregateMetrics]) -> AppResult<Vec<[String; 8]>> {
    let whf = fixed_wh(metrics)?;
    StrategyKind::ALL
        .iter()
        .map(|&kind| {
            let m = find(metrics, kind)?;
            Ok([
                kind.label().to_string(),
                format!("{:.1}", m.energy_wh),
                format!("{:.3}", m.sfp),
                format!("{:.0}%", m.compliance_pct),
                format!("{:.1}", m.delivered_cfm_h),
                format!("{:.1}", m.shortfall_cfm_h),
                format!("{:.1}", m.oversupply_cfm_h),
                format!("{:.0}%", savings_vs_fixed(whf, m.energy_wh)),
            ])
        })
        .collect()
}

struct Headline {
    mode_savings: f64,
    variable_savings: f64,
    variable_compliance: f64,
    /// Air moved by the variable strategy (m³)
    variable_volume_m3: f64,
}

fn headline(metrics: &[AggregateMetrics]) -> AppResult<Headline> {
    let whf = fixed_wh(metrics)?;
    let mode = find(metrics, StrategyKind::ModeSwitch)?;
    let variable = find(metrics, StrategyKind::Variable)?;
    Ok(Headline {
        mode_savings: savings_vs_fixed(whf, mode.energy_wh),
        variable_savings: savings_vs_fixed(whf, variable.energy_wh),
        variable_compliance: variable.compliance_pct,
        variable_volume_m3: cfm_hours_to_m3(variable.delivered_cfm_h),
    })
}

fn parameters_json(project: &Project) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(project)?)
}

pub fn render_markdown(
    project: &Project,
    metrics: &[AggregateMetrics],
    period_label: &str,
    generated: &str,
) -> AppResult<String> {
    let h = headline(metrics)?;
    let mut md = vec![
        format!("# {TITLE}"),
        format!("_{}. Generated: {generated}_\n", project.name),
        "## Summary".to_string(),
        format!(
            "- Mode-switch reduces energy by **{:.0}%** vs fixed (this run).",
            h.mode_savings
        ),
        format!(
            "- Variable reduces energy by **{:.0}%** vs fixed and achieves **{:.0}%** compliance.",
            h.variable_savings, h.variable_compliance
        ),
        format!(
            "- Variable moves **{:.0} m³** of air over the run.\n",
            h.variable_volume_m3
        ),
        format!("## Key Results ({period_label})"),
        format!("| {} |", HEADERS.join(" | ")),
        format!("| {} |", ["---"; 8].join(" | ")),
    ];
    for row in table_rows(metrics)? {
        md.push(format!("| {} |", row.join(" | ")));
    }
    md.push(String::new());
    md.push("## Parameters".to_string());
    md.push("```json".to_string());
    md.push(parameters_json(project)?);
    md.push("```".to_string());
    md.push(String::new());
    Ok(md.join("\n"))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn render_html(
    project: &Project,
    metrics: &[AggregateMetrics],
    period_label: &str,
    generated: &str,
) -> AppResult<String> {
    let h = headline(metrics)?;
    let mut html = vec![
        "<!doctype html><html><head><meta charset='utf-8'>".to_string(),
        format!("<title>{TITLE}</title>"),
        "<style>body{font-family:system-ui,Segoe UI,Arial,sans-serif;max-width:900px;margin:32px auto;line-height:1.45}".to_string(),
        "h1,h2{margin-top:1.1em} table{border-collapse:collapse} th,td{border:1px solid #ddd;padding:6px 8px}".to_string(),
        "code,pre{background:#f6f8fa;border:1px solid #e1e4e8;padding:8px;border-radius:6px}</style></head><body>".to_string(),
        format!(
            "<h1>{TITLE}</h1><p><em>{}. Generated: {}</em></p>",
            escape_html(&project.name),
            escape_html(generated)
        ),
        "<h2>Executive Summary</h2>".to_string(),
        format!(
            "<ul><li>Mode-switch reduces energy by <b>{:.0}%</b> vs fixed.</li>",
            h.mode_savings
        ),
        format!(
            "<li>Variable reduces energy by <b>{:.0}%</b> vs fixed and achieves <b>{:.0}%</b> compliance.</li>",
            h.variable_savings, h.variable_compliance
        ),
        format!(
            "<li>Variable moves <b>{:.0} m³</b> of air over the run.</li></ul>",
            h.variable_volume_m3
        ),
        format!(
            "<h2>Key Results ({})</h2><table><thead><tr>",
            escape_html(period_label)
        ),
    ];
    for header in HEADERS {
        html.push(format!("<th>{header}</th>"));
    }
    html.push("</tr></thead><tbody>".to_string());
    for row in table_rows(metrics)? {
        let cells: String = row.iter().map(|c| format!("<td>{c}</td>")).collect();
        html.push(format!("<tr>{cells}</tr>"));
    }
    html.push("</tbody></table>".to_string());
    html.push("<h2>Parameters</h2><pre><code>".to_string());
    html.push(escape_html(&parameters_json(project)?));
    html.push("</code></pre>".to_string());
    html.push("</body></html>".to_string());
    Ok(html.join("\n"))
}

/// Human label for a run length: whole hours, or minutes/seconds.
pub fn period_label(span_s: f64) -> String {
    let hours = span_s / 3600.0;
    if (hours - hours.round()).abs() < 1e-9 && hours >= 1.0 {
        let n = hours.round() as u64;
        if n == 1 {
            "1 hour".to_string()
        } else {
            format!("{n} hours")
        }
    } else if span_s >= 60.0 {
        format!("{:.0} min", span_s / 60.0)
    } else {
        format!("{span_s:.0} s")
    }
}

/// Write `result_sheet.md` and `result_sheet.html` into `out_dir`.
pub fn write_result_sheet(
    out_dir: &Path,
    project: &Project,
    metrics: &[AggregateMetrics],
    period_label: &str,
) -> AppResult<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(out_dir).map_err(|source| AppError::FileWrite {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();

    let md_path = out_dir.join(MARKDOWN_FILE);
    let md = render_markdown(project, metrics, period_label, &generated)?;
    std::fs::write(&md_path, md).map_err(|source| AppError::FileWrite {
        path: md_path.clone(),
        source,
    })?;

    let html_path = out_dir.join(HTML_FILE);
    let html = render_html(project, metrics, period_label, &generated)?;
    std::fs::write(&html_path, html).map_err(|source| AppError::FileWrite {
        path: html_path.clone(),
        source,
    })?;

    Ok((md_path, html_path))
}
