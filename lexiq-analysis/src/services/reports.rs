//! Report generation
//!
//! Reports are rendered eagerly from the caller's usage statistics and kept
//! for 24 hours. Only json, csv and html can be rendered.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use std::fmt::Write;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use lexiq_common::{InMemoryStore, Store};

use super::usage::{AnalysisSummary, UsageStatistics, UsageTracker};
use crate::analysis::ValidationError;
use crate::models::{GeneratedReport, ReportConfig, ReportFormat};

/// Hours a generated report stays downloadable
pub const REPORT_LIFETIME_HOURS: i64 = 24;

pub struct ReportService {
    store: Arc<dyn Store<String, GeneratedReport>>,
    usage: Arc<UsageTracker>,
}

impl ReportService {
    pub fn new(usage: Arc<UsageTracker>) -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()), usage)
    }

    pub fn with_store(store: Arc<dyn Store<String, GeneratedReport>>, usage: Arc<UsageTracker>) -> Self {
        Self { store, usage }
    }

    pub fn generate(
        &self,
        user_id: &str,
        config: ReportConfig,
    ) -> Result<GeneratedReport, ValidationError> {
        if !config.format.is_renderable() {
            return Err(ValidationError::new(format!(
                "Report format '{}' is not supported; use json, csv or html",
                config.format.extension()
            )));
        }
        if config.title.trim().is_empty() {
            return Err(ValidationError::new("Report title cannot be empty"));
        }

        let stats = self.usage.statistics(user_id);
        let analyses = filter_by_date(&stats.recent_analyses, &config);
        let now = Utc::now();
        let body = match config.format {
            ReportFormat::Csv => render_csv(&config, &stats, &analyses),
            ReportFormat::Html => render_html(&config, &stats, &analyses, now),
            _ => render_json(&config, &stats, &analyses, now),
        };

        let report_id = Uuid::new_v4().to_string();
        let report = GeneratedReport {
            file_name: format!("report_{}.{}", &report_id[..8], config.format.extension()),
            download_url: format!("/api/reports/{}/download", report_id),
            report_id: report_id.clone(),
            user_id: user_id.to_string(),
            file_size: body.len() as u64,
            created_at: now,
            expires_at: Some(now + Duration::hours(REPORT_LIFETIME_HOURS)),
            download_count: 0,
            config,
            body,
        };

        info!(report_id = %report_id, "Generated {} report", report.config.format.extension());
        self.store.put(report_id, report.clone());
        Ok(report)
    }

    /// Report metadata, if owned by `user_id` and not expired
    pub fn get(&self, user_id: &str, report_id: &str) -> Option<GeneratedReport> {
        let key = report_id.to_string();
        let report = self.store.get(&key)?;
        if report.expires_at.is_some_and(|at| Utc::now() >= at) {
            self.store.delete(&key);
            return None;
        }
        (report.user_id == user_id).then_some(report)
    }

    /// Report with its body, counting the download
    pub fn download(&self, user_id: &str, report_id: &str) -> Option<GeneratedReport> {
        self.get(user_id, report_id)?;
        self.store
            .update(&report_id.to_string(), &mut |r: &mut GeneratedReport| {
                r.download_count += 1;
            });
        self.store.get(&report_id.to_string())
    }
}

fn filter_by_date(analyses: &[AnalysisSummary], config: &ReportConfig) -> Vec<AnalysisSummary> {
    if !config.include_terms {
        return Vec::new();
    }
    let start = config.date_range.as_ref().and_then(|r| r.get("start")).copied();
    let end = config.date_range.as_ref().and_then(|r| r.get("end")).copied();
    analyses
        .iter()
        .filter(|a| start.map_or(true, |s| a.created_at >= s))
        .filter(|a| end.map_or(true, |e| a.created_at <= e))
        .cloned()
        .collect()
}

fn render_json(
    config: &ReportConfig,
    stats: &UsageStatistics,
    analyses: &[AnalysisSummary],
    now: DateTime<Utc>,
) -> String {
    let mut report = json!({
        "title": config.title,
        "description": config.description,
        "generated_at": now,
    });
    if config.include_statistics {
        report["statistics"] = json!({
            "total_analyses": stats.total_analyses,
            "total_terms_analyzed": stats.total_terms_analyzed,
            "average_quality_score": stats.average_quality_score,
            "most_used_language": stats.most_used_language,
            "most_used_domain": stats.most_used_domain,
            "last_analysis": stats.last_analysis,
        });
    }
    if config.include_terms {
        report["analyses"] = json!(analyses);
    }
    serde_json::to_string_pretty(&report).unwrap_or_else(|_| report.to_string())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn render_csv(config: &ReportConfig, stats: &UsageStatistics, analyses: &[AnalysisSummary]) -> String {
    let mut out = String::new();
    if config.include_statistics {
        out.push_str("metric,value\n");
        let rows = [
            ("total_analyses", stats.total_analyses.to_string()),
            ("total_terms_analyzed", stats.total_terms_analyzed.to_string()),
            ("average_quality_score", format!("{:.4}", stats.average_quality_score)),
            ("most_used_language", stats.most_used_language.clone().unwrap_or_default()),
            ("most_used_domain", stats.most_used_domain.clone().unwrap_or_default()),
        ];
        for (metric, value) in rows {
            let _ = writeln!(out, "{},{}", metric, csv_field(&value));
        }
    }
    if config.include_terms {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("request_id,created_at,language,domain,total_terms,quality_score,processing_time\n");
        for a in analyses {
            let _ = writeln!(
                out,
                "{},{},{},{},{},{:.4},{:.6}",
                a.request_id,
                a.created_at.to_rfc3339(),
                csv_field(&a.language),
                csv_field(&a.domain),
                a.total_terms,
                a.quality_score,
                a.processing_time
            );
        }
    }
    out
}

fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_html(
    config: &ReportConfig,
    stats: &UsageStatistics,
    analyses: &[AnalysisSummary],
    now: DateTime<Utc>,
) -> String {
    let title = html_escape(&config.title);
    let mut out = format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{0}</title></head>\n<body>\n<h1>{0}</h1>\n",
        title
    );
    if let Some(description) = &config.description {
        let _ = writeln!(out, "<p>{}</p>", html_escape(description));
    }
    let _ = writeln!(out, "<p>Generated {}</p>", now.to_rfc3339());

    if config.include_statistics {
        out.push_str("<h2>Statistics</h2>\n<table>\n");
        let rows = [
            ("Total analyses", stats.total_analyses.to_string()),
            ("Terms analyzed", stats.total_terms_analyzed.to_string()),
            ("Average quality", format!("{:.2}", stats.average_quality_score)),
            ("Most used language", stats.most_used_language.clone().unwrap_or_default()),
            ("Most used domain", stats.most_used_domain.clone().unwrap_or_default()),
        ];
        for (label, value) in rows {
            let _ = writeln!(out, "<tr><th>{}</th><td>{}</td></tr>", label, html_escape(&value));
        }
        out.push_str("</table>\n");
    }

    if config.include_terms {
        out.push_str("<h2>Analyses</h2>\n<table>\n<tr><th>Request</th><th>Date</th><th>Language</th><th>Domain</th><th>Terms</th><th>Quality</th></tr>\n");
        for a in analyses {
            let _ = writeln!(
                out,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td></tr>",
                html_escape(&a.request_id),
                a.created_at.to_rfc3339(),
                html_escape(&a.language),
                html_escape(&a.domain),
                a.total_terms,
                a.quality_score
            );
        }
        out.push_str("</table>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}
