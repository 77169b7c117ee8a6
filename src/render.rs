//! HTML rendering of the leaderboard page.
//!
//! Everything here is a pure function of [`Dashboard`]; nothing touches the
//! network or the filesystem.

use std::fmt::Write;

use crate::dashboard::Dashboard;
use crate::leaderboard::{CarrierRanking, Podium, RankedEntry};

pub const DEFAULT_TITLE: &str = "Airali : Crew Sales Performance";

const STYLESHEET: &str = r#"
body {
    margin: 0;
    min-height: 100vh;
    font-family: "Source Sans Pro", system-ui, sans-serif;
    background: linear-gradient(135deg, #0d4f4f 0%, #0a7a7a 25%, #00b3b3 55%, #00cccc 75%, #004d4d 100%);
    background-attachment: fixed;
    color: white;
}
main { padding: 2rem; }
h1 { font-size: 2.75rem; font-weight: 700; margin: 0; text-align: center; text-shadow: 0 2px 10px rgba(0, 0, 0, 0.3); }
h2 { font-size: 1.75rem; font-weight: 600; margin-bottom: 1.5rem; text-align: center; text-shadow: 0 2px 8px rgba(0, 0, 0, 0.2); }
.refreshed { text-align: center; color: rgba(255, 255, 255, 0.75); font-size: 0.9rem; padding: 0.5rem 0 2rem 0; }
.notice { text-align: center; padding: 1rem; border-radius: 12px; }
.notice.error { background: rgba(255, 80, 80, 0.25); }
.notice.warning { background: rgba(255, 200, 0, 0.25); }
.carriers { display: flex; gap: 2rem; }
.carrier { flex: 1; min-width: 0; }
.glass-card {
    background: rgba(255, 255, 255, 0.12);
    backdrop-filter: blur(12px);
    -webkit-backdrop-filter: blur(12px);
    border-radius: 16px;
    border: 1px solid rgba(255, 255, 255, 0.18);
    padding: 1.5rem;
    box-shadow: 0 8px 32px 0 rgba(0, 0, 0, 0.25);
    transition: all 0.3s ease;
}
.glass-card:hover { transform: translateY(-5px); box-shadow: 0 12px 48px 0 rgba(0, 0, 0, 0.35); background: rgba(255, 255, 255, 0.18); }
.podium-ladder { display: grid; grid-template-columns: 1fr 1fr 1fr; gap: 1rem; margin-bottom: 2rem; }
.podium-stacked .podium-card { margin-bottom: 1rem; }
.podium-card { text-align: center; display: flex; flex-direction: column; justify-content: center; align-items: center; position: relative; }
.rank-1 { min-height: 260px; background: rgba(255, 215, 0, 0.15); border: 2px solid rgba(255, 215, 0, 0.3); }
.rank-2 { min-height: 220px; background: rgba(192, 192, 192, 0.15); border: 2px solid rgba(192, 192, 192, 0.3); }
.rank-3 { min-height: 180px; background: rgba(205, 127, 50, 0.15); border: 2px solid rgba(205, 127, 50, 0.3); }
.podium-rank {
    position: absolute; top: -15px; width: 40px; height: 40px; border-radius: 50%;
    background: rgba(255, 255, 255, 0.95); color: #333; font-weight: 800; font-size: 1.2rem;
    display: flex; align-items: center; justify-content: center; box-shadow: 0 4px 12px rgba(0, 0, 0, 0.3);
}
.crew-name { font-size: 1.25rem; font-weight: 700; margin-bottom: 1rem; line-height: 1.3; }
.caption { font-size: 0.7rem; text-transform: uppercase; opacity: 0.7; letter-spacing: 0.05em; margin-bottom: 0.5rem; }
.amount { font-size: 2rem; font-weight: 800; }
.other-card { min-height: 120px; display: flex; flex-direction: column; justify-content: space-between; margin-bottom: 0.75rem; }
.other-row { display: flex; align-items: center; gap: 0.75rem; }
.other-name { flex: 1; min-width: 0; font-weight: 600; font-size: 0.9rem; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; }
.other-amount { text-align: right; margin-top: 0.5rem; font-size: 1.25rem; font-weight: 700; }
.currency { font-size: 0.65rem; opacity: 0.65; }
.rank-badge {
    background: rgba(255, 255, 255, 0.25); border-radius: 50%; width: 36px; height: 36px;
    display: inline-flex; align-items: center; justify-content: center; font-weight: 700; font-size: 0.95rem;
}
@media (max-width: 768px) {
    .carriers { flex-direction: column; }
    .glass-card { padding: 1rem; }
    .podium-ladder { grid-template-columns: 1fr; }
    .rank-1 { min-height: 200px; }
    .rank-2 { min-height: 180px; }
    .rank-3 { min-height: 160px; }
    .other-card { min-height: 100px; }
}
"#;

/// Renders a complete HTML document for `dashboard`.
pub fn render_page(title: &str, dashboard: &Dashboard) -> String {
    let title = escape_html(title);
    let mut out = String::with_capacity(16 * 1024);

    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{STYLESHEET}</style>\n</head>\n<body>\n<main>\n\
         <header><h1>{title}</h1></header>\n"
    );

    match dashboard {
        Dashboard::Failed { message } => {
            let _ = writeln!(
                out,
                "<div class=\"notice error\">Error: {}</div>",
                escape_html(message)
            );
        }
        Dashboard::NoData => {
            out.push_str("<div class=\"notice warning\">No data available</div>\n");
        }
        Dashboard::Ready { refreshed, carriers } => {
            let _ = writeln!(
                out,
                "<p class=\"refreshed\">Last refreshed: {}</p>",
                escape_html(refreshed)
            );
            out.push_str("<div class=\"carriers\">\n");
            for carrier in carriers {
                out.push_str(&render_carrier(carrier));
            }
            out.push_str("</div>\n");
        }
    }

    out.push_str("</main>\n</body>\n</html>\n");
    out
}

/// One carrier column: heading, podium, then the runners-up list.
pub fn render_carrier(carrier: &CarrierRanking) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "<section class=\"carrier\">\n<h2>✈️ {}</h2>",
        escape_html(&carrier.carrier_code)
    );

    match carrier.podium() {
        Podium::Empty => {}
        Podium::Ladder(top) => {
            out.push_str("<div class=\"podium-ladder\">\n");
            for entry in top {
                out.push_str(&podium_card(entry, "Total Sales"));
            }
            out.push_str("</div>\n");
        }
        Podium::Stacked(top) => {
            out.push_str("<div class=\"podium-stacked\">\n");
            for entry in top {
                out.push_str(&podium_card(entry, "Total Sales (MYR)"));
            }
            out.push_str("</div>\n");
        }
    }

    let runners_up = carrier.runners_up();
    if !runners_up.is_empty() {
        out.push_str("<div class=\"runners-up\">\n");
        for entry in runners_up {
            out.push_str(&list_card(entry));
        }
        out.push_str("</div>\n");
    }

    out.push_str("</section>\n");
    out
}

fn podium_card(entry: &RankedEntry, caption: &str) -> String {
    format!(
        "<div class=\"glass-card podium-card rank-{rank}\">\
         <div class=\"podium-rank\">{rank}</div>\
         <div class=\"crew-name\">{name}</div>\
         <div class=\"caption\">{caption}</div>\
         <div class=\"amount\">{amount}</div>\
         </div>\n",
        rank = entry.rank,
        name = escape_html(&entry.crew_name),
        amount = format_quantity(entry.total_quantity),
    )
}

fn list_card(entry: &RankedEntry) -> String {
    format!(
        "<div class=\"glass-card other-card\">\
         <div class=\"other-row\"><span class=\"rank-badge\">{rank}</span>\
         <div class=\"other-name\">{name}</div></div>\
         <div class=\"other-amount\">{amount}<div class=\"currency\">MYR</div></div>\
         </div>\n",
        rank = entry.rank,
        name = escape_html(&entry.crew_name),
        amount = format_quantity(entry.total_quantity),
    )
}

/// Truncates to a whole number and inserts thousands separators.
pub fn format_quantity(value: f64) -> String {
    let whole = value.trunc() as i64;
    let digits = whole.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
