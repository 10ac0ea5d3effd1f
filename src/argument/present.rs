//! Text rendering for the argument map.

use std::fmt::Write;

use super::map::{ArgumentMap, ArgumentRecord, StanceSummary};

/// Default abbreviation length for map cells.
pub const KEYWORD_LEN: usize = 16;

/// Text shown when no record can be built yet.
pub const EMPTY_MAP_TEXT: &str = "暂无论证记录，请先添加主张和证据";

/// Prompts for the three annotation phases.
pub const PHASE_INSTRUCTIONS: [&str; 3] = [
    "第一步：在所有发言中，找出真正表达立场的句子（主张/观点）。",
    "第二步：为每个主张找出支撑它的证据句。",
    "第三步（可选）：用你自己的话写一句'桥'，解释这个证据为什么能支持这个主张。",
];

/// Trim and keep the first `max_chars` characters, marking the cut with `…`.
pub fn keyword_text(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() > max_chars {
        let mut short: String = trimmed.chars().take(max_chars).collect();
        short.push('…');
        short
    } else {
        trimmed.to_string()
    }
}

/// The "because … so …" sentence for a selected record.
pub fn combined_explanation(record: &ArgumentRecord) -> String {
    let bridge = record.bridge_text.as_deref().unwrap_or("(暂无填写)");
    format!(
        "因为【{}】，\n再加上你认为【{}】，\n所以你用它来{}【{}】。",
        record.evidence_text,
        bridge,
        record.stance.action(),
        record.claim_text
    )
}

fn summary_line(label: &str, summary: &StanceSummary) -> String {
    format!(
        "{}：主张：{} 条 · 证据：{} 条 · 推理桥：{} 条",
        label, summary.claim_count, summary.evidence_count, summary.bridge_count
    )
}

/// Plain-text rendering of the whole map.
pub fn render_text(map: &ArgumentMap) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", summary_line("支持方", &map.summary.pro));
    let _ = writeln!(out, "{}", summary_line("条件支持", &map.summary.conditional));
    let _ = writeln!(out, "{}", summary_line("反对方", &map.summary.con));
    // Neutral claims sit in no group; only their counts are shown.
    if map.summary.neutral.claim_count > 0 {
        let _ = writeln!(out, "{}", summary_line("中立", &map.summary.neutral));
    }
    out.push('\n');

    if map.is_empty() {
        let _ = writeln!(out, "{}", EMPTY_MAP_TEXT);
    } else {
        let groups = [
            ("支持方", &map.groups.pro),
            ("条件支持", &map.groups.conditional),
            ("反对方", &map.groups.con),
        ];
        for (label, records) in groups {
            if records.is_empty() {
                continue;
            }
            let _ = writeln!(out, "[{}]", label);
            for record in records.iter() {
                let _ = writeln!(
                    out,
                    "  {} {} | {} | {}",
                    record.stance.name(),
                    keyword_text(&record.claim_text, KEYWORD_LEN),
                    keyword_text(&record.evidence_text, KEYWORD_LEN),
                    record
                        .bridge_text
                        .as_deref()
                        .map(|t| keyword_text(t, KEYWORD_LEN))
                        .unwrap_or_else(|| "-".to_string())
                );
            }
        }
    }

    out.push('\n');
    let _ = writeln!(out, "{}", map.diagnosis_text);
    out
}
