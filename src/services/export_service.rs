use rust_xlsxwriter::*;

use crate::dto::candidate_dto::ExportRequest;
use crate::error::Result;
use crate::middleware::auth::Principal;
use crate::models::{candidate::Candidate, status::CandidateStatus};
use crate::services::candidate_service::{status_counts, CandidateService};
use crate::utils::time;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Clone)]
pub struct ExportService {
    candidates: CandidateService,
}

impl ExportService {
    pub fn new(candidates: CandidateService) -> Self {
        Self { candidates }
    }

    /// Visible candidates, narrowed to `candidate_ids` when a non-empty list is given.
    pub async fn export(&self, principal: &Principal, request: &ExportRequest) -> Result<Vec<u8>> {
        let ids = request.candidate_ids.as_deref().filter(|ids| !ids.is_empty());
        let rows: Vec<Candidate> = self
            .candidates
            .all()
            .await
            .into_iter()
            .filter(|c| principal.can_view(c))
            .filter(|c| ids.map_or(true, |ids| ids.contains(&c.candidate_id)))
            .collect();
        tracing::info!(rows = rows.len(), by = %principal.username, "Exporting candidates");
        generate_candidates_xlsx(&rows)
    }
}

fn status_color(status: &CandidateStatus) -> Color {
    match status {
        CandidateStatus::Screening => Color::RGB(0x3B82F6),
        CandidateStatus::Shortlist => Color::RGB(0x0EA5E9),
        CandidateStatus::Interview | CandidateStatus::SecondInterview => Color::RGB(0x8B5CF6),
        CandidateStatus::OfferIssued => Color::RGB(0xF59E0B),
        CandidateStatus::OfferAccepted => Color::RGB(0x10B981),
        CandidateStatus::Rejected => Color::RGB(0xEF4444),
        _ => Color::RGB(0x64748B),
    }
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "—"
    } else {
        value
    }
}

/// Generate a styled XLSX workbook from a list of candidates.
pub fn generate_candidates_xlsx(candidates: &[Candidate]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Candidates")?;

    // ── Color palette ──
    let primary_color = Color::RGB(0x1E293B);
    let header_bg = Color::RGB(0x0F172A);
    let header_text = Color::White;
    let alt_row_1 = Color::RGB(0xF8FAFC);
    let alt_row_2 = Color::White;
    let border_color = Color::RGB(0xE2E8F0);

    let columns = [
        ("#", 6.0),
        ("Candidate ID", 24.0),
        ("Candidate Name", 28.0),
        ("Role", 24.0),
        ("Nationality", 16.0),
        ("Status", 18.0),
        ("Requestor Assessment", 22.0),
        ("HR Owner", 16.0),
        ("Next Action", 30.0),
        ("Requestor", 16.0),
        ("Requestor Action", 20.0),
        ("Notes", 40.0),
        ("Last Updated", 20.0),
    ];
    let last_col = (columns.len() - 1) as u16;

    for (i, (_, width)) in columns.iter().enumerate() {
        worksheet.set_column_width(i as u16, *width)?;
    }

    // ── Title rows ──
    let title_format = Format::new()
        .set_font_size(16)
        .set_bold()
        .set_font_color(header_text)
        .set_background_color(primary_color)
        .set_align(FormatAlign::CenterAcross)
        .set_align(FormatAlign::VerticalCenter);
    worksheet.set_row_height(0, 40)?;
    worksheet.merge_range(0, 0, 0, last_col, "Candidates Report", &title_format)?;

    let subtitle_format = Format::new()
        .set_font_size(10)
        .set_italic()
        .set_font_color(Color::RGB(0x94A3B8))
        .set_background_color(primary_color)
        .set_align(FormatAlign::CenterAcross)
        .set_align(FormatAlign::VerticalCenter);
    worksheet.set_row_height(1, 22)?;
    let subtitle = format!(
        "Exported: {}  •  Total candidates: {}",
        time::now_stamp(),
        candidates.len()
    );
    worksheet.merge_range(1, 0, 1, last_col, &subtitle, &subtitle_format)?;

    // ── Header row ──
    let header_format = Format::new()
        .set_bold()
        .set_font_size(10)
        .set_font_color(header_text)
        .set_background_color(header_bg)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Thin)
        .set_border_color(border_color);

    let header_row = 2;
    worksheet.set_row_height(header_row, 30)?;
    for (i, (name, _)) in columns.iter().enumerate() {
        worksheet.write_string_with_format(header_row, i as u16, *name, &header_format)?;
    }

    // ── Data rows ──
    let data_start_row = 3;
    for (idx, c) in candidates.iter().enumerate() {
        let row = data_start_row + idx as u32;
        let bg = if idx % 2 == 0 { alt_row_1 } else { alt_row_2 };

        let base_fmt = Format::new()
            .set_font_size(10)
            .set_background_color(bg)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);
        let center_fmt = base_fmt.clone().set_align(FormatAlign::Center);
        let wrap_fmt = base_fmt.clone().set_text_wrap();
        let name_fmt = base_fmt.clone().set_bold();

        worksheet.set_row_height(row, 22)?;
        worksheet.write_number_with_format(row, 0, (idx + 1) as f64, &center_fmt)?;
        worksheet.write_string_with_format(row, 1, &c.candidate_id, &center_fmt)?;
        worksheet.write_string_with_format(row, 2, &c.candidate_name, &name_fmt)?;
        worksheet.write_string_with_format(row, 3, or_dash(&c.role), &base_fmt)?;
        worksheet.write_string_with_format(row, 4, or_dash(&c.nationality), &base_fmt)?;

        let status_fmt = Format::new()
            .set_font_size(10)
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(status_color(&c.status))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);
        worksheet.write_string_with_format(row, 5, c.status.as_str(), &status_fmt)?;

        worksheet.write_string_with_format(row, 6, or_dash(&c.requestor_assessment), &center_fmt)?;
        worksheet.write_string_with_format(row, 7, or_dash(&c.hr_owner), &base_fmt)?;
        worksheet.write_string_with_format(row, 8, or_dash(&c.next_action), &wrap_fmt)?;
        worksheet.write_string_with_format(row, 9, or_dash(&c.requestor_username), &base_fmt)?;
        worksheet.write_string_with_format(row, 10, or_dash(&c.requestor_action), &center_fmt)?;
        worksheet.write_string_with_format(row, 11, or_dash(&c.notes), &wrap_fmt)?;
        worksheet.write_string_with_format(row, 12, or_dash(&c.last_updated), &center_fmt)?;
    }

    // ── Summary row ──
    let total_row = data_start_row + candidates.len() as u32 + 1;
    let summary_fmt = Format::new()
        .set_bold()
        .set_font_size(10)
        .set_font_color(primary_color)
        .set_background_color(Color::RGB(0xE0E7FF))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
        .set_border_color(border_color);

    worksheet.set_row_height(total_row, 26)?;
    worksheet.merge_range(
        total_row,
        0,
        total_row,
        2,
        &format!("Total: {} candidates", candidates.len()),
        &summary_fmt,
    )?;

    let status_summary = status_counts(candidates)
        .into_iter()
        .filter(|s| s.count > 0)
        .map(|s| format!("{}: {}", s.label, s.count))
        .collect::<Vec<_>>()
        .join(" | ");
    worksheet.merge_range(total_row, 3, total_row, last_col, or_dash(&status_summary), &summary_fmt)?;

    worksheet.set_freeze_panes(3, 0)?;
    worksheet.autofilter(
        header_row,
        0,
        (data_start_row + candidates.len() as u32).saturating_sub(1).max(header_row),
        last_col,
    )?;

    let buffer = workbook.save_to_buffer()?;
    Ok(buffer)
}
