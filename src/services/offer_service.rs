use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use umya_spreadsheet::structs::drawing::spreadsheet::MarkerType;
use umya_spreadsheet::structs::Image;

use crate::database::{Table, WorkbookStore};
use crate::dto::offer_dto::{OfferGenerated, OfferPayload};
use crate::error::{Error, Result};
use crate::middleware::auth::Principal;
use crate::models::{
    offer::{Offer, OFFERS_SHEET},
    screening::Screening,
    status::{CandidateStatus, LocationType},
};
use crate::services::{candidate_service::CandidateService, folder_service::FolderService};
use crate::utils::time;

pub const OFFER_SHEET: &str = "Sheet1";
pub const HEADER_IMAGE: &str = "offer-header.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferField {
    Position,
    CandidateName,
    GovId,
    Nationality,
    Email,
    BasicSalary,
    MonthlyFixedAllowance,
    OtherMonthlyAllowance,
    AccommodationAllowance,
    TotalPackage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateVariant {
    Saudi,
    PhilippineHeadOffice,
    PhilippineSite,
    ForeignHeadOffice,
    ForeignSite,
}

/// Template file and target cells of one variant.
#[derive(Debug)]
pub struct TemplateSpec {
    pub variant: TemplateVariant,
    pub label: &'static str,
    pub file: &'static str,
    pub cells: &'static [(OfferField, &'static str)],
}

use OfferField::*;

pub static TEMPLATES: [TemplateSpec; 5] = [
    TemplateSpec {
        variant: TemplateVariant::Saudi,
        label: "Saudi",
        file: "offer_saudi.xlsx",
        cells: &[
            (Position, "B4"),
            (CandidateName, "B5"),
            (GovId, "B6"),
            (Nationality, "B7"),
            (Email, "B8"),
            (BasicSalary, "B9"),
            (TotalPackage, "B12"),
        ],
    },
    TemplateSpec {
        variant: TemplateVariant::PhilippineHeadOffice,
        label: "Philippine Head Office",
        file: "offer_philippine_ho.xlsx",
        cells: &[
            (Position, "B4"),
            (CandidateName, "B5"),
            (GovId, "B6"),
            (Nationality, "B7"),
            (Email, "B8"),
            (BasicSalary, "B9"),
            (TotalPackage, "B13"),
        ],
    },
    TemplateSpec {
        variant: TemplateVariant::PhilippineSite,
        label: "Philippine Site",
        file: "offer_philippine_site.xlsx",
        cells: &[
            (Position, "B4"),
            (CandidateName, "B5"),
            (GovId, "B6"),
            (Nationality, "B7"),
            (Email, "B8"),
            (BasicSalary, "B9"),
            (MonthlyFixedAllowance, "B10"),
            (OtherMonthlyAllowance, "B11"),
            (TotalPackage, "B12"),
            (AccommodationAllowance, "B13"),
        ],
    },
    TemplateSpec {
        variant: TemplateVariant::ForeignHeadOffice,
        label: "Foreign Head Office",
        file: "offer_foreign_ho.xlsx",
        cells: &[
            (Position, "B4"),
            (CandidateName, "B5"),
            (GovId, "B6"),
            (Nationality, "B7"),
            (Email, "B8"),
            (BasicSalary, "B9"),
            (TotalPackage, "B12"),
        ],
    },
    TemplateSpec {
        variant: TemplateVariant::ForeignSite,
        label: "Foreign Site",
        file: "offer_foreign_site.xlsx",
        cells: &[
            (Position, "B4"),
            (CandidateName, "B5"),
            (GovId, "B6"),
            (Nationality, "B7"),
            (Email, "B8"),
            (BasicSalary, "B9"),
            (MonthlyFixedAllowance, "B10"),
            (OtherMonthlyAllowance, "B11"),
            (TotalPackage, "B12"),
        ],
    },
];

impl TemplateVariant {
    /// First match wins: Saudi, then Filipino/Philippines split by location,
    /// then every other nationality split by location.
    pub fn select(nationality: &str, location: LocationType) -> Self {
        let nationality = nationality.to_lowercase();
        let site = location == LocationType::Site;
        if nationality.contains("saudi") {
            TemplateVariant::Saudi
        } else if nationality.contains("filipino") || nationality.contains("philippines") {
            if site {
                TemplateVariant::PhilippineSite
            } else {
                TemplateVariant::PhilippineHeadOffice
            }
        } else if site {
            TemplateVariant::ForeignSite
        } else {
            TemplateVariant::ForeignHeadOffice
        }
    }

    pub fn spec(self) -> &'static TemplateSpec {
        match self {
            TemplateVariant::Saudi => &TEMPLATES[0],
            TemplateVariant::PhilippineHeadOffice => &TEMPLATES[1],
            TemplateVariant::PhilippineSite => &TEMPLATES[2],
            TemplateVariant::ForeignHeadOffice => &TEMPLATES[3],
            TemplateVariant::ForeignSite => &TEMPLATES[4],
        }
    }
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Blank or unparsable amounts count as zero.
pub fn amount(raw: &str) -> Decimal {
    parse_amount(raw).unwrap_or(Decimal::ZERO)
}

pub fn total_package(payload: &OfferPayload) -> Decimal {
    [
        &payload.basic_salary,
        &payload.accommodation_allowance,
        &payload.transportation_allowance,
        &payload.monthly_fixed_allowance,
        &payload.other_monthly_allowance,
    ]
    .into_iter()
    .map(|v| amount(v))
    .fold(Decimal::ZERO, |total, v| {
        total.checked_add(v).unwrap_or(if v.is_sign_negative() { Decimal::MIN } else { Decimal::MAX })
    })
}

pub fn format_amount(value: Decimal) -> String {
    value.normalize().to_string()
}

/// A value ready to be written into a template cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

fn money_cell(raw: &str) -> CellValue {
    match parse_amount(raw).and_then(|d| d.to_f64()) {
        Some(n) => CellValue::Number(n),
        None => CellValue::Text(raw.trim().to_string()),
    }
}

/// Cell → value pairs for the chosen variant.
pub fn cell_values(spec: &TemplateSpec, payload: &OfferPayload, total: Decimal) -> Vec<(String, CellValue)> {
    spec.cells
        .iter()
        .map(|(field, cell)| {
            let value = match field {
                Position => CellValue::Text(payload.position.trim().to_string()),
                CandidateName => CellValue::Text(payload.candidate_name.trim().to_string()),
                GovId => CellValue::Text(payload.gov_id.trim().to_string()),
                Nationality => CellValue::Text(payload.nationality.trim().to_string()),
                Email => CellValue::Text(payload.email.trim().to_string()),
                BasicSalary => money_cell(&payload.basic_salary),
                MonthlyFixedAllowance => money_cell(&payload.monthly_fixed_allowance),
                OtherMonthlyAllowance => money_cell(&payload.other_monthly_allowance),
                AccommodationAllowance => money_cell(&payload.accommodation_allowance),
                TotalPackage => total
                    .to_f64()
                    .map(CellValue::Number)
                    .unwrap_or_else(|| CellValue::Text(format_amount(total))),
            };
            (cell.to_string(), value)
        })
        .collect()
}

/// Fills `Sheet1` (or the first sheet) of the template and saves it as `out`.
pub fn fill_template(
    template: &Path,
    header_image: Option<&Path>,
    out: &Path,
    values: &[(String, CellValue)],
) -> Result<()> {
    let mut book = umya_spreadsheet::reader::xlsx::read(template)?;
    let named = book.get_sheet_by_name(OFFER_SHEET).is_some();
    let ws = if named {
        book.get_sheet_by_name_mut(OFFER_SHEET)
    } else {
        book.get_sheet_mut(&0)
    }
    .ok_or_else(|| Error::BadRequest("Offer template has no worksheet".into()))?;

    for (cell, value) in values {
        let target = ws.get_cell_mut(cell.as_str());
        match value {
            CellValue::Text(text) => {
                target.set_value_string(text);
            }
            CellValue::Number(n) => {
                target.set_value_number(*n);
            }
        }
    }

    if let Some(image) = header_image.and_then(|p| p.to_str()) {
        let inserted = std::panic::catch_unwind(AssertUnwindSafe(|| {
            let mut marker = MarkerType::default();
            marker.set_coordinate("A1");
            let mut picture = Image::default();
            picture.new_image(image, marker);
            ws.add_image(picture);
        }));
        if inserted.is_err() {
            tracing::warn!(image, "Header image could not be placed, continuing without it");
        }
    }

    umya_spreadsheet::writer::xlsx::write(&book, out)?;
    Ok(())
}

#[derive(Clone)]
pub struct OfferService {
    store: WorkbookStore,
    folders: FolderService,
    candidates: CandidateService,
    templates_dir: PathBuf,
}

impl OfferService {
    pub fn new(
        store: WorkbookStore,
        folders: FolderService,
        candidates: CandidateService,
        templates_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            folders,
            candidates,
            templates_dir,
        }
    }

    /// Prefills the offer form from the candidate, the screening and any
    /// earlier offer.
    pub async fn draft(&self, principal: &Principal, id: &str) -> Result<OfferPayload> {
        principal.require_staff()?;
        let candidate = self.candidates.get(id).await?;
        let screening = self
            .store
            .records::<Screening>()
            .await
            .into_iter()
            .find(|s| s.candidate_id == id)
            .unwrap_or_default();
        let previous = self
            .store
            .records::<Offer>()
            .await
            .into_iter()
            .find(|o| o.candidate_id == id)
            .unwrap_or_default();

        let pick = |values: &[&String]| -> String {
            values
                .iter()
                .map(|v| v.trim())
                .find(|v| !v.is_empty())
                .unwrap_or_default()
                .to_string()
        };

        Ok(OfferPayload {
            candidate_id: candidate.candidate_id.clone(),
            candidate_name: pick(&[&candidate.candidate_name, &screening.candidate_name]),
            position: pick(&[&screening.role, &candidate.role]),
            gov_id: pick(&[&screening.gov_id, &candidate.gov_id]),
            nationality: pick(&[&screening.nationality, &candidate.nationality]),
            email: screening.email.trim().to_string(),
            location_type: LocationType::HeadOffice.as_str().to_string(),
            issue_date: time::today().format(time::DATE_FORMAT).to_string(),
            basic_salary: pick(&[&previous.basic_salary, &screening.expected_compensation]),
            accommodation_allowance: previous.accommodation_allowance.trim().to_string(),
            transportation_allowance: previous.transportation_allowance.trim().to_string(),
            monthly_fixed_allowance: previous.monthly_fixed_allowance.trim().to_string(),
            other_monthly_allowance: previous.other_monthly_allowance.trim().to_string(),
            air_ticket: previous.air_ticket.trim().to_string(),
        })
    }

    /// Fills the selected template, records the offer and marks the candidate
    /// `Offer Issued`.
    pub async fn generate(&self, principal: &Principal, mut payload: OfferPayload) -> Result<OfferGenerated> {
        principal.require_staff()?;
        let candidate = self.candidates.get(payload.candidate_id.trim()).await?;
        if payload.candidate_name.trim().is_empty() {
            payload.candidate_name = candidate.candidate_name.clone();
        }
        if payload.issue_date.trim().is_empty() {
            payload.issue_date = time::today().format(time::DATE_FORMAT).to_string();
        }

        let variant = TemplateVariant::select(&payload.nationality, LocationType::parse(&payload.location_type));
        let spec = variant.spec();
        let template = self.templates_dir.join(spec.file);
        if !template.is_file() {
            return Err(Error::BadRequest(format!(
                "Template not found: {}. Please add it to the templates folder.",
                spec.file
            )));
        }

        let total = total_package(&payload);
        let values = cell_values(spec, &payload, total);
        let folder = self
            .folders
            .ensure(&candidate.candidate_name, &candidate.candidate_id)
            .await?;
        let out = folder.join(format!("{}-offer.xlsx", candidate.candidate_id));
        let header = self.templates_dir.join(HEADER_IMAGE);
        let header = header.is_file().then_some(header);

        let out_path = out.clone();
        tokio::task::spawn_blocking(move || fill_template(&template, header.as_deref(), &out_path, &values))
            .await
            .map_err(|e| Error::Internal(format!("Offer generation task failed: {}", e)))??;

        let offer = Offer {
            candidate_id: candidate.candidate_id.clone(),
            candidate_name: payload.candidate_name.trim().to_string(),
            position: payload.position.trim().to_string(),
            issue_date: payload.issue_date.trim().to_string(),
            basic_salary: payload.basic_salary.trim().to_string(),
            accommodation_allowance: payload.accommodation_allowance.trim().to_string(),
            transportation_allowance: payload.transportation_allowance.trim().to_string(),
            monthly_fixed_allowance: payload.monthly_fixed_allowance.trim().to_string(),
            other_monthly_allowance: payload.other_monthly_allowance.trim().to_string(),
            air_ticket: payload.air_ticket.trim().to_string(),
            total_package: format_amount(total),
            template: spec.file.to_string(),
            offer_excel_path: out.display().to_string(),
            timestamp: time::now_stamp(),
            ..Default::default()
        };
        let record = offer.clone();
        self.store
            .update(OFFERS_SHEET, move |table: &mut Table| {
                let mut record = record;
                if let Some(previous) =
                    table.find::<Offer>(|r| Table::cell(r, "Candidate ID") == record.candidate_id)
                {
                    record.extra = previous.extra;
                }
                table.upsert_by(&["Candidate ID"], &record)
            })
            .await?;

        self.candidates
            .set_status(&candidate.candidate_id, CandidateStatus::OfferIssued)
            .await?;

        tracing::info!(
            candidate_id = %candidate.candidate_id,
            template = spec.file,
            total = %offer.total_package,
            by = %principal.username,
            "Offer generated"
        );
        Ok(OfferGenerated {
            template: spec.label.to_string(),
            total_package: offer.total_package.clone(),
            document_path: offer.offer_excel_path.clone(),
            offer,
        })
    }

    pub async fn document(&self, principal: &Principal, id: &str) -> Result<PathBuf> {
        principal.require_staff()?;
        let offer = self
            .store
            .records::<Offer>()
            .await
            .into_iter()
            .find(|o| o.candidate_id == id)
            .ok_or_else(|| Error::NotFound(format!("No offer for {}", id)))?;
        self.folders
            .resolve(&offer.offer_excel_path)
            .ok_or_else(|| Error::NotFound("Offer document is missing".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_follows_nationality_then_location() {
        use LocationType::{HeadOffice, Site};
        let cases = [
            ("Saudi", Site, TemplateVariant::Saudi),
            ("saudi arabian", HeadOffice, TemplateVariant::Saudi),
            ("Filipino", Site, TemplateVariant::PhilippineSite),
            ("Republic of the Philippines", HeadOffice, TemplateVariant::PhilippineHeadOffice),
            ("Indian", Site, TemplateVariant::ForeignSite),
            ("", HeadOffice, TemplateVariant::ForeignHeadOffice),
        ];
        for (nationality, location, expected) in cases {
            assert_eq!(TemplateVariant::select(nationality, location), expected, "{}", nationality);
        }
    }

    #[test]
    fn every_variant_has_one_spec() {
        for spec in &TEMPLATES {
            assert_eq!(spec.variant.spec().file, spec.file);
            assert!(spec.cells.iter().any(|(f, _)| *f == TotalPackage));
        }
    }

    #[test]
    fn location_label_must_be_exact() {
        assert_eq!(LocationType::parse("Site"), LocationType::Site);
        assert_eq!(LocationType::parse("site"), LocationType::HeadOffice);
        assert_eq!(LocationType::parse(""), LocationType::HeadOffice);
    }

    #[test]
    fn total_ignores_missing_and_bad_amounts() {
        let payload = OfferPayload {
            basic_salary: "5000".into(),
            accommodation_allowance: "1250".into(),
            transportation_allowance: "500".into(),
            monthly_fixed_allowance: "300".into(),
            other_monthly_allowance: "200".into(),
            ..Default::default()
        };
        assert_eq!(format_amount(total_package(&payload)), "7250");

        let partial = OfferPayload {
            basic_salary: "4000.50".into(),
            accommodation_allowance: "n/a".into(),
            transportation_allowance: "".into(),
            monthly_fixed_allowance: "1e2".into(),
            ..Default::default()
        };
        assert_eq!(format_amount(total_package(&partial)), "4100.5");
    }

    #[test]
    fn total_saturates_instead_of_overflowing() {
        let huge = "79228162514264337593543950335".to_string();
        let payload = OfferPayload {
            basic_salary: huge.clone(),
            accommodation_allowance: huge,
            transportation_allowance: "500".into(),
            ..Default::default()
        };
        assert_eq!(total_package(&payload), Decimal::MAX);
    }

    #[test]
    fn money_cells_parse_like_the_total() {
        let payload = OfferPayload {
            basic_salary: "1e2".into(),
            accommodation_allowance: "n/a".into(),
            ..Default::default()
        };
        let spec = TemplateVariant::PhilippineSite.spec();
        let values = cell_values(spec, &payload, total_package(&payload));
        let at = |cell: &str| values.iter().find(|(c, _)| c == cell).map(|(_, v)| v.clone());
        assert_eq!(at("B9"), Some(CellValue::Number(100.0)));
        assert_eq!(at("B13"), Some(CellValue::Text("n/a".into())));
    }

    #[test]
    fn philippine_site_writes_allowance_cells() {
        let payload = OfferPayload {
            candidate_name: "Maria".into(),
            basic_salary: "5000".into(),
            accommodation_allowance: "1250".into(),
            ..Default::default()
        };
        let spec = TemplateVariant::PhilippineSite.spec();
        let values = cell_values(spec, &payload, Decimal::from(7250));
        let at = |cell: &str| values.iter().find(|(c, _)| c == cell).map(|(_, v)| v.clone());
        assert_eq!(at("B5"), Some(CellValue::Text("Maria".into())));
        assert_eq!(at("B12"), Some(CellValue::Number(7250.0)));
        assert_eq!(at("B13"), Some(CellValue::Number(1250.0)));
        assert_eq!(at("B11"), Some(CellValue::Text(String::new())));
    }

    #[test]
    fn template_is_filled_on_the_first_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("tpl.xlsx");
        let mut book = umya_spreadsheet::new_file();
        book.get_sheet_mut(&0).unwrap().set_name("Offer");
        umya_spreadsheet::writer::xlsx::write(&book, &template).unwrap();

        let out = dir.path().join("out.xlsx");
        let values = vec![
            ("B5".to_string(), CellValue::Text("Jane".into())),
            ("B12".to_string(), CellValue::Number(7250.0)),
        ];
        fill_template(&template, None, &out, &values).unwrap();

        let filled = umya_spreadsheet::reader::xlsx::read(&out).unwrap();
        let ws = filled.get_sheet(&0).unwrap();
        assert_eq!(ws.get_value("B5"), "Jane");
        assert_eq!(ws.get_value("B12"), "7250");
    }
}
