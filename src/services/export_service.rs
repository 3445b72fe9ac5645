//! Export des Fahrtenbuchs als CSV und PDF
//!
//! Beide Formate enthalten dieselben Felder in derselben Reihenfolge und das
//! Änderungsprotokoll jeder Fahrt als eine Zeichenkette.

use std::collections::HashMap;
use std::sync::Arc;

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};
use uuid::Uuid;

use crate::models::{SortDirection, Trip, TripFilter, TripLog, TripStatus};
use crate::repositories::TripRepository;
use crate::services::audit_recorder::format_trail;
use crate::utils::errors::{AppError, AppResult};

pub const CSV_FILENAME: &str = "fahrtenbuch.csv";
pub const PDF_FILENAME: &str = "fahrtenbuch.pdf";

const CSV_HEADER: [&str; 14] = [
    "Datum",
    "Uhrzeit",
    "Fahrer",
    "Startort",
    "Zwischenstationen",
    "Zielort",
    "Zweck",
    "Geschäftspartner",
    "Umweg",
    "Start-km",
    "End-km",
    "Distanz",
    "Status",
    "Änderungsprotokoll",
];

// A4 in Punkten
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const FONT_SIZE: f32 = 10.0;
const TITLE_SIZE: f32 = 16.0;
const LEADING: f32 = 14.0;
const MAX_LINE_CHARS: usize = 95;

/// Eine Fahrt mit ihrem formatierten Änderungsprotokoll
#[derive(Debug, Clone)]
pub struct ExportRow {
    pub trip: Trip,
    pub trail: String,
}

impl ExportRow {
    fn fields(&self) -> [String; 14] {
        let d = &self.trip.details;
        let opt = |v: Option<i32>| v.map(|n| n.to_string()).unwrap_or_default();
        [
            d.date.format("%Y-%m-%d").to_string(),
            d.time.map(|t| t.format("%H:%M").to_string()).unwrap_or_default(),
            d.driver_name.clone(),
            d.start_location.clone(),
            d.stations.join(" > "),
            d.end_location.clone(),
            d.purpose.clone(),
            d.business_partner.clone(),
            d.detour_reason.clone().unwrap_or_default(),
            opt(d.start_km),
            opt(d.end_km),
            opt(d.total_distance),
            status_label(d.status).to_string(),
            self.trail.clone(),
        ]
    }
}

fn status_label(status: TripStatus) -> &'static str {
    match status {
        TripStatus::Active => "aktiv",
        TripStatus::Completed => "abgeschlossen",
    }
}

pub struct ExportService {
    trips: Arc<dyn TripRepository>,
}

impl ExportService {
    pub fn new(trips: Arc<dyn TripRepository>) -> Self {
        Self { trips }
    }

    /// Gefilterte Fahrten, aufsteigend nach Datum, mit Protokoll
    pub async fn rows(&self, filter: &TripFilter) -> AppResult<Vec<ExportRow>> {
        let filter = TripFilter {
            direction: SortDirection::Ascending,
            ..filter.clone()
        };
        let trips = self.trips.list(&filter).await?;
        let ids: Vec<Uuid> = trips.iter().map(|t| t.id).collect();
        let logs = self.trips.logs_for_trips(&ids).await?;

        let mut by_trip: HashMap<Uuid, Vec<&TripLog>> = HashMap::new();
        for log in &logs {
            by_trip.entry(log.trip_id).or_default().push(log);
        }

        Ok(trips
            .into_iter()
            .map(|trip| {
                let trail = by_trip
                    .get(&trip.id)
                    .map(|logs| format_trail(logs))
                    .unwrap_or_default();
                ExportRow { trip, trail }
            })
            .collect())
    }

    pub async fn csv(&self, filter: &TripFilter) -> AppResult<Vec<u8>> {
        let rows = self.rows(filter).await?;
        tracing::info!(trips = rows.len(), "csv export");
        render_csv(&rows)
    }

    pub async fn pdf(&self, filter: &TripFilter) -> AppResult<Vec<u8>> {
        let rows = self.rows(filter).await?;
        tracing::info!(trips = rows.len(), "pdf export");
        Ok(render_pdf(&rows))
    }
}

pub fn render_csv(rows: &[ExportRow]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER)
        .map_err(|e| AppError::Internal(format!("CSV error: {}", e)))?;
    for row in rows {
        writer
            .write_record(row.fields())
            .map_err(|e| AppError::Internal(format!("CSV error: {}", e)))?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV error: {}", e)))
}

/// Zeilen des Textblocks einer Fahrt
fn pdf_block(row: &ExportRow) -> Vec<String> {
    let fields = row.fields();
    let mut lines = Vec::with_capacity(fields.len() + 1);
    for (label, value) in CSV_HEADER.iter().zip(fields.iter()) {
        if value.is_empty() {
            continue;
        }
        lines.extend(wrap(&format!("{}: {}", label, value), MAX_LINE_CHARS));
    }
    lines.push(String::new());
    lines
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Helvetica kennt nur WinAnsi; Umlaute liegen dort auf ihrem Latin-1 Wert
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            code @ 0x20..=0x7e | code @ 0xa0..=0xff => code as u8,
            _ => b'?',
        })
        .collect()
}

pub fn render_pdf(rows: &[ExportRow]) -> Vec<u8> {
    let lines_per_page = ((PAGE_HEIGHT - 2.0 * MARGIN - TITLE_SIZE) / LEADING) as usize;

    // Blöcke werden nicht über Seitengrenzen getrennt, solange sie auf eine Seite passen
    let mut pages: Vec<Vec<String>> = vec![Vec::new()];
    for row in rows {
        let block = pdf_block(row);
        let used = pages.last().map_or(0, Vec::len);
        if used > 0 && used + block.len() > lines_per_page {
            pages.push(Vec::new());
        }
        for line in block {
            if pages.last().map_or(0, Vec::len) >= lines_per_page {
                pages.push(Vec::new());
            }
            if let Some(page) = pages.last_mut() {
                page.push(line);
            }
        }
    }

    let catalog_id = Ref::new(1);
    let tree_id = Ref::new(2);
    let font_id = Ref::new(3);
    let font_name = Name(b"F1");

    let page_ids: Vec<Ref> = (0..pages.len())
        .map(|i| Ref::new(4 + 2 * i as i32))
        .collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);
    pdf.type1_font(font_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    let page_count = pages.len();
    for (index, (page_lines, page_id)) in pages.iter().zip(page_ids.iter()).enumerate() {
        let content_id = Ref::new(page_id.get() + 1);

        let mut page = pdf.page(*page_id);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
        page.parent(tree_id);
        page.contents(content_id);
        page.resources().fonts().pair(font_name, font_id);
        page.finish();

        let mut content = Content::new();
        content.begin_text();
        content.set_font(font_name, TITLE_SIZE);
        content.next_line(MARGIN, PAGE_HEIGHT - MARGIN);
        content.show(Str(&win_ansi(&format!(
            "Fahrtenbuch (Seite {} von {})",
            index + 1,
            page_count
        ))));
        content.set_font(font_name, FONT_SIZE);
        content.next_line(0.0, -(TITLE_SIZE + LEADING));
        for line in page_lines {
            content.show(Str(&win_ansi(line)));
            content.next_line(0.0, -LEADING);
        }
        content.end_text();

        pdf.stream(content_id, &content.finish());
    }

    pdf.finish()
}
