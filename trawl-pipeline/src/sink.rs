//! Where finished records go.
//!
//! Column order is fixed: company, name, location, URL, the site's detail
//! fields in configured order, then `Status`. Console blocks put the name
//! first and omit `Status`.
use rust_xlsxwriter::{DataValidation, Format, Workbook, XlsxError};
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use trawl_common::{EnrichedRecord, Status};
use trawl_config::{OutputConfig, SiteConfig};

pub const STATUS_COLUMN: &str = "Status";

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to write workbook {path}: {source}")]
    Xlsx {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },

    #[error("failed to print records: {0}")]
    Io(#[from] std::io::Error),
}

/// Header row for `site`.
pub fn header(site: &SiteConfig) -> Vec<String> {
    let labels = &site.columns;
    let mut header = vec![
        labels.company.clone(),
        labels.name.clone(),
        labels.location.clone(),
        labels.url.clone(),
    ];
    header.extend(site.details.iter().map(|d| d.field().label().to_string()));
    header.push(STATUS_COLUMN.to_string());
    header
}

/// Cells of `record`, aligned with [`header`].
pub fn row(record: &EnrichedRecord) -> Vec<String> {
    let stub = &record.stub;
    let mut row = vec![
        stub.company.clone().unwrap_or_default(),
        stub.name.clone(),
        stub.location.clone(),
        stub.url.to_string(),
    ];
    row.extend(record.fields.iter().map(|(_, value)| value.clone()));
    row.push(record.status.to_string());
    row
}

/// What a sink did, for the closing console message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOutcome {
    Printed {
        records: usize,
    },
    Saved {
        path: PathBuf,
        records: usize,
        status_dropdown: bool,
    },
}

impl fmt::Display for SinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkOutcome::Printed { records } => write!(f, " Printed {records} records"),
            SinkOutcome::Saved {
                path,
                status_dropdown,
                ..
            } => {
                writeln!(f, " Data saved to {}", path.display())?;
                if *status_dropdown {
                    write!(f, " Dropdown added to '{STATUS_COLUMN}' column in {}", path.display())
                } else {
                    write!(f, " '{STATUS_COLUMN}' column not found.")
                }
            }
        }
    }
}

pub trait Sink {
    fn write(
        &mut self,
        header: &[String],
        records: &[EnrichedRecord],
    ) -> Result<SinkOutcome, SinkError>;
}

/// Build the sink configured for `site`. Console output goes to `out`.
pub fn sink_for<W: Write + 'static>(site: &SiteConfig, out: W) -> Box<dyn Sink> {
    match &site.output {
        OutputConfig::Xlsx { path } => Box::new(XlsxSink::new(path.clone())),
        OutputConfig::Console => Box::new(ConsoleSink::new(out)),
    }
}

/// Writes one sheet, creating or overwriting the file.
pub struct XlsxSink {
    path: PathBuf,
}

impl XlsxSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn build(&self, header: &[String], records: &[EnrichedRecord]) -> Result<bool, XlsxError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let bold = Format::new().set_bold();

        for (col, title) in header.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, title, &bold)?;
        }
        for (i, record) in records.iter().enumerate() {
            let r = (i + 1) as u32;
            for (col, value) in row(record).iter().enumerate() {
                sheet.write_string(r, col as u16, value)?;
            }
        }

        let status_col = header.iter().position(|h| h == STATUS_COLUMN);
        let dropdown = match status_col {
            Some(col) if !records.is_empty() => {
                let choices = DataValidation::new()
                    .allow_list_strings(&Status::ALL.map(Status::as_str))?
                    .ignore_blank(true);
                let col = col as u16;
                sheet.add_data_validation(1, col, records.len() as u32, col, &choices)?;
                true
            }
            _ => false,
        };
        sheet.autofit();

        workbook.save(&self.path)?;
        Ok(dropdown)
    }
}

impl Sink for XlsxSink {
    fn write(
        &mut self,
        header: &[String],
        records: &[EnrichedRecord],
    ) -> Result<SinkOutcome, SinkError> {
        let status_dropdown = self
            .build(header, records)
            .map_err(|source| SinkError::Xlsx {
                path: self.path.clone(),
                source,
            })?;
        info!(
            target: "pipeline.sink",
            path = %self.path.display(),
            records = records.len(),
            status_dropdown,
            "workbook written"
        );
        Ok(SinkOutcome::Saved {
            path: self.path.clone(),
            records: records.len(),
            status_dropdown,
        })
    }
}

/// Prints every record as a labelled block.
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for ConsoleSink<W> {
    fn write(
        &mut self,
        header: &[String],
        records: &[EnrichedRecord],
    ) -> Result<SinkOutcome, SinkError> {
        let columns = console_columns(header);
        let width = columns.iter().map(|&i| header[i].len()).max().unwrap_or(0);
        for record in records {
            let row = row(record);
            writeln!(self.out, "--------------------")?;
            for &i in &columns {
                let value = row.get(i).map_or("", String::as_str);
                writeln!(self.out, "{:<width$} : {value}", header[i])?;
            }
        }
        self.out.flush()?;
        Ok(SinkOutcome::Printed {
            records: records.len(),
        })
    }
}

/// Console blocks lead with the name, then the company, and leave `Status` out.
fn console_columns(header: &[String]) -> Vec<usize> {
    [1, 0]
        .into_iter()
        .chain(2..header.len())
        .filter(|&i| i < header.len() && header[i] != STATUS_COLUMN)
        .collect()
}
