//! Export driver: location → period → data element, written straight to CSV.
//!
//! # Example
//!
//! ```rust,ignore
//! use dataexport::{DataElementExporter, ExportConfig, MemoryDataset};
//!
//! let dataset = MemoryDataset::from_path("dataset.json")?;
//! let exporter = DataElementExporter::new(&dataset, &dataset, ExportConfig::default());
//! let summary = exporter.export_data(&request)?;
//! println!("{} rows in {}", summary.rows_written, summary.path.display());
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::basic_info::basic_info;
use super::filter::filter_data_locations;
use super::headers::{export_data_headers, CSV_FILE_EXTENSION};
use super::visitor::DataPointVisitor;
use crate::config::ExportConfig;
use crate::error::ExportResult;
use crate::models::{DataElement, DataExport, DataLocation, Locale, Period};
use crate::store::{LocationService, ValueStore};

/// Outcome of a finished export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    /// The written file; nothing removes it afterwards
    pub path: PathBuf,
    pub locations: usize,
    pub periods: usize,
    pub data_elements: usize,
    /// Triples for which a value was stored, `null` included
    pub values_found: usize,
    /// Data rows, header excluded
    pub rows_written: usize,
}

/// Counters gathered while writing rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub values_found: usize,
    pub rows_written: usize,
}

/// Excel dialect: comma separated, CRLF, quotes only where needed.
pub fn excel_writer<W: Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b',')
        .terminator(csv::Terminator::CRLF)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(inner)
}

/// Writes data-element values of a location hierarchy to CSV.
pub struct DataElementExporter<'a> {
    locations: &'a dyn LocationService,
    values: &'a dyn ValueStore,
    config: ExportConfig,
    locale: Locale,
}

impl<'a> DataElementExporter<'a> {
    pub fn new(
        locations: &'a dyn LocationService,
        values: &'a dyn ValueStore,
        config: ExportConfig,
    ) -> Self {
        let locale = config.locale();
        Self {
            locations,
            values,
            config,
            locale,
        }
    }

    /// Resolve `export` and write its file.
    pub fn export_data(&self, export: &DataExport) -> ExportResult<ExportSummary> {
        debug!(export = ?export, "Exporting data");

        let data_locations =
            filter_data_locations(self.locations, &export.type_codes, &export.location_codes);
        let periods = self.resolve_periods(&export.period_codes);
        let data_elements = self.resolve_data_elements(&export.data_element_codes);

        self.export_data_elements(&export.code, &data_locations, &periods, &data_elements)
    }

    /// Write the given cross-product to a new `<file_name>*.csv` file.
    pub fn export_data_elements(
        &self,
        file_name: &str,
        data_locations: &[&DataLocation],
        periods: &[&Period],
        data_elements: &[&DataElement],
    ) -> ExportResult<ExportSummary> {
        debug!(
            file_name,
            locations = data_locations.len(),
            periods = periods.len(),
            data_elements = data_elements.len(),
            "Exporting data elements"
        );

        let (file, path) = tempfile::Builder::new()
            .prefix(file_name)
            .suffix(CSV_FILE_EXTENSION)
            .tempfile_in(self.config.output_dir())?
            .keep()
            .map_err(|e| e.error)?;

        let mut writer = excel_writer(BufWriter::new(file));
        let stats = self.write_data_elements(&mut writer, data_locations, periods, data_elements)?;
        close(writer)?;

        info!(
            path = %path.display(),
            rows = stats.rows_written,
            values = stats.values_found,
            "Export written"
        );

        Ok(ExportSummary {
            path,
            locations: data_locations.len(),
            periods: periods.len(),
            data_elements: data_elements.len(),
            values_found: stats.values_found,
            rows_written: stats.rows_written,
        })
    }

    /// Header, then the rows of every triple in nesting order.
    ///
    /// Rows are written as soon as they are produced. On error the writer is
    /// left to its owner; nothing already written is undone.
    pub fn write_data_elements<W: Write>(
        &self,
        writer: &mut csv::Writer<W>,
        data_locations: &[&DataLocation],
        periods: &[&Period],
        data_elements: &[&DataElement],
    ) -> ExportResult<WriteStats> {
        writer.write_record(self.export_data_headers())?;

        let mut stats = WriteStats::default();
        for &location in data_locations {
            for &period in periods {
                for &data_element in data_elements {
                    let Some(lines) = self.export_line_for_value(location, period, data_element)?
                    else {
                        continue;
                    };
                    stats.values_found += 1;
                    for line in &lines {
                        writer.write_record(line)?;
                        stats.rows_written += 1;
                    }
                }
            }
        }
        Ok(stats)
    }

    /// Rows for one triple; `None` when no value is stored.
    ///
    /// A stored value with no non-null leaf gives `Some` with no rows.
    pub fn export_line_for_value(
        &self,
        location: &DataLocation,
        period: &Period,
        data_element: &DataElement,
    ) -> ExportResult<Option<Vec<Vec<String>>>> {
        let Some(data_value) = self.values.data_element_value(data_element, location, period)?
        else {
            return Ok(None);
        };

        let mut visitor = DataPointVisitor::default();
        if !data_value.is_null() {
            visitor.set_basic_info(self.basic_info(location, period, data_element));
            visitor.visit(&data_element.value_type, &data_value.value);
        }
        self.values.release(data_value);

        Ok(Some(visitor.into_lines()))
    }

    /// Descriptive prefix for one triple, see [`basic_info`].
    pub fn basic_info(
        &self,
        location: &DataLocation,
        period: &Period,
        data_element: &DataElement,
    ) -> Vec<String> {
        basic_info(self.locations, &self.locale, location, period, data_element)
    }

    /// Column names for the current hierarchy.
    pub fn export_data_headers(&self) -> Vec<String> {
        export_data_headers(&self.locations.list_levels())
    }

    fn resolve_periods(&self, codes: &[String]) -> Vec<&'a Period> {
        let values = self.values;
        codes
            .iter()
            .filter_map(|code| {
                let period = values.find_period_by_code(code);
                if period.is_none() {
                    warn!(code = %code, "Skipping unknown period");
                }
                period
            })
            .collect()
    }

    fn resolve_data_elements(&self, codes: &[String]) -> Vec<&'a DataElement> {
        let values = self.values;
        codes
            .iter()
            .filter_map(|code| {
                let element = values.find_data_element_by_code(code);
                if element.is_none() {
                    warn!(code = %code, "Skipping unknown data element");
                }
                element
            })
            .collect()
    }
}

/// Flush everything down to the file.
fn close(writer: csv::Writer<BufWriter<File>>) -> ExportResult<()> {
    let buffered = writer.into_inner().map_err(|e| e.into_error())?;
    let file = buffered.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}
