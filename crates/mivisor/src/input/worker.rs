//! Background spreadsheet import.
//!
//! Reading a large workbook can take seconds, so the import runs on its own
//! thread and reports back through a channel. Only one import may be in
//! flight at a time; a second request is rejected until the first outcome
//! has been collected.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use tracing::{debug, warn};

use super::parser::read_delimited;
use super::source::Dataset;
use super::workbook;
use crate::error::{MivisorError, Result};

/// What to import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportRequest {
    /// One worksheet of a workbook.
    Workbook { path: PathBuf, sheet: String },
    /// A CSV/TSV file.
    Delimited { path: PathBuf },
}

impl ImportRequest {
    /// Pick the request kind from the file extension. Workbooks need a sheet.
    pub fn for_path(path: impl Into<PathBuf>, sheet: Option<&str>) -> Result<Self> {
        let path = path.into();
        if workbook::is_workbook(&path) {
            let sheet = sheet.ok_or_else(|| {
                MivisorError::Validation(format!(
                    "a worksheet name is required to import '{}'",
                    path.display()
                ))
            })?;
            Ok(ImportRequest::Workbook {
                path,
                sheet: sheet.to_string(),
            })
        } else {
            Ok(ImportRequest::Delimited { path })
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ImportRequest::Workbook { path, .. } | ImportRequest::Delimited { path } => path,
        }
    }

    /// Run the import on the current thread.
    pub fn run(&self) -> Result<Dataset> {
        match self {
            ImportRequest::Workbook { path, sheet } => workbook::read_sheet(path, sheet),
            ImportRequest::Delimited { path } => read_delimited(path),
        }
    }
}

/// Completion of an import.
#[derive(Debug)]
pub struct ImportOutcome {
    pub request: ImportRequest,
    pub result: Result<Dataset>,
}

#[derive(Debug)]
struct InFlight {
    request: ImportRequest,
    receiver: Receiver<ImportOutcome>,
}

/// Runs imports off the calling thread, one at a time.
#[derive(Debug, Default)]
pub struct ImportWorker {
    in_flight: Option<InFlight>,
}

impl ImportWorker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an import has been started and its outcome not yet collected.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start an import in the background.
    pub fn submit(&mut self, request: ImportRequest) -> Result<()> {
        if self.is_busy() {
            warn!(path = %request.path().display(), "import rejected, another is in flight");
            return Err(MivisorError::ImportInProgress);
        }

        let (sender, receiver) = mpsc::channel();
        let job = request.clone();
        debug!(path = %job.path().display(), "starting background import");

        thread::spawn(move || {
            let result = job.run();
            // The receiver may have been dropped with the worker.
            let _ = sender.send(ImportOutcome {
                request: job,
                result,
            });
        });

        self.in_flight = Some(InFlight { request, receiver });
        Ok(())
    }

    /// Collect the outcome if the import has finished, without blocking.
    pub fn poll(&mut self) -> Option<ImportOutcome> {
        let in_flight = self.in_flight.as_ref()?;
        match in_flight.receiver.try_recv() {
            Ok(outcome) => {
                self.in_flight = None;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => self.in_flight.take().map(Self::lost),
        }
    }

    /// Block until the in-flight import finishes.
    pub fn wait(&mut self) -> Option<ImportOutcome> {
        let in_flight = self.in_flight.take()?;
        match in_flight.receiver.recv() {
            Ok(outcome) => Some(outcome),
            Err(_) => Some(Self::lost(in_flight)),
        }
    }

    fn lost(in_flight: InFlight) -> ImportOutcome {
        ImportOutcome {
            result: Err(MivisorError::ImportFailed(format!(
                "import of '{}' stopped without a result",
                in_flight.request.path().display()
            ))),
            request: in_flight.request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_request_for_path() {
        let req = ImportRequest::for_path("a.xlsx", Some("Sheet1")).unwrap();
        assert!(matches!(req, ImportRequest::Workbook { ref sheet, .. } if sheet == "Sheet1"));
        assert!(ImportRequest::for_path("a.xlsx", None).is_err());
        assert!(matches!(
            ImportRequest::for_path("a.csv", None).unwrap(),
            ImportRequest::Delimited { .. }
        ));
    }

    #[test]
    fn test_second_submit_rejected_while_busy() {
        let file = csv_file("Organism,AMP\nE.coli,R\n");
        let mut worker = ImportWorker::new();
        worker
            .submit(ImportRequest::Delimited {
                path: file.path().to_path_buf(),
            })
            .unwrap();

        let second = worker.submit(ImportRequest::Delimited {
            path: file.path().to_path_buf(),
        });
        assert!(matches!(second, Err(MivisorError::ImportInProgress)));

        let outcome = worker.wait().expect("an outcome");
        let dataset = outcome.result.unwrap();
        assert_eq!(dataset.column_names(), vec!["Organism", "AMP"]);
        assert!(!worker.is_busy());
    }

    #[test]
    fn test_failed_import_reports_error() {
        let mut worker = ImportWorker::new();
        worker
            .submit(ImportRequest::Workbook {
                path: PathBuf::from("missing/book.xlsx"),
                sheet: "Sheet1".into(),
            })
            .unwrap();
        let outcome = worker.wait().unwrap();
        assert!(matches!(
            outcome.result,
            Err(MivisorError::WorkbookOpen { .. })
        ));
    }

    #[test]
    fn test_poll_idle_worker() {
        let mut worker = ImportWorker::new();
        assert!(worker.poll().is_none());
        assert!(worker.wait().is_none());
    }
}
