//! Dataset import: typed cells, delimited text, workbooks and the
//! background import worker.

mod cell;
mod parser;
mod source;
mod worker;
pub mod workbook;

pub use cell::CellValue;
pub use parser::{read_delimited, Parser, ParserConfig};
pub use source::{Column, Dataset, SourceMetadata};
pub use worker::{ImportOutcome, ImportRequest, ImportWorker};
