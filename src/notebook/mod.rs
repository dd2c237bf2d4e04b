//! Notebook normalization
//!
//! Reads nbformat v4 documents, clears execution state and writes them back.

mod cleaner;
mod discover;
mod model;

pub use cleaner::{clean, needs_cleaning, normalize, parse, render};
pub use discover::{
    discover_and_clean, discover_dirty, find_notebooks, CleanReport, ErrorPolicy,
    NOTEBOOK_EXTENSION,
};
pub use model::{Cell, CellType, Notebook, Source, SUPPORTED_NBFORMAT};
